//! Shell-style word splitting and quoting.
//!
//! Flag strings produced by helper scripts are split the way a POSIX shell
//! would split them and then rejoined with single spaces, quoting any word
//! that would not survive a second split unchanged.

use crate::error::{ProbeError, Result};

/// Split `input` into words using POSIX shell quoting rules.
///
/// Supports single quotes (literal), double quotes (backslash escapes `"`,
/// `\`, `$` and `` ` ``) and backslash escapes outside quotes. An unclosed
/// quote fails with [`ProbeError::MalformedExpression`].
pub fn split(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unclosed(input)),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some('\n') => {}
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(unclosed(input)),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unclosed(input)),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some('\n') => {}
                    Some(c) => current.push(c),
                    None => return Err(unclosed(input)),
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Quote a single word so that [`split`] returns it unchanged.
pub fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', "'\"'\"'"))
}

/// Join words with single spaces, quoting where needed.
pub fn join<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_safe(c: char) -> bool {
    c.is_alphanumeric() || "_@%+=:,./-".contains(c)
}

fn unclosed(input: &str) -> ProbeError {
    ProbeError::MalformedExpression {
        expression: input.to_string(),
    }
}
