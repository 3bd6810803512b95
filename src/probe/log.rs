//! The probe log.
//!
//! Every compile, link and helper invocation made during a run is recorded
//! in a single append-only text stream, normally `<outdir>/probe.log`. The
//! log exists for humans wondering why a library was not detected; nothing
//! ever reads it back.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

enum Target {
    Writer(Box<dyn Write>),
    Memory(Vec<String>),
}

/// Append-only, line-oriented log of a probing run.
pub struct ProbeLog {
    target: Target,
    write_failed: bool,
}

impl ProbeLog {
    /// Create (truncating) a log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Log to an arbitrary writer.
    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
            write_failed: false,
        }
    }

    /// Keep log lines in memory, retrievable via [`ProbeLog::lines`].
    pub fn memory() -> Self {
        Self {
            target: Target::Memory(Vec::new()),
            write_failed: false,
        }
    }

    /// Append one line.
    pub fn line(&mut self, message: impl Display) {
        match &mut self.target {
            Target::Memory(lines) => lines.push(message.to_string()),
            Target::Writer(out) => {
                if let Err(e) = writeln!(out, "{}", message) {
                    if !self.write_failed {
                        tracing::warn!("Failed to write probe log: {}", e);
                        self.write_failed = true;
                    }
                }
            }
        }
    }

    /// Append a block of text, one log line per line of input.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// Lines recorded so far; empty unless created with [`ProbeLog::memory`].
    pub fn lines(&self) -> &[String] {
        match &self.target {
            Target::Memory(lines) => lines,
            Target::Writer(_) => &[],
        }
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    /// Flush buffered output to the underlying writer.
    pub fn flush(&mut self) {
        if let Target::Writer(out) = &mut self.target {
            if let Err(e) = out.flush() {
                tracing::warn!("Failed to flush probe log: {}", e);
            }
        }
    }
}

impl Drop for ProbeLog {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for ProbeLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.target {
            Target::Writer(_) => "writer",
            Target::Memory(_) => "memory",
        };
        f.debug_struct("ProbeLog").field("target", &kind).finish()
    }
}
