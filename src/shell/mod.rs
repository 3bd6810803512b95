//! External command execution and shell word handling.

pub mod command;
pub mod words;

pub use command::{execute, execute_shell, CommandResult, CommandRunner, ShellRunner};
