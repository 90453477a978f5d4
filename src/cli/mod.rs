//! Command-line interface
//!
//! - Argument parsing structures
//! - Command implementations
//! - The interactive terminal driver

pub mod args;
pub mod commands;
pub mod interactive;
pub mod router;

pub use args::{Cli, Commands, QuizOptions};
pub use router::execute_command;
