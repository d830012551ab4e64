//! Command line interface of polylemma.

pub mod args;
pub mod commands;
pub mod output;

pub use args::PolylemmaArgs;
pub use commands::execute_command;
