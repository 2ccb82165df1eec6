mod commands;
pub mod handlers;

pub use commands::{ClassifierArg, Cli, Commands};
