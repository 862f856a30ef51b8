// CLI module - Command line interface
pub mod args;
pub mod commands;
pub mod options;
pub mod output;
pub mod registry;

pub use args::{Invocation, ParsedArguments};
pub use commands::{execute_command, route, run_command, CommandRequest, Outcome, Route};
pub use options::OutputMode;
pub use output::{render, ConsoleWriter, OutputWriter};
pub use registry::CommandId;
