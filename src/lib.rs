//! memcli library
//!
//! Command-line front end for a course-teaching API: argument parsing,
//! command dispatch, response rendering and the HTTP adapter behind them.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::cli::commands::{execute_command, Outcome};
pub use crate::core::client::{ClientFactory, CourseClient};
pub use crate::domain::config::MemCliConfig;
pub use crate::domain::error::{MemCliError, MemCliResult};
