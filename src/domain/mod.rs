// Domain module - Errors, configuration and column data
pub mod columns;
pub mod config;
pub mod error;
