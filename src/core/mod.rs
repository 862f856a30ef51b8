// Core module - Client interface consumed by the command handlers
pub mod client;

pub use client::{ClientFactory, CourseClient};
