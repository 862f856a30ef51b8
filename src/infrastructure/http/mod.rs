// HTTP module - remote teaching API adapter
pub mod client;

pub use client::{HttpClientFactory, HttpCourseClient};
