use thiserror::Error;

/// memcli unified error type
#[derive(Error, Debug)]
pub enum MemCliError {
    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid value for --{option}: \"{value}\". {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error("Invalid --field value: \"{0}\". Expected KEY=VALUE.")]
    InvalidField(String),

    #[error("{0}")]
    InvalidColumns(String),

    #[error("No columns provided. Pass --field KEY=VALUE (repeatable) or --columns '{{\"1\": \"value\"}}'.")]
    NoColumns,

    #[error("Missing credentials. Set MEMRISE_USERNAME and MEMRISE_PASSWORD env vars or pass --username/--password.")]
    MissingCredentials,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{operation} failed: {message}")]
    Client { operation: String, message: String },

    #[error("Output error: {0}")]
    Output(String),
}

impl MemCliError {
    pub(crate) fn invalid_option(option: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn client(operation: &str, message: impl Into<String>) -> Self {
        Self::Client {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

pub type MemCliResult<T> = Result<T, MemCliError>;
