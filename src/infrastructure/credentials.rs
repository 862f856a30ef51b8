// Credential resolution - options, then environment, then config file
use crate::cli::args::ParsedArguments;
use crate::cli::options::{CLIENT_ID, PASSWORD, USERNAME};
use crate::domain::config::CredentialsConfig;
use crate::domain::error::{MemCliError, MemCliResult};

pub const USERNAME_ENV: &str = "MEMRISE_USERNAME";
pub const PASSWORD_ENV: &str = "MEMRISE_PASSWORD";
pub const CLIENT_ID_ENV: &str = "MEMRISE_CLIENT_ID";

/// Resolved login for the remote API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: Option<String>,
}

impl Credentials {
    /// Resolve credentials; username and password are mandatory.
    ///
    /// Empty values count as absent at every level.
    pub fn resolve<F>(
        args: &ParsedArguments,
        stored: &CredentialsConfig,
        env: F,
    ) -> MemCliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |value: &String| !value.is_empty();
        let pick = |option: Option<&str>, var: &str, stored: &Option<String>| {
            option
                .map(str::to_string)
                .filter(present)
                .or_else(|| env(var).filter(present))
                .or_else(|| stored.clone().filter(present))
        };

        let username = pick(args.get(&USERNAME), USERNAME_ENV, &stored.username);
        let password = pick(args.get(&PASSWORD), PASSWORD_ENV, &stored.password);
        let client_id = pick(args.get(&CLIENT_ID), CLIENT_ID_ENV, &stored.client_id);

        match (username, password) {
            (Some(username), Some(password)) => {
                tracing::debug!(%username, has_client_id = client_id.is_some(), "resolved credentials");
                Ok(Self {
                    username,
                    password,
                    client_id,
                })
            }
            _ => Err(MemCliError::MissingCredentials),
        }
    }

    /// Resolve against the process environment.
    pub fn from_env(args: &ParsedArguments, stored: &CredentialsConfig) -> MemCliResult<Self> {
        Self::resolve(args, stored, |var| std::env::var(var).ok())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}
