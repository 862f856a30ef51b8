use serde::{Deserialize, Serialize};

/// memcli configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemCliConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Stored credentials, lowest precedence
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Default output mode (text or json)
    #[serde(default = "default_output")]
    pub output: String,
    /// Base URL of the teaching API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Credentials kept in the config file
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output() -> String {
    "text".to_string()
}

fn default_api_url() -> String {
    "https://app.memrise.com/api".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: default_output(),
            api_url: default_api_url(),
            timeout_ms: default_timeout(),
        }
    }
}
