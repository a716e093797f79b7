use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::env;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    /// Deep-merged over the exchange descriptor after all ancestors
    pub descriptor_overrides: Option<Value>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 5)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("descriptor_overrides", &self.descriptor_overrides)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("max_retries", &self.max_retries)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            descriptor_overrides: Option<Value>,
            #[serde(default = "default_timeout")]
            timeout_seconds: u64,
            #[serde(default = "default_retries")]
            max_retries: u32,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            descriptor_overrides: helper.descriptor_overrides,
            timeout_seconds: helper.timeout_seconds,
            max_retries: helper.max_retries,
        })
    }
}

const fn default_timeout() -> u64 {
    30
}

const fn default_retries() -> u32 {
    3
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            descriptor_overrides: None,
            timeout_seconds: default_timeout(),
            max_retries: default_retries(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `WEX_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `WEX_SECRET_KEY`)
    /// - `{EXCHANGE}_TIMEOUT_SECONDS` (optional, defaults to 30)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);
        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let timeout_seconds = match env::var(&timeout_var) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{}: {}", timeout_var, e))
            })?,
            Err(_) => default_timeout(),
        };

        Ok(Self::new(api_key, secret_key).timeout(timeout_seconds))
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // No file is fine, system env vars still apply
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has credentials for private endpoints
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Deep-merge `overrides` over the exchange descriptor (e.g. to repoint `urls`)
    #[must_use]
    pub fn descriptor_overrides(mut self, overrides: Value) -> Self {
        self.descriptor_overrides = Some(overrides);
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_redacts_secrets() {
        let config = ExchangeConfig::new("key".to_string(), "very-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("very-secret"));
    }

    #[test]
    fn test_read_only_has_no_credentials() {
        assert!(!ExchangeConfig::read_only().has_credentials());
        assert!(ExchangeConfig::new("k".to_string(), "s".to_string()).has_credentials());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s"}"#).unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_retries, 3);
        assert!(config.descriptor_overrides.is_none());
        assert_eq!(config.secret_key(), "s");
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = ExchangeConfig::from_env("LOTUSX_TEST_ABSENT_PREFIX").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(_)));
    }
}
