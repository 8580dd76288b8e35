//! Skin analysis service configuration

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Facial-analysis provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Regional detect endpoints, tried in order
    pub endpoints: Vec<String>,
    /// Per-endpoint request timeout in seconds
    pub timeout_secs: u64,
    /// Pause before the next endpoint after a 5xx HTML reply
    pub retry_backoff_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub sqlite_path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path() -> &'static str {
        "config.toml"
    }

    /// Secrets set in the environment win over file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("FACEPP_API_KEY") {
            self.provider.api_key = key;
        }
        if let Ok(secret) = std::env::var("FACEPP_API_SECRET") {
            self.provider.api_secret = secret;
        }
        if let Ok(secret) = std::env::var("DERMASCAN_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            provider: ProviderConfig {
                api_key: String::new(),
                api_secret: String::new(),
                endpoints: vec![
                    "https://api.faceplusplus.com/facepp/v3/detect".to_string(),
                    "https://api-us.faceplusplus.com/facepp/v3/detect".to_string(),
                ],
                timeout_secs: 12,
                retry_backoff_secs: 2,
            },
            auth: AuthConfig {
                token_secret: "dermascan-secret-change-in-production".to_string(),
            },
            storage: StorageConfig {
                sqlite_path: Some(PathBuf::from("data/scans.db")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
            [server]
            port = 8080

            [provider]
            api_key = "key"
            api_secret = "secret"
            endpoints = ["https://example.com/detect"]
            timeout_secs = 10
            retry_backoff_secs = 1

            [auth]
            token_secret = "test-secret"

            [storage]
            sqlite_path = "data/test.db"
        "#;

        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.provider.endpoints.len(), 1);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.auth.token_secret, "test-secret");
    }

    #[test]
    fn test_default_has_both_regional_endpoints() {
        let config = Config::default();
        assert_eq!(config.provider.endpoints.len(), 2);
        assert!(config.provider.endpoints[0].contains("faceplusplus.com"));
        // Credentials must come from the environment or the config file
        assert!(config.provider.api_key.is_empty());
    }
}
