//! Server configuration

use ratesmart_classifiers::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Token accepted for admin operations when none is configured
pub const DEFAULT_ADMIN_TOKEN: &str = "admin-token";

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret for admin operations
    #[serde(default = "default_admin_token")]
    pub admin_token: String,

    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Request body limit in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Seconds a business session token stays valid after login
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Review analysis thresholds and lexicon overrides
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub port: Option<u16>,
    pub admin_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        // Use defaults when the file is absent
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(listen) = &overrides.listen {
            config.listen = listen.clone();
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }
        if let Some(token) = &overrides.admin_token {
            config.admin_token = token.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.admin_token.is_empty() {
            anyhow::bail!("admin_token may not be empty");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be positive");
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.session_ttl_secs) {
            anyhow::bail!(
                "session_ttl_secs must be in [1, {MAX_SESSION_TTL_SECS}], got {}",
                self.session_ttl_secs
            );
        }
        self.analysis.validate()?;
        Ok(())
    }

    pub fn uses_default_admin_token(&self) -> bool {
        self.admin_token == DEFAULT_ADMIN_TOKEN
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            admin_token: default_admin_token(),
            cors_allowed_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
            session_ttl_secs: default_session_ttl_secs(),
            analysis: AnalysisConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_admin_token() -> String {
    DEFAULT_ADMIN_TOKEN.to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_session_ttl_secs() -> u64 {
    60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("/nonexistent/ratesmart.yaml", &ConfigOverrides::default())
            .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.listen, "0.0.0.0");
        assert!(config.uses_default_admin_token());
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.session_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port: 9000\nadmin_token: from-file\nanalysis:\n  fake_review:\n    min_tokens: 5"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = ServerConfig::load(path, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.admin_token, "from-file");
        assert_eq!(config.analysis.fake_review.min_tokens, 5);
        assert_eq!(config.analysis.fake_review.min_chars, 10);

        let overrides = ConfigOverrides {
            port: Some(7000),
            admin_token: Some("from-env".into()),
            ..Default::default()
        };
        let config = ServerConfig::load(path, &overrides).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.admin_token, "from-env");
    }

    #[test]
    fn test_invalid_analysis_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "analysis:\n  fake_review:\n    repetition_ratio: 1.5").unwrap();
        let path = file.path().to_str().unwrap();

        assert!(ServerConfig::load(path, &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_ttl_secs: 0").unwrap();
        let path = file.path().to_str().unwrap();
        assert!(ServerConfig::load(path, &ConfigOverrides::default()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_ttl_secs: 300").unwrap();
        let path = file.path().to_str().unwrap();
        let config = ServerConfig::load(path, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(5));
    }

    #[test]
    fn test_empty_admin_token_rejected() {
        let overrides = ConfigOverrides {
            admin_token: Some(String::new()),
            ..Default::default()
        };
        assert!(ServerConfig::load("/nonexistent/ratesmart.yaml", &overrides).is_err());
    }
}
