//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `BFHL_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `BFHL_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `BFHL_IDENTITY__EMAIL=jane@example.com` sets the `identity.email` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use bfhl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Structure
//!
//! - **Server**: `host`, `port` - HTTP server binding configuration
//! - **Identity**: `identity.user_id`, `identity.email`, `identity.roll_number` - echoed in
//!   every classification response
//! - **Security**: `cors` - CORS settings for browser clients
//! - **Limits**: `limits.max_body_size` - request body cap in bytes
//! - **Features**: `enable_metrics`, `enable_otel_export` - Optional feature toggles
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! BFHL_PORT=8080
//!
//! # Override nested values
//! BFHL_IDENTITY__ROLL_NUMBER=ABCD123
//! BFHL_ENABLE_METRICS=false
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::classify::Identity;
use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "BFHL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Identity fields merged into every response
    pub identity: Identity,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
    /// Request limits
    pub limits: LimitsConfig,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials (cookies) in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600),
        }
    }
}

/// Request limits configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. Bodies carry base64 files, so this bounds the
    /// largest file that can be validated (roughly 3/4 of this value).
    /// Default: 10MB
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            identity: Identity::default(),
            cors: CorsConfig::default(),
            limits: LimitsConfig::default(),
            enable_metrics: true,
            enable_otel_export: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        let identity = &self.identity;
        for (field, value) in [
            ("user_id", &identity.user_id),
            ("email", &identity.email),
            ("roll_number", &identity.roll_number),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Internal {
                    operation: format!("validate config: identity.{field} must not be empty"),
                });
            }
        }

        if !identity.email.contains('@') {
            return Err(Error::Internal {
                operation: format!("validate config: identity.email '{}' is not an email address", identity.email),
            });
        }

        if self.limits.max_body_size == 0 {
            return Err(Error::Internal {
                operation: "validate config: limits.max_body_size must be greater than 0".to_string(),
            });
        }

        // Browsers refuse credentialed responses with a wildcard origin
        if self.cors.allow_credentials && self.cors.allowed_origins.contains(&CorsOrigin::Wildcard) {
            return Err(Error::Internal {
                operation: "validate config: cors.allow_credentials cannot be combined with a '*' origin".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables override specific values
            // (BFHL_CONFIG names the file itself and is not a config key)
            .merge(Env::prefixed("BFHL_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config.port, 3000);
            assert_eq!(config.identity, Identity::default());
            assert_eq!(config.limits.max_body_size, 10 * 1024 * 1024);
            assert!(config.enable_metrics);
            assert!(!config.enable_otel_export);

            Ok(())
        });
    }

    #[test]
    fn test_identity_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
identity:
  user_id: jane_roe_01012000
  email: jane@example.com
  roll_number: XYZ789
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.identity.user_id, "jane_roe_01012000");
            assert_eq!(config.identity.email, "jane@example.com");
            assert_eq!(config.identity.roll_number, "XYZ789");

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
port: 4000
identity:
  email: yaml@example.com
"#,
            )?;

            jail.set_env("BFHL_HOST", "127.0.0.1");
            jail.set_env("BFHL_PORT", "8080");
            jail.set_env("BFHL_IDENTITY__ROLL_NUMBER", "ENV001");

            let config = Config::load(&args("test.yaml"))?;

            // Env vars should override
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8080);
            assert_eq!(config.identity.roll_number, "ENV001");

            // YAML values should be preserved
            assert_eq!(config.identity.email, "yaml@example.com");
            // Untouched fields keep their defaults
            assert_eq!(config.identity.user_id, Identity::default().user_id);

            Ok(())
        });
    }

    #[test]
    fn test_cors_origins() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
cors:
  allowed_origins:
    - "https://app.example.com"
  allow_credentials: true
  max_age: 60
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(
                config.cors.allowed_origins,
                vec![CorsOrigin::Url(Url::parse("https://app.example.com").unwrap())]
            );
            assert!(config.cors.allow_credentials);
            assert_eq!(config.cors.max_age, Some(60));

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "prot: 8080\n")?;

            assert!(Config::load(&args("test.yaml")).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_config_validation_empty_identity() {
        let mut config = Config::default();
        config.identity.user_id = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("identity.user_id"));
    }

    #[test]
    fn test_config_validation_bad_email() {
        let mut config = Config::default();
        config.identity.email = "not-an-email".to_string();

        let message = config.validate().unwrap_err().to_string();
        assert!(message.starts_with("Failed to validate config: "), "{message}");
        assert!(message.contains("identity.email"));
    }

    #[test]
    fn test_config_validation_zero_body_limit() {
        let mut config = Config::default();
        config.limits.max_body_size = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_wildcard_with_credentials() {
        let mut config = Config::default();
        config.cors.allow_credentials = true;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("allow_credentials"));

        config.cors.allowed_origins = vec![CorsOrigin::Url(Url::parse("https://app.example.com").unwrap())];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_surfaces_validation_errors() {
        Jail::expect_with(|jail| {
            jail.set_env("BFHL_LIMITS__MAX_BODY_SIZE", "0");

            let err = Config::load(&args("missing.yaml")).unwrap_err();
            assert!(err.to_string().contains("max_body_size"));

            Ok(())
        });
    }
}
