/*
 * Responsibility
 * - Load settings from the environment once at startup (.env via dotenvy)
 * - Validate them (missing / invalid values abort startup)
 * - Hand the auth part to services as an explicit AuthSettings struct
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the key resolver and token verifier need. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwks_url: Url,
    pub audience: String,
    pub issuer: String,
    pub jwks_timeout: Duration,
    pub leeway_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup (the environment in production).
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let port: u16 = get("PORT").and_then(|s| s.parse().ok()).unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwks_url = Url::parse(&required("JWKS_URL")?)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(ConfigError::Invalid("JWKS_URL"))?;

        if jwks_url.scheme() != "https" {
            tracing::warn!(url = %jwks_url, "JWKS_URL should use https");
        }

        let audience = required("AUTH_AUDIENCE")?;
        let issuer = required("AUTH_ISSUER")?;

        let jwks_timeout_seconds = match get("JWKS_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("JWKS_TIMEOUT_SECONDS"))?,
            None => 10,
        };

        let leeway_seconds = match get("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 60,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth: AuthSettings {
                jwks_url,
                audience,
                issuer,
                jwks_timeout: Duration::from_secs(jwks_timeout_seconds),
                leeway_seconds,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const BASE: [(&str, &str); 3] = [
        ("JWKS_URL", "https://issuer.example/.well-known/jwks.json"),
        ("AUTH_AUDIENCE", "my-api"),
        ("AUTH_ISSUER", "https://issuer.example/"),
    ];

    #[test]
    fn defaults_apply() {
        let config = load(&BASE).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.auth.jwks_timeout, Duration::from_secs(10));
        assert_eq!(config.auth.leeway_seconds, 60);
        assert_eq!(config.auth.audience, "my-api");
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("JWKS_TIMEOUT_SECONDS", "3"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "0"),
        ]);

        let config = load(&pairs).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.auth.jwks_timeout, Duration::from_secs(3));
        assert_eq!(config.auth.leeway_seconds, 0);
    }

    #[test]
    fn missing_required_values_fail() {
        assert_eq!(
            load(&BASE[1..]).unwrap_err(),
            ConfigError::Missing("JWKS_URL")
        );
        assert_eq!(
            load(&[BASE[0], BASE[2]]).unwrap_err(),
            ConfigError::Missing("AUTH_AUDIENCE")
        );
        assert_eq!(
            load(&[BASE[0], BASE[1], ("AUTH_ISSUER", "  ")]).unwrap_err(),
            ConfigError::Missing("AUTH_ISSUER")
        );
    }

    #[test]
    fn invalid_values_fail() {
        let mut pairs = BASE.to_vec();
        pairs[0] = ("JWKS_URL", "ftp://issuer.example/jwks");
        assert_eq!(load(&pairs).unwrap_err(), ConfigError::Invalid("JWKS_URL"));

        let mut pairs = BASE.to_vec();
        pairs.push(("JWKS_TIMEOUT_SECONDS", "0"));
        assert_eq!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid("JWKS_TIMEOUT_SECONDS")
        );

        for bad in ["sixty", "-1", ""] {
            let mut pairs = BASE.to_vec();
            pairs.push(("ACCESS_TOKEN_LEEWAY_SECONDS", bad));
            assert_eq!(
                load(&pairs).unwrap_err(),
                ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"),
                "{bad:?}"
            );
        }
    }
}
