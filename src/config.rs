//! Client configuration parsed from environment variables.

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{var} is not defined in environment variables; check your .env file")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    pub refresh_path: String,
    pub timeouts: Timeouts,
    pub environment: Environment,
}

impl ClientConfig {
    /// Config for a known base URL with every other setting at its default.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
            timeouts: Timeouts::default(),
            environment: Environment::Development,
        }
    }

    /// Like [`ClientConfig::new`], but rejects a base URL that `from_env`
    /// would reject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `api_url` is not an http(s) URL.
    pub fn parse(api_url: &str) -> Result<Self, ConfigError> {
        check_api_url(api_url)?;
        Ok(Self::new(api_url))
    }

    /// Build typed client config from environment variables.
    ///
    /// Required:
    /// - `ADMIN_API_URL`
    ///
    /// Optional:
    /// - `ADMIN_API_REFRESH_PATH`: default `/auth/refresh`
    /// - `ADMIN_API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `APP_ENV`: `development` (default) or `production`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("ADMIN_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing { var: "ADMIN_API_URL" })?;
        check_api_url(&api_url)?;

        let refresh_path = std::env::var("ADMIN_API_REFRESH_PATH").unwrap_or_else(|_| DEFAULT_REFRESH_PATH.to_owned());
        if !refresh_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: "ADMIN_API_REFRESH_PATH",
                reason: format!("'{refresh_path}' must start with '/'"),
            });
        }

        let timeouts = Timeouts {
            request_secs: env_parse_u64("ADMIN_API_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("ADMIN_API_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let environment = parse_environment(std::env::var("APP_ENV").ok().as_deref())?;

        Ok(Self { api_url: api_url.trim_end_matches('/').to_owned(), refresh_path, timeouts, environment })
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn check_api_url(api_url: &str) -> Result<(), ConfigError> {
    if api_url.starts_with("http://") || api_url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid { var: "ADMIN_API_URL", reason: format!("'{api_url}' is not an http(s) URL") })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_environment(raw: Option<&str>) -> Result<Environment, ConfigError> {
    match raw.map(str::trim).unwrap_or("development") {
        "" | "development" | "dev" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(ConfigError::Invalid {
            var: "APP_ENV",
            reason: format!("unknown environment '{other}' (expected 'development' or 'production')"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
