//! Invocation configuration read from the environment.

use std::{collections::HashMap, fmt::Display, time::Duration};

use url::Url;

/// Environment variable holding the AWS region of the bucket.
pub const REGION_VAR: &str = "AWS_REGION";

/// Environment variable holding the proxy (CloudFront) domain url.
pub const PROXY_DOMAIN_VAR: &str = "PROXY_CLOUDFRONT_URL";

/// Environment variable overriding the validity of the pre-signed urls.
pub const EXPIRATION_VAR: &str = "PRESIGN_EXPIRATION_SECONDS";

/// Default validity of a pre-signed url, in seconds.
pub const DEFAULT_EXPIRATION_SECS: u64 = 10_000;

/// Longest validity SigV4 accepts for a pre-signed url (7 days).
pub const MAX_EXPIRATION_SECS: u64 = 604_800;

/// Source of environment variables.
pub trait Environment: Send + Sync {
    /// Look up a variable, returning `None` when it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Error raised when the configuration is incomplete or malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// One or more required variables are unset or empty.
    Missing(Vec<&'static str>),
    /// A variable is set to a value that cannot be used.
    Invalid {
        /// Name of the offending variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(names) => {
                write!(f, "You must set environment: {}", names.join(", "))
            }
            ConfigError::Invalid { name, reason } => {
                write!(f, "Invalid environment {name}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated configuration of a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    region: String,
    proxy_domain: String,
    expiration: Duration,
}

impl ProxyConfig {
    /// Create a configuration with the default expiration.
    pub fn new(region: impl Into<String>, proxy_domain: impl Into<String>) -> Self {
        let proxy_domain: String = proxy_domain.into();
        Self {
            region: region.into(),
            proxy_domain: proxy_domain.trim_end_matches('/').to_owned(),
            expiration: Duration::from_secs(DEFAULT_EXPIRATION_SECS),
        }
    }

    /// Read and validate the configuration.
    ///
    /// All required variables are checked before failing, so a single error
    /// names every missing variable in check order.
    pub fn load(env: &dyn Environment) -> Result<Self, ConfigError> {
        let region = non_empty(env, REGION_VAR);
        let proxy_domain = non_empty(env, PROXY_DOMAIN_VAR);

        let (region, proxy_domain) = match (region, proxy_domain) {
            (Some(region), Some(proxy_domain)) => (region, proxy_domain),
            (region, proxy_domain) => {
                let mut missing = vec![];
                if region.is_none() {
                    missing.push(REGION_VAR);
                }
                if proxy_domain.is_none() {
                    missing.push(PROXY_DOMAIN_VAR);
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        validate_region(&region)?;
        validate_proxy_domain(&proxy_domain)?;
        let expiration = match non_empty(env, EXPIRATION_VAR) {
            Some(value) => parse_expiration(&value)?,
            None => Duration::from_secs(DEFAULT_EXPIRATION_SECS),
        };

        Ok(Self::new(region, proxy_domain).with_expiration(expiration))
    }

    /// Override the validity of the pre-signed urls.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// The AWS region of the bucket.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The proxy domain without trailing slash.
    pub fn proxy_domain(&self) -> &str {
        &self.proxy_domain
    }

    /// Validity of the pre-signed urls.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

fn non_empty(env: &dyn Environment, name: &str) -> Option<String> {
    env.var(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn validate_region(value: &str) -> Result<(), ConfigError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: REGION_VAR,
            reason: format!("`{value}` is not a region name"),
        })
    }
}

fn validate_proxy_domain(value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: PROXY_DOMAIN_VAR,
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

fn parse_expiration(value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_EXPIRATION_SECS).contains(secs))
        .ok_or_else(|| ConfigError::Invalid {
            name: EXPIRATION_VAR,
            reason: format!("expected seconds between 1 and {MAX_EXPIRATION_SECS}, got `{value}`"),
        })?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn load_complete_config() {
        let env = env(&[
            (REGION_VAR, "us-east-1"),
            (PROXY_DOMAIN_VAR, "https://proxy.example.io"),
        ]);
        let config = ProxyConfig::load(&env).unwrap();
        assert_eq!(config.region(), "us-east-1");
        assert_eq!(config.proxy_domain(), "https://proxy.example.io");
        assert_eq!(config.expiration(), Duration::from_secs(10_000));
    }

    #[test]
    fn missing_everything_names_both_variables() {
        let err = ProxyConfig::load(&env(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![REGION_VAR, PROXY_DOMAIN_VAR])
        );
        assert_eq!(
            err.to_string(),
            "You must set environment: AWS_REGION, PROXY_CLOUDFRONT_URL"
        );
    }

    #[test]
    fn missing_proxy_domain_only() {
        let err = ProxyConfig::load(&env(&[(REGION_VAR, "eu-west-1")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You must set environment: PROXY_CLOUDFRONT_URL"
        );
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let env = env(&[(REGION_VAR, ""), (PROXY_DOMAIN_VAR, "https://proxy.example.io")]);
        let err = ProxyConfig::load(&env).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![REGION_VAR]));
    }

    #[test]
    fn padded_values_are_trimmed() {
        let env = env(&[
            (REGION_VAR, " us-east-1\n"),
            (PROXY_DOMAIN_VAR, "  https://proxy.example.io "),
        ]);
        let config = ProxyConfig::load(&env).unwrap();
        assert_eq!(config.region(), "us-east-1");
        assert_eq!(config.proxy_domain(), "https://proxy.example.io");
    }

    #[test]
    fn region_must_be_a_region_name() {
        for region in ["us east 1", "US-EAST-1", "us-east-1/evil"] {
            let env = env(&[(REGION_VAR, region), (PROXY_DOMAIN_VAR, "https://proxy.example.io")]);
            let err = ProxyConfig::load(&env).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: REGION_VAR, .. }), "{region}");
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let env = env(&[
            (REGION_VAR, "us-east-1"),
            (PROXY_DOMAIN_VAR, "https://proxy.example.io/"),
        ]);
        let config = ProxyConfig::load(&env).unwrap();
        assert_eq!(config.proxy_domain(), "https://proxy.example.io");
    }

    #[test]
    fn proxy_domain_must_be_http_url() {
        let relative = env(&[(REGION_VAR, "us-east-1"), (PROXY_DOMAIN_VAR, "proxy.example.io")]);
        assert!(matches!(
            ProxyConfig::load(&relative),
            Err(ConfigError::Invalid { name: PROXY_DOMAIN_VAR, .. })
        ));

        let ftp = env(&[(REGION_VAR, "us-east-1"), (PROXY_DOMAIN_VAR, "ftp://proxy.example.io")]);
        assert!(ProxyConfig::load(&ftp).is_err());
    }

    #[test]
    fn expiration_override() {
        let env = env(&[
            (REGION_VAR, "us-east-1"),
            (PROXY_DOMAIN_VAR, "https://proxy.example.io"),
            (EXPIRATION_VAR, "900"),
        ]);
        let config = ProxyConfig::load(&env).unwrap();
        assert_eq!(config.expiration(), Duration::from_secs(900));
    }

    #[test]
    fn expiration_out_of_range() {
        for value in ["0", "604801", "ten", "-5"] {
            let env = env(&[
                (REGION_VAR, "us-east-1"),
                (PROXY_DOMAIN_VAR, "https://proxy.example.io"),
                (EXPIRATION_VAR, value),
            ]);
            let err = ProxyConfig::load(&env).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: EXPIRATION_VAR, .. }), "{value}");
        }
    }
}
