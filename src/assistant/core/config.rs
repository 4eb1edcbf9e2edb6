//! Configuration for the assistant widget and its reply client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::core::role::UserRole;
use crate::assistant::core::settings::Settings;

/// Environment variable for the reply endpoint.
pub const REPLY_URL_ENV: &str = "TOURNEY_ASSISTANT_REPLY_URL";
/// Environment variable for the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "TOURNEY_ASSISTANT_TIMEOUT_SECS";
/// Environment variable for the initial reply language.
pub const LANGUAGE_ENV: &str = "TOURNEY_ASSISTANT_LANGUAGE";
/// Environment variable for the initial detail level.
pub const DETAIL_LEVEL_ENV: &str = "TOURNEY_ASSISTANT_DETAIL_LEVEL";
/// Environment variable for the signed-in role.
pub const ROLE_ENV: &str = "TOURNEY_ASSISTANT_ROLE";

/// Default reply endpoint.
const DEFAULT_REPLY_URL: &str = "http://127.0.0.1:3000/api/chat";

/// Top-level assistant configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Reply service settings.
    pub reply: ReplyConfig,
    /// Settings the widget starts with.
    pub settings: Settings,
    /// Role used to pick suggestions.
    pub role: Option<UserRole>,
}

impl AssistantConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from process environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable holds an unparsable value or the result is invalid.
    pub fn from_env() -> AssistantResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if a variable holds an unparsable value or the result is invalid.
    pub fn from_vars<F>(lookup: F) -> AssistantResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(REPLY_URL_ENV) {
            config.reply.endpoint = url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AssistantError::InvalidConfig(format!(
                    "{TIMEOUT_ENV} must be a number of seconds, got {raw:?}"
                ))
            })?;
            config.reply.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(LANGUAGE_ENV) {
            config.settings.language = raw.parse().map_err(|value| {
                AssistantError::InvalidConfig(format!("unknown language: {value}"))
            })?;
        }

        if let Some(raw) = lookup(DETAIL_LEVEL_ENV) {
            config.settings.detail_level = raw.parse().map_err(|value| {
                AssistantError::InvalidConfig(format!("unknown detail level: {value}"))
            })?;
        }

        // The auth layer may hand over roles this widget has no suggestions for.
        config.role = lookup(ROLE_ENV).as_deref().and_then(UserRole::from_name);

        config.validate()?;
        Ok(config)
    }

    /// Set the reply endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.reply.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.reply.request_timeout = timeout;
        self
    }

    /// Set the role.
    #[must_use]
    pub const fn with_role(mut self, role: Option<UserRole>) -> Self {
        self.role = role;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> AssistantResult<()> {
        if self.reply.request_timeout.is_zero() {
            return Err(AssistantError::InvalidConfig(
                "reply.request_timeout must be > 0".to_string(),
            ));
        }

        if self.reply.connect_timeout.is_zero() {
            return Err(AssistantError::InvalidConfig(
                "reply.connect_timeout must be > 0".to_string(),
            ));
        }

        let url = Url::parse(&self.reply.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AssistantError::InvalidConfig(format!(
                "reply.endpoint must be http(s), got {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

/// Reply service client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Endpoint receiving `POST {"message": ...}`.
    pub endpoint: String,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REPLY_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::assistant::core::settings::{DetailLevel, Language};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AssistantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reply.endpoint, DEFAULT_REPLY_URL);
        assert!(config.role.is_none());
    }

    #[test]
    fn test_from_vars_reads_everything() {
        let env = vars(&[
            (REPLY_URL_ENV, "https://example.test/reply"),
            (TIMEOUT_ENV, "5"),
            (LANGUAGE_ENV, "bilingual"),
            (DETAIL_LEVEL_ENV, "expert"),
            (ROLE_ENV, "judge"),
        ]);
        let config = AssistantConfig::from_vars(|name| env.get(name).cloned());
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.reply.endpoint, "https://example.test/reply");
        assert_eq!(config.reply.request_timeout, Duration::from_secs(5));
        assert_eq!(config.settings.language, Language::Bilingual);
        assert_eq!(config.settings.detail_level, DetailLevel::Expert);
        assert_eq!(config.role, Some(UserRole::Judge));
    }

    #[test]
    fn test_unknown_role_falls_back_to_none() {
        let env = vars(&[(ROLE_ENV, "spectator")]);
        let config = AssistantConfig::from_vars(|name| env.get(name).cloned());
        assert!(matches!(config, Ok(ref c) if c.role.is_none()));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let env = vars(&[(TIMEOUT_ENV, "soon")]);
        let result = AssistantConfig::from_vars(|name| env.get(name).cloned());
        assert!(matches!(result, Err(AssistantError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = AssistantConfig::new().with_endpoint("ftp://example.test/reply");
        assert!(matches!(config.validate(), Err(AssistantError::InvalidConfig(_))));

        let config = AssistantConfig::new().with_endpoint("not a url");
        assert!(matches!(config.validate(), Err(AssistantError::Url(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AssistantConfig::new().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_durations_serialize_as_seconds() {
        let json = serde_json::to_value(ReplyConfig::default()).unwrap_or_default();
        assert_eq!(json["request_timeout"], 60);
        assert_eq!(json["connect_timeout"], 10);
    }
}
