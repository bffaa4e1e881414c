//! Runtime settings, read from the process environment (and `.env`).

use std::time::Duration;

use thiserror::Error;

use crate::encouragement::{Locale, Personality};

pub const CHATGPT_API_KEY: &str = "CHATGPT_API_KEY";
pub const QUIZ_LOCALE: &str = "QUIZ_LOCALE";
pub const QUIZ_PERSONALITY: &str = "QUIZ_PERSONALITY";
pub const FEEDBACK_TIMEOUT_SECS: &str = "FEEDBACK_TIMEOUT_SECS";

const DEFAULT_FEEDBACK_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means encouragement comes from the local phrase list only.
    pub chatgpt_api_key: Option<String>,
    pub locale: Locale,
    pub personality: Personality,
    pub feedback_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chatgpt_api_key: None,
            locale: Locale::default(),
            personality: Personality::default(),
            feedback_timeout: DEFAULT_FEEDBACK_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from any variable source. Unset and blank variables
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        config.chatgpt_api_key = get(CHATGPT_API_KEY).map(|k| k.trim().to_string());

        if let Some(locale) = get(QUIZ_LOCALE) {
            config.locale = locale.parse().map_err(|reason| ConfigError::Invalid {
                var: QUIZ_LOCALE,
                reason,
            })?;
        }

        if let Some(personality) = get(QUIZ_PERSONALITY) {
            config.personality = personality.parse().map_err(|reason| ConfigError::Invalid {
                var: QUIZ_PERSONALITY,
                reason,
            })?;
        }

        if let Some(secs) = get(FEEDBACK_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                var: FEEDBACK_TIMEOUT_SECS,
                reason: format!("expected a whole number of seconds, got {:?}", secs),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: FEEDBACK_TIMEOUT_SECS,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.feedback_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
