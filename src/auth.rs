//! Credential acquisition
//!
//! The credential is read once before the crawl starts and handed to the
//! remote reader by value; nothing mutates it afterwards.

use crate::config::AuthConfig;
use crate::ConfigError;
use std::fmt;

/// Username and token sent as HTTP Basic authorization on every request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    token: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Reads the token from the environment variable named in the config
    ///
    /// # Returns
    ///
    /// * `Ok(Credential)` - The variable is set and non-empty
    /// * `Err(ConfigError::MissingCredential)` - The variable is unset or empty
    pub fn from_env(config: &AuthConfig) -> Result<Self, ConfigError> {
        match std::env::var(&config.token_env) {
            Ok(token) if !token.trim().is_empty() => {
                Ok(Self::new(config.username.clone(), token.trim()))
            }
            _ => Err(ConfigError::MissingCredential(config.token_env.clone())),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
