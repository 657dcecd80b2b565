use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use crate::config::ScoringConfig;

/// Bearer credential for the prediction service. Debug output never shows the value.
#[derive(Debug, Clone)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("no scoring credential configured")]
    Unavailable,
    #[error("credential provider failed: {0}")]
    Provider(String),
}

/// Supplies the bearer credential for each scoring attempt.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn token(&self) -> Result<BearerToken, CredentialError>;
}

/// Serves a token fixed at startup, or reports it unavailable when none was configured.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    token: Option<Secret<String>>,
}

impl StaticCredentialProvider {
    pub fn new(token: Option<Secret<String>>) -> Self {
        Self { token }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.api_token.clone())
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn token(&self) -> Result<BearerToken, CredentialError> {
        self.token
            .as_ref()
            .map(|secret| BearerToken::new(secret.expose_secret().clone()))
            .ok_or(CredentialError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_unavailable() {
        let provider = StaticCredentialProvider::default();
        assert_eq!(provider.token().await.err(), Some(CredentialError::Unavailable));
    }

    #[tokio::test]
    async fn configured_token_is_served() {
        let provider = StaticCredentialProvider::new(Some(Secret::new("abc".to_string())));
        let token = provider.token().await.expect("token present");
        assert_eq!(token.expose(), "abc");
        assert!(!format!("{token:?}").contains("abc"));
    }
}
