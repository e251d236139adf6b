//! Credential and identity seams.
//!
//! The identity provider lives outside this crate. It is consulted through
//! [`CredentialProvider`] once per outgoing request; nothing here caches a token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::Result;

/// Environment variable read by [`EnvToken`] by default
pub const TOKEN_ENV: &str = "PICKWISE_TOKEN";

/// Source of bearer tokens for the prediction service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, or `None` when the user has no session.
    async fn token(&self) -> Result<Option<String>>;
}

/// Treat empty and whitespace-only tokens as missing
pub(crate) fn normalize_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Fixed token, mostly for scripts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV)
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn token(&self) -> Result<Option<String>> {
        Ok(std::env::var(&self.var).ok())
    }
}

/// Adapts an async closure, e.g. a session object's `get_token`
pub struct FnCredentials<F> {
    fetch: F,
}

impl<F, Fut> FnCredentials<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>>> + Send + 'static,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<F, Fut> CredentialProvider for FnCredentials<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>>> + Send + 'static,
{
    async fn token(&self) -> Result<Option<String>> {
        (self.fetch)().await
    }
}

/// Identity display fields handed over by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Option<String>,
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            email: Some(email.into()),
        }
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("N/A")
    }

    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or("N/A")
    }
}
