//! Bearer credentials for the scheduling service
//!
//! Providers are consulted at the start of every network operation, so a
//! token written by an external sign-in flow is picked up without restarting
//! the session.

use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Environment variable checked by [`EnvCredential::from_default_env`]
pub const TOKEN_ENV: &str = "VET_BOOKING_TOKEN";

/// Opaque bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token; blank input yields `None`
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[allow(dead_code)]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Source of the bearer credential
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` when the user is not signed in
    fn bearer_token(&self) -> Option<BearerToken>;
}

/// Fixed credential, mostly for tests and scripted runs
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct StaticCredential(Option<BearerToken>);

#[allow(dead_code)]
impl StaticCredential {
    pub fn new(token: &str) -> Self {
        Self(BearerToken::new(token))
    }

    pub fn absent() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredential {
    fn bearer_token(&self) -> Option<BearerToken> {
        self.0.clone()
    }
}

/// Reads the token from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }

    pub fn from_default_env() -> Self {
        Self::new(TOKEN_ENV)
    }
}

impl CredentialProvider for EnvCredential {
    fn bearer_token(&self) -> Option<BearerToken> {
        std::env::var(&self.var).ok().and_then(BearerToken::new)
    }
}

/// Token persisted by the sign-in flow, re-read on every call
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for TokenFile {
    fn bearer_token(&self) -> Option<BearerToken> {
        match fs::read_to_string(&self.path) {
            Ok(content) => BearerToken::new(content),
            Err(e) => {
                tracing::debug!("No token at {}: {e}", self.path.display());
                None
            }
        }
    }
}

/// First provider that yields a token wins
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialProvider for CredentialChain {
    fn bearer_token(&self) -> Option<BearerToken> {
        self.providers.iter().find_map(|p| p.bearer_token())
    }
}
