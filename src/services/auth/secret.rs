//! Where the HS256 signing secret comes from.
//!
//! The secret is process-wide configuration, but it is read at issuance time
//! rather than captured at startup.

use std::fmt;

pub trait SecretSource: Send + Sync {
    /// Current secret, or `None` when unset. An empty string counts as unset.
    fn signing_secret(&self) -> Option<String>;
}

/// Reads the named environment variable on every call.
#[derive(Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl fmt::Debug for EnvSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSecret").field("var", &self.var).finish()
    }
}

impl SecretSource for EnvSecret {
    fn signing_secret(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|s| !s.is_empty())
    }
}

/// Fixed secret supplied by the embedding code.
#[derive(Clone)]
pub struct StaticSecret(String);

impl StaticSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticSecret(..)")
    }
}

impl SecretSource for StaticSecret {
    fn signing_secret(&self) -> Option<String> {
        Some(self.0.clone()).filter(|s| !s.is_empty())
    }
}
