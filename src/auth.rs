//! Bearer token resolution for the Octopod API.
//!
//! The token comes from the command line / environment; the last one used is
//! kept in `.cache/token` so later runs can start without it.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Result;

const CACHE: &str = ".cache";
const TOKEN_FILE: &str = ".cache/token";

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() { None } else { Some(Self(token)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of logs
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Pick the configured token, falling back to the cached one
pub fn resolve_token(configured: Option<&str>) -> Result<Option<BearerToken>> {
    if let Some(token) = configured.and_then(BearerToken::new) {
        fs::create_dir_all(CACHE)?;
        fs::write(TOKEN_FILE, token.as_str())?;
        tracing::debug!("Saved token to disk");
        return Ok(Some(token));
    }

    if Path::new(TOKEN_FILE).exists() {
        let cached = fs::read_to_string(TOKEN_FILE)?;
        tracing::info!("Using cached token");
        return Ok(BearerToken::new(cached));
    }

    tracing::warn!("No token configured, requests will be anonymous");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(BearerToken::new("   ").is_none());
        assert_eq!(BearerToken::new(" abc\n").map(|t| t.as_str().to_string()), Some("abc".to_string()));
    }

    #[test]
    fn debug_output_hides_secret() {
        let token = BearerToken::new("secret").expect("token");
        assert_eq!(format!("{:?}", token), "BearerToken(***)");
    }
}
