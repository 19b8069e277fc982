//! Bearer session tokens.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// An opaque bearer or refresh token.
///
/// Redacted in `Debug` output and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretToken(String);

impl SecretToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SecretToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Access and refresh token pair for the storefront API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: SecretToken,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<SecretToken>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: SecretToken::new(access_token),
            refresh_token: refresh_token
                .map(SecretToken::new)
                .filter(|token| !token.is_empty()),
        }
    }

    /// Applies a refresh response. A missing refresh token keeps the current one.
    pub(crate) fn rotate(&mut self, access_token: SecretToken, refresh_token: Option<SecretToken>) {
        self.access_token = access_token;

        if let Some(refresh_token) = refresh_token.filter(|token| !token.is_empty()) {
            self.refresh_token = Some(refresh_token);
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let session = Session::new("access-abc", Some("refresh-xyz".to_string()));
        let debug = format!("{session:?}");

        assert!(!debug.contains("access-abc"), "access token leaked: {debug}");
        assert!(!debug.contains("refresh-xyz"), "refresh token leaked: {debug}");
    }

    #[test]
    fn rotate_keeps_refresh_token_when_none_returned() {
        let mut session = Session::new("old", Some("refresh".to_string()));

        session.rotate(SecretToken::new("new"), None);

        assert_eq!(session.access_token.expose(), "new");
        assert_eq!(
            session.refresh_token.as_ref().map(SecretToken::expose),
            Some("refresh")
        );
    }

    #[test]
    fn blank_refresh_token_is_dropped() {
        let session = Session::new("access", Some("  ".to_string()));

        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn serializes_tokens_in_camel_case() -> TestResult {
        let json = serde_json::to_value(Session::new("a", Some("r".to_string())))?;

        assert_eq!(
            json,
            serde_json::json!({ "accessToken": "a", "refreshToken": "r" })
        );

        Ok(())
    }
}
