//! Authenticated session credential.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Bearer credential for the current user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw bearer token for the `Authorization` header.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }
}

// Tokens must not leak into log lines through `{:?}`.
impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::new("secret-token");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert_eq!(session.token(), "secret-token");
    }
}
