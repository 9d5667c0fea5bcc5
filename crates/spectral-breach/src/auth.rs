//! Dehashed account credentials and the Basic authorization header.

use crate::error::{BreachError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

/// Dehashed account email and API key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    api_key: String,
}

impl Credentials {
    /// Create credentials from an account email and API key.
    #[must_use]
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
        }
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether both the email and the key are set. Whitespace-only values count as unset.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Value for the `Authorization` header.
    ///
    /// # Errors
    /// Returns [`BreachError::MissingCredentials`] if either part is empty.
    pub fn authorization(&self) -> Result<String> {
        basic_authorization(&self.email, &self.api_key)
    }
}

// The key never reaches logs through Debug.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Build a `Basic` authorization header value from `email:api_key`.
///
/// # Errors
/// Returns [`BreachError::MissingCredentials`] if either input is blank.
pub fn basic_authorization(email: &str, api_key: &str) -> Result<String> {
    if email.trim().is_empty() || api_key.trim().is_empty() {
        return Err(BreachError::MissingCredentials);
    }

    let token = STANDARD.encode(format!("{email}:{api_key}"));
    Ok(format!("Basic {token}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        let header =
            basic_authorization("analyst@example.com", "secret").expect("build header");
        assert_eq!(header, "Basic YW5hbHlzdEBleGFtcGxlLmNvbTpzZWNyZXQ=");

        let header = basic_authorization("user", "key").expect("build header");
        assert_eq!(header, "Basic dXNlcjprZXk=");
    }

    #[test]
    fn test_blank_inputs_rejected() {
        for (email, key) in [("", "key"), ("user", ""), ("  ", "key"), ("", "")] {
            assert!(
                matches!(
                    basic_authorization(email, key),
                    Err(BreachError::MissingCredentials)
                ),
                "Should fail for: {email:?}/{key:?}"
            );
        }
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("user@example.com", "key").is_complete());
        assert!(!Credentials::new("user@example.com", "").is_complete());
        assert!(!Credentials::new("user@example.com", "   ").is_complete());
        assert!(!Credentials::new(" \t", "key").is_complete());
        assert!(!Credentials::default().is_complete());
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials::new("user@example.com", "super-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("super-secret"));
    }
}
