//! Bearer-token resolution for authenticated calls.
//!
//! Tokens come from the `HTM_VAULT_TOKEN` environment variable, or
//! failing that from the token file named in [`ClientConfig`]. The
//! provider never refreshes or validates a token; it only answers
//! "is there one" and "hand it over or fail with this message".
//!
//! [`ClientConfig`]: crate::config::ClientConfig

use std::fs;
use std::path::PathBuf;

use crate::error::ClientError;

/// Environment variable consulted before the token file.
pub const TOKEN_ENV_VAR: &str = "HTM_VAULT_TOKEN";


/// Resolves the current user's bearer token.
pub struct TokenProvider {
    env_var: Option<&'static str>,
    token_path: PathBuf,
}


impl TokenProvider {
    /// Provider that consults `HTM_VAULT_TOKEN` first, then the token
    /// file at `token_path`.
    pub fn new(token_path: PathBuf) -> Self {
        TokenProvider {
            env_var: Some(TOKEN_ENV_VAR),
            token_path,
        }
    }

    /// Provider that reads only the token file. Used by tests and by
    /// callers that must ignore ambient environment.
    pub fn file_only(token_path: PathBuf) -> Self {
        TokenProvider {
            env_var: None,
            token_path,
        }
    }

    /// The current token, if one is available. Whitespace is trimmed
    /// and an empty token counts as absent.
    pub fn token(&self) -> Option<String> {
        if let Some(var) = self.env_var {
            if let Ok(value) = std::env::var(var) {
                let value = value.trim().to_string();
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        let raw = fs::read_to_string(&self.token_path).ok()?;
        let token = raw.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Whether a token is currently available.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// The current token, or `Unauthenticated` carrying the
    /// operation-specific message.
    pub fn token_or_err(&self, unauthenticated_message: &str) -> Result<String, ClientError> {
        self.token()
            .ok_or_else(|| ClientError::Unauthenticated(unauthenticated_message.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_logged_out() {
        let provider =
            TokenProvider::file_only(PathBuf::from("/tmp/htm_vault_no_such_token_file"));
        assert!(!provider.is_logged_in());
        assert!(provider.token().is_none());
    }

    #[test]
    fn token_read_from_file_is_trimmed() {
        let dir = std::env::temp_dir().join("htm_vault_test_auth_file");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("token");
        fs::write(&path, "  abc.def.ghi \n").unwrap();

        let provider = TokenProvider::file_only(path);
        assert_eq!(provider.token().as_deref(), Some("abc.def.ghi"));
        assert!(provider.is_logged_in());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn blank_file_counts_as_absent() {
        let dir = std::env::temp_dir().join("htm_vault_test_auth_blank");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("token");
        fs::write(&path, "   \n").unwrap();

        let provider = TokenProvider::file_only(path);
        assert!(provider.token().is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn token_or_err_carries_the_operation_message() {
        let provider =
            TokenProvider::file_only(PathBuf::from("/tmp/htm_vault_no_such_token_file"));
        let err = provider
            .token_or_err("Only authenticated users can retire devices.")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Only authenticated users can retire devices."
        );
    }
}
