//! Access token storage in the OS keychain.
//!
//! Tokens are keyed by the expense API base URL, so switching servers in the
//! settings never hands one server's token to another.

use crate::error::AppError;
use keyring::Entry;

/// Service name used in the keychain.
const SERVICE_NAME: &str = "expense-desk";

/// Keychain-backed session token store.
pub struct TokenStore;

impl TokenStore {
    /// Save the bearer token issued by `api_url`.
    pub fn save(api_url: &str, access_token: &str) -> Result<(), AppError> {
        if access_token.trim().is_empty() {
            return Err(AppError::invalid_input_field(
                "Access token must not be empty",
                "access_token",
            ));
        }

        Self::entry(api_url)?
            .set_password(access_token)
            .map_err(|e| AppError::credential_storage(format!("Failed to save token: {}", e)))
    }

    /// Load the saved token for `api_url`, or `None` when signed out.
    pub fn load(api_url: &str) -> Result<Option<String>, AppError> {
        match Self::entry(api_url)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::credential_storage(format!(
                "Failed to read token: {}",
                e
            ))),
        }
    }

    /// Forget the token for `api_url`. Idempotent.
    pub fn clear(api_url: &str) -> Result<(), AppError> {
        match Self::entry(api_url)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::credential_storage(format!(
                "Failed to remove token: {}",
                e
            ))),
        }
    }

    fn entry(api_url: &str) -> Result<Entry, AppError> {
        Entry::new(SERVICE_NAME, &account_name(api_url)).map_err(|e| {
            AppError::credential_storage(format!("Failed to open keychain entry: {}", e))
        })
    }
}

/// Keychain account for an API URL: lowercased, no trailing slashes.
pub fn account_name(api_url: &str) -> String {
    api_url.trim().trim_end_matches('/').to_lowercase()
}
