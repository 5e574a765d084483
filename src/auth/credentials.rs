use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "tasklane";

/// Optional "remember me" storage for the sign-in password, backed by
/// the OS keychain and keyed by the account email.
///
/// This is convenience state only - the session itself lives in the
/// [`TokenStore`](super::TokenStore). Pairs with `Config::last_email`.
pub struct CredentialStore;

impl CredentialStore {
    /// Remember the password for an email in the OS keychain.
    pub fn remember(email: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the remembered password for an email.
    pub fn password_for(email: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for an email.
    pub fn forget(email: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check whether a password is remembered for an email.
    pub fn is_remembered(email: &str) -> bool {
        match Entry::new(SERVICE_NAME, email) {
            Ok(entry) => entry.get_password().is_ok(),
            Err(_) => false,
        }
    }
}
