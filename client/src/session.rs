//! Session management
//!
//! This module owns the login, signup and logout lifecycle, the
//! remember-me policy and the persisted token state. Tokens are opaque
//! strings; validity is only ever discovered through a rejected request.

use std::sync::Arc;

use tracing::{info, warn};

use common::storage::KeyValueStore;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::Profile;
use crate::validation;

/// Store keys holding session state
pub mod keys {
    /// Bearer token attached to authenticated requests
    pub const ACCESS_TOKEN: &str = "accessToken";
    /// Long-lived token exchanged for new access tokens
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Remembered username (remember-me only)
    pub const USERNAME: &str = "username";
    /// Remembered password (remember-me only)
    pub const PASSWORD: &str = "password";
}

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggingIn,
    SigningUp,
    LoggedIn,
    LoggingOut,
}

/// Identity of the authenticated user
///
/// Passed into the synchronizers at construction for authorship and
/// ownership checks, instead of reading some ambient global profile.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub username: String,
    pub profile_picture: Option<String>,
}

impl From<&Profile> for SessionContext {
    fn from(profile: &Profile) -> Self {
        SessionContext {
            username: profile.user.username.clone(),
            profile_picture: profile.picture.clone(),
        }
    }
}

/// Session manager owning the login/signup/logout lifecycle
pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<KeyValueStore>,
    state: SessionState,
}

impl SessionManager {
    /// Create a new session manager in the logged-out state
    pub fn new(api: Arc<ApiClient>, store: Arc<KeyValueStore>) -> Self {
        SessionManager {
            api,
            store,
            state: SessionState::LoggedOut,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Restore a persisted session, if any
    ///
    /// Returns true when a stored access token was found. Whether the
    /// token still authorizes requests is only learned from the backend.
    pub async fn restore(&mut self) -> bool {
        if self.api.has_access_token().await {
            self.state = SessionState::LoggedIn;
            true
        } else {
            false
        }
    }

    /// True when an access token is stored
    pub async fn is_logged_in(&self) -> bool {
        self.api.has_access_token().await
    }

    /// Remembered credentials for prefilling the login form
    pub async fn remembered_credentials(&self) -> Option<(String, String)> {
        let username = self.store.get(keys::USERNAME).await?;
        let password = self.store.get(keys::PASSWORD).await?;
        Some((username, password))
    }

    /// Log in with the given credentials
    ///
    /// Both fields are validated locally before any network call. On
    /// success the access token is always persisted; the raw credentials
    /// are persisted only when `remember` is set, and any previously
    /// remembered pair is cleared when it is not.
    pub async fn login(&mut self, username: &str, password: &str, remember: bool) -> ApiResult<()> {
        validation::validate_login(username, password).map_err(ApiError::Validation)?;

        self.state = SessionState::LoggingIn;
        let result = self.perform_login(username, password, remember).await;
        self.state = if result.is_ok() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        };

        result
    }

    async fn perform_login(&self, username: &str, password: &str, remember: bool) -> ApiResult<()> {
        let tokens = self.api.login(username, password).await?;

        self.store.set(keys::ACCESS_TOKEN, &tokens.access_token).await?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token).await?;
        }

        if remember {
            self.store.set(keys::USERNAME, username).await?;
            self.store.set(keys::PASSWORD, password).await?;
        } else {
            self.store.remove(keys::USERNAME).await?;
            self.store.remove(keys::PASSWORD).await?;
        }

        info!("User {} logged in", username);
        Ok(())
    }

    /// Create an account and log in
    ///
    /// All fields are validated locally (non-empty, matching passwords,
    /// minimum password length) before any network call.
    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ApiResult<()> {
        validation::validate_signup(username, email, password, confirm_password)
            .map_err(ApiError::Validation)?;

        self.state = SessionState::SigningUp;
        let result = self.perform_signup(username, email, password).await;
        self.state = if result.is_ok() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        };

        result
    }

    async fn perform_signup(&self, username: &str, email: &str, password: &str) -> ApiResult<()> {
        let tokens = self.api.signup(username, email, password).await?;

        self.store.set(keys::ACCESS_TOKEN, &tokens.access_token).await?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token).await?;
        }

        info!("User {} signed up", username);
        Ok(())
    }

    /// Log out
    ///
    /// The server is notified best-effort; local tokens are cleared
    /// unconditionally so a network failure can never strand the user in
    /// a logged-in state. Remembered credentials survive logout.
    pub async fn logout(&mut self) -> ApiResult<()> {
        self.state = SessionState::LoggingOut;

        if let Some(refresh_token) = self.store.get(keys::REFRESH_TOKEN).await {
            if let Err(err) = self.api.logout(&refresh_token).await {
                warn!("Server logout failed, clearing local session anyway: {}", err);
            }
        }

        let access_removed = self.store.remove(keys::ACCESS_TOKEN).await;
        let refresh_removed = self.store.remove(keys::REFRESH_TOKEN).await;
        self.state = SessionState::LoggedOut;
        info!("Logged out");

        access_removed?;
        refresh_removed?;
        Ok(())
    }

    /// Explicitly forget a remembered username/password pair
    pub async fn clear_remembered_credentials(&self) -> ApiResult<()> {
        self.store.remove(keys::USERNAME).await?;
        self.store.remove(keys::PASSWORD).await?;
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token
    pub async fn refresh_access_token(&self) -> ApiResult<String> {
        self.api.refresh_access_token().await
    }

    /// Fetch the profile and build a [`SessionContext`] from it
    pub async fn current_context(&self) -> ApiResult<SessionContext> {
        let profile = self.api.get_profile().await?;
        Ok(SessionContext::from(&profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use common::storage::StoreConfig;

    fn test_manager() -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(KeyValueStore::open(&StoreConfig {
            path: dir.path().join("session.json"),
        }));
        // Unroutable port: validation failures must return before any
        // request is attempted, so this address is never dialed.
        let config = ApiConfig::with_base_url("http://127.0.0.1:9/api");
        let api = Arc::new(ApiClient::new(&config, store.clone()).expect("client"));
        (dir, SessionManager::new(api, store))
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_locally() {
        let (_dir, mut manager) = test_manager();

        let err = manager.login("", "secret", false).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = manager.login("alice", "", true).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert_eq!(manager.state(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_passwords_locally() {
        let (_dir, mut manager) = test_manager();

        let err = manager
            .signup("alice", "a@example.com", "secret1", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = manager
            .signup("alice", "a@example.com", "abc", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_restore_requires_stored_token() {
        let (_dir, mut manager) = test_manager();
        assert!(!manager.restore().await);
        assert_eq!(manager.state(), SessionState::LoggedOut);

        manager
            .store
            .set(keys::ACCESS_TOKEN, "abc")
            .await
            .expect("set");
        assert!(manager.restore().await);
        assert_eq!(manager.state(), SessionState::LoggedIn);
    }
}
