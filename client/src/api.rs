//! HTTP client for the ShortVid backend
//!
//! This module is the single point of network access for the SDK. It
//! builds requests against one configured base URL, attaches the bearer
//! token read fresh from the key-value store at call time, decodes JSON
//! responses and normalizes failures into [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use common::storage::KeyValueStore;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, Profile, ProfileUpdate, Video, VideoDraft};
use crate::session::keys;

/// Tokens issued by login and signup
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    password_confirm: &'a str,
}

#[derive(Serialize)]
struct LogoutRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    content: &'a str,
}

/// HTTP client for the backend API
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<KeyValueStore>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ApiConfig, store: Arc<KeyValueStore>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Network)?;

        Ok(ApiClient {
            http,
            base_url: config.base_url.clone(),
            store,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// True when an access token is currently stored
    pub async fn has_access_token(&self) -> bool {
        self.store.get(keys::ACCESS_TOKEN).await.is_some()
    }

    async fn stored_access_token(&self) -> ApiResult<String> {
        self.store
            .get(keys::ACCESS_TOKEN)
            .await
            .ok_or_else(|| ApiError::Auth("Access token not found. Please login again.".to_string()))
    }

    /// Send a bearer-authenticated request
    ///
    /// The token is read from the store at each attempt, never cached in
    /// memory. A 401 triggers exactly one refresh-token exchange followed
    /// by one retry; if the exchange fails the 401 classifies as usual.
    async fn send_authorized<F>(&self, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client, &str) -> ApiResult<RequestBuilder>,
    {
        let mut refreshed = false;
        loop {
            let token = self.stored_access_token().await?;
            let response = build(&self.http, &token)?
                .send()
                .await
                .map_err(ApiError::Network)?;

            if response.status() == StatusCode::UNAUTHORIZED && !refreshed {
                refreshed = true;
                match self.refresh_access_token().await {
                    Ok(_) => continue,
                    Err(err) => debug!("Token refresh failed: {}", err),
                }
            }

            return Ok(response);
        }
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        if response.status().is_success() {
            response.json().await.map_err(ApiError::Network)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn expect_success(response: Response) -> ApiResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Classify a non-success response into an [`ApiError`]
    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();
        let message = extract_error_message(&bytes)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Auth(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(message)
            }
            _ => ApiError::Server(message),
        }
    }

    /// Exchange credentials for session tokens
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        info!("Login attempt for user: {}", username);

        let response = self
            .http
            .post(self.endpoint("/login/"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(ApiError::Network);
        }

        // Any 4xx on login means the credentials were not accepted.
        if status.is_client_error() {
            let bytes = response.bytes().await.unwrap_or_default();
            let message = extract_error_message(&bytes)
                .unwrap_or_else(|| "Check your username or password".to_string());
            return Err(ApiError::Auth(message));
        }

        Err(Self::error_from_response(response).await)
    }

    /// Register a new account and receive session tokens
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> ApiResult<TokenPair> {
        info!("Signup attempt for user: {}", username);

        let response = self
            .http
            .post(self.endpoint("/signup/"))
            .json(&SignupRequest {
                username,
                email,
                password,
                password_confirm: password,
            })
            .send()
            .await
            .map_err(ApiError::Network)?;

        Self::expect_json(response).await
    }

    /// Invalidate a refresh token on the server
    pub async fn logout(&self, refresh_token: &str) -> ApiResult<()> {
        let response = self
            .http
            .post(self.endpoint("/logout/"))
            .json(&LogoutRequest { refresh_token })
            .send()
            .await
            .map_err(ApiError::Network)?;

        Self::expect_success(response).await
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// The new token is persisted to the store before returning.
    pub async fn refresh_access_token(&self) -> ApiResult<String> {
        let refresh = self
            .store
            .get(keys::REFRESH_TOKEN)
            .await
            .ok_or_else(|| ApiError::Auth("No refresh token stored.".to_string()))?;

        let response = self
            .http
            .post(self.endpoint("/token/refresh/"))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(ApiError::Network)?;

        let refreshed: RefreshResponse = Self::expect_json(response).await?;
        self.store.set(keys::ACCESS_TOKEN, &refreshed.access).await?;
        info!("Access token refreshed");

        Ok(refreshed.access)
    }

    /// List the video feed in server-defined order
    pub async fn list_videos(&self) -> ApiResult<Vec<Video>> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http.get(self.endpoint("/videos/")).bearer_auth(token))
            })
            .await?;

        Self::expect_json(response).await
    }

    /// List the comment thread of a video
    pub async fn get_comments(&self, video_id: i64) -> ApiResult<Vec<Comment>> {
        let response = self
            .http
            .get(self.endpoint(&format!("/comments/{}", video_id)))
            .send()
            .await
            .map_err(ApiError::Network)?;

        Self::expect_json(response).await
    }

    /// Create a comment on a video
    pub async fn post_comment(&self, video_id: i64, content: &str) -> ApiResult<Comment> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http
                    .post(self.endpoint(&format!("/videos/{}/comments/", video_id)))
                    .bearer_auth(token)
                    .json(&CommentRequest { content }))
            })
            .await?;

        Self::expect_json(response).await
    }

    /// Delete a comment; the server enforces authorship
    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http
                    .delete(self.endpoint(&format!("/comments/{}/delete/", comment_id)))
                    .bearer_auth(token))
            })
            .await?;

        Self::expect_success(response).await
    }

    /// Increment the view counter of a video
    ///
    /// Best-effort: failures are logged and never surfaced. A failed view
    /// tick must not interrupt playback.
    pub async fn increment_view(&self, video_id: i64) {
        if let Err(err) = self.try_increment_view(video_id).await {
            warn!("Failed to increment view for video {}: {}", video_id, err);
        }
    }

    async fn try_increment_view(&self, video_id: i64) -> ApiResult<()> {
        let response = self
            .http
            .post(self.endpoint(&format!("/videos/{}/increment_view/", video_id)))
            .send()
            .await
            .map_err(ApiError::Network)?;

        Self::expect_success(response).await
    }

    /// Fetch the current user's profile
    pub async fn get_profile(&self) -> ApiResult<Profile> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http.get(self.endpoint("/profile/")).bearer_auth(token))
            })
            .await?;

        Self::expect_json(response).await
    }

    /// List the current user's own videos
    pub async fn list_own_videos(&self) -> ApiResult<Vec<Video>> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http.get(self.endpoint("/profile/videos/")).bearer_auth(token))
            })
            .await?;

        Self::expect_json(response).await
    }

    /// Submit a multipart profile update
    ///
    /// Only fields present in the update are sent; the server decides
    /// which are honored and returns the resulting profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        let response = self
            .send_authorized(|http, token| {
                let mut form = Form::new();
                if let Some(username) = &update.username {
                    form = form.text("user.username", username.clone());
                }
                if let Some(email) = &update.email {
                    form = form.text("user.email", email.clone());
                }
                if let Some(description) = &update.description {
                    form = form.text("description", description.clone());
                }
                if let Some(picture) = &update.picture {
                    let part = Part::bytes(picture.data.clone())
                        .file_name(picture.file_name.clone())
                        .mime_str(&picture.mime_type)
                        .map_err(ApiError::Network)?;
                    form = form.part("picture", part);
                }

                Ok(http
                    .put(self.endpoint("/profile/update/"))
                    .bearer_auth(token)
                    .multipart(form))
            })
            .await?;

        Self::expect_json(response).await
    }

    /// Delete one of the current user's own videos
    pub async fn delete_own_video(&self, video_id: i64) -> ApiResult<()> {
        let response = self
            .send_authorized(|http, token| {
                Ok(http
                    .delete(self.endpoint(&format!("/profile/videos/{}/", video_id)))
                    .bearer_auth(token))
            })
            .await?;

        Self::expect_success(response).await
    }

    /// Submit a validated video draft as a single multipart POST
    pub async fn upload_video(&self, draft: &VideoDraft) -> ApiResult<()> {
        info!(
            "Uploading video '{}' ({} bytes)",
            draft.title,
            draft.data.len()
        );

        let response = self
            .send_authorized(|http, token| {
                let part = Part::bytes(draft.data.clone())
                    .file_name(draft.file_name.clone())
                    .mime_str(&draft.mime_type)
                    .map_err(ApiError::Network)?;

                let form = Form::new()
                    .text("title", draft.title.clone())
                    .text("description", draft.description.clone())
                    .text("category", draft.category.as_str())
                    .part("video", part);

                Ok(http
                    .post(self.endpoint("/videos/upload/"))
                    .bearer_auth(token)
                    .multipart(form))
            })
            .await?;

        Self::expect_success(response).await
    }
}

/// Pull a human-readable message out of an error body
///
/// Tries `{"detail": ...}`, then `{"error": ...}`, then a field-error map
/// of the form `{"field": ["message", ...]}`, then the raw body text.
fn extract_error_message(bytes: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        if let Some(detail) = value.get("detail").and_then(Value::as_str) {
            return Some(detail.to_string());
        }

        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Some(error.to_string());
        }

        if let Some(fields) = value.as_object() {
            let mut lines = Vec::new();
            for (field, messages) in fields {
                match messages {
                    Value::String(message) => lines.push(format!("{}: {}", field, message)),
                    Value::Array(items) => {
                        for item in items {
                            if let Some(message) = item.as_str() {
                                lines.push(format!("{}: {}", field, message));
                            }
                        }
                    }
                    _ => {}
                }
            }
            if !lines.is_empty() {
                return Some(lines.join("\n"));
            }
        }
    }

    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}
