//! Profile synchronization
//!
//! Fetches the current user's profile and owned videos in one concurrent
//! pair, and applies owner-side mutations: deleting own videos after
//! server confirmation and submitting multipart profile updates.

use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{Profile, ProfileUpdate, Video};

/// Synchronizer for the current user's profile and owned videos
pub struct ProfileSynchronizer {
    api: Arc<ApiClient>,
    profile: Option<Profile>,
    videos: Vec<Video>,
}

impl ProfileSynchronizer {
    /// Create a new profile synchronizer
    pub fn new(api: Arc<ApiClient>) -> Self {
        ProfileSynchronizer {
            api,
            profile: None,
            videos: Vec::new(),
        }
    }

    /// Fetch profile and owned videos concurrently
    ///
    /// Both requests run in parallel and are joined before any local
    /// state changes; the first failure aborts the pair and surfaces as
    /// the single combined error.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (profile, videos) =
            tokio::try_join!(self.api.get_profile(), self.api.list_own_videos())?;

        info!(
            "Loaded profile for {} with {} videos",
            profile.user.username,
            videos.len()
        );
        self.profile = Some(profile);
        self.videos = videos;
        Ok(())
    }

    /// Cached profile, absent until a load succeeds
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Cached owned-video list
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    /// Delete one of the user's own videos
    ///
    /// The server call comes first; the local list is updated only after
    /// the server confirms. A forbidden outcome carries its own message
    /// so the UI can distinguish it from a generic failure.
    pub async fn delete_video(&mut self, video_id: i64) -> ApiResult<()> {
        match self.api.delete_own_video(video_id).await {
            Ok(()) => {
                self.videos.retain(|video| video.id != video_id);
                info!("Deleted video {}", video_id);
                Ok(())
            }
            Err(ApiError::Forbidden(_)) => Err(ApiError::Forbidden(
                "You are not allowed to delete this video.".to_string(),
            )),
            Err(err) => Err(err),
        }
    }

    /// Submit a profile update
    ///
    /// On success the cached profile is replaced with the server's
    /// response; on failure local state is untouched so the caller may
    /// retry with the same inputs.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> ApiResult<()> {
        let updated = self.api.update_profile(update).await?;
        self.profile = Some(updated);
        Ok(())
    }
}
