//! Feed synchronization
//!
//! Keeps a screen-scoped cache of the video feed and per-video comment
//! threads in sync with the backend: wholesale reloads, client-side
//! filtering, lazily fetched comment threads, optimistic comment
//! creation and once-per-video view counting.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, Comment, Video};
use crate::session::SessionContext;
use crate::validation;

/// Synchronizer for the video feed and its comment threads
pub struct FeedSynchronizer {
    api: Arc<ApiClient>,
    context: SessionContext,
    videos: Vec<Video>,
    comments: HashMap<i64, Vec<Comment>>,
    expanded: HashSet<i64>,
    counted_views: HashSet<i64>,
}

impl FeedSynchronizer {
    /// Create a new synchronizer for the given user identity
    pub fn new(api: Arc<ApiClient>, context: SessionContext) -> Self {
        FeedSynchronizer {
            api,
            context,
            videos: Vec::new(),
            comments: HashMap::new(),
            expanded: HashSet::new(),
            counted_views: HashSet::new(),
        }
    }

    /// Identity used for authorship and ownership checks
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Fetch the full video list, replacing the cache wholesale
    ///
    /// On failure the prior cache is left untouched.
    pub async fn load(&mut self) -> ApiResult<()> {
        let videos = self.api.list_videos().await?;
        info!("Loaded {} videos", videos.len());
        self.videos = videos;
        Ok(())
    }

    /// Cached video list in server-defined order
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    /// Filter the cached list without touching the network
    ///
    /// Case-insensitive substring match over title, uploader username and
    /// description, ANDed with an exact category match when one is given.
    /// An empty query with no category returns the full list.
    pub fn filtered(&self, query: &str, category: Option<Category>) -> Vec<&Video> {
        let needle = query.to_lowercase();

        self.videos
            .iter()
            .filter(|video| {
                let text_match = needle.is_empty()
                    || video.title.to_lowercase().contains(&needle)
                    || video.uploader_username.to_lowercase().contains(&needle)
                    || video.description.to_lowercase().contains(&needle);
                let category_match = category.is_none_or(|wanted| video.category == wanted);
                text_match && category_match
            })
            .collect()
    }

    /// True when the comment thread of a video is expanded
    pub fn is_expanded(&self, video_id: i64) -> bool {
        self.expanded.contains(&video_id)
    }

    /// Cached comment thread of a video, empty when never fetched
    pub fn comments(&self, video_id: i64) -> &[Comment] {
        self.comments.get(&video_id).map_or(&[], Vec::as_slice)
    }

    /// Toggle the comment thread of a video, returning whether it is now
    /// expanded
    ///
    /// The thread is fetched only on the first expand; later toggles
    /// reuse the cache until the next full reload. A failed fetch leaves
    /// the thread uncached so a later expand retries.
    pub async fn toggle_comments(&mut self, video_id: i64) -> ApiResult<bool> {
        if self.expanded.remove(&video_id) {
            return Ok(false);
        }

        self.expanded.insert(video_id);

        if !self.comments.contains_key(&video_id) {
            let thread = self.api.get_comments(video_id).await?;
            self.comments.insert(video_id, thread);
        }

        Ok(true)
    }

    /// Post a comment with an optimistic local insert
    ///
    /// Whitespace-only content is rejected locally with no network call
    /// and no state change. The optimistic entry is replaced by the
    /// server's comment on success and rolled back on failure, so local
    /// and server state never stay divergent.
    pub async fn add_comment(&mut self, video_id: i64, content: &str) -> ApiResult<()> {
        validation::validate_comment(content).map_err(ApiError::Validation)?;

        let local_id = Utc::now().timestamp_millis();
        let optimistic = Comment {
            id: local_id,
            content: content.to_string(),
            user_username: self.context.username.clone(),
            user_profile_picture: self.context.profile_picture.clone(),
            created_at: Utc::now(),
        };
        self.comments.entry(video_id).or_default().push(optimistic);

        match self.api.post_comment(video_id, content).await {
            Ok(created) => {
                if let Some(thread) = self.comments.get_mut(&video_id) {
                    if let Some(entry) = thread.iter_mut().find(|comment| comment.id == local_id) {
                        *entry = created;
                    }
                }
                Ok(())
            }
            Err(err) => {
                if let Some(thread) = self.comments.get_mut(&video_id) {
                    thread.retain(|comment| comment.id != local_id);
                }
                Err(err)
            }
        }
    }

    /// Delete a comment authored by the current user
    ///
    /// Rejected locally when the cached comment's author is not the
    /// current user; the server remains authoritative for the rest. The
    /// local entry is removed only after the server confirms.
    pub async fn delete_comment(&mut self, comment_id: i64, video_id: i64) -> ApiResult<()> {
        let owned = self
            .comments
            .get(&video_id)
            .and_then(|thread| thread.iter().find(|comment| comment.id == comment_id))
            .is_some_and(|comment| comment.user_username == self.context.username);

        if !owned {
            return Err(ApiError::Forbidden(
                "You cannot delete this comment.".to_string(),
            ));
        }

        self.api.delete_comment(comment_id).await?;

        if let Some(thread) = self.comments.get_mut(&video_id) {
            thread.retain(|comment| comment.id != comment_id);
        }

        Ok(())
    }

    /// Count a playback start for a video
    ///
    /// The view counter is incremented at most once per video for this
    /// synchronizer's lifetime, however many playback status ticks the
    /// player emits; failures are logged, never surfaced.
    pub async fn record_playback(&mut self, video_id: i64) {
        if self.counted_views.insert(video_id) {
            self.api.increment_view(video_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use chrono::TimeZone;
    use common::storage::{KeyValueStore, StoreConfig};

    fn test_feed() -> (tempfile::TempDir, FeedSynchronizer) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(KeyValueStore::open(&StoreConfig {
            path: dir.path().join("session.json"),
        }));
        let config = ApiConfig::with_base_url("http://127.0.0.1:9/api");
        let api = Arc::new(ApiClient::new(&config, store).expect("client"));
        let context = SessionContext {
            username: "alice".to_string(),
            profile_picture: None,
        };
        (dir, FeedSynchronizer::new(api, context))
    }

    fn sample_video(id: i64, title: &str, uploader: &str, category: Category) -> Video {
        Video {
            id,
            title: title.to_string(),
            description: format!("All about {}", title),
            category,
            uploader_id: id * 10,
            uploader_username: uploader.to_string(),
            uploader_profile_picture: None,
            views: 0,
            upload_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            video_file: Some(format!("/media/videos/{}.mp4", id)),
        }
    }

    #[tokio::test]
    async fn test_filter_matches_title_uploader_and_description() {
        let (_dir, mut feed) = test_feed();
        feed.videos = vec![
            sample_video(1, "Rust ownership", "bob", Category::ProgrammingSoftwareDevelopment),
            sample_video(2, "Subnetting basics", "carol", Category::NetworkingCybersecurity),
            sample_video(3, "Intro to SQL", "rusty_dev", Category::DataScienceDatabases),
        ];

        let hits = feed.filtered("RUST", None);
        let ids: Vec<i64> = hits.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let hits = feed.filtered("rust", Some(Category::DataScienceDatabases));
        let ids: Vec<i64> = hits.iter().map(|video| video.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_filter_is_idempotent_and_empty_returns_all() {
        let (_dir, mut feed) = test_feed();
        feed.videos = vec![
            sample_video(1, "Rust ownership", "bob", Category::ProgrammingSoftwareDevelopment),
            sample_video(2, "Subnetting basics", "carol", Category::NetworkingCybersecurity),
        ];

        let first: Vec<i64> = feed.filtered("net", None).iter().map(|v| v.id).collect();
        let second: Vec<i64> = feed.filtered("net", None).iter().map(|v| v.id).collect();
        assert_eq!(first, second);

        assert_eq!(feed.filtered("", None).len(), feed.videos().len());
    }

    #[tokio::test]
    async fn test_add_comment_rejects_whitespace_without_state_change() {
        let (_dir, mut feed) = test_feed();

        let err = feed.add_comment(1, "   ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(feed.comments(1).is_empty());
    }

    #[tokio::test]
    async fn test_delete_foreign_comment_rejected_locally() {
        let (_dir, mut feed) = test_feed();
        feed.comments.insert(
            7,
            vec![Comment {
                id: 42,
                content: "first!".to_string(),
                user_username: "mallory".to_string(),
                user_profile_picture: None,
                created_at: Utc::now(),
            }],
        );

        let err = feed.delete_comment(42, 7).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(feed.comments(7).len(), 1);
    }
}
