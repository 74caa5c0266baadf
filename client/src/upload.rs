//! Video upload pipeline
//!
//! Validates a locally selected media asset against size and field
//! constraints, then submits it as a single multipart POST. No chunking,
//! no resume, no progress reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, VideoDraft};

/// Maximum accepted video size, enforced before any network activity
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

/// Locally selected media asset
///
/// Stands in for the platform picker result: the file path plus the
/// metadata the validation rules need.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl MediaAsset {
    /// Describe a file on disk as a selectable asset
    pub fn from_path(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)
            .map_err(|err| ApiError::Validation(format!("Could not read video file: {}", err)))?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        Ok(MediaAsset {
            mime_type: video_mime_for(&path),
            size_bytes: metadata.len(),
            path,
            file_name,
        })
    }
}

fn video_mime_for(path: &Path) -> String {
    let mime = match path.extension().and_then(|ext| ext.to_str()) {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "video/mp4",
    };
    mime.to_string()
}

/// Upload pipeline for user videos
pub struct UploadPipeline {
    api: Arc<ApiClient>,
}

impl UploadPipeline {
    /// Create a new upload pipeline
    pub fn new(api: Arc<ApiClient>) -> Self {
        UploadPipeline { api }
    }

    /// Validate an upload attempt; the first violation wins
    ///
    /// Order: an asset must be selected, it must fit the size limit, and
    /// title, description and category must all be present. Runs no
    /// network calls.
    pub fn validate<'a>(
        asset: Option<&'a MediaAsset>,
        title: &str,
        description: &str,
        category: Option<Category>,
    ) -> ApiResult<(&'a MediaAsset, Category)> {
        let Some(asset) = asset else {
            return Err(ApiError::Validation("No video was selected.".to_string()));
        };

        if asset.size_bytes > MAX_VIDEO_BYTES {
            return Err(ApiError::Validation(
                "Video file is too large. Please select a file under 50MB.".to_string(),
            ));
        }

        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please fill all fields, select a video, and choose a category.".to_string(),
            ));
        }

        let Some(category) = category else {
            return Err(ApiError::Validation(
                "Please fill all fields, select a video, and choose a category.".to_string(),
            ));
        };

        Ok((asset, category))
    }

    /// Validate and submit an upload
    ///
    /// Requires a stored access token; its absence aborts with an auth
    /// error before any request is sent. The file is read and posted as
    /// one multipart request.
    pub async fn submit(
        &self,
        asset: Option<&MediaAsset>,
        title: &str,
        description: &str,
        category: Option<Category>,
    ) -> ApiResult<()> {
        let (asset, category) = Self::validate(asset, title, description, category)?;

        if !self.api.has_access_token().await {
            return Err(ApiError::Auth("User is not authenticated.".to_string()));
        }

        let data = tokio::fs::read(&asset.path)
            .await
            .map_err(|err| ApiError::Validation(format!("Could not read video file: {}", err)))?;

        let draft = VideoDraft {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category,
            file_name: asset.file_name.clone(),
            mime_type: asset.mime_type.clone(),
            data,
        };

        self.api.upload_video(&draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_of_size(size_bytes: u64) -> MediaAsset {
        MediaAsset {
            path: PathBuf::from("clip.mp4"),
            file_name: "clip.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_validate_requires_asset_first() {
        let err = UploadPipeline::validate(None, "", "", None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(message) if message == "No video was selected."));
    }

    #[test]
    fn test_validate_rejects_oversized_asset() {
        let asset = asset_of_size(60 * 1024 * 1024);
        let err = UploadPipeline::validate(Some(&asset), "Title", "Description", None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(message)
                if message == "Video file is too large. Please select a file under 50MB."
        ));
    }

    #[test]
    fn test_validate_requires_all_fields() {
        let asset = asset_of_size(1024);

        let err = UploadPipeline::validate(Some(&asset), "", "Description", None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = UploadPipeline::validate(Some(&asset), "Title", "Description", None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(
            UploadPipeline::validate(
                Some(&asset),
                "Title",
                "Description",
                Some(Category::GameDevelopmentArVr)
            )
            .is_ok()
        );
    }

    #[test]
    fn test_asset_at_limit_is_accepted() {
        let asset = asset_of_size(MAX_VIDEO_BYTES);
        assert!(
            UploadPipeline::validate(
                Some(&asset),
                "Title",
                "Description",
                Some(Category::UiUxDesignTools)
            )
            .is_ok()
        );
    }

    #[test]
    fn test_mime_guess_by_extension() {
        assert_eq!(video_mime_for(Path::new("a.mov")), "video/quicktime");
        assert_eq!(video_mime_for(Path::new("a.webm")), "video/webm");
        assert_eq!(video_mime_for(Path::new("a.unknown")), "video/mp4");
    }
}
