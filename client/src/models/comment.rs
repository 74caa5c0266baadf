//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment on a video
///
/// The parent video association is held by the per-video thread cache,
/// not by a field on the comment itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub user_username: String,
    pub user_profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}
