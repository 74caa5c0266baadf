//! User and profile models

use serde::{Deserialize, Serialize};

/// User entity embedded in a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Profile of the authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user: User,
    pub picture: Option<String>,
    pub description: Option<String>,
}

impl Profile {
    /// Description text with a placeholder when the server sent none
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => "No description provided.",
        }
    }
}

/// Profile update payload
///
/// Only fields that are present are sent; the server decides which are
/// honored.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub picture: Option<PictureFile>,
}

impl ProfileUpdate {
    /// True when no field is set at all
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.description.is_none()
            && self.picture.is_none()
    }
}

/// In-memory picture file for a multipart profile update
#[derive(Debug, Clone)]
pub struct PictureFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
