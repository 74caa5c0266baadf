//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client::models::Category;

/// Terminal client for the ShortVid platform
#[derive(Parser)]
#[command(name = "shortvid", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store session tokens
    Login {
        username: String,
        /// Password; prompted without echo when omitted
        #[arg(long)]
        password: Option<String>,
        /// Remember the credentials for the next login
        #[arg(long)]
        remember: bool,
    },
    /// Create an account and log in
    Signup {
        username: String,
        email: String,
    },
    /// Log out and clear stored tokens
    Logout,
    /// Show the video feed
    Feed {
        /// Case-insensitive search over title, uploader and description
        #[arg(long, default_value = "")]
        query: String,
        /// Exact category filter
        #[arg(long)]
        category: Option<Category>,
    },
    /// List the fixed category choices
    Categories,
    /// Show the comment thread of a video
    Comments {
        video_id: i64,
    },
    /// Comment on a video
    Comment {
        video_id: i64,
        content: String,
    },
    /// Delete one of your own comments
    DeleteComment {
        video_id: i64,
        comment_id: i64,
    },
    /// Record a playback view for a video
    Watch {
        video_id: i64,
    },
    /// Show your profile and uploaded videos
    Profile,
    /// Delete one of your own videos
    DeleteVideo {
        video_id: i64,
    },
    /// Update profile fields
    EditProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Path to a profile picture image
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Upload a video
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Category,
        /// Path to the video file
        #[arg(long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_feed_with_category() {
        let cli = Cli::try_parse_from([
            "shortvid",
            "feed",
            "--query",
            "rust",
            "--category",
            "Programming & Software Development",
        ])
        .expect("parse");

        match cli.command {
            Command::Feed { query, category } => {
                assert_eq!(query, "rust");
                assert_eq!(category, Some(Category::ProgrammingSoftwareDevelopment));
            }
            _ => panic!("expected feed command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        let result = Cli::try_parse_from(["shortvid", "feed", "--category", "Cooking"]);
        assert!(result.is_err());
    }
}
