//! Command handlers driving the client SDK

use std::path::{Path, PathBuf};
use std::sync::Arc;

use client::api::ApiClient;
use client::config::ApiConfig;
use client::error::{ApiError, ApiResult};
use client::feed::FeedSynchronizer;
use client::models::{Category, PictureFile, ProfileUpdate};
use client::profile::ProfileSynchronizer;
use client::session::SessionManager;
use client::upload::{MediaAsset, UploadPipeline};
use common::storage::{KeyValueStore, StoreConfig};

use crate::cli::{Cli, Command};

struct App {
    api: Arc<ApiClient>,
    store: Arc<KeyValueStore>,
}

fn build_app() -> ApiResult<App> {
    let store = Arc::new(KeyValueStore::open(&StoreConfig::from_env()));
    let api = Arc::new(ApiClient::new(&ApiConfig::from_env(), store.clone())?);
    Ok(App { api, store })
}

/// Dispatch a parsed command
pub async fn run(cli: Cli) -> ApiResult<()> {
    let app = build_app()?;

    match cli.command {
        Command::Login {
            username,
            password,
            remember,
        } => login(&app, &username, password, remember).await,
        Command::Signup { username, email } => signup(&app, &username, &email).await,
        Command::Logout => logout(&app).await,
        Command::Feed { query, category } => feed(&app, &query, category).await,
        Command::Categories => {
            for category in Category::ALL {
                println!("{}", category);
            }
            Ok(())
        }
        Command::Comments { video_id } => comments(&app, video_id).await,
        Command::Comment { video_id, content } => comment(&app, video_id, &content).await,
        Command::DeleteComment {
            video_id,
            comment_id,
        } => delete_comment(&app, video_id, comment_id).await,
        Command::Watch { video_id } => {
            app.api.increment_view(video_id).await;
            println!("Playback recorded for video {}.", video_id);
            Ok(())
        }
        Command::Profile => profile(&app).await,
        Command::DeleteVideo { video_id } => delete_video(&app, video_id).await,
        Command::EditProfile {
            username,
            email,
            description,
            picture,
        } => edit_profile(&app, username, email, description, picture).await,
        Command::Upload {
            title,
            description,
            category,
            file,
        } => upload(&app, &title, &description, category, &file).await,
    }
}

fn prompt_password(prompt: &str) -> ApiResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|err| ApiError::Validation(format!("Could not read password: {}", err)))
}

async fn login(app: &App, username: &str, password: Option<String>, remember: bool) -> ApiResult<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let mut manager = SessionManager::new(app.api.clone(), app.store.clone());
    manager.login(username, &password, remember).await?;
    println!("Logged in as {}.", username);
    Ok(())
}

async fn signup(app: &App, username: &str, email: &str) -> ApiResult<()> {
    let password = prompt_password("Password: ")?;
    let confirm_password = prompt_password("Confirm password: ")?;

    let mut manager = SessionManager::new(app.api.clone(), app.store.clone());
    manager
        .signup(username, email, &password, &confirm_password)
        .await?;
    println!("Account created, logged in as {}.", username);
    Ok(())
}

async fn logout(app: &App) -> ApiResult<()> {
    let mut manager = SessionManager::new(app.api.clone(), app.store.clone());
    manager.logout().await?;
    println!("Logged out.");
    Ok(())
}

async fn feed(app: &App, query: &str, category: Option<Category>) -> ApiResult<()> {
    let manager = SessionManager::new(app.api.clone(), app.store.clone());
    let context = manager.current_context().await?;

    let mut feed = FeedSynchronizer::new(app.api.clone(), context);
    feed.load().await?;

    let videos = feed.filtered(query, category);
    if videos.is_empty() {
        println!("No videos found.");
        return Ok(());
    }

    for video in videos {
        println!(
            "[{}] {} — {} ({}, {} views, {})",
            video.id,
            video.title,
            video.uploader_username,
            video.category,
            video.views,
            video.upload_date.format("%Y-%m-%d")
        );
        println!("    {}", video.description);
    }
    Ok(())
}

async fn comments(app: &App, video_id: i64) -> ApiResult<()> {
    let thread = app.api.get_comments(video_id).await?;
    if thread.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }

    for comment in thread {
        println!(
            "[{}] {} ({}): {}",
            comment.id,
            comment.user_username,
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.content
        );
    }
    Ok(())
}

async fn comment(app: &App, video_id: i64, content: &str) -> ApiResult<()> {
    let manager = SessionManager::new(app.api.clone(), app.store.clone());
    let context = manager.current_context().await?;

    let mut feed = FeedSynchronizer::new(app.api.clone(), context);
    feed.add_comment(video_id, content).await?;
    println!("Comment posted.");
    Ok(())
}

async fn delete_comment(app: &App, video_id: i64, comment_id: i64) -> ApiResult<()> {
    let manager = SessionManager::new(app.api.clone(), app.store.clone());
    let context = manager.current_context().await?;

    let mut feed = FeedSynchronizer::new(app.api.clone(), context);
    // Load the thread so the authorship check has the comment to inspect.
    feed.toggle_comments(video_id).await?;
    feed.delete_comment(comment_id, video_id).await?;
    println!("Comment deleted.");
    Ok(())
}

async fn profile(app: &App) -> ApiResult<()> {
    let mut sync = ProfileSynchronizer::new(app.api.clone());
    sync.load().await?;

    if let Some(profile) = sync.profile() {
        println!("{} <{}>", profile.user.username, profile.user.email);
        println!("{}", profile.description_or_default());
        if let Some(picture) = &profile.picture {
            println!("Picture: {}", picture);
        }
    }

    println!();
    if sync.videos().is_empty() {
        println!("No uploaded videos.");
    } else {
        println!("Uploaded videos:");
        for video in sync.videos() {
            println!("[{}] {} ({} views)", video.id, video.title, video.views);
        }
    }
    Ok(())
}

async fn delete_video(app: &App, video_id: i64) -> ApiResult<()> {
    let mut sync = ProfileSynchronizer::new(app.api.clone());
    sync.delete_video(video_id).await?;
    println!("Video deleted successfully.");
    Ok(())
}

async fn edit_profile(
    app: &App,
    username: Option<String>,
    email: Option<String>,
    description: Option<String>,
    picture: Option<PathBuf>,
) -> ApiResult<()> {
    let picture = match picture {
        Some(path) => Some(read_picture(&path)?),
        None => None,
    };

    let update = ProfileUpdate {
        username,
        email,
        description,
        picture,
    };
    if update.is_empty() {
        return Err(ApiError::Validation("Nothing to update.".to_string()));
    }

    let mut sync = ProfileSynchronizer::new(app.api.clone());
    sync.update_profile(&update).await?;
    println!("Profile updated!");
    Ok(())
}

fn read_picture(path: &Path) -> ApiResult<PictureFile> {
    let data = std::fs::read(path)
        .map_err(|err| ApiError::Validation(format!("Could not read picture: {}", err)))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("profile.jpg")
        .to_string();

    let mime_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
    .to_string();

    Ok(PictureFile {
        file_name,
        mime_type,
        data,
    })
}

async fn upload(
    app: &App,
    title: &str,
    description: &str,
    category: Category,
    file: &Path,
) -> ApiResult<()> {
    let asset = MediaAsset::from_path(file)?;
    let pipeline = UploadPipeline::new(app.api.clone());
    pipeline
        .submit(Some(&asset), title, description, Some(category))
        .await?;
    println!("Upload complete.");
    Ok(())
}
