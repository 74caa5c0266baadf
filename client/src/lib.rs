//! Client SDK for the ShortVid platform
//!
//! This crate implements the device-side half of the platform: session
//! management (login, signup, logout, token refresh), feed and profile
//! synchronization against the REST backend, and the video upload
//! pipeline. All network access goes through [`api::ApiClient`]; session
//! tokens live in the shared key-value store from the `common` crate.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod profile;
pub mod session;
pub mod upload;
pub mod validation;
