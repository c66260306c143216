//! Classloop school API client
//!
//! Thin typed wrapper around the school backend's activity-feed endpoints.
//! Owns the wire formats and the normalization of the backend's inconsistent
//! response envelopes; everything above this crate works with one canonical
//! shape.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::{SchoolApi, SchoolApiClient};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use types::{
    LikeAction, LikeSnapshot, ListPostsRequest, MediaDto, Pagination, PostDto, PostPage,
    ToggleLikeRequest,
};
