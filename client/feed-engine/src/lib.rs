//! Classloop activity-feed engine
//!
//! Client-side core of the school activity feed: fetches the canonical post
//! collection through the school API gateway, derives each tab's visible
//! feed (audience scope rules, then user-chosen attribute refinement), and
//! reconciles optimistic like toggles against server truth. State lives in
//! an explicitly constructed [`store::FeedStore`] owned by the app session;
//! nothing here is global.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::{Config, FeedConfig, LikeConfig, StaleFetchPolicy};
pub use error::{FetchError, FetchResult, LikeError, LikeResult};
pub use models::{
    DateRange, FilterCriteria, LikeAction, LikeOutcome, MediaRef, Post, RenderableMedia,
    RenderablePost, Role, ScopeKind, SelectedStudent, Viewer,
};
pub use services::feed::{FeedService, RefreshOutcome};
pub use store::{FeedStore, LikeOverride, LikePhase};
