pub mod attribute;
pub mod feed;
pub mod likes;
pub mod presentation;
pub mod scope;

pub use attribute::attribute_filter;
pub use feed::{FeedService, RefreshOutcome};
pub use likes::LikeEngine;
pub use presentation::{media_url, present};
pub use scope::scope_filter;
