//! Domain model for the activity feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classloop_api_client::types::{MediaDto, PostDto};
pub use classloop_api_client::LikeAction;

/// Canonical activity-feed post.
///
/// A well-formed post has exactly one scope origin: school-wide (`class_id`
/// and `student_id` both absent, `school_id` equal to the configured
/// canonical school id), class-wide (`class_id` set), or individual-student
/// (`student_id` set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub school_id: Option<i64>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub category: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub hashtags: Vec<String>,
    pub likes_count: u32,
    /// Last known server truth for the fetching account
    pub is_liked_by_user: bool,
    pub media: Vec<MediaRef>,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Self {
            id: dto.id,
            school_id: dto.school_id,
            class_id: dto.class_id,
            student_id: dto.student_id,
            category: dto.category,
            title: dto.title,
            content: dto.content,
            created_at: dto.created_at,
            hashtags: dto.hashtags,
            likes_count: dto.likes_count,
            is_liked_by_user: dto.is_liked_by_user,
            media: dto.media.into_iter().map(MediaRef::from).collect(),
        }
    }
}

/// Media attachment as stored server-side: a relative path plus metadata.
/// An empty path or filename marks the attachment malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRef {
    pub path: String,
    pub filename: String,
    pub mime_type: String,
}

impl From<MediaDto> for MediaRef {
    fn from(dto: MediaDto) -> Self {
        Self {
            path: dto.url,
            filename: dto.filename,
            mime_type: dto.mime_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Parent,
    Educator,
    Principal,
    Administrator,
}

/// Child currently selected by the viewer (relevant for parents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedStudent {
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub name: String,
}

/// Session context that scope rules resolve against, supplied by the host
/// app's session layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: i64,
    pub role: Role,
    pub selected_student: Option<SelectedStudent>,
}

/// Audience-visibility class of a feed tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    School,
    Class,
    Student,
}

/// User-chosen refinement applied after scope filtering.
///
/// Every field at its default is a no-op predicate; the category sentinel
/// `"all"` (and the empty string) means no category filter.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: String,
    pub hashtags: Vec<String>,
    pub date_range: DateRange,
}

/// Inclusive bounds on `created_at`; an unset bound does not constrain
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

/// Post shaped for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RenderablePost {
    pub id: i64,
    pub category: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub hashtags: Vec<String>,
    pub likes_count: u32,
    pub is_liked_by_user: bool,
    pub media: Vec<RenderableMedia>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderableMedia {
    /// Absolute proxy URL; empty when the attachment metadata is malformed,
    /// which renderers treat as "no media"
    pub url: String,
    pub filename: String,
    pub mime_type: String,
}

/// Server-confirmed final state of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub post_id: i64,
    pub action: LikeAction,
    pub liked: bool,
    pub likes_count: u32,
}
