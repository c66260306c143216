//! Wire types for the school REST API
//!
//! The backend is a Laravel-style JSON service with inconsistent envelopes:
//! list responses arrive either as the documented
//! `{status, data: {posts, pagination}}` wrapper, as a bare array, or as an
//! object with a nested posts array. Numeric ids are sometimes serialized as
//! strings, booleans as `0`/`1`, and hashtag lists as `null` or a single
//! joined string. Everything here normalizes those shapes into one canonical
//! form so callers never see the sloppiness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Envelope status value the backend uses for success
const STATUS_SUCCESSFUL: &str = "successful";

// ========== Request Bodies ==========

/// Body for `POST /school-posts/list`
///
/// The feed engine sends only `page`/`page_size` and filters client-side;
/// the remaining fields mirror what the server accepts.
#[derive(Debug, Clone, Serialize)]
pub struct ListPostsRequest {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,
}

impl ListPostsRequest {
    /// The fetch-everything form used by the feed refresh: first page at the
    /// configured page size, no server-side filters.
    pub fn fetch_all(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search_phrase: None,
            category: None,
            date_from: None,
            date_to: None,
            hashtags: Vec::new(),
        }
    }
}

/// Direction of a like toggle, lowercase on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

/// Body for `POST /school-posts/toggle-like`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleLikeRequest {
    pub post_id: i64,
    pub action: LikeAction,
}

// ========== Response Payloads ==========

/// Wire form of an activity-feed post
#[derive(Debug, Clone, Deserialize)]
pub struct PostDto {
    #[serde(deserialize_with = "de_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub hashtags: Vec<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub likes_count: u32,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_liked_by_user: bool,
    #[serde(default)]
    pub media: Vec<MediaDto>,
}

/// Wire form of a media attachment
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDto {
    /// Relative storage path served through the media proxy
    #[serde(default, alias = "path")]
    pub url: String,
    #[serde(default, alias = "file_name")]
    pub filename: String,
    #[serde(default, alias = "mime")]
    pub mime_type: String,
}

/// Laravel paginator metadata from the documented envelope
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "de_count")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub last_page: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub total: u32,
}

/// Normalized result of a list call
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<PostDto>,
    pub pagination: Option<Pagination>,
}

/// Server truth returned by the like toggle
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LikeSnapshot {
    #[serde(default, deserialize_with = "de_flag")]
    pub is_liked_by_user: bool,
    #[serde(default, deserialize_with = "de_count")]
    pub likes_count: u32,
}

// ========== Envelope Normalization ==========

/// Normalize a list-posts response body into posts plus pagination.
///
/// Accepted shapes, checked in order: a bare array of posts; the documented
/// `{status, data: {posts, pagination}}` wrapper (non-successful status is an
/// error carrying the server message); `{data: [...]}` and `{posts: [...]}`
/// nested-array fallbacks. Anything else is an error.
pub fn parse_post_list(body: Value) -> Result<PostPage, ApiError> {
    if body.is_array() {
        let posts = serde_json::from_value(body)?;
        return Ok(PostPage {
            posts,
            pagination: None,
        });
    }

    let obj = body.as_object().ok_or_else(|| {
        ApiError::UnexpectedShape("list response is neither an array nor an object".to_string())
    })?;

    check_envelope_status(obj)?;

    if let Some(data) = obj.get("data") {
        if let Some(posts) = data.get("posts") {
            let pagination = data
                .get("pagination")
                .cloned()
                .and_then(|p| serde_json::from_value(p).ok());
            return Ok(PostPage {
                posts: serde_json::from_value(posts.clone())?,
                pagination,
            });
        }
        if data.is_array() {
            return Ok(PostPage {
                posts: serde_json::from_value(data.clone())?,
                pagination: None,
            });
        }
    }

    if let Some(posts) = obj.get("posts") {
        return Ok(PostPage {
            posts: serde_json::from_value(posts.clone())?,
            pagination: None,
        });
    }

    Err(ApiError::UnexpectedShape(
        "no posts array found in list response".to_string(),
    ))
}

/// Normalize a toggle-like response body into the server's like snapshot.
pub fn parse_like_snapshot(body: Value) -> Result<LikeSnapshot, ApiError> {
    let obj = body.as_object().ok_or_else(|| {
        ApiError::UnexpectedShape("toggle-like response is not an object".to_string())
    })?;

    check_envelope_status(obj)?;

    // Some deployments wrap the snapshot in `data`, some return it flat.
    let payload = match obj.get("data") {
        Some(data) if data.is_object() => data,
        _ => &body,
    };
    let has_like_fields = payload
        .as_object()
        .map(|p| p.contains_key("is_liked_by_user") || p.contains_key("likes_count"))
        .unwrap_or(false);
    if !has_like_fields {
        return Err(ApiError::UnexpectedShape(
            "toggle-like response carries no like fields".to_string(),
        ));
    }

    Ok(serde_json::from_value(payload.clone())?)
}

fn check_envelope_status(obj: &serde_json::Map<String, Value>) -> Result<(), ApiError> {
    if let Some(status) = obj.get("status").and_then(Value::as_str) {
        if status != STATUS_SUCCESSFUL {
            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string();
            return Err(ApiError::Api(message));
        }
    }
    Ok(())
}

// ========== Tolerant Field Deserializers ==========

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Required id, as a JSON number or a numeric string
fn de_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_i64(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid id: {value}")))
}

/// Nullable id; unparseable values degrade to `None`
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value))
}

/// Non-negative count, as a number or numeric string; absent or garbage is 0
fn de_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value)
        .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0))
}

/// Boolean, as `true`/`false`, `0`/`1`, or `"0"`/`"1"`
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => matches!(s.trim(), "1" | "true" | "True" | "TRUE"),
        _ => false,
    })
}

/// Hashtag list as an array, `null`, or one comma/space-joined string
fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split([',', ' '])
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_post_json() -> Value {
        json!({
            "id": 1,
            "school_id": 1,
            "class_id": null,
            "student_id": null,
            "category": "announcement",
            "title": "Final exam schedule",
            "content": "Exams start next Monday.",
            "created_at": "2024-05-01T10:00:00Z",
            "hashtags": ["exams", "schedule"],
            "likes_count": 10,
            "is_liked_by_user": false,
            "media": []
        })
    }

    #[test]
    fn test_parse_bare_array() {
        let page = parse_post_list(json!([sample_post_json()])).unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].id, 1);
        assert!(page.pagination.is_none());
    }

    #[test]
    fn test_parse_documented_wrapper_with_pagination() {
        let body = json!({
            "status": "successful",
            "data": {
                "posts": [sample_post_json()],
                "pagination": {"current_page": 1, "last_page": 3, "per_page": 100, "total": 250}
            }
        });
        let page = parse_post_list(body).unwrap();
        assert_eq!(page.posts.len(), 1);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.last_page, 3);
        assert_eq!(pagination.total, 250);
    }

    #[test]
    fn test_parse_nested_posts_fallback() {
        let page = parse_post_list(json!({"posts": [sample_post_json()]})).unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[test]
    fn test_parse_data_array_fallback() {
        let page = parse_post_list(json!({"data": [sample_post_json()]})).unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[test]
    fn test_failed_status_carries_server_message() {
        let body = json!({"status": "error", "message": "token expired"});
        match parse_post_list(body) {
            Err(ApiError::Api(message)) => assert_eq!(message, "token expired"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_shape_is_an_error() {
        assert!(matches!(
            parse_post_list(json!({"status": "successful", "data": {"count": 3}})),
            Err(ApiError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_post_list(json!("nope")),
            Err(ApiError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_string_ids_and_int_flags_normalize() {
        let body = json!([{
            "id": "42",
            "school_id": "1",
            "class_id": "",
            "student_id": null,
            "title": "t",
            "content": "c",
            "created_at": "2024-05-01T10:00:00Z",
            "likes_count": "7",
            "is_liked_by_user": 1
        }]);
        let page = parse_post_list(body).unwrap();
        let post = &page.posts[0];
        assert_eq!(post.id, 42);
        assert_eq!(post.school_id, Some(1));
        assert_eq!(post.class_id, None);
        assert_eq!(post.student_id, None);
        assert_eq!(post.likes_count, 7);
        assert!(post.is_liked_by_user);
        assert!(post.hashtags.is_empty());
        assert_eq!(post.category, "");
    }

    #[test]
    fn test_hashtags_accept_null_and_joined_string() {
        let null_tags = json!([{
            "id": 1, "created_at": "2024-05-01T10:00:00Z", "hashtags": null
        }]);
        assert!(parse_post_list(null_tags).unwrap().posts[0]
            .hashtags
            .is_empty());

        let joined = json!([{
            "id": 2, "created_at": "2024-05-01T10:00:00Z", "hashtags": "sports, finals"
        }]);
        assert_eq!(
            parse_post_list(joined).unwrap().posts[0].hashtags,
            vec!["sports".to_string(), "finals".to_string()]
        );
    }

    #[test]
    fn test_parse_like_snapshot_wrapped_and_flat() {
        let wrapped = json!({
            "status": "successful",
            "data": {"is_liked_by_user": true, "likes_count": 15}
        });
        let snapshot = parse_like_snapshot(wrapped).unwrap();
        assert!(snapshot.is_liked_by_user);
        assert_eq!(snapshot.likes_count, 15);

        let flat = json!({"is_liked_by_user": 0, "likes_count": "3"});
        let snapshot = parse_like_snapshot(flat).unwrap();
        assert!(!snapshot.is_liked_by_user);
        assert_eq!(snapshot.likes_count, 3);
    }

    #[test]
    fn test_parse_like_snapshot_rejects_empty_payload() {
        assert!(matches!(
            parse_like_snapshot(json!({"status": "successful"})),
            Err(ApiError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_like_snapshot(json!({"status": "failed", "message": "post gone"})),
            Err(ApiError::Api(_))
        ));
    }

    #[test]
    fn test_fetch_all_body_omits_unset_filters() {
        let body = serde_json::to_value(ListPostsRequest::fetch_all(100)).unwrap();
        assert_eq!(body, json!({"page": 1, "page_size": 100}));
    }

    #[test]
    fn test_like_action_serializes_lowercase() {
        let body = serde_json::to_value(ToggleLikeRequest {
            post_id: 7,
            action: LikeAction::Unlike,
        })
        .unwrap();
        assert_eq!(body, json!({"post_id": 7, "action": "unlike"}));
    }
}
