//! Feed presentation shaping
//!
//! Pure string construction between the filters and the renderer: absolute
//! media URLs from relative storage paths, hashtags passed through in order.
//! No filtering logic lives here.

use tracing::debug;
use urlencoding::encode;

use crate::models::{MediaRef, Post, RenderableMedia, RenderablePost};

/// Shape filtered posts for rendering
pub fn present(posts: &[Post], base_url: &str) -> Vec<RenderablePost> {
    posts.iter().map(|post| renderable(post, base_url)).collect()
}

fn renderable(post: &Post, base_url: &str) -> RenderablePost {
    RenderablePost {
        id: post.id,
        category: post.category.clone(),
        title: post.title.clone(),
        content: post.content.clone(),
        created_at: post.created_at,
        hashtags: post.hashtags.clone(),
        likes_count: post.likes_count,
        is_liked_by_user: post.is_liked_by_user,
        media: post
            .media
            .iter()
            .map(|media| RenderableMedia {
                url: media_url(base_url, media),
                filename: media.filename.clone(),
                mime_type: media.mime_type.clone(),
            })
            .collect(),
    }
}

/// Absolute URL of a media attachment behind the feed media proxy.
///
/// Malformed metadata (empty path or filename) yields an empty string rather
/// than an error; the renderer treats it as "no media".
pub fn media_url(base_url: &str, media: &MediaRef) -> String {
    if media.path.trim().is_empty() || media.filename.trim().is_empty() {
        debug!(filename = %media.filename, "media metadata malformed, no url built");
        return String::new();
    }
    format!(
        "{}/get-activity-feed-media?url={}&filename={}&mime_type={}",
        base_url.trim_end_matches('/'),
        encode(&media.path),
        encode(&media.filename),
        encode(&media.mime_type),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(path: &str, filename: &str, mime_type: &str) -> MediaRef {
        MediaRef {
            path: path.to_string(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    #[test]
    fn test_media_url_construction() {
        let url = media_url(
            "https://api.school.example",
            &media("activity/7/photo 1.jpg", "photo 1.jpg", "image/jpeg"),
        );
        assert_eq!(
            url,
            "https://api.school.example/get-activity-feed-media?url=activity%2F7%2Fphoto%201.jpg&filename=photo%201.jpg&mime_type=image%2Fjpeg"
        );
    }

    #[test]
    fn test_media_url_trims_trailing_slash() {
        let url = media_url(
            "https://api.school.example/",
            &media("a/b.png", "b.png", "image/png"),
        );
        assert!(url.starts_with("https://api.school.example/get-activity-feed-media?"));
    }

    #[test]
    fn test_malformed_media_degrades_to_empty_url() {
        let base = "https://api.school.example";
        assert_eq!(media_url(base, &media("", "b.png", "image/png")), "");
        assert_eq!(media_url(base, &media("a/b.png", "  ", "image/png")), "");
    }

    #[test]
    fn test_present_keeps_hashtag_order() {
        let post = Post {
            id: 1,
            school_id: Some(1),
            class_id: None,
            student_id: None,
            category: "event".to_string(),
            title: "Sports day".to_string(),
            content: String::new(),
            created_at: chrono::Utc::now(),
            hashtags: vec!["sports".to_string(), "outdoor".to_string()],
            likes_count: 3,
            is_liked_by_user: true,
            media: vec![media("a/b.png", "b.png", "image/png")],
        };

        let rendered = present(&[post], "https://api.school.example");
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].hashtags, vec!["sports", "outdoor"]);
        assert!(rendered[0].is_liked_by_user);
        assert!(!rendered[0].media[0].url.is_empty());
    }
}
