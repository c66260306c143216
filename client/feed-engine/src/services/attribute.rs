//! Attribute filtering
//!
//! User-driven refinement on top of the scope-filtered feed: free-text
//! search, category, hashtags, and date range, combined as a conjunction.
//! Every predicate left at its default keeps everything, so default criteria
//! are an identity and the predicates commute.

use crate::models::{FilterCriteria, Post};

/// Keep the posts matching every enabled predicate. Returns a new sequence;
/// the input is never mutated.
pub fn attribute_filter(posts: &[Post], criteria: &FilterCriteria) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| matches_criteria(post, criteria))
        .cloned()
        .collect()
}

fn matches_criteria(post: &Post, criteria: &FilterCriteria) -> bool {
    matches_search(post, &criteria.search_term)
        && matches_category(post, &criteria.category)
        && matches_hashtags(post, &criteria.hashtags)
        && criteria.date_range.contains(post.created_at)
}

/// Case-insensitive substring match on title or content
fn matches_search(post: &Post, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    post.title.to_lowercase().contains(&term) || post.content.to_lowercase().contains(&term)
}

/// Case-insensitive equality; `"all"` and the empty string disable the filter
fn matches_category(post: &Post, category: &str) -> bool {
    if category.is_empty() || category.eq_ignore_ascii_case("all") {
        return true;
    }
    post.category.to_lowercase() == category.to_lowercase()
}

/// At least one post hashtag contains at least one criteria hashtag,
/// case-insensitive. Partial-tag matching is intentional so "sport" finds
/// "sports". Blank criteria tags are skipped.
fn matches_hashtags(post: &Post, wanted: &[String]) -> bool {
    let wanted: Vec<String> = wanted
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    if wanted.is_empty() {
        return true;
    }
    post.hashtags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        wanted.iter().any(|want| tag.contains(want))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;

    fn post(id: i64, title: &str, content: &str, category: &str, hashtags: &[&str]) -> Post {
        Post {
            id,
            school_id: Some(1),
            class_id: None,
            student_id: None,
            category: category.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            hashtags: hashtags.iter().map(|tag| tag.to_string()).collect(),
            likes_count: 0,
            is_liked_by_user: false,
            media: Vec::new(),
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            post(1, "Schedule", "Final exam schedule", "announcement", &["exams"]),
            post(2, "Sports day", "Sports day on Friday", "event", &["sports", "outdoor"]),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|post| post.id).collect()
    }

    #[test]
    fn test_default_criteria_are_an_identity() {
        let posts = sample_posts();
        let kept = attribute_filter(&posts, &FilterCriteria::default());
        assert_eq!(ids(&kept), ids(&posts));
    }

    #[test]
    fn test_search_matches_content_case_insensitive() {
        let criteria = FilterCriteria {
            search_term: "  EXAM ".to_string(),
            ..Default::default()
        };
        let kept = attribute_filter(&sample_posts(), &criteria);
        assert_eq!(ids(&kept), vec![1]);
    }

    #[test]
    fn test_category_all_sentinel_keeps_everything() {
        let criteria = FilterCriteria {
            category: "All".to_string(),
            ..Default::default()
        };
        assert_eq!(attribute_filter(&sample_posts(), &criteria).len(), 2);

        let criteria = FilterCriteria {
            category: "Event".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&attribute_filter(&sample_posts(), &criteria)), vec![2]);
    }

    #[test]
    fn test_hashtag_partial_match() {
        let criteria = FilterCriteria {
            hashtags: vec!["sport".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&attribute_filter(&sample_posts(), &criteria)), vec![2]);

        // blank criteria tags do not exclude anything
        let criteria = FilterCriteria {
            hashtags: vec!["  ".to_string()],
            ..Default::default()
        };
        assert_eq!(attribute_filter(&sample_posts(), &criteria).len(), 2);
    }

    #[test]
    fn test_date_range_constrains_only_set_bounds() {
        let posts = sample_posts();
        let criteria = FilterCriteria {
            date_range: DateRange {
                start: Some("2024-06-01T00:00:00Z".parse().unwrap()),
                end: None,
            },
            ..Default::default()
        };
        assert!(attribute_filter(&posts, &criteria).is_empty());

        let criteria = FilterCriteria {
            date_range: DateRange {
                start: None,
                end: Some("2024-06-01T00:00:00Z".parse().unwrap()),
            },
            ..Default::default()
        };
        assert_eq!(attribute_filter(&posts, &criteria).len(), 2);
    }

    #[test]
    fn test_predicates_commute() {
        let posts = sample_posts();
        let search_only = FilterCriteria {
            search_term: "sports".to_string(),
            ..Default::default()
        };
        let category_only = FilterCriteria {
            category: "event".to_string(),
            ..Default::default()
        };

        let search_then_category =
            attribute_filter(&attribute_filter(&posts, &search_only), &category_only);
        let category_then_search =
            attribute_filter(&attribute_filter(&posts, &category_only), &search_only);
        let combined = attribute_filter(
            &posts,
            &FilterCriteria {
                search_term: "sports".to_string(),
                category: "event".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(ids(&search_then_category), ids(&category_then_search));
        assert_eq!(ids(&search_then_category), ids(&combined));
    }
}
