//! Audience scope filtering
//!
//! Each feed tab shows one audience-visibility class. The three rules are
//! mutually exclusive over well-formed posts: a post carries exactly one
//! scope origin, so it matches at most one rule for a fixed viewer. Missing
//! viewer context never errors; it yields an empty result.

use tracing::debug;

use crate::models::{Post, ScopeKind, Viewer};

/// Keep the posts visible under one scope rule. Returns a new sequence; the
/// input is never mutated.
pub fn scope_filter(
    posts: &[Post],
    viewer: &Viewer,
    kind: ScopeKind,
    canonical_school_id: i64,
) -> Vec<Post> {
    let kept: Vec<Post> = posts
        .iter()
        .filter(|post| matches_scope(post, viewer, kind, canonical_school_id))
        .cloned()
        .collect();
    debug!(
        scope = ?kind,
        total = posts.len(),
        kept = kept.len(),
        "scope filter applied"
    );
    kept
}

fn matches_scope(post: &Post, viewer: &Viewer, kind: ScopeKind, canonical_school_id: i64) -> bool {
    match kind {
        // School-wide: addressed to the whole school, not to a class or a
        // student.
        ScopeKind::School => {
            post.school_id == Some(canonical_school_id)
                && post.class_id.is_none()
                && post.student_id.is_none()
        }
        // Class-wide: fail closed when no student is selected or the
        // selected student has no class.
        ScopeKind::Class => {
            match viewer
                .selected_student
                .as_ref()
                .and_then(|student| student.class_id)
            {
                Some(class_id) => post.class_id == Some(class_id),
                None => false,
            }
        }
        // Individual-student: fail closed when no student is selected.
        ScopeKind::Student => match viewer.selected_student.as_ref() {
            Some(student) => post.student_id == Some(student.student_id),
            None => false,
        },
    }
}
