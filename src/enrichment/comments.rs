//! Review comments as SPDX annotations.

use crate::model::{ReviewComment, strip_quotes};
use crate::spdx::Annotation;

const ANNOTATION_TYPE: &str = "OTHER";

/// Current UTC time with microsecond precision.
#[must_use]
pub fn annotation_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}

/// One annotation per comment, all stamped with `timestamp`.
#[must_use]
pub fn comment_annotations(comments: &[ReviewComment], timestamp: &str) -> Vec<Annotation> {
    comments
        .iter()
        .map(|c| Annotation {
            annotation_date: strip_quotes(timestamp),
            annotation_type: ANNOTATION_TYPE.to_string(),
            annotator: strip_quotes(&format!("Person: {}", c.user.email)),
            comment: strip_quotes(&c.comment),
        })
        .collect()
}
