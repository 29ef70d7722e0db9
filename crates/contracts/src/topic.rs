//! TopicPath - Cheap-to-clone broker topic address
//!
//! Uses Arc<str> internally for O(1) clone operations.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Fully qualified topic address, `projects/{project}/topics/{topic}`.
///
/// Resolved once from configuration at startup and cloned into every
/// `PublishTask`, so cloning only increments a reference count.
///
/// # Examples
/// ```
/// use contracts::TopicPath;
///
/// let topic = TopicPath::new("my-project", "ingest-records");
/// let copy = topic.clone(); // O(1) - just increments ref count
/// assert_eq!(topic, copy);
/// assert_eq!(topic.as_str(), "projects/my-project/topics/ingest-records");
/// assert_eq!(topic.topic_id(), "ingest-records");
/// ```
#[derive(Clone)]
pub struct TopicPath {
    path: Arc<str>,
    topic_start: usize,
}

impl TopicPath {
    /// Build the path from project and topic identifiers.
    pub fn new(project_id: &str, topic_id: &str) -> Self {
        let path = format!("projects/{project_id}/topics/{topic_id}");
        let topic_start = path.len() - topic_id.len();
        Self {
            path: Arc::from(path),
            topic_start,
        }
    }

    /// Get the full path.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Get the bare topic identifier.
    #[inline]
    pub fn topic_id(&self) -> &str {
        &self.path[self.topic_start..]
    }
}

impl Deref for TopicPath {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl AsRef<str> for TopicPath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl fmt::Debug for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicPath({:?})", self.path)
    }
}

impl PartialEq for TopicPath {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.path, &other.path) || self.path == other.path
    }
}

impl Eq for TopicPath {}

impl PartialEq<str> for TopicPath {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.path.as_ref() == other
    }
}

impl PartialEq<&str> for TopicPath {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.path.as_ref() == *other
    }
}

impl Serialize for TopicPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}
