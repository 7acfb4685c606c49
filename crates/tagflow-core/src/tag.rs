#![forbid(unsafe_code)]

//! The tag data model.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Stable identity of a tag.
///
/// Identity never changes for the lifetime of a tag, even when its name or
/// count does. Hosts typically map their own keys (database ids, UUID
/// halves, interned strings) onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagId(u64);

impl TagId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TagId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag#{}", self.0)
    }
}

/// A tag: identity plus the content a chip displays.
///
/// ```
/// use tagflow_core::tag::{Tag, TagId};
///
/// let tag = Tag::new(TagId::new(7), "rust").with_count(3);
/// assert_eq!(tag.name(), "rust");
/// assert_eq!(tag.count(), 3);
///
/// // Same identity, different content: the fingerprint moves.
/// let renamed = Tag::new(TagId::new(7), "rustlang").with_count(3);
/// assert_eq!(tag.id(), renamed.id());
/// assert_ne!(tag.content_fingerprint(), renamed.content_fingerprint());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    id: TagId,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    count: u64,
}

impl Tag {
    /// Create a tag with a count of zero.
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            count: 0,
        }
    }

    /// Set the badge count.
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    #[inline]
    pub fn id(&self) -> TagId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Hash of everything that affects the rendered chip size.
    ///
    /// Identity is deliberately excluded: two tags with equal content
    /// measure the same.
    pub fn content_fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.name.hash(&mut hasher);
        self.count.hash(&mut hasher);
        hasher.finish()
    }
}
