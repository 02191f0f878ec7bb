//! Document-level types: the permissive input shape and the normalized
//! version records the engines operate on.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Revision metadata attached to every version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// 1-based ordinal of the revision. Stable identity of the version;
    /// ascending index order is chronological order.
    pub index: u32,

    /// Name of the revision author.
    #[serde(rename = "authorName")]
    pub author_name: String,

    /// Timestamp of the revision.
    #[serde(rename = "authorDate")]
    pub author_date: DateTime<Utc>,

    /// Revision message.
    #[serde(default)]
    pub message: String,
}

/// One normalized snapshot of the document: ordered pages plus metadata.
///
/// Only produced by the version store, which guarantees a non-empty page
/// list sorted by page number with every word stamped with its page index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    /// Revision metadata.
    pub metadata: Metadata,

    /// Pages of the snapshot, sorted by `number`.
    pub pages: Vec<Page>,
}

impl Version {
    /// Total number of words across all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(Page::word_count).sum()
    }

    /// Sum of the bounding-box widths of every word in the version.
    pub fn total_word_width(&self) -> f32 {
        self.pages.iter().map(Page::total_word_width).sum()
    }
}

/// The raw document as supplied by a producer: a list of versions whose
/// page lists may be missing entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    /// Versions in chronological order.
    #[serde(default)]
    pub versions: Vec<RawVersion>,
}

/// One raw version before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVersion {
    /// Revision metadata.
    pub metadata: Metadata,

    /// Pages, if the producer captured any for this revision.
    #[serde(default)]
    pub pages: Option<Vec<Page>>,
}

impl RawVersion {
    /// Promote to a normalized version, or `None` if the page list is
    /// missing or empty. Not an error: invalid versions are silently
    /// filtered before any other processing.
    pub fn into_version(self) -> Option<Version> {
        match self.pages {
            Some(pages) if !pages.is_empty() => Some(Version {
                metadata: self.metadata,
                pages,
            }),
            _ => None,
        }
    }
}
