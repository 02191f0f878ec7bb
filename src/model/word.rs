//! Word-level types.

use serde::{Deserialize, Serialize};

/// The smallest tracked text unit: a token with a stable identity and a
/// bounding box on its page.
///
/// The `id` is assigned by the producer of the document and is the sole
/// notion of identity in this engine: unique within a version, and reused
/// across versions for the same logical token. Position never participates
/// in identity comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable identifier of the token.
    pub id: u64,

    /// Left edge of the bounding box (page-local coordinates).
    pub x0: f32,

    /// Top edge of the bounding box.
    pub y0: f32,

    /// Right edge of the bounding box.
    pub x1: f32,

    /// Bottom edge of the bounding box.
    pub y1: f32,

    /// Page index within the owning version. Stamped from the owning page
    /// during normalization; any input value is overwritten.
    #[serde(default)]
    pub page: u32,

    /// Externally supplied flag: the token's position changed since its
    /// previous occurrence. Consumed, never derived, by this engine.
    #[serde(default, rename = "move")]
    pub moved: bool,
}

impl Word {
    /// Width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A word occurrence with its derived lifetime attached.
///
/// Produced by the lifetime resolver as a new value per occurrence; the
/// loaded document is never mutated. `added_version` and `removed_version`
/// describe the contiguous presence run this occurrence belongs to, so a
/// token that disappears and later reappears carries the dates of the run
/// currently on display, not of its first life.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedWord {
    /// Stable identifier of the token.
    pub id: u64,

    /// Left edge of the bounding box.
    pub x0: f32,

    /// Top edge of the bounding box.
    pub y0: f32,

    /// Right edge of the bounding box.
    pub x1: f32,

    /// Bottom edge of the bounding box.
    pub y1: f32,

    /// Page index within the owning version.
    pub page: u32,

    /// Externally supplied movement flag.
    #[serde(rename = "move")]
    pub moved: bool,

    /// Valid-version index this occurrence was observed in.
    pub version: usize,

    /// First valid-version index of the presence run containing this
    /// occurrence.
    pub added_version: usize,

    /// Index of the first version from which the run's id is absent, or
    /// the final valid-version index if the token is never removed.
    pub removed_version: usize,
}

impl AnnotatedWord {
    /// Build an annotated occurrence from a word and its resolved lifetime.
    pub fn new(word: &Word, version: usize, added_version: usize, removed_version: usize) -> Self {
        Self {
            id: word.id,
            x0: word.x0,
            y0: word.y0,
            x1: word.x1,
            y1: word.y1,
            page: word.page,
            moved: word.moved,
            version,
            added_version,
            removed_version,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Whether the token is still present in the final version of the
    /// document with `version_count` valid versions.
    pub fn survives(&self, version_count: usize) -> bool {
        version_count > 0 && self.removed_version == version_count - 1
    }
}

/// Identity seam shared by raw and annotated words, so the diff engine can
/// operate uniformly on either representation.
pub trait Identified {
    /// The stable token id used for all set-membership tests.
    fn word_id(&self) -> u64;
}

impl<T: Identified> Identified for &T {
    fn word_id(&self) -> u64 {
        (**self).word_id()
    }
}

impl Identified for Word {
    fn word_id(&self) -> u64 {
        self.id
    }
}

impl Identified for AnnotatedWord {
    fn word_id(&self) -> u64 {
        self.id
    }
}
