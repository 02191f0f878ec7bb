//! Page-level types.

use super::Word;
use serde::{Deserialize, Serialize};

/// A single page in one version of the document.
///
/// Pages carry their own geometry; it is assumed (but not enforced) that a
/// page keeps its dimensions across versions of the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page index within its version (0-based).
    pub number: u32,

    /// Page width in page-local units.
    pub width: f32,

    /// Page height in page-local units.
    pub height: f32,

    /// Words on the page, in reading order.
    #[serde(rename = "text", default)]
    pub words: Vec<Word>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            words: Vec::new(),
        }
    }

    /// Number of words on the page.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Check if the page has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of the bounding-box widths of all words on the page.
    pub fn total_word_width(&self) -> f32 {
        self.words.iter().map(Word::width).sum()
    }

    /// Page dimensions as a (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
