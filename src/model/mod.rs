//! Data model for paginated document revisions.
//!
//! This module defines the input contract (raw documents with optional
//! page lists) and the normalized records the diff and statistics engines
//! operate on. The loaded document is treated as immutable data; all
//! derived fields live on separate annotated records.

mod document;
mod page;
mod word;

pub use document::{Metadata, RawDocument, RawVersion, Version};
pub use page::Page;
pub use word::{AnnotatedWord, Identified, Word};
