//! Version store: normalizes a raw document into the ordered sequence of
//! valid versions everything downstream consumes.
//!
//! Normalization filters out versions without pages, sorts pages by their
//! number and stamps every word with its page index. The flattening order
//! produced by [`VersionStore::words`] (pages in number order, words in
//! reading order) is the canonical document order used by all positional
//! and run computations.

use std::collections::HashSet;

use chrono::Datelike;

use crate::model::{RawDocument, Version, Word};

/// The canonical, validated sequence of document versions.
///
/// Owns the version/page/word data for the lifetime of one loaded
/// document. An empty store is a valid (if degenerate) result; every
/// accessor degrades to an empty output rather than failing.
#[derive(Debug, Clone, Default)]
pub struct VersionStore {
    versions: Vec<Version>,
}

impl VersionStore {
    /// Build a store from a raw document, dropping versions that lack a
    /// non-empty page list and preserving the relative order of the rest.
    pub fn from_document(document: RawDocument) -> Self {
        let total = document.versions.len();
        let mut versions: Vec<Version> = document
            .versions
            .into_iter()
            .filter_map(|raw| raw.into_version())
            .collect();

        for version in &mut versions {
            version.pages.sort_by_key(|page| page.number);
            for page in &mut version.pages {
                let number = page.number;
                for word in &mut page.words {
                    word.page = number;
                }
            }
        }

        log::debug!(
            "version store: {} of {} versions valid",
            versions.len(),
            total
        );

        Self { versions }
    }

    /// Number of valid versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if the store holds no valid versions.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// All valid versions, in chronological order.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Get a version by valid-version index.
    pub fn get(&self, index: usize) -> Option<&Version> {
        self.versions.get(index)
    }

    /// Flatten one version into canonical document order: pages in number
    /// order, words within a page in reading order. Out-of-range indices
    /// yield an empty list.
    pub fn words(&self, index: usize) -> Vec<&Word> {
        match self.versions.get(index) {
            Some(version) => version
                .pages
                .iter()
                .flat_map(|page| page.words.iter())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Word count of the longest version. Used to normalize document
    /// positions so that runs are comparable across versions of different
    /// lengths.
    pub fn max_length(&self) -> usize {
        self.versions
            .iter()
            .map(Version::word_count)
            .max()
            .unwrap_or(0)
    }

    /// Highest word id present anywhere in the document.
    pub fn max_word_id(&self) -> Option<u64> {
        self.versions
            .iter()
            .flat_map(|v| v.pages.iter())
            .flat_map(|p| p.words.iter())
            .map(|w| w.id)
            .max()
    }

    /// Distinct author names in order of first appearance.
    pub fn authors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut authors = Vec::new();
        for version in &self.versions {
            let name = version.metadata.author_name.as_str();
            if seen.insert(name) {
                authors.push(name);
            }
        }
        authors
    }

    /// Group versions by the ISO week of their author date, preserving
    /// chronological order within and across groups.
    pub fn weekly_groups(&self) -> Vec<WeekGroup> {
        let mut groups: Vec<WeekGroup> = Vec::new();
        for (index, version) in self.versions.iter().enumerate() {
            let week = version.metadata.author_date.iso_week();
            let key = (week.year(), week.week());
            match groups.last_mut() {
                Some(group) if (group.year, group.week) == key => group.versions.push(index),
                _ => groups.push(WeekGroup {
                    year: key.0,
                    week: key.1,
                    versions: vec![index],
                }),
            }
        }
        groups
    }
}

/// Versions sharing one ISO week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup {
    /// ISO week-based year.
    pub year: i32,

    /// ISO week number (1-53).
    pub week: u32,

    /// Valid-version indices falling into the week, in chronological
    /// order.
    pub versions: Vec<usize>,
}

impl WeekGroup {
    /// The last (most recent) version of the week.
    pub fn latest(&self) -> usize {
        *self.versions.last().expect("week groups are never empty")
    }
}
