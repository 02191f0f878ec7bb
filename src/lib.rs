//! # wordspan
//!
//! Word-lifetime tracking and revision diff engine for paginated
//! documents.
//!
//! Given an ordered sequence of document revisions, each a list of pages
//! holding words with stable ids and bounding boxes, wordspan computes
//! when every word was added and removed, diffs any two revisions, and
//! derives the aggregate series behind revision-history visualizations:
//! stacked timelines, length histograms, change-run scatter plots and
//! positional heatmaps. Drawing is out of scope; the engine hands
//! structured, serializable data to whatever renders it.
//!
//! ## Quick Start
//!
//! ```
//! use wordspan::{analyze_str, SelectionState};
//!
//! let document = r#"{
//!     "versions": [
//!         { "metadata": { "index": 1, "authorName": "ada",
//!                         "authorDate": "2021-03-04T12:00:00Z", "message": "draft" },
//!           "pages": [ { "number": 0, "width": 612, "height": 792,
//!                        "text": [ { "id": 1, "x0": 10, "y0": 10, "x1": 40, "y1": 22 } ] } ] }
//!     ]
//! }"#;
//!
//! let analysis = analyze_str(document)?;
//! let selection = SelectionState::new();
//! let view = analysis.version_view(&selection);
//! assert_eq!(view.right_words.len(), 1);
//! # Ok::<(), wordspan::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Lifetime resolution**: per-occurrence added/removed versions, with
//!   reappearing words treated as new runs
//! - **Pairwise diffs**: id-set based added/removed/moved lists between
//!   any two revisions
//! - **Eight-way timeline**: per-version change accounting against a
//!   selected (left, right) pair
//! - **Statistics**: length and width series, boundary-normalized change
//!   sizes, contiguous change runs with outlier detection, change-density
//!   grids
//! - **Defensive loading**: versions without pages are filtered, an empty
//!   document degrades to empty outputs everywhere

pub mod diff;
pub mod error;
pub mod lifetime;
pub mod model;
pub mod selection;
pub mod stats;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use diff::{Diff, IdSet, TimelineCategory, TimelineRow};
pub use error::{Error, Result};
pub use model::{
    AnnotatedWord, Identified, Metadata, Page, RawDocument, RawVersion, Version, Word,
};
pub use selection::SelectionState;
pub use stats::{
    AdjacentChange, ChangeRun, HeatCell, HeatMap, LengthPoint, PageHeat, RunSeries, RunStats,
    VersionRuns, WidthPoint,
};
pub use store::{VersionStore, WeekGroup};
pub use view::{ChangeClass, ColorAttribute, DiffView, PageView, Shade};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;

/// Load and analyze a document from a JSON string.
pub fn analyze_str(json: &str) -> Result<Analysis> {
    let document: RawDocument = serde_json::from_str(json)?;
    Ok(Analysis::from_document(document))
}

/// Load and analyze a document from any reader.
pub fn analyze_reader<R: Read>(reader: R) -> Result<Analysis> {
    let document: RawDocument = serde_json::from_reader(reader)?;
    Ok(Analysis::from_document(document))
}

/// Load and analyze a document from a JSON file.
///
/// # Example
///
/// ```no_run
/// let analysis = wordspan::analyze_file("manuscript.json").unwrap();
/// println!("versions: {}", analysis.version_count());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Analysis> {
    let file = File::open(path)?;
    analyze_reader(BufReader::new(file))
}

/// JSON output format for derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a derived series (or any other output value) to JSON for
/// the rendering layer.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Serialize(e.to_string()))
}

/// A fully analyzed document: the validated version store plus the
/// lifetime-annotated words of every version.
///
/// Built once per loaded document. Every query method is a pure function
/// of the analysis and the passed-in [`SelectionState`], so recomputing
/// with the same selection yields identical results.
pub struct Analysis {
    store: VersionStore,
    words: Vec<Vec<AnnotatedWord>>,
}

impl Analysis {
    /// Analyze a raw document: filter invalid versions, then resolve
    /// word lifetimes.
    pub fn from_document(document: RawDocument) -> Self {
        let store = VersionStore::from_document(document);
        let words = lifetime::annotate(&store);
        Self { store, words }
    }

    /// The underlying version store.
    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// Number of valid versions.
    pub fn version_count(&self) -> usize {
        self.store.len()
    }

    /// Check if the document has no valid versions.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Annotated words of one version in canonical document order, or an
    /// empty slice for an out-of-range index.
    pub fn words(&self, index: usize) -> &[AnnotatedWord] {
        self.words.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Annotated words of every version.
    pub fn all_words(&self) -> &[Vec<AnnotatedWord>] {
        &self.words
    }

    /// Diff two versions by index. Out-of-range indices behave as empty
    /// versions.
    pub fn diff(&self, left: usize, right: usize) -> Diff<'_, AnnotatedWord> {
        diff::diff(self.words(left), self.words(right))
    }

    /// The stacked timeline series for the current selection.
    pub fn timeline(&self, selection: &SelectionState) -> Vec<TimelineRow> {
        diff::timeline(&self.store, &self.words, selection)
    }

    /// The version-level comparison view for the current selection.
    pub fn version_view(&self, selection: &SelectionState) -> DiffView<'_> {
        view::version_view(&self.store, &self.words, selection)
    }

    /// The page-level comparison view for the current selection.
    pub fn page_view(&self, selection: &SelectionState) -> PageView<'_> {
        view::page_view(&self.store, &self.words, selection)
    }

    /// Change classes of one version's words relative to its neighbors.
    pub fn change_classes(&self, index: usize) -> Vec<ChangeClass> {
        view::change_classes(&self.words, index)
    }

    /// Shading values of one version's words under a color attribute.
    pub fn shades(&self, index: usize, attribute: ColorAttribute) -> Vec<Shade<'_>> {
        view::shades(&self.store, &self.words, index, attribute)
    }

    /// Length-over-time series.
    pub fn length_series(&self) -> Vec<LengthPoint> {
        stats::length_series(&self.store)
    }

    /// Word-width series.
    pub fn width_series(&self) -> Vec<WidthPoint> {
        stats::width_series(&self.store)
    }

    /// Boundary-normalized change counts per adjacent version pair.
    pub fn adjacent_changes(&self) -> Vec<AdjacentChange> {
        stats::adjacent_changes(&self.store)
    }

    /// Contiguous change runs of every version.
    pub fn change_runs(&self) -> RunSeries {
        stats::change_runs(&self.store)
    }

    /// Positional change-density grid across the whole document.
    pub fn heat_density(&self) -> HeatMap {
        stats::heat_density(&self.store)
    }
}
