//! Render-facing view assembly.
//!
//! Bundles the outputs the rendering layer consumes for one selection:
//! flattened word lists for both sides, added/removed/moved lists, and
//! the per-word shading resolved from a closed attribute enum. Everything
//! here is a pure function of (store, annotated words, selection).

use chrono::Timelike;
use serde::Serialize;

use crate::diff::{diff, IdSet};
use crate::model::AnnotatedWord;
use crate::selection::SelectionState;
use crate::store::VersionStore;

/// Per-word change class relative to the adjacent versions, used for
/// change-based coloring. Precedence: added, then removed, then moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClass {
    /// Present in the neighboring versions, position untouched.
    Unchanged,

    /// Position changed since the previous occurrence.
    Moved,

    /// Not present in the previous version.
    Added,

    /// Gone in the next version.
    Removed,
}

/// Word attribute driving the coloring of a whole-document view.
/// Selected once per render call, never re-dispatched per word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorAttribute {
    /// Color by the version a word was added in.
    #[default]
    Age,

    /// Color by the commit hour of the adding revision.
    Time,

    /// Color by change class relative to the adjacent versions.
    Changes,

    /// Color by the author of the adding revision.
    Authors,
}

/// The resolved shading value of one word under a [`ColorAttribute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade<'a> {
    /// Valid-version index the word was added in.
    Age(usize),

    /// Hour of day (0-23) of the adding revision.
    Hour(u32),

    /// Change class relative to the adjacent versions.
    Change(ChangeClass),

    /// Author of the adding revision.
    Author(&'a str),
}

/// Classify every word of one version against its neighbors, in
/// canonical document order. Out-of-range indices yield an empty list.
pub fn change_classes(words: &[Vec<AnnotatedWord>], index: usize) -> Vec<ChangeClass> {
    let Some(current) = words.get(index) else {
        return Vec::new();
    };

    let added: IdSet = match index.checked_sub(1).and_then(|i| words.get(i)) {
        Some(previous) => IdSet::new(&diff(previous, current).added),
        None => IdSet::default(),
    };
    let removed: IdSet = match words.get(index + 1) {
        Some(next) => IdSet::new(&diff(current, next).removed),
        None => IdSet::default(),
    };

    current
        .iter()
        .map(|word| {
            if added.contains(word.id) {
                ChangeClass::Added
            } else if removed.contains(word.id) {
                ChangeClass::Removed
            } else if word.moved {
                ChangeClass::Moved
            } else {
                ChangeClass::Unchanged
            }
        })
        .collect()
}

/// Resolve the shading of every word of one version under the given
/// attribute, in canonical document order.
pub fn shades<'a>(
    store: &'a VersionStore,
    words: &[Vec<AnnotatedWord>],
    index: usize,
    attribute: ColorAttribute,
) -> Vec<Shade<'a>> {
    let Some(current) = words.get(index) else {
        return Vec::new();
    };

    match attribute {
        ColorAttribute::Age => current.iter().map(|w| Shade::Age(w.added_version)).collect(),
        ColorAttribute::Time => current
            .iter()
            .map(|w| {
                let hour = store
                    .get(w.added_version)
                    .map(|v| v.metadata.author_date.hour())
                    .unwrap_or(0);
                Shade::Hour(hour)
            })
            .collect(),
        ColorAttribute::Changes => change_classes(words, index)
            .into_iter()
            .map(Shade::Change)
            .collect(),
        ColorAttribute::Authors => current
            .iter()
            .map(|w| {
                let author = store
                    .get(w.added_version)
                    .map(|v| v.metadata.author_name.as_str())
                    .unwrap_or("");
                Shade::Author(author)
            })
            .collect(),
    }
}

/// Everything the rendering layer needs to draw one (left, right)
/// version comparison.
#[derive(Debug, Clone, Default)]
pub struct DiffView<'a> {
    /// Left version's words in canonical document order.
    pub left_words: &'a [AnnotatedWord],

    /// Right version's words in canonical document order.
    pub right_words: &'a [AnnotatedWord],

    /// Words the right version has and the left lacks.
    pub added: Vec<&'a AnnotatedWord>,

    /// Words the left version has and the right lacks.
    pub removed: Vec<&'a AnnotatedWord>,

    /// Words flagged as moved, right side first, then left.
    pub moved: Vec<&'a AnnotatedWord>,
}

/// Assemble the version-level comparison for the current selection.
/// Out-of-range cursors are clamped; an empty store yields an empty
/// view.
pub fn version_view<'a>(
    store: &VersionStore,
    words: &'a [Vec<AnnotatedWord>],
    selection: &SelectionState,
) -> DiffView<'a> {
    let count = store.len();
    if count == 0 {
        return DiffView::default();
    }

    let left_words = words[selection.left_version.min(count - 1)].as_slice();
    let right_words = words[selection.right_version.min(count - 1)].as_slice();

    let pair = diff(left_words, right_words);
    let mut moved: Vec<&AnnotatedWord> = right_words.iter().filter(|w| w.moved).collect();
    moved.extend(left_words.iter().filter(|w| w.moved));

    DiffView {
        left_words,
        right_words,
        added: pair.added,
        removed: pair.removed,
        moved,
    }
}

/// The page-level comparison: one selected page per side, diffed against
/// the other side's whole version.
#[derive(Debug, Clone, Default)]
pub struct PageView<'a> {
    /// Words on the selected left page.
    pub left_page_words: Vec<&'a AnnotatedWord>,

    /// Words on the selected right page.
    pub right_page_words: Vec<&'a AnnotatedWord>,

    /// Right-page words the left version lacks.
    pub added: Vec<&'a AnnotatedWord>,

    /// Left-page words the right version lacks.
    pub removed: Vec<&'a AnnotatedWord>,

    /// Moved words of both versions, excluding added and removed ids;
    /// right side first, then left.
    pub moved: Vec<&'a AnnotatedWord>,
}

/// Assemble the page-level comparison for the current selection. A page
/// cursor pointing past the selected version's pages contributes empty
/// lists.
pub fn page_view<'a>(
    store: &VersionStore,
    words: &'a [Vec<AnnotatedWord>],
    selection: &SelectionState,
) -> PageView<'a> {
    let count = store.len();
    if count == 0 {
        return PageView::default();
    }

    let left_version = &words[selection.left_version.min(count - 1)];
    let right_version = &words[selection.right_version.min(count - 1)];
    let left_ids = IdSet::new(left_version);
    let right_ids = IdSet::new(right_version);

    let left_page_words: Vec<&AnnotatedWord> = left_version
        .iter()
        .filter(|w| w.page as usize == selection.left_page)
        .collect();
    let right_page_words: Vec<&AnnotatedWord> = right_version
        .iter()
        .filter(|w| w.page as usize == selection.right_page)
        .collect();

    let added: Vec<&AnnotatedWord> = right_page_words
        .iter()
        .copied()
        .filter(|w| !left_ids.contains(w.id))
        .collect();
    let removed: Vec<&AnnotatedWord> = left_page_words
        .iter()
        .copied()
        .filter(|w| !right_ids.contains(w.id))
        .collect();

    let added_ids = IdSet::new(&added);
    let removed_ids = IdSet::new(&removed);

    let mut moved: Vec<&AnnotatedWord> = right_version
        .iter()
        .filter(|w| !added_ids.contains(w.id) && w.moved)
        .collect();
    moved.extend(
        left_version
            .iter()
            .filter(|w| !removed_ids.contains(w.id) && w.moved),
    );

    PageView {
        left_page_words,
        right_page_words,
        added,
        removed,
        moved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::annotate;
    use crate::model::{Metadata, Page, RawDocument, RawVersion, Word};

    fn word(id: u64, moved: bool) -> Word {
        Word {
            id,
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 2.0,
            page: 0,
            moved,
        }
    }

    fn store_from_pages(versions: &[&[(u32, &[u64])]]) -> VersionStore {
        let versions = versions
            .iter()
            .enumerate()
            .map(|(i, pages)| RawVersion {
                metadata: Metadata {
                    index: i as u32 + 1,
                    author_name: if i % 2 == 0 { "ada" } else { "grace" }.to_string(),
                    author_date: format!("2021-03-0{}T0{}:00:00Z", i + 1, i)
                        .parse()
                        .unwrap(),
                    message: String::new(),
                },
                pages: Some(
                    pages
                        .iter()
                        .map(|&(number, ids)| {
                            let mut page = Page::new(number, 100.0, 200.0);
                            page.words = ids.iter().map(|&id| word(id, false)).collect();
                            page
                        })
                        .collect(),
                ),
            })
            .collect();
        VersionStore::from_document(RawDocument { versions })
    }

    #[test]
    fn test_change_classes_precedence() {
        let store = store_from_pages(&[
            &[(0, &[1, 2])],
            &[(0, &[1, 2, 3])],
            &[(0, &[1, 3])],
        ]);
        let words = annotate(&store);

        let classes = change_classes(&words, 1);
        // Word 1: untouched. Word 2: removed going into version 2.
        // Word 3: added relative to version 0.
        assert_eq!(
            classes,
            vec![
                ChangeClass::Unchanged,
                ChangeClass::Removed,
                ChangeClass::Added
            ]
        );
    }

    #[test]
    fn test_change_classes_first_and_last_version() {
        let store = store_from_pages(&[&[(0, &[1])], &[(0, &[1, 2])]]);
        let words = annotate(&store);

        // Nothing counts as added in the first version, nothing as
        // removed in the last.
        assert_eq!(
            change_classes(&words, 0),
            vec![ChangeClass::Unchanged]
        );
        assert_eq!(
            change_classes(&words, 1),
            vec![ChangeClass::Unchanged, ChangeClass::Added]
        );
    }

    #[test]
    fn test_shades_by_attribute() {
        let store = store_from_pages(&[&[(0, &[1])], &[(0, &[1, 2])]]);
        let words = annotate(&store);

        let ages = shades(&store, &words, 1, ColorAttribute::Age);
        assert_eq!(ages, vec![Shade::Age(0), Shade::Age(1)]);

        let hours = shades(&store, &words, 1, ColorAttribute::Time);
        assert_eq!(hours, vec![Shade::Hour(0), Shade::Hour(1)]);

        let authors = shades(&store, &words, 1, ColorAttribute::Authors);
        assert_eq!(authors, vec![Shade::Author("ada"), Shade::Author("grace")]);
    }

    #[test]
    fn test_version_view() {
        let store = store_from_pages(&[&[(0, &[1, 2, 3])], &[(0, &[2, 3, 4])]]);
        let words = annotate(&store);
        let selection = SelectionState {
            right_version: 1,
            ..SelectionState::new()
        };

        let view = version_view(&store, &words, &selection);
        assert_eq!(view.left_words.len(), 3);
        assert_eq!(view.right_words.len(), 3);
        assert_eq!(view.added.iter().map(|w| w.id).collect::<Vec<_>>(), vec![4]);
        assert_eq!(
            view.removed.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![1]
        );
        assert!(view.moved.is_empty());
    }

    #[test]
    fn test_version_view_empty_store() {
        let store = store_from_pages(&[]);
        let words = annotate(&store);
        let view = version_view(&store, &words, &SelectionState::new());
        assert!(view.left_words.is_empty());
        assert!(view.added.is_empty());
    }

    #[test]
    fn test_page_view_diffs_page_against_whole_version() {
        // Left: pages 0=[1,2], 1=[3]. Right: pages 0=[1], 1=[3,4].
        let store = store_from_pages(&[
            &[(0, &[1, 2]), (1, &[3])],
            &[(0, &[1]), (1, &[3, 4])],
        ]);
        let words = annotate(&store);
        let selection = SelectionState {
            right_version: 1,
            left_page: 0,
            right_page: 1,
            ..SelectionState::new()
        };

        let view = page_view(&store, &words, &selection);
        assert_eq!(
            view.left_page_words.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(
            view.right_page_words
                .iter()
                .map(|w| w.id)
                .collect::<Vec<_>>(),
            vec![3, 4]
        );
        // Word 4 on the right page is new to the left version.
        assert_eq!(view.added.iter().map(|w| w.id).collect::<Vec<_>>(), vec![4]);
        // Word 2 on the left page is gone from the right version.
        assert_eq!(
            view.removed.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn test_page_view_out_of_range_page_is_empty() {
        let store = store_from_pages(&[&[(0, &[1])]]);
        let words = annotate(&store);
        let selection = SelectionState {
            left_page: 5,
            ..SelectionState::new()
        };

        let view = page_view(&store, &words, &selection);
        assert!(view.left_page_words.is_empty());
        assert!(view.removed.is_empty());
    }
}
