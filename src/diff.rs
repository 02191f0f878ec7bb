//! Pairwise diff engine.
//!
//! Id-set based comparison between any two versions: plain added/removed
//! diffs, three-way partitions against a (left, right) reference pair, and
//! the eight-way timeline classification built on top of them. All
//! functions are pure; recomputing with the same inputs yields identical
//! outputs.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AnnotatedWord, Identified};
use crate::selection::SelectionState;
use crate::store::VersionStore;

/// Prehashed id set for one side of a comparison.
#[derive(Debug, Clone, Default)]
pub struct IdSet(HashSet<u64>);

impl IdSet {
    /// Collect the ids of a word sequence.
    pub fn new<W: Identified>(words: &[W]) -> Self {
        Self(words.iter().map(Identified::word_id).collect())
    }

    /// Membership test by id.
    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Added and removed words between two versions.
#[derive(Debug, Clone)]
pub struct Diff<'a, W> {
    /// Words whose id is in `next` but not in `current`, in `next` order.
    pub added: Vec<&'a W>,

    /// Words whose id is in `current` but not in `next`, in `current`
    /// order.
    pub removed: Vec<&'a W>,
}

/// Compute the id-set difference between two word sequences.
///
/// Output order follows the sequence each word came from. Positions are
/// ignored entirely: a word with the same id on a different page or at a
/// different spot is still the same word.
pub fn diff<'a, W: Identified>(current: &'a [W], next: &'a [W]) -> Diff<'a, W> {
    let current_ids = IdSet::new(current);
    let next_ids = IdSet::new(next);

    Diff {
        added: next
            .iter()
            .filter(|w| !current_ids.contains(w.word_id()))
            .collect(),
        removed: current
            .iter()
            .filter(|w| !next_ids.contains(w.word_id()))
            .collect(),
    }
}

/// Probe words absent from one or both of the reference versions,
/// partitioned by which side is missing them. The partitions are disjoint
/// by construction.
#[derive(Debug, Clone)]
pub struct AddedPartition<'a, W> {
    /// Present in the right reference only.
    pub only_missing_from_left: Vec<&'a W>,

    /// Present in the left reference only.
    pub only_missing_from_right: Vec<&'a W>,

    /// Present in neither reference.
    pub missing_from_both: Vec<&'a W>,
}

impl<W> AddedPartition<'_, W> {
    /// Total number of partitioned words.
    pub fn total(&self) -> usize {
        self.only_missing_from_left.len()
            + self.only_missing_from_right.len()
            + self.missing_from_both.len()
    }
}

/// Reference words absent from the probe version, partitioned by which
/// side still holds them.
#[derive(Debug, Clone)]
pub struct RemovedPartition<'a, W> {
    /// Held by the left reference only.
    pub only_in_left: Vec<&'a W>,

    /// Held by the right reference only.
    pub only_in_right: Vec<&'a W>,

    /// Held by both references (listed from the left sequence).
    pub in_both: Vec<&'a W>,
}

/// Partition the probe's words by absence from the reference pair.
pub fn classify_added<'a, W: Identified>(
    probe: &'a [W],
    left_ids: &IdSet,
    right_ids: &IdSet,
) -> AddedPartition<'a, W> {
    let mut partition = AddedPartition {
        only_missing_from_left: Vec::new(),
        only_missing_from_right: Vec::new(),
        missing_from_both: Vec::new(),
    };

    for word in probe {
        let id = word.word_id();
        match (left_ids.contains(id), right_ids.contains(id)) {
            (false, false) => partition.missing_from_both.push(word),
            (false, true) => partition.only_missing_from_left.push(word),
            (true, false) => partition.only_missing_from_right.push(word),
            (true, true) => {}
        }
    }

    partition
}

/// Partition the reference pair's words that the probe no longer holds.
pub fn classify_removed<'a, W: Identified>(
    probe_ids: &IdSet,
    left: &'a [W],
    right: &'a [W],
    left_ids: &IdSet,
    right_ids: &IdSet,
) -> RemovedPartition<'a, W> {
    let mut partition = RemovedPartition {
        only_in_left: Vec::new(),
        only_in_right: Vec::new(),
        in_both: Vec::new(),
    };

    for word in left {
        let id = word.word_id();
        if !probe_ids.contains(id) {
            if right_ids.contains(id) {
                partition.in_both.push(word);
            } else {
                partition.only_in_left.push(word);
            }
        }
    }
    for word in right {
        let id = word.word_id();
        if !probe_ids.contains(id) && !left_ids.contains(id) {
            partition.only_in_right.push(word);
        }
    }

    partition
}

/// The eight mutually exclusive change categories of the stacked
/// timeline. Probe words land in the first five; words the probe lost
/// relative to a reference land in the removed categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineCategory {
    /// Present in both references, position untouched.
    Unchanged,

    /// Present in both references, flagged as moved.
    Moved,

    /// Present in the left reference but absent from the right.
    AddedToLeft,

    /// Present in the right reference but absent from the left.
    AddedToRight,

    /// Present in neither reference: new relative to both.
    AddedToBoth,

    /// Absent from the probe, held by the left reference only.
    RemovedFromLeft,

    /// Absent from the probe, held by the right reference only.
    RemovedFromRight,

    /// Absent from the probe, held by both references.
    RemovedFromBoth,
}

/// Classify one probe word against the reference pair. Precedence is
/// added categories first, then the movement flag, then unchanged, so a
/// word contributes to exactly one category.
pub fn classify_word(
    word: &AnnotatedWord,
    left_ids: &IdSet,
    right_ids: &IdSet,
) -> TimelineCategory {
    match (left_ids.contains(word.id), right_ids.contains(word.id)) {
        (false, false) => TimelineCategory::AddedToBoth,
        (false, true) => TimelineCategory::AddedToRight,
        (true, false) => TimelineCategory::AddedToLeft,
        (true, true) if word.moved => TimelineCategory::Moved,
        (true, true) => TimelineCategory::Unchanged,
    }
}

/// One row of the stacked timeline: the eight-way change accounting of a
/// probe version against the selected (left, right) pair.
///
/// The removed counts are negative so stacked charts can draw them below
/// the axis without re-deriving signs. `complete` is the internal
/// consistency total: `length + moved + added_to_left + added_to_right +
/// added_to_both`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    /// 1-based revision ordinal of the probe version.
    pub version: u32,

    /// Author date of the probe version.
    #[serde(rename = "authorDate")]
    pub author_date: DateTime<Utc>,

    /// Word count of the probe version.
    pub length: i64,

    /// Probe words present in the left reference but absent from the
    /// right.
    pub added_to_left: i64,

    /// Probe words present in the right reference but absent from the
    /// left.
    pub added_to_right: i64,

    /// Probe words absent from both references.
    pub added_to_both: i64,

    /// Words held only by the left reference that the probe lacks
    /// (negative).
    pub removed_from_left: i64,

    /// Words held only by the right reference that the probe lacks
    /// (negative).
    pub removed_from_right: i64,

    /// Words held by both references that the probe lacks (negative).
    pub removed_from_both: i64,

    /// Probe words carrying the movement flag.
    pub moved: i64,

    /// Probe words present in both references.
    pub unchanged: i64,

    /// Consistency total; see the struct docs.
    pub complete: i64,
}

/// Build the stacked timeline series: one row per valid version, each
/// classified against the selection's (left, right) pair.
///
/// Out-of-range cursors are clamped to the last valid version; an empty
/// store yields an empty series.
pub fn timeline(
    store: &VersionStore,
    words: &[Vec<AnnotatedWord>],
    selection: &SelectionState,
) -> Vec<TimelineRow> {
    let count = store.len();
    if count == 0 {
        return Vec::new();
    }

    let left = selection.left_version.min(count - 1);
    let right = selection.right_version.min(count - 1);
    let left_ids = IdSet::new(&words[left]);
    let right_ids = IdSet::new(&words[right]);

    store
        .versions()
        .iter()
        .zip(words)
        .map(|(version, probe_words)| {
            let probe_ids = IdSet::new(probe_words);

            let added = classify_added(probe_words, &left_ids, &right_ids);
            let removed =
                classify_removed(&probe_ids, &words[left], &words[right], &left_ids, &right_ids);

            let length = probe_words.len() as i64;
            let moved = probe_words.iter().filter(|w| w.moved).count() as i64;
            let added_to_right = added.only_missing_from_left.len() as i64;
            let added_to_left = added.only_missing_from_right.len() as i64;
            let added_to_both = added.missing_from_both.len() as i64;
            let added_total = added_to_left + added_to_right + added_to_both;

            let row = TimelineRow {
                version: version.metadata.index,
                author_date: version.metadata.author_date,
                length,
                added_to_left,
                added_to_right,
                added_to_both,
                removed_from_left: -(removed.only_in_left.len() as i64),
                removed_from_right: -(removed.only_in_right.len() as i64),
                removed_from_both: -(removed.in_both.len() as i64),
                moved,
                unchanged: length - added_total,
                complete: length + moved + added_total,
            };

            // Cross-check the set partition against an independent
            // per-word classification; a mismatch is a classification bug.
            debug_assert_eq!(row.complete, checked_complete(probe_words, &left_ids, &right_ids));

            row
        })
        .collect()
}

/// Recompute the consistency total through `classify_word`, counting
/// every probe word exactly once.
fn checked_complete(probe: &[AnnotatedWord], left_ids: &IdSet, right_ids: &IdSet) -> i64 {
    let mut unchanged = 0i64;
    let mut moved_exclusive = 0i64;
    let mut added = 0i64;
    for word in probe {
        match classify_word(word, left_ids, right_ids) {
            TimelineCategory::Unchanged => unchanged += 1,
            TimelineCategory::Moved => moved_exclusive += 1,
            TimelineCategory::AddedToLeft
            | TimelineCategory::AddedToRight
            | TimelineCategory::AddedToBoth => added += 1,
            _ => unreachable!("probe words never land in removed categories"),
        }
    }
    debug_assert_eq!(unchanged + moved_exclusive + added, probe.len() as i64);

    let length = probe.len() as i64;
    let moved_total = probe.iter().filter(|w| w.moved).count() as i64;
    length + moved_total + added
}
