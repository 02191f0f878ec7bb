//! Aggregate statistics over the version sequence.
//!
//! Everything here is derived from the canonical document order: length
//! and width series per version, boundary-normalized change counts per
//! adjacent version pair, contiguous change runs with document-fraction
//! positions, the outlier split used by scatter displays, and the
//! positional change-density grid behind the heatmap.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diff::diff;
use crate::model::Word;
use crate::store::VersionStore;

/// Word count of one version, with its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthPoint {
    /// 1-based revision ordinal.
    pub version: u32,

    /// Author date of the revision.
    #[serde(rename = "authorDate")]
    pub author_date: DateTime<Utc>,

    /// Total word count.
    pub length: usize,
}

/// Length-over-time series, one point per valid version.
pub fn length_series(store: &VersionStore) -> Vec<LengthPoint> {
    store
        .versions()
        .iter()
        .map(|version| LengthPoint {
            version: version.metadata.index,
            author_date: version.metadata.author_date,
            length: version.word_count(),
        })
        .collect()
}

/// Bounding-box width accounting of one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidthPoint {
    /// 1-based revision ordinal.
    pub version: u32,

    /// Total word count.
    pub word_count: usize,

    /// Sum of the bounding-box widths of every word.
    pub total_width: f32,

    /// Average word width, or 0 for a version without words.
    pub mean_width: f32,
}

/// Word-width series, one point per valid version.
pub fn width_series(store: &VersionStore) -> Vec<WidthPoint> {
    store
        .versions()
        .iter()
        .map(|version| {
            let word_count = version.word_count();
            let total_width = version.total_word_width();
            WidthPoint {
                version: version.metadata.index,
                word_count,
                total_width,
                mean_width: if word_count > 0 {
                    total_width / word_count as f32
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Change accounting between one version and its successor.
///
/// A boundary is a changed word whose successor in document order is
/// unchanged, or which ends the document: the tail of a maximal
/// contiguous run. `words / boundaries` therefore measures the average
/// size of a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjacentChange {
    /// 1-based revision ordinal of the earlier version of the pair.
    pub version: u32,

    /// Words the successor gained.
    pub added_words: usize,

    /// Run boundaries among the gained words (counted in the successor's
    /// document order).
    pub added_boundaries: usize,

    /// Words the successor lost.
    pub removed_words: usize,

    /// Run boundaries among the lost words (counted in this version's
    /// document order).
    pub removed_boundaries: usize,
}

impl AdjacentChange {
    /// Average contiguous run size of the gained words, or 0 when
    /// nothing was gained.
    pub fn average_added_size(&self) -> f64 {
        if self.added_boundaries == 0 {
            0.0
        } else {
            self.added_words as f64 / self.added_boundaries as f64
        }
    }

    /// Average contiguous run size of the lost words, or 0 when nothing
    /// was lost.
    pub fn average_removed_size(&self) -> f64 {
        if self.removed_boundaries == 0 {
            0.0
        } else {
            self.removed_words as f64 / self.removed_boundaries as f64
        }
    }
}

/// Change accounting for every adjacent version pair, in order. Empty
/// for stores with fewer than two versions.
pub fn adjacent_changes(store: &VersionStore) -> Vec<AdjacentChange> {
    let count = store.len();
    if count < 2 {
        return Vec::new();
    }

    (0..count - 1)
        .map(|index| {
            let current = store.words(index);
            let next = store.words(index + 1);
            let current_ids: HashSet<u64> = current.iter().map(|w| w.id).collect();
            let next_ids: HashSet<u64> = next.iter().map(|w| w.id).collect();

            let (added_words, added_boundaries) =
                count_changed_with_boundaries(&next, &current_ids);
            let (removed_words, removed_boundaries) =
                count_changed_with_boundaries(&current, &next_ids);

            AdjacentChange {
                version: store.versions()[index].metadata.index,
                added_words,
                added_boundaries,
                removed_words,
                removed_boundaries,
            }
        })
        .collect()
}

/// Count words of `sequence` absent from `other_ids`, plus the number of
/// positions where such a word is followed by a present word or by the
/// end of the sequence.
fn count_changed_with_boundaries(sequence: &[&Word], other_ids: &HashSet<u64>) -> (usize, usize) {
    let mut words = 0;
    let mut boundaries = 0;
    for (index, word) in sequence.iter().enumerate() {
        if !other_ids.contains(&word.id) {
            words += 1;
            match sequence.get(index + 1) {
                None => boundaries += 1,
                Some(next) if other_ids.contains(&next.id) => boundaries += 1,
                Some(_) => {}
            }
        }
    }
    (words, boundaries)
}

/// One maximal contiguous run of changed words within a version.
///
/// Positions are fractions of the longest version's word count, so runs
/// are comparable across versions of different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeRun {
    /// 1-based revision ordinal of the version the run occurs in.
    pub version: u32,

    /// Number of changed words in the run.
    pub changed_words: usize,

    /// Mean document position of the run's words, as a fraction.
    pub docpos: f64,

    /// Fraction one slot before the run's first word (floored at 0).
    pub start_pos: f64,

    /// Fraction one slot past the run's last word, except at the very
    /// end of the document where it is the last word's own position.
    pub end_pos: f64,

    /// Net change within the run: +1 per added word, -1 per removed.
    pub added_removed: i64,
}

/// Runs of one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionRuns {
    /// 1-based revision ordinal.
    pub version: u32,

    /// Runs in document order.
    pub runs: Vec<ChangeRun>,
}

/// All change runs of the document plus the normalization base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSeries {
    /// One entry per valid version, in order.
    pub versions: Vec<VersionRuns>,

    /// Word count of the longest version; the divisor behind every
    /// fraction in the runs.
    pub max_length: usize,
}

impl RunSeries {
    /// All runs across all versions, flattened in order.
    pub fn flatten(&self) -> Vec<ChangeRun> {
        self.versions.iter().flat_map(|v| v.runs.clone()).collect()
    }
}

/// Detect contiguous runs of changed words in every version.
///
/// A word counts as changed when it was added relative to the previous
/// version or is removed going into the next one. A run is flushed when
/// the following word is unchanged or the document ends.
pub fn change_runs(store: &VersionStore) -> RunSeries {
    let count = store.len();
    let max_length = store.max_length();
    let mut versions = Vec::with_capacity(count);

    for index in 0..count {
        let words = store.words(index);
        let version = store.versions()[index].metadata.index;

        let added: HashSet<u64> = if index > 0 {
            diff(&store.words(index - 1), &words)
                .added
                .iter()
                .map(|w| w.id)
                .collect()
        } else {
            HashSet::new()
        };
        let removed: HashSet<u64> = if index + 1 < count {
            diff(&words, &store.words(index + 1))
                .removed
                .iter()
                .map(|w| w.id)
                .collect()
        } else {
            HashSet::new()
        };

        let mut runs = Vec::new();
        let divisor = max_length.max(1) as f64;

        let mut changed_words = 0usize;
        let mut combined_position = 0usize;
        let mut first_index: Option<usize> = None;
        let mut added_removed = 0i64;

        for (word_index, word) in words.iter().enumerate() {
            let is_added = added.contains(&word.id);
            let is_removed = removed.contains(&word.id);
            if !is_added && !is_removed {
                continue;
            }

            changed_words += 1;
            combined_position += word_index;
            let first = *first_index.get_or_insert(word_index);
            if is_added {
                added_removed += 1;
            } else {
                added_removed -= 1;
            }

            let at_end = word_index + 1 >= words.len();
            let next_unchanged = !at_end && {
                let next = words[word_index + 1];
                !added.contains(&next.id) && !removed.contains(&next.id)
            };

            if at_end || next_unchanged {
                runs.push(ChangeRun {
                    version,
                    changed_words,
                    docpos: (combined_position as f64 / changed_words as f64) / divisor,
                    start_pos: first.saturating_sub(1) as f64 / divisor,
                    end_pos: if at_end {
                        word_index as f64 / divisor
                    } else {
                        (word_index + 1) as f64 / divisor
                    },
                    added_removed,
                });
                changed_words = 0;
                combined_position = 0;
                first_index = None;
                added_removed = 0;
            }
        }

        versions.push(VersionRuns { version, runs });
    }

    log::debug!(
        "change runs: {} runs across {} versions",
        versions.iter().map(|v| v.runs.len()).sum::<usize>(),
        count
    );

    RunSeries {
        versions,
        max_length,
    }
}

/// Population mean and standard deviation of run sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunStats {
    /// Mean of `changed_words` across the runs.
    pub mean: f64,

    /// Population standard deviation of `changed_words`.
    pub std_dev: f64,
}

/// Compute run-size statistics over a set of runs. Zero for an empty
/// set.
pub fn run_stats(runs: &[ChangeRun]) -> RunStats {
    if runs.is_empty() {
        return RunStats {
            mean: 0.0,
            std_dev: 0.0,
        };
    }

    let count = runs.len() as f64;
    let mean = runs.iter().map(|r| r.changed_words as f64).sum::<f64>() / count;
    let variance = runs
        .iter()
        .map(|r| {
            let delta = r.changed_words as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    RunStats {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Whether a run's size deviates from the mean by strictly more than one
/// standard deviation. With zero deviation nothing is an outlier.
pub fn is_outlier(run: &ChangeRun, stats: &RunStats) -> bool {
    stats.std_dev > 0.0 && ((run.changed_words as f64 - stats.mean) / stats.std_dev).abs() > 1.0
}

/// Split runs into (regular, outliers) using [`run_stats`] over the
/// whole set. Scatter displays size-scale the regular runs and draw
/// outliers with a fixed marker.
pub fn split_outliers(runs: &[ChangeRun]) -> (Vec<ChangeRun>, Vec<ChangeRun>) {
    let stats = run_stats(runs);
    runs.iter()
        .copied()
        .partition(|run| !is_outlier(run, &stats))
}

/// One cell of the change-density grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatCell {
    /// Page-local x coordinate (rounded).
    pub x: i32,

    /// Page-local y coordinate (rounded).
    pub y: i32,

    /// Number of changed bounding boxes covering the cell.
    pub count: u32,
}

/// Change density of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeat {
    /// Page index.
    pub page: u32,

    /// Non-zero cells in (x, y) order.
    pub cells: Vec<HeatCell>,
}

/// Change-density grid across the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatMap {
    /// Pages with at least one counted cell, in page order.
    pub pages: Vec<PageHeat>,

    /// Highest cell count anywhere; the normalization base for color
    /// scales.
    pub max: u32,
}

/// Accumulate the change-density grid: for every adjacent version pair,
/// every added and removed word stamps the integer cells covered by its
/// rounded bounding box onto its page.
pub fn heat_density(store: &VersionStore) -> HeatMap {
    let mut grid: BTreeMap<u32, BTreeMap<(i32, i32), u32>> = BTreeMap::new();

    let count = store.len();
    for index in 0..count.saturating_sub(1) {
        let current = store.words(index);
        let next = store.words(index + 1);
        let pair = diff(&current, &next);

        for word in pair.added.iter().chain(pair.removed.iter()) {
            let cells = grid.entry(word.page).or_default();
            let x0 = word.x0.round() as i32;
            let x1 = word.x1.round() as i32;
            let y0 = word.y0.round() as i32;
            let y1 = word.y1.round() as i32;
            for x in x0..=x1 {
                for y in y0..=y1 {
                    *cells.entry((x, y)).or_insert(0) += 1;
                }
            }
        }
    }

    let max = grid
        .values()
        .flat_map(|cells| cells.values())
        .copied()
        .max()
        .unwrap_or(0);

    HeatMap {
        pages: grid
            .into_iter()
            .map(|(page, cells)| PageHeat {
                page,
                cells: cells
                    .into_iter()
                    .map(|((x, y), count)| HeatCell { x, y, count })
                    .collect(),
            })
            .collect(),
        max,
    }
}
