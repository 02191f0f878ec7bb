//! Word-lifetime resolver.
//!
//! Two linear passes over the version sequence assign every word
//! occurrence the bounds of its presence run: the version it was added in
//! and the version it disappeared in. Membership is tested by id only;
//! position changes never interrupt a run. A token that disappears and
//! later reappears starts a fresh run, so each occurrence reports the
//! lifetime of the run it belongs to.

use std::collections::{HashMap, HashSet};

use crate::model::AnnotatedWord;
use crate::store::VersionStore;

/// Resolve lifetimes for every word occurrence in the store.
///
/// Returns one vector per valid version, in canonical document order,
/// holding a new annotated record per occurrence. The store itself is
/// left untouched. Runs in O(total words) via hashed id lookups.
pub fn annotate(store: &VersionStore) -> Vec<Vec<AnnotatedWord>> {
    let count = store.len();
    if count == 0 {
        return Vec::new();
    }

    let flattened: Vec<_> = (0..count).map(|i| store.words(i)).collect();
    let id_sets: Vec<HashSet<u64>> = flattened
        .iter()
        .map(|words| words.iter().map(|w| w.id).collect())
        .collect();

    // Forward pass: map each id to the version index opening its current
    // presence run. Ids that vanish are evicted so a reappearance opens a
    // new run.
    let mut open_runs: HashMap<u64, usize> = HashMap::new();
    let mut added_versions: Vec<Vec<usize>> = Vec::with_capacity(count);
    for index in 0..count {
        if index > 0 {
            for id in id_sets[index - 1].difference(&id_sets[index]) {
                open_runs.remove(id);
            }
        }
        added_versions.push(
            flattened[index]
                .iter()
                .map(|word| *open_runs.entry(word.id).or_insert(index))
                .collect(),
        );
    }

    // Backward pass: map each id to the version index at which its run
    // ends (the first version, scanning forward, where the id is absent).
    // Scanning backward keeps exactly the nearest such boundary visible
    // for the version being annotated.
    let last = count - 1;
    let mut run_ends: HashMap<u64, usize> = HashMap::new();
    let mut removed_versions: Vec<Vec<usize>> = vec![Vec::new(); count];
    for index in (0..count).rev() {
        if index < last {
            for id in id_sets[index].difference(&id_sets[index + 1]) {
                run_ends.insert(*id, index + 1);
            }
        }
        removed_versions[index] = flattened[index]
            .iter()
            .map(|word| run_ends.get(&word.id).copied().unwrap_or(last))
            .collect();
    }

    log::debug!(
        "lifetime resolver: annotated {} occurrences across {} versions",
        flattened.iter().map(Vec::len).sum::<usize>(),
        count
    );

    flattened
        .iter()
        .enumerate()
        .map(|(version, words)| {
            words
                .iter()
                .zip(&added_versions[version])
                .zip(&removed_versions[version])
                .map(|((word, &added), &removed)| {
                    debug_assert!(added <= removed);
                    AnnotatedWord::new(word, version, added, removed)
                })
                .collect()
        })
        .collect()
}
