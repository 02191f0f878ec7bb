//! End-to-end tests over a synthetic revision history: load, resolve
//! lifetimes, diff, classify, aggregate.

use std::io::Write;

use wordspan::{analyze_file, analyze_str, Analysis, ColorAttribute, SelectionState};

/// Build a document JSON with one page per version, words laid out on a
/// simple grid.
fn document_json(versions: &[&[u64]]) -> String {
    let versions: Vec<String> = versions
        .iter()
        .enumerate()
        .map(|(i, ids)| {
            let words: Vec<String> = ids
                .iter()
                .enumerate()
                .map(|(slot, id)| {
                    format!(
                        r#"{{ "id": {}, "x0": {}, "y0": 10, "x1": {}, "y1": 22 }}"#,
                        id,
                        slot * 50,
                        slot * 50 + 40
                    )
                })
                .collect();
            format!(
                r#"{{
                    "metadata": {{ "index": {}, "authorName": "author-{}",
                                   "authorDate": "2021-03-{:02}T1{}:00:00Z", "message": "rev {}" }},
                    "pages": [ {{ "number": 0, "width": 612, "height": 792, "text": [ {} ] }} ]
                }}"#,
                i + 1,
                i % 2,
                i + 1,
                i % 10,
                i + 1,
                words.join(", ")
            )
        })
        .collect();
    format!(r#"{{ "versions": [ {} ] }}"#, versions.join(", "))
}

fn analyze(versions: &[&[u64]]) -> Analysis {
    analyze_str(&document_json(versions)).unwrap()
}

#[test]
fn test_load_from_file() {
    let json = document_json(&[&[1, 2], &[2, 3]]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let analysis = analyze_file(file.path()).unwrap();
    assert_eq!(analysis.version_count(), 2);
}

#[test]
fn test_load_missing_file_is_an_io_error() {
    let result = analyze_file("/nonexistent/manuscript.json");
    assert!(matches!(result, Err(wordspan::Error::Io(_))));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let result = analyze_str("{ \"versions\": [ {");
    assert!(matches!(result, Err(wordspan::Error::Parse(_))));
}

#[test]
fn test_lifetimes_across_a_history() {
    // id 1 lives through versions 0-2, id 5 appears in version 1 and is
    // gone from version 3 onward, id 9 reappears after a gap.
    let analysis = analyze(&[&[1, 9], &[1, 5], &[1, 5, 9], &[9]]);

    let first = analysis.words(0);
    assert_eq!(first[0].added_version, 0);
    assert_eq!(first[0].removed_version, 3);

    let reappeared = analysis
        .words(2)
        .iter()
        .find(|w| w.id == 9)
        .expect("id 9 present in version 2");
    assert_eq!(reappeared.added_version, 2);
    assert_eq!(reappeared.removed_version, 3);

    let faded = analysis
        .words(2)
        .iter()
        .find(|w| w.id == 5)
        .expect("id 5 present in version 2");
    assert_eq!(faded.added_version, 1);
    assert_eq!(faded.removed_version, 3);
}

#[test]
fn test_reappearance_property() {
    let analysis = analyze(&[&[1], &[], &[1]]);
    // The middle version has a page with no words, which is still valid;
    // the reappearing occurrence starts a new run.
    assert_eq!(analysis.version_count(), 3);
    let occurrence = &analysis.words(2)[0];
    assert_eq!(occurrence.added_version, 2);
}

#[test]
fn test_round_trip_diff_over_random_shaped_sets() {
    let histories: [&[&[u64]]; 3] = [
        &[&[1, 2, 3], &[4, 5, 6]],
        &[&[1, 2, 3, 4, 5], &[2, 4, 6]],
        &[&[], &[1, 2]],
    ];

    for versions in histories {
        let analysis = analyze(versions);
        let forward = analysis.diff(0, 1);
        let backward = analysis.diff(1, 0);

        let mut fwd: Vec<u64> = forward.added.iter().map(|w| w.id).collect();
        let mut bwd: Vec<u64> = backward.removed.iter().map(|w| w.id).collect();
        fwd.sort_unstable();
        bwd.sort_unstable();
        assert_eq!(fwd, bwd);
    }
}

#[test]
fn test_timeline_partition_with_distinct_references() {
    // Five versions with overlapping content; probe them all against
    // (1, 3).
    let analysis = analyze(&[
        &[1, 2, 3],
        &[2, 3, 4],
        &[3, 4, 5, 6],
        &[4, 6, 7],
        &[6, 7, 8],
    ]);
    let selection = SelectionState {
        left_version: 1,
        right_version: 3,
        ..SelectionState::new()
    };

    let rows = analysis.timeline(&selection);
    assert_eq!(rows.len(), 5);
    for row in &rows {
        let added = row.added_to_left + row.added_to_right + row.added_to_both;
        assert_eq!(row.complete, row.length + row.moved + added);
        assert_eq!(row.unchanged + added, row.length);
        assert!(row.removed_from_left <= 0);
        assert!(row.removed_from_right <= 0);
        assert!(row.removed_from_both <= 0);
    }

    // Version 5 (probe index 4): id 8 is in neither reference, ids 6 and
    // 7 are held by the right reference only.
    let last = &rows[4];
    assert_eq!(last.added_to_both, 1);
    assert_eq!(last.added_to_right, 2);
    // ids 2 and 3 are held by the left reference only, id 4 by both.
    assert_eq!(last.removed_from_left, -2);
    assert_eq!(last.removed_from_both, -1);
}

#[test]
fn test_navigation_drives_recomputation() {
    let analysis = analyze(&[&[1, 2], &[2, 3], &[3, 4]]);
    let store = analysis.store();
    let mut selection = SelectionState::new();

    selection.next_right_version(store);
    let view = analysis.version_view(&selection);
    assert_eq!(view.added.iter().map(|w| w.id).collect::<Vec<_>>(), vec![3]);

    selection.next_right_version(store);
    let view = analysis.version_view(&selection);
    assert_eq!(
        view.added.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![3, 4]
    );

    // Walking past the end changes nothing.
    selection.next_right_version(store);
    let again = analysis.version_view(&selection);
    assert_eq!(
        again.added.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![3, 4]
    );
}

#[test]
fn test_aggregates_over_a_history() {
    let analysis = analyze(&[&[1, 2, 3], &[1, 2, 3, 4, 5], &[1, 4, 5]]);

    let lengths = analysis.length_series();
    assert_eq!(
        lengths.iter().map(|p| p.length).collect::<Vec<_>>(),
        vec![3, 5, 3]
    );

    let changes = analysis.adjacent_changes();
    assert_eq!(changes.len(), 2);
    // 4 and 5 arrive as one contiguous run.
    assert_eq!(changes[0].added_words, 2);
    assert_eq!(changes[0].added_boundaries, 1);
    assert_eq!(changes[0].average_added_size(), 2.0);
    // 2 and 3 leave as one contiguous run.
    assert_eq!(changes[1].removed_words, 2);
    assert_eq!(changes[1].removed_boundaries, 1);

    let runs = analysis.change_runs();
    assert_eq!(runs.max_length, 5);
    let all = runs.flatten();
    assert!(!all.is_empty());
    for run in &all {
        assert!(run.start_pos >= 0.0);
        assert!(run.end_pos <= 1.0);
        assert!(run.docpos >= 0.0 && run.docpos <= 1.0);
        assert!(run.changed_words > 0);
    }

    let heat = analysis.heat_density();
    assert_eq!(heat.pages.len(), 1);
    assert!(heat.max >= 1);
}

#[test]
fn test_shading_is_consistent_with_lifetimes() {
    let analysis = analyze(&[&[1], &[1, 2]]);

    let shades = analysis.shades(1, ColorAttribute::Age);
    let words = analysis.words(1);
    for (shade, word) in shades.iter().zip(words) {
        match shade {
            wordspan::Shade::Age(version) => assert_eq!(*version, word.added_version),
            other => panic!("unexpected shade {:?}", other),
        }
    }

    let authors = analysis.shades(1, ColorAttribute::Authors);
    assert_eq!(
        authors,
        vec![
            wordspan::Shade::Author("author-0"),
            wordspan::Shade::Author("author-1")
        ]
    );
}

#[test]
fn test_recomputation_is_byte_identical() {
    let json = document_json(&[&[1, 2, 3], &[2, 3, 4], &[4, 5]]);
    let first = analyze_str(&json).unwrap();
    let second = analyze_str(&json).unwrap();
    let selection = SelectionState {
        right_version: 2,
        ..SelectionState::new()
    };

    let a = wordspan::to_json(&first.timeline(&selection), wordspan::JsonFormat::Compact).unwrap();
    let b = wordspan::to_json(&second.timeline(&selection), wordspan::JsonFormat::Compact).unwrap();
    assert_eq!(a, b);

    let heat_a = wordspan::to_json(&first.heat_density(), wordspan::JsonFormat::Compact).unwrap();
    let heat_b = wordspan::to_json(&second.heat_density(), wordspan::JsonFormat::Compact).unwrap();
    assert_eq!(heat_a, heat_b);
}
