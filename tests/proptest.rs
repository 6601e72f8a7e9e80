//! Property-based tests for chapterpack.
//!
//! These tests generate random click sequences to find edge cases in the
//! selection state machine.

use proptest::prelude::*;

use chapterpack::prelude::*;
use chapterpack::selection::SelectionEngine;

const FILE_LEN: usize = 12;

fn export_text(n: usize) -> String {
    let messages: Vec<_> = (0..n)
        .map(|i| serde_json::json!({"id": format!("m{i}"), "author": {"name": "a"}, "content": i.to_string()}))
        .collect();
    serde_json::json!({"channel": {"id": "1", "name": "general"}, "messages": messages}).to_string()
}

fn arb_clicks(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..FILE_LEN, 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // SELECTION PROPERTIES
    // ============================================

    /// Any click sequence keeps the selection a single run (or empty)
    #[test]
    fn selection_stays_contiguous(clicks in arb_clicks(40)) {
        let mut engine = SelectionEngine::new();
        let id = SourceId::from("src");

        for p in clicks {
            let run = engine.click(&id, p).expect("clicks from a single run never violate it");
            let selected = engine.selected(&id);
            match run {
                None => {
                    prop_assert!(selected.is_empty());
                }
                Some(run) => {
                    prop_assert_eq!(selected.first().copied(), Some(*run.start()));
                    prop_assert_eq!(selected.last().copied(), Some(*run.end()));
                    prop_assert_eq!(run.end() - run.start() + 1, selected.len());
                }
            }
        }
    }

    /// The clicked position ends up selected unless it was selected before
    #[test]
    fn unselected_click_selects_it(clicks in arb_clicks(20), p in 0..FILE_LEN) {
        let mut engine = SelectionEngine::new();
        let id = SourceId::from("src");
        for c in clicks {
            engine.click(&id, c).unwrap();
        }
        let run = engine.run(&id);
        let inside = run.as_ref().is_some_and(|r| r.contains(&p));
        prop_assume!(!inside);

        engine.click(&id, p).unwrap();
        prop_assert!(engine.is_selected(&id, p));
    }

    /// Selecting one item then clicking it again leaves nothing selected
    #[test]
    fn double_click_clears(p in 0..FILE_LEN) {
        let mut engine = SelectionEngine::new();
        let id = SourceId::from("src");
        engine.click(&id, p).unwrap();
        prop_assert_eq!(engine.click(&id, p).unwrap(), None);
        prop_assert!(engine.summary().is_empty());
    }

    /// Other sources are never touched by a click
    #[test]
    fn clicks_are_per_source(clicks in arb_clicks(20), q in 0..FILE_LEN) {
        let mut engine = SelectionEngine::new();
        let a = SourceId::from("a");
        let b = SourceId::from("b");
        engine.click(&b, q).unwrap();
        for c in clicks {
            engine.click(&a, c).unwrap();
        }
        prop_assert_eq!(engine.selected(&b), vec![q]);
    }

    // ============================================
    // EXPORT PROPERTIES
    // ============================================

    /// Exported messages are exactly the committed run, in file order
    #[test]
    fn export_matches_committed_run(clicks in prop::collection::vec(0..FILE_LEN, 1..15)) {
        let mut session = Session::default();
        let id = session.load_str("general.json", &export_text(FILE_LEN)).unwrap();
        for c in clicks {
            session.click(&id, c).unwrap();
        }
        let selected = session.selected(&id);
        prop_assume!(!selected.is_empty());

        session.commit(&id).unwrap();
        let doc = session.export("x").document;
        let exported: Vec<String> = doc.entries[0].messages.iter().map(|m| m.id().into_owned()).collect();
        let expected: Vec<String> = selected.iter().map(|p| format!("m{p}")).collect();
        prop_assert_eq!(exported, expected);
    }
}
