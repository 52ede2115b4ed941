use std::path::PathBuf;

use proptest::prelude::*;
use tapwise_common::config::GestureSettings;
use tapwise_gesture_model::gesture::{GestureEvent, GestureRecord};
use tapwise_gesture_model::touch::{
    parse_script, validate_script, TouchBatch, TouchSample, TouchScript,
};
use tapwise_replay::{ReplayOptions, ReplaySession};

fn load_fixture(name: &str) -> TouchScript {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("scripts")
        .join(name);

    let content = std::fs::read_to_string(path).expect("fixture script should be readable");
    parse_script(&content).expect("fixture script should parse")
}

fn replay(script: &TouchScript) -> Vec<GestureRecord> {
    let (records, _) =
        ReplaySession::run(&GestureSettings::default(), script, &ReplayOptions::default())
            .expect("replay should succeed");
    records
}

fn signature(records: &[GestureRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| match record.event {
            GestureEvent::Flick { direction, .. } | GestureEvent::Swipe { direction, .. } => {
                format!("{}({})@{:.3}", record.event.name(), direction, record.t)
            }
            _ => match record.event.magnification() {
                Some(m) => format!("{}({:.2})@{:.3}", record.event.name(), m, record.t),
                None => format!("{}@{:.3}", record.event.name(), record.t),
            },
        })
        .collect()
}

#[test]
fn fixtures_are_valid_scripts() {
    for name in [
        "double_tap.jsonl",
        "pinch.jsonl",
        "flick_swipe.jsonl",
        "hold_drag.jsonl",
    ] {
        let script = load_fixture(name);
        assert!(script.header.is_some(), "{name} should carry a header");
        assert!(validate_script(&script).is_empty(), "{name} should be valid");
    }
}

#[test]
fn double_tap_fixture() {
    let records = replay(&load_fixture("double_tap.jsonl"));
    assert_eq!(
        signature(&records),
        vec![
            "down@0.000",
            "tap@0.040",
            "down@0.100",
            "tap@0.140",
            "double_tap@0.140",
        ]
    );
}

#[test]
fn pinch_fixture() {
    let records = replay(&load_fixture("pinch.jsonl"));
    assert_eq!(
        signature(&records),
        vec![
            "down@0.000",
            "down@0.000",
            "pinch_action(1.50)@0.100",
            "pinch_out(1.50)@0.100",
            "pinch_action(1.20)@0.200",
            "pinch_in(1.20)@0.200",
            "pinch_ended(1.20)@0.300",
            "tap@0.350",
            "single_tap@0.600",
        ]
    );
}

#[test]
fn flick_swipe_fixture() {
    let records = replay(&load_fixture("flick_swipe.jsonl"));
    assert_eq!(
        signature(&records),
        vec![
            "down@0.000",
            "scroll@0.100",
            "flick(right)@0.200",
            "down@1.000",
            "scroll@1.200",
            "swipe(down)@1.400",
        ]
    );
}

#[test]
fn hold_drag_fixture() {
    let records = replay(&load_fixture("hold_drag.jsonl"));
    assert_eq!(
        signature(&records),
        vec!["down@0.000", "hold@1.100", "drag@1.500", "drag_ended@1.600"]
    );
}

#[test]
fn replay_is_deterministic() {
    let script = load_fixture("pinch.jsonl");
    assert_eq!(replay(&script), replay(&script));
}

#[test]
fn zero_settle_leaves_trailing_tap_unresolved() {
    let script = load_fixture("pinch.jsonl");
    let options = ReplayOptions {
        settle_secs: Some(0.0),
    };
    let (records, summary) =
        ReplaySession::run(&GestureSettings::default(), &script, &options).unwrap();
    assert!(records.iter().all(|r| r.event.name() != "single_tap"));
    assert_eq!(summary.batches, 5);
    assert_eq!(summary.samples, 6);
    assert!((summary.end_time - 0.35).abs() < 1e-9);
}

fn tap_script(gaps: &[f64]) -> TouchScript {
    let mut batches = Vec::new();
    let mut t = 0.0;
    for gap in gaps {
        t += gap;
        batches.push(TouchBatch::begin(t, vec![TouchSample::new(0, 80.0, 80.0)]));
        batches.push(TouchBatch::end(t + 0.02, vec![TouchSample::new(0, 80.0, 80.0)]));
    }
    TouchScript {
        header: None,
        batches,
    }
}

proptest! {
    #[test]
    fn every_tap_resolves_exactly_once(gaps in prop::collection::vec(0.05f64..0.6, 1..12)) {
        let records = replay(&tap_script(&gaps));
        let count = |name: &str| records.iter().filter(|r| r.event.name() == name).count();

        prop_assert_eq!(count("tap"), gaps.len());
        prop_assert_eq!(count("tap"), count("single_tap") + 2 * count("double_tap"));
        prop_assert_eq!(count("hold"), 0);
    }
}
