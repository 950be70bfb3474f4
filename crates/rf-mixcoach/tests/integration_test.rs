//! Mix Coach Integration Tests
//!
//! Runs whole submissions through the public API.
//! Verifies:
//! - Challenge pack loading
//! - Scoring per target kind (EQ, compressor, problem, multitrack)
//! - Grading boundaries and feedback content
//! - Parametric EQ reduction feeding per-track scoring
//! - Progress tracking and deterministic results

use std::path::PathBuf;

use rf_mixcoach::feedback::{EQ_AFFIRMATION, GOAL_EXCELLENT};
use rf_mixcoach::{
    Breakdown, ChallengeEvaluator, ChallengeSet, CompressorParams, EqParams, MixInput, ParametricBand,
    ParametricEqParams, ProgressLedger, ProgressSink, ScoringConfig, Target, TrackMap, TrackParams,
    reduce_parametric_eq,
};

fn starter_pack() -> ChallengeSet {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("challenges/starter.json");
    ChallengeSet::from_file(path).expect("starter pack loads")
}

fn eq_input(low: f64, mid: f64, high: f64) -> MixInput {
    MixInput::new(EqParams::new(low, mid, high), CompressorParams::default())
}

fn band_tracks() -> TrackMap {
    let mut tracks = TrackMap::new();
    tracks.insert("kick".into(), TrackParams::with_eq(EqParams::new(4.0, 0.0, 0.0)));
    tracks.insert("bass".into(), TrackParams::with_eq(EqParams::new(-2.0, 1.0, 0.0)));
    tracks.insert("gtr1".into(), TrackParams::default().pan(-0.7));
    tracks.insert("gtr2".into(), TrackParams::default().pan(0.7));
    tracks.insert("vocal".into(), TrackParams::default().pan(0.0).volume(-3.0).reverb(12.0));
    tracks.insert("pad".into(), TrackParams::default().volume(-14.0).reverb(55.0));
    tracks
}

// ═══════════════════════════════════════════════════════════════════════════════
// PACK LOADING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_starter_pack_loads() {
    let set = starter_pack();
    assert_eq!(set.len(), 7);
    for challenge in set.iter() {
        assert!(challenge.validate().is_ok(), "{} failed validation", challenge.id);
    }
    assert!(set.require("band-space").unwrap().target.is_multitrack());
}

// ═══════════════════════════════════════════════════════════════════════════════
// EQ / COMPRESSOR / PROBLEM
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_exact_eq_match_scores_full() {
    let set = starter_pack();
    let result = ChallengeEvaluator::default().evaluate(set.require("eq-warmth").unwrap(), &eq_input(3.0, 0.0, -3.0));

    assert_eq!(result.overall, 100);
    assert_eq!(result.stars, 3);
    assert!(result.passed);
    assert_eq!(result.feedback, vec![EQ_AFFIRMATION.to_string()]);
}

#[test]
fn test_dead_zone_keeps_full_score() {
    let set = starter_pack();
    // 0.3 dB off with a 3 dB tolerance sits inside the dead zone
    let result = ChallengeEvaluator::default().evaluate(set.require("eq-warmth").unwrap(), &eq_input(3.3, -0.3, -2.7));
    assert_eq!(result.overall, 100);
}

#[test]
fn test_half_tolerance_scores_half() {
    let set = starter_pack();
    let result = ChallengeEvaluator::default().evaluate(set.require("eq-warmth").unwrap(), &eq_input(1.5, 1.5, -1.5));

    match &result.breakdown {
        Breakdown::Eq(score) => {
            assert_eq!(score.low, 50);
            assert_eq!(score.mid, 50);
            assert_eq!(score.high, 50);
        }
        other => panic!("unexpected breakdown {:?}", other),
    }
    assert_eq!(result.overall, 50);
    assert_eq!(result.stars, 1);
    assert!(!result.passed);
    assert_eq!(result.feedback.len(), 3);
    assert_eq!(result.feedback[0], "Try boosting the low frequencies");
}

#[test]
fn test_feedback_never_reveals_target_values() {
    let set = starter_pack();
    let result = ChallengeEvaluator::default().evaluate(set.require("eq-telephone").unwrap(), &eq_input(0.0, 0.0, 0.0));
    for line in &result.feedback {
        assert!(!line.contains('9'), "hint leaks a value: {}", line);
        assert!(!line.contains('6'), "hint leaks a value: {}", line);
    }
}

#[test]
fn test_compressor_without_timings() {
    let set = starter_pack();
    let input = MixInput::new(EqParams::flat(), CompressorParams::new(-18.0, 40.0).with_timings(1.0, 1.0));
    let result = ChallengeEvaluator::default().evaluate(set.require("comp-tame-peaks").unwrap(), &input);

    // timings are ignored when the target does not declare them
    assert_eq!(result.overall, 100);
    match &result.breakdown {
        Breakdown::Compressor(score) => assert!(!score.has_timings()),
        other => panic!("unexpected breakdown {:?}", other),
    }
}

#[test]
fn test_compressor_timing_hints() {
    let set = starter_pack();
    let input = MixInput::new(EqParams::flat(), CompressorParams::new(-20.0, 60.0).with_timings(0.001, 0.2));
    let result = ChallengeEvaluator::default().evaluate(set.require("comp-punch").unwrap(), &input);

    match &result.breakdown {
        Breakdown::Compressor(score) => {
            assert_eq!(score.threshold, 100);
            assert_eq!(score.amount, 100);
            assert_eq!(score.attack, Some(42));
            assert_eq!(score.release, Some(100));
            assert_eq!(score.total, 86);
        }
        other => panic!("unexpected breakdown {:?}", other),
    }
    assert_eq!(result.feedback, vec!["Try a slower attack".to_string()]);
}

#[test]
fn test_problem_challenge() {
    let set = starter_pack();
    let challenge = set.require("fix-mud").unwrap();
    let evaluator = ChallengeEvaluator::default();

    let solved = evaluator.evaluate(challenge, &eq_input(-4.0, 0.0, 2.0));
    assert_eq!(solved.overall, 100);
    assert!(solved.passed);

    let half = evaluator.evaluate(challenge, &eq_input(2.0, 0.0, 0.0));
    assert_eq!(half.overall, 50);
    assert!(!half.passed);
    assert_eq!(half.feedback.len(), 1);
    assert!(half.feedback[0].contains("Low EQ"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// MULTI-TRACK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_multitrack_eq_with_bus() {
    let set = starter_pack();
    let mut tracks = TrackMap::new();
    tracks.insert("kick".into(), TrackParams::with_eq(EqParams::new(4.0, -2.0, 0.0)));
    tracks.insert("snare".into(), TrackParams::with_eq(EqParams::new(0.0, 2.0, 3.0)));
    let input = MixInput::new(EqParams::flat(), CompressorParams::new(-18.0, 30.0)).with_tracks(tracks);

    let result = ChallengeEvaluator::default().evaluate(set.require("glue-drums").unwrap(), &input);
    assert_eq!(result.overall, 100);
    assert_eq!(result.stars, 3);
    match &result.breakdown {
        Breakdown::MultitrackEq { tracks, bus } => {
            assert_eq!(tracks.len(), 2);
            assert_eq!(bus.map(|b| b.total), Some(100));
        }
        other => panic!("unexpected breakdown {:?}", other),
    }
}

#[test]
fn test_multitrack_without_tracks_scores_zero() {
    let set = starter_pack();
    let result = ChallengeEvaluator::default().evaluate(set.require("glue-drums").unwrap(), &MixInput::default());
    assert_eq!(result.overall, 0);
    assert_eq!(result.stars, 1);
    assert!(!result.passed);
    assert!(result.breakdown.is_empty());
}

#[test]
fn test_goal_challenge_all_met() {
    let set = starter_pack();
    let input = MixInput::default()
        .with_tracks(band_tracks())
        .with_bus(rf_mixcoach::BusParams::default().with_compression(30.0));

    let result = ChallengeEvaluator::default().evaluate(set.require("band-space").unwrap(), &input);
    assert_eq!(result.overall, 100);
    assert_eq!(result.feedback, vec![GOAL_EXCELLENT.to_string()]);
}

#[test]
fn test_goal_challenge_missing_bus() {
    let set = starter_pack();
    let input = MixInput::default().with_tracks(band_tracks());

    let result = ChallengeEvaluator::default().evaluate(set.require("band-space").unwrap(), &input);
    // 5 of 6 conditions
    assert_eq!(result.overall, 83);
    assert_eq!(result.stars, 2);
    assert!(result.passed);
    assert_eq!(result.feedback.last().unwrap(), "Not met: Set bus compression between 20% and 50%");
}

#[test]
fn test_parametric_eq_feeds_goal_conditions() {
    let set = starter_pack();
    let mut tracks = band_tracks();
    // bass boosts the low end through a parametric shelf despite its flat simple EQ
    let boosted = ParametricEqParams::new(
        ParametricBand::low_shelf(250.0, 5.0),
        ParametricBand::peaking(500.0, 0.0, 1.0),
        ParametricBand::peaking(2500.0, 0.0, 1.0),
        ParametricBand::high_shelf(8000.0, 0.0),
    );
    tracks.insert("bass".into(), TrackParams::default().parametric(boosted));
    assert_eq!(reduce_parametric_eq(&boosted).low, 5.0);

    let input = MixInput::default()
        .with_tracks(tracks)
        .with_bus(rf_mixcoach::BusParams::default().with_compression(30.0));
    let result = ChallengeEvaluator::default().evaluate(set.require("band-space").unwrap(), &input);
    assert_eq!(result.overall, 83);
    assert!(result.feedback.iter().any(|l| l.contains("kick and bass")));
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG / PROGRESS / DETERMINISM
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_beginner_config_is_more_forgiving() {
    let target = Target::eq(EqParams::new(3.0, 0.0, -3.0));
    let input = eq_input(1.0, 0.0, -3.0);

    let strict = ChallengeEvaluator::new(ScoringConfig::advanced()).evaluate_target(&target, &input);
    let default = ChallengeEvaluator::default().evaluate_target(&target, &input);
    let loose = ChallengeEvaluator::new(ScoringConfig::beginner()).evaluate_target(&target, &input);

    assert!(strict.overall <= default.overall);
    assert!(default.overall <= loose.overall);
}

#[test]
fn test_progress_keeps_best_attempt() {
    let set = starter_pack();
    let challenge = set.require("eq-warmth").unwrap();
    let evaluator = ChallengeEvaluator::default();
    let mut ledger = ProgressLedger::new();

    for input in [eq_input(3.0, 0.0, -3.0), eq_input(0.0, 0.0, 0.0)] {
        let result = evaluator.evaluate(challenge, &input);
        ledger.record(&challenge.id, result.outcome());
    }

    let progress = ledger.get("eq-warmth").unwrap();
    assert_eq!(progress.best_stars, 3);
    assert!(progress.passed);
    assert_eq!(progress.attempts, 2);
    assert_eq!(ledger.completed_count(), 1);
}

#[test]
fn test_evaluation_is_deterministic() {
    let set = starter_pack();
    let evaluator = ChallengeEvaluator::default();
    let input = MixInput::new(EqParams::new(1.2, -0.7, 2.2), CompressorParams::new(-11.0, 47.0))
        .with_tracks(band_tracks());

    for challenge in set.iter() {
        let first = evaluator.evaluate(challenge, &input);
        let second = evaluator.evaluate(challenge, &input);
        assert_eq!(first, second, "{} is not deterministic", challenge.id);
        assert!(first.overall <= 100);
        assert!((1..=3).contains(&first.stars));
    }
}

#[test]
fn test_result_json_shape() {
    let set = starter_pack();
    let result = ChallengeEvaluator::default().evaluate(set.require("eq-warmth").unwrap(), &eq_input(3.0, 0.0, -3.0));
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["overall"], 100);
    assert_eq!(json["breakdown"]["type"], "eq");
    assert_eq!(json["breakdown"]["low"], 100);
}
