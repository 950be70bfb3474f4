//! Challenge evaluation
//!
//! Single pass: resolve per-track parametric EQs, dispatch on the target
//! kind, compose the overall score, grade it and attach feedback. The
//! evaluator holds only configuration, so one instance can be shared freely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::challenge::{Challenge, Target};
use crate::conditions::{Condition, evaluate_goals};
use crate::config::ScoringConfig;
use crate::dynamics::CompressorEvaluator;
use crate::eq::{EqEvaluator, EqScore};
use crate::error::MixCoachResult;
use crate::feedback::FeedbackGenerator;
use crate::parametric::reduce_parametric_eq;
use crate::params::{BusParams, CompressorParams, EqParams, TrackMap};
use crate::problem::{ProblemSolution, evaluate_problem};
use crate::result::{Breakdown, ScoreResult};
use crate::similarity::mean_score;

/// Everything the control surface reports for one submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixInput {
    /// Main EQ
    #[serde(default)]
    pub eq: EqParams,
    /// Main compressor (acts on the bus in multi-track challenges)
    #[serde(default)]
    pub compressor: CompressorParams,
    /// Per-track controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<TrackMap>,
    /// Bus processing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<BusParams>,
}

impl MixInput {
    /// Single-channel input
    pub fn new(eq: EqParams, compressor: CompressorParams) -> Self {
        Self {
            eq,
            compressor,
            tracks: None,
            bus: None,
        }
    }

    /// Builder pattern: attach per-track controls
    pub fn with_tracks(mut self, tracks: TrackMap) -> Self {
        self.tracks = Some(tracks);
        self
    }

    /// Builder pattern: attach bus processing
    pub fn with_bus(mut self, bus: BusParams) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> MixCoachResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Replace each track's simplified EQ with its reduced parametric EQ, if any
pub fn resolve_tracks(tracks: &TrackMap) -> TrackMap {
    tracks
        .iter()
        .map(|(id, track)| {
            let mut track = *track;
            if let Some(parametric) = &track.parametric_eq {
                let reduced = reduce_parametric_eq(parametric);
                log::trace!("track {}: parametric EQ reduced to {:?}", id, reduced);
                track.low = reduced.low;
                track.mid = reduced.mid;
                track.high = reduced.high;
            }
            (id.clone(), track)
        })
        .collect()
}

/// Scores submissions against challenge targets
#[derive(Debug, Clone)]
pub struct ChallengeEvaluator {
    config: ScoringConfig,
    eq: EqEvaluator,
    compressor: CompressorEvaluator,
    feedback: FeedbackGenerator,
}

impl Default for ChallengeEvaluator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ChallengeEvaluator {
    /// Evaluator for a (validated) config
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            eq: EqEvaluator::from_config(&config),
            compressor: CompressorEvaluator::from_config(&config),
            feedback: FeedbackGenerator::from_config(&config),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a submission for a challenge
    pub fn evaluate(&self, challenge: &Challenge, input: &MixInput) -> ScoreResult {
        let result = self.evaluate_target(&challenge.target, input);
        log::debug!(
            "challenge {} ({}): overall={} stars={} passed={}",
            challenge.id,
            challenge.target.kind(),
            result.overall,
            result.stars,
            result.passed
        );
        result
    }

    /// Score a submission for a bare target
    pub fn evaluate_target(&self, target: &Target, input: &MixInput) -> ScoreResult {
        log::trace!("dispatching {} target", target.kind());

        let (overall, breakdown, feedback) = match target {
            Target::Eq { target, tolerance } => self.score_eq(&input.eq, target, *tolerance),
            Target::Compressor { target } => self.score_compressor(&input.compressor, target),
            Target::Problem { solution } => self.score_problem(input, solution),
            Target::MultitrackEq { tracks, bus_compressor } => match &input.tracks {
                Some(player_tracks) => {
                    self.score_multitrack_eq(&resolve_tracks(player_tracks), tracks, bus_compressor.as_ref(), &input.compressor)
                }
                None => Self::missing_tracks(target),
            },
            Target::MultitrackGoal { conditions } => match &input.tracks {
                Some(player_tracks) => {
                    self.score_goals(&resolve_tracks(player_tracks), input.bus.as_ref(), conditions)
                }
                None => Self::missing_tracks(target),
            },
        };

        ScoreResult::graded(overall, &self.config.grading, breakdown, feedback)
    }

    fn missing_tracks(target: &Target) -> (u8, Breakdown, Vec<String>) {
        log::warn!("{} target evaluated without per-track params, scoring 0", target.kind());
        (0, Breakdown::Empty, Vec::new())
    }

    fn score_eq(&self, player: &EqParams, target: &EqParams, tolerance: Option<f64>) -> (u8, Breakdown, Vec<String>) {
        let evaluator = match tolerance {
            Some(tol) => self.eq.with_tolerance(tol),
            None => self.eq,
        };
        let score = evaluator.evaluate(player, target);
        let feedback = self.feedback.eq(player, target, &score);
        (score.total, Breakdown::Eq(score), feedback)
    }

    fn score_compressor(&self, player: &CompressorParams, target: &CompressorParams) -> (u8, Breakdown, Vec<String>) {
        let score = self.compressor.evaluate(player, target, target.has_timings());
        let feedback = self.feedback.compressor(player, target, &score);
        (score.total, Breakdown::Compressor(score), feedback)
    }

    fn score_problem(&self, input: &MixInput, solution: &ProblemSolution) -> (u8, Breakdown, Vec<String>) {
        let score = evaluate_problem(&input.eq, &input.compressor, solution);
        let feedback = self.feedback.problem(&score);
        (score.total, Breakdown::Problem(score), feedback)
    }

    fn score_multitrack_eq(
        &self,
        player_tracks: &TrackMap,
        targets: &BTreeMap<String, EqParams>,
        bus_target: Option<&CompressorParams>,
        bus_player: &CompressorParams,
    ) -> (u8, Breakdown, Vec<String>) {
        let track_scores: BTreeMap<String, _> = targets
            .iter()
            .map(|(id, target)| {
                let score = match player_tracks.get(id) {
                    Some(track) => self.eq.evaluate(&track.eq(), target),
                    None => {
                        log::debug!("multitrack-eq: no params for track {}, scoring 0", id);
                        EqScore {
                            low: 0,
                            mid: 0,
                            high: 0,
                            total: 0,
                        }
                    }
                };
                (id.clone(), score)
            })
            .collect();

        let bus_score =
            bus_target.map(|target| self.compressor.evaluate(bus_player, target, target.has_timings()));

        let mut totals: Vec<u8> = track_scores.values().map(|s| s.total).collect();
        if let Some(bus) = &bus_score {
            totals.push(bus.total);
        }
        let overall = mean_score(&totals);

        let feedback = self.feedback.multitrack_eq(
            player_tracks,
            targets,
            &track_scores,
            bus_target.zip(bus_score.as_ref()).map(|(t, s)| (bus_player, t, s)),
            overall,
        );

        let breakdown = Breakdown::MultitrackEq {
            tracks: track_scores,
            bus: bus_score,
        };
        (overall, breakdown, feedback)
    }

    fn score_goals(
        &self,
        player_tracks: &TrackMap,
        bus: Option<&BusParams>,
        conditions: &[Condition],
    ) -> (u8, Breakdown, Vec<String>) {
        let score = evaluate_goals(conditions, player_tracks, bus);
        let overall = score.total;
        let feedback = self.feedback.goals(&score, overall);
        (overall, Breakdown::MultitrackGoal(score), feedback)
    }
}
