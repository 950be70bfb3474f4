//! Learner-facing hints
//!
//! Hints say which way to move a control, never the target value itself.

use std::collections::BTreeMap;

use crate::config::{FeedbackThresholds, ScoringConfig};
use crate::conditions::GoalScore;
use crate::dynamics::CompressorScore;
use crate::eq::EqScore;
use crate::params::{Band, CompressorParams, EqParams, TrackMap};
use crate::problem::ProblemScore;

/// Shown when every EQ band is close enough
pub const EQ_AFFIRMATION: &str = "Great EQ work! All three bands are close to the target.";
/// Shown when no compressor hint fired
pub const COMPRESSOR_AFFIRMATION: &str = "Compressor settings are spot on!";
/// Shown when a problem challenge has no failing range
pub const PROBLEM_SOLVED: &str = "Problem fixed! Every setting is within the target range.";
/// Prefix for a well-balanced multitrack EQ
pub const MULTITRACK_AFFIRMATION: &str = "Great job! The tracks sit well together.";
/// Prefix for goal scores at the top tier
pub const GOAL_EXCELLENT: &str = "Excellent balance!";
/// Prefix for goal scores at the middle tier
pub const GOAL_GOOD: &str = "Good progress!";

/// Builds feedback lines from scores
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackGenerator {
    thresholds: FeedbackThresholds,
}

impl FeedbackGenerator {
    /// Generator with explicit thresholds
    pub fn new(thresholds: FeedbackThresholds) -> Self {
        Self { thresholds }
    }

    /// Generator using the configured thresholds
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.feedback)
    }

    fn needs_hint(&self, score: u8) -> bool {
        score < self.thresholds.hint_below
    }

    /// Bands that scored too low, with their direction
    fn band_moves(&self, player: &EqParams, target: &EqParams, score: &EqScore) -> Vec<(Band, &'static str)> {
        Band::ALL
            .into_iter()
            .filter(|&band| self.needs_hint(score.band(band)))
            .map(|band| {
                let direction = if player.get(band) < target.get(band) {
                    "boost"
                } else {
                    "cut"
                };
                (band, direction)
            })
            .collect()
    }

    /// One hint per low-scoring band, or a single affirmation
    pub fn eq(&self, player: &EqParams, target: &EqParams, score: &EqScore) -> Vec<String> {
        let moves = self.band_moves(player, target, score);
        if moves.is_empty() {
            return vec![EQ_AFFIRMATION.to_string()];
        }

        moves
            .into_iter()
            .map(|(band, direction)| {
                let verb = if direction == "boost" { "boosting" } else { "cutting" };
                format!("Try {} the {} frequencies", verb, band)
            })
            .collect()
    }

    /// Directional compressor hints without the affirmation line
    fn compressor_hints(
        &self,
        player: &CompressorParams,
        target: &CompressorParams,
        score: &CompressorScore,
    ) -> Vec<String> {
        let mut hints = Vec::new();

        if self.needs_hint(score.threshold) {
            hints.push(if player.threshold < target.threshold {
                "Try raising the threshold".to_string()
            } else {
                "Try lowering the threshold".to_string()
            });
        }

        if self.needs_hint(score.amount) {
            hints.push(if player.amount < target.amount {
                "Try increasing the compression amount".to_string()
            } else {
                "Try decreasing the compression amount".to_string()
            });
        }

        let timings = [
            ("attack", score.attack, player.attack, target.attack),
            ("release", score.release, player.release, target.release),
        ];
        for (name, graded, played, wanted) in timings {
            let Some(sub_score) = graded else { continue };
            if !self.needs_hint(sub_score) {
                continue;
            }
            hints.push(match (played, wanted) {
                (Some(p), Some(w)) if p < w => format!("Try a slower {}", name),
                (Some(_), Some(_)) => format!("Try a faster {}", name),
                _ => format!("Set the {} time", name),
            });
        }

        hints
    }

    /// Compressor hints, or a single affirmation
    pub fn compressor(&self, player: &CompressorParams, target: &CompressorParams, score: &CompressorScore) -> Vec<String> {
        let hints = self.compressor_hints(player, target, score);
        if hints.is_empty() {
            vec![COMPRESSOR_AFFIRMATION.to_string()]
        } else {
            hints
        }
    }

    /// One line per failed range, or a success line
    pub fn problem(&self, score: &ProblemScore) -> Vec<String> {
        let lines: Vec<String> = score
            .failed()
            .map(|check| {
                let unit = check.field.unit();
                format!(
                    "{} should be between {}{} and {}{}",
                    check.field.label(),
                    check.range.min,
                    unit,
                    check.range.max,
                    unit
                )
            })
            .collect();

        if lines.is_empty() {
            vec![PROBLEM_SOLVED.to_string()]
        } else {
            lines
        }
    }

    /// Per-track hint bundles plus optional bus hints
    pub fn multitrack_eq(
        &self,
        tracks: &TrackMap,
        targets: &BTreeMap<String, EqParams>,
        scores: &BTreeMap<String, EqScore>,
        bus: Option<(&CompressorParams, &CompressorParams, &CompressorScore)>,
        overall: u8,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        if overall >= self.thresholds.multitrack_affirm {
            lines.push(MULTITRACK_AFFIRMATION.to_string());
        }

        for (id, score) in scores {
            if !self.needs_hint(score.total) {
                continue;
            }
            let Some(target) = targets.get(id) else {
                continue;
            };
            let Some(track) = tracks.get(id) else {
                lines.push(format!("{}: no settings received for this track", id));
                continue;
            };
            let moves: Vec<String> = self
                .band_moves(&track.eq(), target, score)
                .into_iter()
                .map(|(band, direction)| format!("{} {}", direction, band))
                .collect();
            if !moves.is_empty() {
                lines.push(format!("{}: {}", id, moves.join(", ")));
            }
        }

        if let Some((player, target, score)) = bus {
            if self.needs_hint(score.total) {
                lines.extend(
                    self.compressor_hints(player, target, score)
                        .into_iter()
                        .map(|hint| format!("Bus: {}", hint)),
                );
            }
        }

        lines
    }

    /// "Not met" lines, prefixed by a tier message
    pub fn goals(&self, score: &GoalScore, overall: u8) -> Vec<String> {
        let mut lines = Vec::new();

        if overall >= self.thresholds.goal_excellent {
            lines.push(GOAL_EXCELLENT.to_string());
        } else if overall >= self.thresholds.goal_good {
            lines.push(GOAL_GOOD.to_string());
        }

        lines.extend(score.unmet().map(|c| format!("Not met: {}", c.description)));
        lines
    }
}
