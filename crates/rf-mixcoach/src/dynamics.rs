//! Compressor matching
//!
//! Threshold and amount are always graded; attack and release only when the
//! caller asks for timings and the target declares both.

use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, Tolerances};
use crate::params::CompressorParams;
use crate::similarity::{mean_score, similarity_with_dead_zone};

/// Compressor sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressorScore {
    /// Threshold score
    pub threshold: u8,
    /// Amount score
    pub amount: u8,
    /// Attack score (timing challenges only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<u8>,
    /// Release score (timing challenges only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<u8>,
    /// Rounded mean of the graded sub-scores
    pub total: u8,
}

impl CompressorScore {
    /// Attack and release were graded
    pub fn has_timings(&self) -> bool {
        self.attack.is_some() && self.release.is_some()
    }
}

/// Scores learner compressor settings against a target
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressorEvaluator {
    tolerances: Tolerances,
}

impl CompressorEvaluator {
    /// Evaluator with explicit tolerances
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Evaluator using the configured tolerances
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.tolerances)
    }

    /// Grade `player` against `target`
    pub fn evaluate(
        &self,
        player: &CompressorParams,
        target: &CompressorParams,
        include_timings: bool,
    ) -> CompressorScore {
        let t = &self.tolerances;
        let score = |p: f64, g: f64, tol: f64| similarity_with_dead_zone(p, g, tol, t.dead_zone);

        let threshold = score(player.threshold, target.threshold, t.threshold_db);
        let amount = score(player.amount, target.amount, t.amount);

        let timings = match (include_timings, target.attack, target.release) {
            (true, Some(target_attack), Some(target_release)) => {
                // An unset learner timing cannot match anything
                let attack = player
                    .attack
                    .map_or(0, |a| score(a, target_attack, t.attack_sec));
                let release = player
                    .release
                    .map_or(0, |r| score(r, target_release, t.release_sec));
                Some((attack, release))
            }
            _ => None,
        };

        let total = match timings {
            Some((attack, release)) => mean_score(&[threshold, amount, attack, release]),
            None => mean_score(&[threshold, amount]),
        };

        log::trace!(
            "compressor score: threshold={} amount={} timings={:?} total={}",
            threshold,
            amount,
            timings,
            total
        );

        CompressorScore {
            threshold,
            amount,
            attack: timings.map(|(a, _)| a),
            release: timings.map(|(_, r)| r),
            total,
        }
    }
}
