//! 3-band EQ matching

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::params::{Band, EqParams};
use crate::similarity::{DEFAULT_DEAD_ZONE, mean_score, similarity_with_dead_zone};

/// Default EQ tolerance (dB)
pub const DEFAULT_EQ_TOLERANCE_DB: f64 = 3.0;

/// Per-band EQ scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqScore {
    /// Low band score
    pub low: u8,
    /// Mid band score
    pub mid: u8,
    /// High band score
    pub high: u8,
    /// Rounded mean of the three bands
    pub total: u8,
}

impl EqScore {
    /// Score of one band
    pub fn band(&self, band: Band) -> u8 {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }
}

/// Scores a learner EQ against a target EQ
#[derive(Debug, Clone, Copy)]
pub struct EqEvaluator {
    tolerance_db: f64,
    dead_zone: f64,
}

impl Default for EqEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_EQ_TOLERANCE_DB)
    }
}

impl EqEvaluator {
    /// Evaluator with a custom band tolerance
    pub fn new(tolerance_db: f64) -> Self {
        Self {
            tolerance_db,
            dead_zone: DEFAULT_DEAD_ZONE,
        }
    }

    /// Evaluator using the configured EQ tolerance
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            tolerance_db: config.tolerances.eq_db,
            dead_zone: config.tolerances.dead_zone,
        }
    }

    /// Builder pattern: override the band tolerance, keeping the dead zone
    pub fn with_tolerance(mut self, tolerance_db: f64) -> Self {
        self.tolerance_db = tolerance_db;
        self
    }

    /// Band tolerance in dB
    pub fn tolerance_db(&self) -> f64 {
        self.tolerance_db
    }

    /// Score every band with the same tolerance
    pub fn evaluate(&self, player: &EqParams, target: &EqParams) -> EqScore {
        let score = |band| {
            similarity_with_dead_zone(player.get(band), target.get(band), self.tolerance_db, self.dead_zone)
        };
        let low = score(Band::Low);
        let mid = score(Band::Mid);
        let high = score(Band::High);

        log::trace!("eq score: low={} mid={} high={}", low, mid, high);

        EqScore {
            low,
            mid,
            high,
            total: mean_score(&[low, mid, high]),
        }
    }
}
