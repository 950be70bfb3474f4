//! Scoring configuration
//!
//! Every tolerance and grading threshold the engine uses lives here, so a
//! challenge pack can ship a tuned profile without touching scoring code.

use serde::{Deserialize, Serialize};

use crate::error::{MixCoachError, MixCoachResult};

/// Per-parameter tolerances (native units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// EQ band gain tolerance (dB)
    pub eq_db: f64,
    /// Compressor threshold tolerance (dB)
    pub threshold_db: f64,
    /// Compressor amount tolerance (percentage points)
    pub amount: f64,
    /// Attack time tolerance (seconds)
    pub attack_sec: f64,
    /// Release time tolerance (seconds)
    pub release_sec: f64,
    /// Fraction of tolerance treated as a perfect match
    pub dead_zone: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eq_db: 3.0,
            threshold_db: 6.0,
            amount: 15.0,
            attack_sec: 0.05,
            release_sec: 0.1,
            dead_zone: 0.1,
        }
    }
}

/// Score thresholds for stars and pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingThresholds {
    /// Minimum overall score to pass
    pub pass: u8,
    /// Minimum overall score for three stars
    pub three_stars: u8,
    /// Minimum overall score for two stars
    pub two_stars: u8,
}

impl Default for GradingThresholds {
    fn default() -> Self {
        Self {
            pass: 60,
            three_stars: 90,
            two_stars: 75,
        }
    }
}

/// Score thresholds that switch feedback lines on and off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    /// Sub-scores below this get a directional hint
    pub hint_below: u8,
    /// Multitrack EQ overall at or above this gets an affirmation
    pub multitrack_affirm: u8,
    /// Goal overall at or above this is "Excellent balance!"
    pub goal_excellent: u8,
    /// Goal overall at or above this is "Good progress!"
    pub goal_good: u8,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            hint_below: 70,
            multitrack_affirm: 80,
            goal_excellent: 90,
            goal_good: 70,
        }
    }
}

/// Complete scoring configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Similarity tolerances
    pub tolerances: Tolerances,
    /// Star and pass thresholds
    pub grading: GradingThresholds,
    /// Feedback trigger thresholds
    pub feedback: FeedbackThresholds,
}

impl ScoringConfig {
    /// Wider tolerances for first-time learners
    pub fn beginner() -> Self {
        Self {
            tolerances: Tolerances {
                eq_db: 4.5,
                threshold_db: 9.0,
                amount: 20.0,
                attack_sec: 0.08,
                release_sec: 0.15,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Tighter tolerances and a higher pass mark
    pub fn advanced() -> Self {
        Self {
            tolerances: Tolerances {
                eq_db: 2.0,
                threshold_db: 4.0,
                amount: 10.0,
                attack_sec: 0.03,
                release_sec: 0.06,
                ..Default::default()
            },
            grading: GradingThresholds {
                pass: 70,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json(json: &str) -> MixCoachResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder pattern: set EQ tolerance
    pub fn with_eq_tolerance(mut self, db: f64) -> Self {
        self.tolerances.eq_db = db;
        self
    }

    /// Builder pattern: set compressor threshold tolerance
    pub fn with_threshold_tolerance(mut self, db: f64) -> Self {
        self.tolerances.threshold_db = db;
        self
    }

    /// Builder pattern: set compressor amount tolerance
    pub fn with_amount_tolerance(mut self, points: f64) -> Self {
        self.tolerances.amount = points;
        self
    }

    /// Builder pattern: set pass mark
    pub fn with_pass_mark(mut self, score: u8) -> Self {
        self.grading.pass = score;
        self
    }

    /// Check that tolerances are positive and grading tiers are ordered
    pub fn validate(&self) -> MixCoachResult<()> {
        let t = &self.tolerances;
        let tolerances = [
            ("eq_db", t.eq_db),
            ("threshold_db", t.threshold_db),
            ("amount", t.amount),
            ("attack_sec", t.attack_sec),
            ("release_sec", t.release_sec),
        ];
        for (name, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                return Err(MixCoachError::InvalidConfig(format!(
                    "tolerance {} must be > 0, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..1.0).contains(&t.dead_zone) {
            return Err(MixCoachError::InvalidConfig(format!(
                "dead_zone must be in [0, 1), got {}",
                t.dead_zone
            )));
        }

        let g = &self.grading;
        if g.three_stars > 100 || g.pass > 100 || g.two_stars > g.three_stars {
            return Err(MixCoachError::InvalidConfig(format!(
                "grading tiers out of order: two_stars={}, three_stars={}, pass={}",
                g.two_stars, g.three_stars, g.pass
            )));
        }

        let f = &self.feedback;
        if f.goal_good > f.goal_excellent {
            return Err(MixCoachError::InvalidConfig(format!(
                "goal_good ({}) above goal_excellent ({})",
                f.goal_good, f.goal_excellent
            )));
        }

        Ok(())
    }
}
