//! Range checks for open-ended "fix this mix" challenges
//!
//! A problem target declares acceptable ranges for any subset of the EQ and
//! compressor controls. Each declared field is all-or-nothing.

use serde::{Deserialize, Serialize};

use crate::params::{CompressorParams, EqParams};
use crate::similarity::mean_score;

/// Inclusive value range, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ValueRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl ValueRange {
    /// Create a range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive containment
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `min <= max`
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl From<[f64; 2]> for ValueRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<ValueRange> for [f64; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}

/// A control a problem target can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemField {
    /// Low EQ band
    Low,
    /// Mid EQ band
    Mid,
    /// High EQ band
    High,
    /// Compressor threshold
    Threshold,
    /// Compressor amount
    Amount,
}

impl ProblemField {
    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            ProblemField::Low => "Low EQ",
            ProblemField::Mid => "Mid EQ",
            ProblemField::High => "High EQ",
            ProblemField::Threshold => "Threshold",
            ProblemField::Amount => "Compression amount",
        }
    }

    /// Unit suffix
    pub fn unit(&self) -> &'static str {
        match self {
            ProblemField::Amount => "%",
            _ => " dB",
        }
    }
}

/// Acceptable ranges; absent fields are not graded
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProblemSolution {
    /// Low band range (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<ValueRange>,
    /// Mid band range (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<ValueRange>,
    /// High band range (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<ValueRange>,
    /// Threshold range (dB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<ValueRange>,
    /// Amount range (percent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<ValueRange>,
}

impl ProblemSolution {
    /// Declared fields in fixed order
    pub fn declared(&self) -> Vec<(ProblemField, ValueRange)> {
        [
            (ProblemField::Low, self.low),
            (ProblemField::Mid, self.mid),
            (ProblemField::High, self.high),
            (ProblemField::Threshold, self.threshold),
            (ProblemField::Amount, self.amount),
        ]
        .into_iter()
        .filter_map(|(field, range)| range.map(|r| (field, r)))
        .collect()
    }
}

/// Outcome of one range check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeCheck {
    /// Field checked
    pub field: ProblemField,
    /// Learner value
    pub value: f64,
    /// Required range
    pub range: ValueRange,
    /// 100 inside the range, 0 outside
    pub score: u8,
}

impl RangeCheck {
    /// Value fell inside the range
    pub fn passed(&self) -> bool {
        self.score == 100
    }
}

/// Problem-challenge scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemScore {
    /// One check per declared field
    pub checks: Vec<RangeCheck>,
    /// Rounded mean of check scores; 0 with no declared fields
    pub total: u8,
}

impl ProblemScore {
    /// Checks whose value fell outside the range
    pub fn failed(&self) -> impl Iterator<Item = &RangeCheck> {
        self.checks.iter().filter(|c| !c.passed())
    }
}

/// Evaluate learner controls against a problem solution
pub fn evaluate_problem(
    eq: &EqParams,
    compressor: &CompressorParams,
    solution: &ProblemSolution,
) -> ProblemScore {
    let checks: Vec<RangeCheck> = solution
        .declared()
        .into_iter()
        .map(|(field, range)| {
            let value = match field {
                ProblemField::Low => eq.low,
                ProblemField::Mid => eq.mid,
                ProblemField::High => eq.high,
                ProblemField::Threshold => compressor.threshold,
                ProblemField::Amount => compressor.amount,
            };
            RangeCheck {
                field,
                value,
                range,
                score: if range.contains(value) { 100 } else { 0 },
            }
        })
        .collect();

    let scores: Vec<u8> = checks.iter().map(|c| c.score).collect();
    let total = mean_score(&scores);

    ProblemScore { checks, total }
}
