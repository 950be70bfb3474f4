//! ReelForge Mix Coach
//!
//! Scoring engine for interactive mixing challenges:
//!
//! ## Features
//! - **EQ Matching**: Per-band similarity against a 3-band target
//! - **Compressor Matching**: Threshold, amount and optional attack/release
//! - **Problem Challenges**: Range checks for "fix this mix" exercises
//! - **Multi-track EQ**: Per-track targets plus an optional bus compressor
//! - **Goal Conditions**: Pan, depth, level, EQ and compression rules across tracks
//! - **Parametric Reduction**: 4-band parametric EQ collapsed to low/mid/high
//! - **Feedback**: Directional hints that never reveal target values
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rf_mixcoach::{ChallengeEvaluator, ChallengeSet, MixInput, ScoringConfig};
//!
//! let set = ChallengeSet::from_file("challenges/starter.json")?;
//! let challenge = set.require("eq-warmth")?;
//!
//! let evaluator = ChallengeEvaluator::new(ScoringConfig::beginner());
//! let result = evaluator.evaluate(challenge, &MixInput::new(eq, compressor));
//! println!("{}", result.to_text());
//! ```

#![warn(missing_docs)]

pub mod challenge;
pub mod conditions;
pub mod config;
pub mod dynamics;
pub mod eq;
pub mod evaluator;
pub mod feedback;
pub mod parametric;
pub mod params;
pub mod problem;
pub mod progress;
pub mod result;
pub mod similarity;

mod error;

pub use error::{MixCoachError, MixCoachResult};

pub use challenge::{Challenge, ChallengeSet, Difficulty, Target};
pub use conditions::{Condition, Depth, GoalScore, PanPosition};
pub use config::ScoringConfig;
pub use evaluator::{ChallengeEvaluator, MixInput};
pub use parametric::reduce_parametric_eq;
pub use params::{
    Band, BusParams, CompressorParams, EqParams, ParametricBand, ParametricEqParams, TrackMap, TrackParams,
};
pub use progress::{ProgressLedger, ProgressSink};
pub use result::{Breakdown, ChallengeOutcome, ScoreResult};
