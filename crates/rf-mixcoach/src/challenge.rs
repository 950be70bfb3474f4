//! Challenge definitions
//!
//! A challenge pairs learner-facing text with a tagged [`Target`]. Packs are
//! authored as JSON arrays and loaded into a [`ChallengeSet`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conditions::Condition;
use crate::error::{MixCoachError, MixCoachResult};
use crate::params::{CompressorParams, EqParams};
use crate::problem::ProblemSolution;

/// Challenge difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// First steps
    #[default]
    Beginner,
    /// Some experience
    Intermediate,
    /// Full mixes
    Advanced,
}

impl Difficulty {
    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// What the learner must match or achieve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Target {
    /// Match a 3-band EQ
    Eq {
        /// Target gains
        target: EqParams,
        /// Per-challenge tolerance override (dB)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f64>,
    },
    /// Match compressor settings; timings graded when both are declared
    Compressor {
        /// Target settings
        target: CompressorParams,
    },
    /// Bring the declared controls into range
    Problem {
        /// Acceptable ranges
        solution: ProblemSolution,
    },
    /// Match an EQ per track, optionally a bus compressor
    MultitrackEq {
        /// Track id → target EQ
        tracks: BTreeMap<String, EqParams>,
        /// Optional bus compressor target
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bus_compressor: Option<CompressorParams>,
    },
    /// Satisfy a list of goal conditions
    MultitrackGoal {
        /// Conditions in display order
        conditions: Vec<Condition>,
    },
}

impl Target {
    /// Tag as it appears in JSON
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Eq { .. } => "eq",
            Target::Compressor { .. } => "compressor",
            Target::Problem { .. } => "problem",
            Target::MultitrackEq { .. } => "multitrack-eq",
            Target::MultitrackGoal { .. } => "multitrack-goal",
        }
    }

    /// Needs per-track learner params
    pub fn is_multitrack(&self) -> bool {
        matches!(self, Target::MultitrackEq { .. } | Target::MultitrackGoal { .. })
    }

    /// Simple EQ target with the default tolerance
    pub fn eq(target: EqParams) -> Self {
        Target::Eq {
            target,
            tolerance: None,
        }
    }

    /// Compressor target
    pub fn compressor(target: CompressorParams) -> Self {
        Target::Compressor { target }
    }

    fn validate(&self, id: &str) -> MixCoachResult<()> {
        match self {
            Target::Eq { tolerance, .. } => {
                if let Some(tol) = tolerance {
                    if !(tol.is_finite() && *tol > 0.0) {
                        return Err(MixCoachError::invalid_challenge(
                            id,
                            format!("eq tolerance must be > 0, got {}", tol),
                        ));
                    }
                }
            }
            Target::Compressor { target } => {
                if target.attack.is_some() != target.release.is_some() {
                    log::warn!(
                        "challenge {}: only one of attack/release declared, timings will not be graded",
                        id
                    );
                }
            }
            Target::Problem { solution } => {
                let declared = solution.declared();
                if declared.is_empty() {
                    return Err(MixCoachError::invalid_challenge(id, "problem declares no ranges"));
                }
                if let Some((field, range)) = declared.iter().find(|(_, r)| !r.is_ordered()) {
                    return Err(MixCoachError::invalid_challenge(
                        id,
                        format!("{} range [{}, {}] is inverted", field.label(), range.min, range.max),
                    ));
                }
            }
            Target::MultitrackEq { tracks, .. } => {
                if tracks.is_empty() {
                    return Err(MixCoachError::invalid_challenge(id, "multitrack-eq declares no tracks"));
                }
            }
            Target::MultitrackGoal { conditions } => {
                if conditions.is_empty() {
                    return Err(MixCoachError::invalid_challenge(id, "multitrack-goal declares no conditions"));
                }
                for condition in conditions {
                    if condition.referenced_tracks().iter().any(|t| t.is_empty()) {
                        return Err(MixCoachError::invalid_challenge(
                            id,
                            format!("{} condition has an empty track id", condition.kind()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// One mixing challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// Stable id, used as the progress key
    pub id: String,
    /// Title
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: String,
    /// Difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Hint text shown on request
    #[serde(default)]
    pub hints: Vec<String>,
    /// Scoring target
    pub target: Target,
}

impl Challenge {
    /// Minimal challenge
    pub fn new(id: impl Into<String>, title: impl Into<String>, target: Target) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            difficulty: Difficulty::default(),
            hints: Vec::new(),
            target,
        }
    }

    /// Builder pattern: set difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Parse one challenge from JSON and validate it
    pub fn from_json(json: &str) -> MixCoachResult<Self> {
        let challenge: Self = serde_json::from_str(json)?;
        challenge.validate()?;
        Ok(challenge)
    }

    /// Structural checks for authored content
    pub fn validate(&self) -> MixCoachResult<()> {
        if self.id.trim().is_empty() {
            return Err(MixCoachError::invalid_challenge(&self.id, "id is empty"));
        }
        self.target.validate(&self.id)
    }
}

/// Ordered collection of challenges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeSet {
    challenges: Vec<Challenge>,
}

impl ChallengeSet {
    /// Build from already-parsed challenges, validating each
    pub fn new(challenges: Vec<Challenge>) -> MixCoachResult<Self> {
        let set = Self { challenges };
        set.validate()?;
        Ok(set)
    }

    /// Parse a JSON array of challenges
    pub fn from_json(json: &str) -> MixCoachResult<Self> {
        let challenges: Vec<Challenge> = serde_json::from_str(json)?;
        Self::new(challenges)
    }

    /// Load a JSON array of challenges from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> MixCoachResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        log::debug!("loaded {} challenges from {}", set.len(), path.display());
        Ok(set)
    }

    /// Validate every challenge and reject duplicate ids
    pub fn validate(&self) -> MixCoachResult<()> {
        let mut seen = HashSet::new();
        for challenge in &self.challenges {
            challenge.validate()?;
            if !seen.insert(challenge.id.as_str()) {
                return Err(MixCoachError::invalid_challenge(&challenge.id, "duplicate id"));
            }
        }
        Ok(())
    }

    /// Look up by id
    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Look up by id, failing when absent
    pub fn require(&self, id: &str) -> MixCoachResult<&Challenge> {
        self.get(id)
            .ok_or_else(|| MixCoachError::UnknownChallenge(id.to_string()))
    }

    /// Challenges in authoring order
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    /// Number of challenges
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// No challenges loaded
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Band;
    use std::io::Write;

    const PACK: &str = r#"[
        {
            "id": "eq-warmth",
            "title": "Add warmth",
            "difficulty": "beginner",
            "hints": ["Low end carries warmth"],
            "target": {"type": "eq", "target": {"low": 3, "mid": 0, "high": -3}}
        },
        {
            "id": "fix-mud",
            "title": "Clear the mud",
            "target": {"type": "problem", "solution": {"low": [-6, -2], "mid": [-3, 0]}}
        },
        {
            "id": "kick-bass",
            "title": "Kick vs bass",
            "difficulty": "intermediate",
            "target": {
                "type": "multitrack-goal",
                "conditions": [
                    {"type": "frequency_separation", "track1": "kick", "track2": "bass", "band": "low"},
                    {"type": "bus_compression", "minAmount": 20}
                ]
            }
        },
        {
            "id": "glue",
            "title": "Glue the drums",
            "difficulty": "advanced",
            "target": {
                "type": "multitrack-eq",
                "tracks": {"kick": {"low": 4, "mid": -2, "high": 0}},
                "busCompressor": {"threshold": -18, "amount": 30}
            }
        }
    ]"#;

    #[test]
    fn test_load_pack() {
        let set = ChallengeSet::from_json(PACK).unwrap();
        assert_eq!(set.len(), 4);
        let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["eq-warmth", "fix-mud", "kick-bass", "glue"]);

        let warmth = set.require("eq-warmth").unwrap();
        assert_eq!(warmth.target, Target::eq(EqParams::new(3.0, 0.0, -3.0)));
        assert_eq!(warmth.hints.len(), 1);

        let goal = set.get("kick-bass").unwrap();
        assert_eq!(goal.difficulty, Difficulty::Intermediate);
        match &goal.target {
            Target::MultitrackGoal { conditions } => {
                assert_eq!(conditions[0], Condition::frequency_separation("kick", "bass", Band::Low));
                assert!(conditions[1].is_bus_scoped());
            }
            other => panic!("unexpected target {:?}", other.kind()),
        }

        let glue = set.get("glue").unwrap();
        match &glue.target {
            Target::MultitrackEq { bus_compressor, .. } => {
                assert_eq!(*bus_compressor, Some(CompressorParams::new(-18.0, 30.0)));
            }
            other => panic!("unexpected target {:?}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_id() {
        let set = ChallengeSet::from_json(PACK).unwrap();
        assert!(matches!(set.require("nope"), Err(MixCoachError::UnknownChallenge(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let a = Challenge::new("dup", "A", Target::eq(EqParams::flat()));
        let b = Challenge::new("dup", "B", Target::eq(EqParams::flat()));
        assert!(ChallengeSet::new(vec![a, b]).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let json = r#"{"id": "x", "title": "X", "target": {"type": "problem", "solution": {"low": [0, -3]}}}"#;
        let err = Challenge::from_json(json).unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn test_empty_targets_rejected() {
        let goal = Challenge::new("g", "G", Target::MultitrackGoal { conditions: Vec::new() });
        assert!(goal.validate().is_err());

        let multi = Challenge::new(
            "m",
            "M",
            Target::MultitrackEq {
                tracks: BTreeMap::new(),
                bus_compressor: None,
            },
        );
        assert!(multi.validate().is_err());

        let blank = Challenge::new(" ", "blank", Target::eq(EqParams::flat()));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_unknown_target_type_is_json_error() {
        let json = r#"{"id": "x", "title": "X", "target": {"type": "spectral"}}"#;
        assert!(matches!(Challenge::from_json(json), Err(MixCoachError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PACK.as_bytes()).unwrap();
        let set = ChallengeSet::from_file(file.path()).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(Target::compressor(CompressorParams::new(-20.0, 50.0)).kind(), "compressor");
    }
}
