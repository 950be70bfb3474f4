//! Progress tracking
//!
//! Evaluation never touches storage. Callers hand each [`ChallengeOutcome`]
//! to a [`ProgressSink`]; [`ProgressLedger`] is the in-memory sink.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::ChallengeOutcome;

/// Receives one outcome per completed attempt
pub trait ProgressSink {
    /// Record an attempt at `challenge_id`
    fn record(&mut self, challenge_id: &str, outcome: ChallengeOutcome);
}

/// Best result so far for one challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    /// Highest star rating reached
    pub best_stars: u8,
    /// Passed at least once
    pub passed: bool,
    /// Number of attempts recorded
    pub attempts: u32,
}

/// In-memory progress, keyed by challenge id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressLedger {
    entries: BTreeMap<String, ChallengeProgress>,
}

impl ProgressLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress for one challenge
    pub fn get(&self, challenge_id: &str) -> Option<&ChallengeProgress> {
        self.entries.get(challenge_id)
    }

    /// Challenges passed at least once
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|p| p.passed).count()
    }

    /// Sum of best star ratings
    pub fn total_stars(&self) -> u32 {
        self.entries.values().map(|p| u32::from(p.best_stars)).sum()
    }

    /// Challenge ids with their progress, in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChallengeProgress)> {
        self.entries.iter().map(|(id, p)| (id.as_str(), p))
    }
}

impl ProgressSink for ProgressLedger {
    fn record(&mut self, challenge_id: &str, outcome: ChallengeOutcome) {
        let entry = self.entries.entry(challenge_id.to_string()).or_default();
        entry.best_stars = entry.best_stars.max(outcome.stars);
        entry.passed |= outcome.passed;
        entry.attempts += 1;
        log::debug!(
            "progress {}: best_stars={} passed={} attempts={}",
            challenge_id,
            entry.best_stars,
            entry.passed,
            entry.attempts
        );
    }
}
