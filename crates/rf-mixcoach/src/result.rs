//! Evaluation results and grading

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::conditions::GoalScore;
use crate::config::GradingThresholds;
use crate::dynamics::CompressorScore;
use crate::eq::EqScore;
use crate::problem::ProblemScore;

/// Per-kind score details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Breakdown {
    /// EQ band scores
    Eq(EqScore),
    /// Compressor sub-scores
    Compressor(CompressorScore),
    /// Range checks
    Problem(ProblemScore),
    /// Per-track EQ scores and optional bus compressor score
    MultitrackEq {
        /// Track id → EQ score
        tracks: BTreeMap<String, EqScore>,
        /// Bus compressor score, when the target declares one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bus: Option<CompressorScore>,
    },
    /// Goal condition outcomes
    MultitrackGoal(GoalScore),
    /// Required input was missing
    Empty,
}

impl Breakdown {
    /// Nothing was scored
    pub fn is_empty(&self) -> bool {
        matches!(self, Breakdown::Empty)
    }
}

/// What the progress tracker stores per attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    /// 1..=3
    pub stars: u8,
    /// Overall met the pass mark
    pub passed: bool,
}

/// Complete evaluation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Overall score (0-100)
    pub overall: u8,
    /// Star rating (1-3)
    pub stars: u8,
    /// Overall met the pass mark
    pub passed: bool,
    /// Kind-specific details
    pub breakdown: Breakdown,
    /// Ordered hint lines
    pub feedback: Vec<String>,
}

/// Stars for an overall score. There is no zero-star tier.
pub fn stars_for(overall: u8, grading: &GradingThresholds) -> u8 {
    if overall >= grading.three_stars {
        3
    } else if overall >= grading.two_stars {
        2
    } else {
        1
    }
}

/// Pass/fail for an overall score
pub fn passed_for(overall: u8, grading: &GradingThresholds) -> bool {
    overall >= grading.pass
}

impl ScoreResult {
    /// Grade `overall` and assemble the result
    pub fn graded(overall: u8, grading: &GradingThresholds, breakdown: Breakdown, feedback: Vec<String>) -> Self {
        let overall = overall.min(100);
        Self {
            overall,
            stars: stars_for(overall, grading),
            passed: passed_for(overall, grading),
            breakdown,
            feedback,
        }
    }

    /// Stars and pass flag for progress tracking
    pub fn outcome(&self) -> ChallengeOutcome {
        ChallengeOutcome {
            stars: self.stars,
            passed: self.passed,
        }
    }

    /// Star string such as "★★☆"
    pub fn star_string(&self) -> String {
        let filled = self.stars.min(3) as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(3 - filled))
    }

    /// Named sub-scores in display order
    pub fn score_rows(&self) -> Vec<(String, u8)> {
        let mut rows = Vec::new();
        match &self.breakdown {
            Breakdown::Eq(eq) => {
                rows.push(("Low".to_string(), eq.low));
                rows.push(("Mid".to_string(), eq.mid));
                rows.push(("High".to_string(), eq.high));
            }
            Breakdown::Compressor(comp) => push_compressor_rows(&mut rows, comp),
            Breakdown::Problem(problem) => {
                for check in &problem.checks {
                    rows.push((check.field.label().to_string(), check.score));
                }
            }
            Breakdown::MultitrackEq { tracks, bus } => {
                for (id, score) in tracks {
                    rows.push((id.clone(), score.total));
                }
                if let Some(bus) = bus {
                    rows.push(("Bus compressor".to_string(), bus.total));
                }
            }
            Breakdown::MultitrackGoal(goals) => {
                for condition in &goals.conditions {
                    rows.push((condition.description.clone(), if condition.passed { 100 } else { 0 }));
                }
            }
            Breakdown::Empty => {}
        }
        rows
    }

    /// Plain-text summary
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        let status = if self.passed { "PASS" } else { "FAIL" };
        output.push_str(&format!("[{}] {}/100 {}\n", status, self.overall, self.star_string()));

        for (name, score) in self.score_rows() {
            output.push_str(&format!("  {:<40} {:>3}\n", name, score));
        }

        if !self.feedback.is_empty() {
            output.push('\n');
            for line in &self.feedback {
                output.push_str(&format!("- {}\n", line));
            }
        }

        output
    }

    /// Markdown report
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Mix Challenge Result\n\n");
        output.push_str(&format!(
            "## Status: {}\n\n",
            if self.passed { "✅ PASS" } else { "❌ FAIL" }
        ));
        output.push_str(&format!("**Score:** {}/100 {}\n\n", self.overall, self.star_string()));

        let rows = self.score_rows();
        if !rows.is_empty() {
            output.push_str("## Breakdown\n\n");
            output.push_str("| Item | Score |\n");
            output.push_str("|------|-------|\n");
            for (name, score) in rows {
                output.push_str(&format!("| {} | {} |\n", name, score));
            }
            output.push('\n');
        }

        if !self.feedback.is_empty() {
            output.push_str("## Feedback\n\n");
            for line in &self.feedback {
                output.push_str(&format!("- {}\n", line));
            }
        }

        output
    }
}

fn push_compressor_rows(rows: &mut Vec<(String, u8)>, comp: &CompressorScore) {
    rows.push(("Threshold".to_string(), comp.threshold));
    rows.push(("Amount".to_string(), comp.amount));
    if let Some(attack) = comp.attack {
        rows.push(("Attack".to_string(), attack));
    }
    if let Some(release) = comp.release {
        rows.push(("Release".to_string(), release));
    }
}
