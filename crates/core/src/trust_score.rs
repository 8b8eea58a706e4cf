//! Trust-score rule: bounded deltas, score events, and display bands.
//!
//! A project's trust score is an integer in `[MIN_TRUST_SCORE, MAX_TRUST_SCORE]`.
//! Every mutation goes through [`apply_delta`], which truncates at the bounds
//! instead of rejecting out-of-range results.

use serde::{Deserialize, Serialize};

use crate::project::ProjectStatus;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest possible trust score.
pub const MIN_TRUST_SCORE: i32 = 0;

/// Highest possible trust score.
pub const MAX_TRUST_SCORE: i32 = 100;

/// Score assigned to newly seeded projects.
pub const INITIAL_TRUST_SCORE: i32 = 80;

/// Score change when a project milestone is marked complete.
pub const MILESTONE_COMPLETE_DELTA: i32 = 5;

/// Score change when a project is marked delayed.
pub const PROJECT_DELAYED_DELTA: i32 = -10;

/// Score change applied for each submitted citizen feedback.
pub const VERIFIED_FEEDBACK_DELTA: i32 = 5;

/// Lower bound (inclusive) of the [`TrustBand::High`] band.
pub const HIGH_BAND_THRESHOLD: i32 = 70;

/// Lower bound (inclusive) of the [`TrustBand::Moderate`] band.
pub const MODERATE_BAND_THRESHOLD: i32 = 50;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Apply `delta` to `score`, clamping the result into `[0, 100]`.
///
/// Pure: neither input is validated, and scores already outside the range
/// are pulled back in.
pub fn apply_delta(score: i32, delta: i32) -> i32 {
    score
        .saturating_add(delta)
        .clamp(MIN_TRUST_SCORE, MAX_TRUST_SCORE)
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The events that may change a project's trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEvent {
    MilestoneComplete,
    ProjectDelayed,
    VerifiedFeedback,
}

impl ScoreEvent {
    /// Fixed score delta for this event.
    pub fn delta(self) -> i32 {
        match self {
            Self::MilestoneComplete => MILESTONE_COMPLETE_DELTA,
            Self::ProjectDelayed => PROJECT_DELAYED_DELTA,
            Self::VerifiedFeedback => VERIFIED_FEEDBACK_DELTA,
        }
    }

    /// Status the project moves to, if this event changes status at all.
    pub fn status_transition(self) -> Option<ProjectStatus> {
        match self {
            Self::MilestoneComplete => Some(ProjectStatus::OnTime),
            Self::ProjectDelayed => Some(ProjectStatus::Delayed),
            Self::VerifiedFeedback => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MilestoneComplete => "milestone_complete",
            Self::ProjectDelayed => "project_delayed",
            Self::VerifiedFeedback => "verified_feedback",
        }
    }
}

impl std::fmt::Display for ScoreEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// Coarse classification of a score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustBand {
    High,
    Moderate,
    Low,
}

impl TrustBand {
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_BAND_THRESHOLD {
            Self::High
        } else if score >= MODERATE_BAND_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}
