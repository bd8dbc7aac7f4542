use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle of a match. Always set explicitly by an organizer, never inferred from hole results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Scheduled, not yet on the course. Initial state of every match.
    #[default]
    Prepared,
    /// On the course; its current tally feeds the projected standings.
    Running,
    /// Finished; its result is final.
    Completed,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 3] = [
        MatchStatus::Prepared,
        MatchStatus::Running,
        MatchStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Prepared => "prepared",
            MatchStatus::Running => "running",
            MatchStatus::Completed => "completed",
        }
    }

    /// Read a stored status value. Empty or unrecognised values fall into [`MatchStatus::Prepared`].
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    fn rank(self) -> u8 {
        match self {
            MatchStatus::Prepared => 0,
            MatchStatus::Running => 1,
            MatchStatus::Completed => 2,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an organizer supplies a status outside the three known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match status `{0}` (expected prepared, running or completed)")]
pub struct UnknownStatus(pub String);

impl FromStr for MatchStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prepared" => Ok(MatchStatus::Prepared),
            "running" => Ok(MatchStatus::Running),
            "completed" => Ok(MatchStatus::Completed),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

/// Which status changes organizers may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may replace any other, so mistakes can be corrected.
    #[default]
    Unrestricted,
    /// Only prepared -> running -> completed (skipping ahead allowed), never backwards.
    ForwardOnly,
}

/// Error returned when a status change is rejected by the active policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status transition: {from} cannot move to {to}")]
pub struct InvalidTransition {
    /// Status the match was in.
    pub from: MatchStatus,
    /// Requested status.
    pub to: MatchStatus,
}

/// Applies status changes to matches according to a [`TransitionPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMachine {
    policy: TransitionPolicy,
}

impl StatusMachine {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Status assigned to freshly created matches.
    pub fn initial(&self) -> MatchStatus {
        MatchStatus::Prepared
    }

    /// Validate a change from the stored value `current` to `next`, returning the status to store.
    pub fn transition(
        &self,
        current: &str,
        next: MatchStatus,
    ) -> Result<MatchStatus, InvalidTransition> {
        let from = MatchStatus::normalize(current);
        match self.policy {
            TransitionPolicy::Unrestricted => Ok(next),
            TransitionPolicy::ForwardOnly if next.rank() >= from.rank() => Ok(next),
            TransitionPolicy::ForwardOnly => Err(InvalidTransition { from, to: next }),
        }
    }
}
