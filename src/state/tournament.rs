//! Domain vocabulary shared by the scoring engine, the stores and the DTO layer.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Playing format of a match. Informational only: every format is scored as match play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    Singles,
    TexasScramble,
    Foursome,
}

/// Which holes of the course a match is played over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum HoleSpan {
    /// Full round, holes 1 to 18.
    #[default]
    #[serde(rename = "18")]
    Full,
    /// Front nine, holes 1 to 9.
    #[serde(rename = "front9")]
    FrontNine,
    /// Back nine, holes 10 to 18.
    #[serde(rename = "back9")]
    BackNine,
}

impl HoleSpan {
    /// Hole numbers belonging to the span.
    pub fn holes(self) -> RangeInclusive<u8> {
        match self {
            HoleSpan::Full => 1..=18,
            HoleSpan::FrontNine => 1..=9,
            HoleSpan::BackNine => 10..=18,
        }
    }

    /// Number of holes played in the span (9 or 18).
    pub fn hole_count(self) -> usize {
        match self {
            HoleSpan::Full => 18,
            HoleSpan::FrontNine | HoleSpan::BackNine => 9,
        }
    }

    /// Whether `hole` is played in this span.
    pub fn contains(self, hole: u8) -> bool {
        self.holes().contains(&hole)
    }

    /// Map a zero-based position on the score card to the actual hole number.
    pub fn hole_at(self, index: usize) -> Option<u8> {
        if index >= self.hole_count() {
            return None;
        }
        let first = *self.holes().start();
        u8::try_from(index).ok().map(|offset| first + offset)
    }

    /// Zero-based position of `hole` on the score card.
    pub fn index_of(self, hole: u8) -> Option<usize> {
        self.contains(hole)
            .then(|| usize::from(hole - *self.holes().start()))
    }
}

/// Result of a single hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HoleOutcome {
    /// Team A won the hole.
    #[serde(rename = "A")]
    TeamA,
    /// Team B won the hole.
    #[serde(rename = "B")]
    TeamB,
    /// Hole halved.
    #[serde(rename = "AS")]
    Halved,
    /// Not played yet.
    #[serde(rename = "")]
    Unplayed,
}

impl HoleOutcome {
    /// Wire code used by score cards.
    pub fn code(self) -> &'static str {
        match self {
            HoleOutcome::TeamA => "A",
            HoleOutcome::TeamB => "B",
            HoleOutcome::Halved => "AS",
            HoleOutcome::Unplayed => "",
        }
    }

    pub fn is_played(self) -> bool {
        self != HoleOutcome::Unplayed
    }
}

impl fmt::Display for HoleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hole outcome code `{0}` (expected `A`, `B`, `AS` or empty)")]
pub struct UnknownOutcome(pub String);

impl FromStr for HoleOutcome {
    type Err = UnknownOutcome;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "A" => Ok(HoleOutcome::TeamA),
            "B" => Ok(HoleOutcome::TeamB),
            "AS" => Ok(HoleOutcome::Halved),
            "" => Ok(HoleOutcome::Unplayed),
            other => Err(UnknownOutcome(other.to_string())),
        }
    }
}

/// Recorded outcome for one hole of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleResult {
    pub hole: u8,
    pub outcome: HoleOutcome,
}

impl HoleResult {
    pub fn new(hole: u8, outcome: HoleOutcome) -> Self {
        Self { hole, outcome }
    }
}

/// Side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_nine_keeps_course_hole_numbers() {
        assert_eq!(HoleSpan::BackNine.hole_at(0), Some(10));
        assert_eq!(HoleSpan::BackNine.hole_at(8), Some(18));
        assert_eq!(HoleSpan::BackNine.hole_at(9), None);
        assert_eq!(HoleSpan::BackNine.index_of(9), None);
        assert_eq!(HoleSpan::BackNine.index_of(12), Some(2));
    }

    #[test]
    fn front_nine_excludes_back_holes() {
        assert!(HoleSpan::FrontNine.contains(9));
        assert!(!HoleSpan::FrontNine.contains(10));
        assert!(!HoleSpan::Full.contains(0));
        assert!(!HoleSpan::Full.contains(19));
    }

    #[test]
    fn outcome_codes_parse() {
        assert_eq!("A".parse::<HoleOutcome>(), Ok(HoleOutcome::TeamA));
        assert_eq!("AS".parse::<HoleOutcome>(), Ok(HoleOutcome::Halved));
        assert_eq!("".parse::<HoleOutcome>(), Ok(HoleOutcome::Unplayed));
        assert!("C".parse::<HoleOutcome>().is_err());
    }

    #[test]
    fn span_serializes_with_legacy_names() {
        assert_eq!(serde_json::to_string(&HoleSpan::Full).unwrap(), "\"18\"");
        assert_eq!(
            serde_json::from_str::<HoleSpan>("\"back9\"").unwrap(),
            HoleSpan::BackNine
        );
    }
}
