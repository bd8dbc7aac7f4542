//! Match-play scoring: turns recorded hole outcomes into a running tally, the
//! "N Up" text shown to spectators, and the points a match is worth.

use crate::state::tournament::{HoleOutcome, HoleResult, HoleSpan, Side};

/// Text shown while neither side leads.
pub const ALL_SQUARE: &str = "A/S";

/// Outcome of every hole of a match, indexed by position in its span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleCard {
    span: HoleSpan,
    outcomes: Vec<HoleOutcome>,
}

impl HoleCard {
    /// Place `results` on a card for `span`. Holes outside the span are ignored, which
    /// keeps stale rows from an earlier span configuration out of the tally.
    pub fn from_results<'a, I>(span: HoleSpan, results: I) -> Self
    where
        I: IntoIterator<Item = &'a HoleResult>,
    {
        let mut outcomes = vec![HoleOutcome::Unplayed; span.hole_count()];
        for result in results {
            if let Some(index) = span.index_of(result.hole) {
                outcomes[index] = result.outcome;
            }
        }
        Self { span, outcomes }
    }

    pub fn span(&self) -> HoleSpan {
        self.span
    }

    pub fn outcomes(&self) -> &[HoleOutcome] {
        &self.outcomes
    }

    /// Played holes as storable results, in hole order.
    pub fn played(&self) -> Vec<HoleResult> {
        self.span
            .holes()
            .zip(self.outcomes.iter())
            .filter(|(_, outcome)| outcome.is_played())
            .map(|(hole, outcome)| HoleResult::new(hole, *outcome))
            .collect()
    }

    pub fn tally(&self) -> HoleTally {
        self.outcomes
            .iter()
            .fold(HoleTally::default(), |mut tally, outcome| {
                match outcome {
                    HoleOutcome::TeamA => tally.wins_a += 1,
                    HoleOutcome::TeamB => tally.wins_b += 1,
                    HoleOutcome::Halved => tally.halved += 1,
                    HoleOutcome::Unplayed => tally.remaining += 1,
                }
                tally
            })
    }
}

/// Hole counts of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoleTally {
    pub wins_a: u32,
    pub wins_b: u32,
    pub halved: u32,
    /// Holes without a recorded outcome.
    pub remaining: u32,
}

impl HoleTally {
    /// Holes with a recorded outcome.
    pub fn played(&self) -> u32 {
        self.wins_a + self.wins_b + self.halved
    }

    /// Leading side and its margin, or `None` when all square.
    pub fn leader(&self) -> Option<(Side, u32)> {
        match self.wins_a.cmp(&self.wins_b) {
            std::cmp::Ordering::Greater => Some((Side::A, self.wins_a - self.wins_b)),
            std::cmp::Ordering::Less => Some((Side::B, self.wins_b - self.wins_a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// `"<leader> N Up"` or [`ALL_SQUARE`].
    pub fn display_text(&self, team_a: &str, team_b: &str) -> String {
        match self.leader() {
            Some((Side::A, margin)) => format!("{team_a} {margin} Up"),
            Some((Side::B, margin)) => format!("{team_b} {margin} Up"),
            None => ALL_SQUARE.to_string(),
        }
    }

    /// Result if the match ended with the current counts.
    pub fn result(&self) -> MatchResult {
        match self.leader() {
            Some((side, _)) => MatchResult::Won(side),
            None => MatchResult::Halved,
        }
    }
}

/// Result of a match as far as points are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Won(Side),
    Halved,
}

impl MatchResult {
    /// Points for both sides. Always sums to exactly one.
    pub fn points(self) -> PointSplit {
        match self {
            MatchResult::Won(Side::A) => PointSplit {
                team_a: 1.0,
                team_b: 0.0,
            },
            MatchResult::Won(Side::B) => PointSplit {
                team_a: 0.0,
                team_b: 1.0,
            },
            MatchResult::Halved => PointSplit {
                team_a: 0.5,
                team_b: 0.5,
            },
        }
    }
}

/// Points awarded to team A and team B for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSplit {
    pub team_a: f64,
    pub team_b: f64,
}

/// Scored view of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub card: HoleCard,
    pub tally: HoleTally,
    pub text: String,
}

/// Stateless match-play scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer;

impl MatchScorer {
    /// Score a match from its stored hole results.
    pub fn score(
        &self,
        team_a: &str,
        team_b: &str,
        results: &[HoleResult],
        span: HoleSpan,
    ) -> MatchScore {
        let card = HoleCard::from_results(span, results);
        let tally = card.tally();
        let text = tally.display_text(team_a, team_b);
        MatchScore { card, tally, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(codes: &[(u8, HoleOutcome)]) -> Vec<HoleResult> {
        codes
            .iter()
            .map(|(hole, outcome)| HoleResult::new(*hole, *outcome))
            .collect()
    }

    fn repeat(start: u8, count: u8, outcome: HoleOutcome) -> Vec<(u8, HoleOutcome)> {
        (start..start + count).map(|hole| (hole, outcome)).collect()
    }

    #[test]
    fn team_a_five_up_after_ten_wins_to_five() {
        let mut codes = repeat(1, 10, HoleOutcome::TeamA);
        codes.extend(repeat(11, 5, HoleOutcome::TeamB));
        let score = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::Full);

        assert_eq!(score.tally.wins_a, 10);
        assert_eq!(score.tally.wins_b, 5);
        assert_eq!(score.tally.remaining, 3);
        assert_eq!(score.text, "Europe 5 Up");
        assert_eq!(score.tally.result(), MatchResult::Won(Side::A));
    }

    #[test]
    fn team_b_lead_uses_team_b_name() {
        let codes = repeat(1, 2, HoleOutcome::TeamB);
        let score = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::Full);
        assert_eq!(score.text, "USA 2 Up");
    }

    #[test]
    fn all_halved_nine_hole_match_is_all_square() {
        let codes = repeat(1, 9, HoleOutcome::Halved);
        let score = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::FrontNine);

        assert_eq!(score.tally.wins_a, 0);
        assert_eq!(score.tally.wins_b, 0);
        assert_eq!(score.tally.halved, 9);
        assert_eq!(score.text, ALL_SQUARE);
        assert_eq!(score.tally.result().points(), PointSplit {
            team_a: 0.5,
            team_b: 0.5
        });
    }

    #[test]
    fn no_results_is_all_square() {
        let score = MatchScorer.score("Europe", "USA", &[], HoleSpan::Full);
        assert_eq!(score.tally.wins_a, 0);
        assert_eq!(score.tally.wins_b, 0);
        assert_eq!(score.tally.remaining, 18);
        assert_eq!(score.text, ALL_SQUARE);
    }

    #[test]
    fn holes_outside_span_do_not_count() {
        let mut codes = repeat(1, 2, HoleOutcome::TeamA);
        codes.extend(repeat(10, 5, HoleOutcome::TeamB));
        let front = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::FrontNine);
        assert_eq!((front.tally.wins_a, front.tally.wins_b), (2, 0));
        assert_eq!(front.text, "Europe 2 Up");

        let back = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::BackNine);
        assert_eq!((back.tally.wins_a, back.tally.wins_b), (0, 5));
        assert_eq!(back.tally.remaining, 4);
    }

    #[test]
    fn unplayed_and_halved_holes_count_for_neither_side() {
        let codes = vec![
            (1, HoleOutcome::TeamA),
            (2, HoleOutcome::Halved),
            (3, HoleOutcome::Unplayed),
            (4, HoleOutcome::TeamB),
        ];
        let score = MatchScorer.score("Europe", "USA", &results(&codes), HoleSpan::Full);
        assert_eq!((score.tally.wins_a, score.tally.wins_b), (1, 1));
        assert_eq!(score.text, ALL_SQUARE);
    }

    #[test]
    fn card_lists_played_holes_with_course_numbers() {
        let card = HoleCard::from_results(
            HoleSpan::BackNine,
            &results(&[(12, HoleOutcome::TeamA), (18, HoleOutcome::Halved)]),
        );
        assert_eq!(card.outcomes()[2], HoleOutcome::TeamA);
        assert_eq!(
            card.played(),
            results(&[(12, HoleOutcome::TeamA), (18, HoleOutcome::Halved)])
        );
    }

    #[test]
    fn every_result_awards_exactly_one_point() {
        for result in [
            MatchResult::Won(Side::A),
            MatchResult::Won(Side::B),
            MatchResult::Halved,
        ] {
            let split = result.points();
            assert_eq!(split.team_a + split.team_b, 1.0);
        }
    }
}
