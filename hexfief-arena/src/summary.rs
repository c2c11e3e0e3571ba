//! Aggregate statistics over a set of match outcomes

use serde::Serialize;

use crate::runner::{DecidedBy, MatchOutcome};

/// Win/draw/decision roll-up for an arena run, from the point of view of
/// the two configured AIs (after side-swap accounting).
#[derive(Clone, Debug, Default, Serialize)]
pub struct ArenaSummary {
    pub games: usize,
    pub ai1_wins: usize,
    pub ai2_wins: usize,
    pub draws: usize,
    pub eliminations: usize,
    pub hex_count_wins: usize,
    pub ai1_wins_as_first: usize,
    pub ai1_games_as_first: usize,
    pub ai1_wins_as_second: usize,
    pub ai1_games_as_second: usize,
    pub avg_turns: f32,
    pub avg_winner_hexes: f32,
}

impl ArenaSummary {
    pub fn from_outcomes(outcomes: &[MatchOutcome]) -> Self {
        let mut summary = ArenaSummary {
            games: outcomes.len(),
            ..ArenaSummary::default()
        };
        let mut winner_hexes = 0usize;
        let mut wins_with_hexes = 0usize;
        let mut total_turns = 0u64;

        for outcome in outcomes {
            total_turns += u64::from(outcome.turns);
            match outcome.decided_by {
                DecidedBy::Elimination => summary.eliminations += 1,
                DecidedBy::HexCount => summary.hex_count_wins += 1,
                DecidedBy::Draw => {}
            }
            if outcome.swapped {
                summary.ai1_games_as_second += 1;
            } else {
                summary.ai1_games_as_first += 1;
            }
            match outcome.winning_ai() {
                Some(0) => {
                    summary.ai1_wins += 1;
                    if outcome.swapped {
                        summary.ai1_wins_as_second += 1;
                    } else {
                        summary.ai1_wins_as_first += 1;
                    }
                }
                Some(_) => summary.ai2_wins += 1,
                None => summary.draws += 1,
            }
            if let Some(pid) = outcome.winner {
                winner_hexes += outcome.hex_counts[pid as usize];
                wins_with_hexes += 1;
            }
        }

        if summary.games > 0 {
            summary.avg_turns = total_turns as f32 / summary.games as f32;
        }
        if wins_with_hexes > 0 {
            summary.avg_winner_hexes = winner_hexes as f32 / wins_with_hexes as f32;
        }
        summary
    }

    fn percent(part: usize, whole: usize) -> f32 {
        if whole == 0 {
            0.0
        } else {
            100.0 * part as f32 / whole as f32
        }
    }

    /// Formatted table in the style of the CLI output.
    pub fn render(&self, ai1: &str, ai2: &str) -> String {
        let name_width = ai1.len().max(ai2.len()).max(5);
        let mut out = String::new();
        out.push_str(&format!(
            "=== {ai1} vs {ai2} ({} games, sides swapped per seed) ===\n\n",
            self.games
        ));
        out.push_str(&format!(
            "  {ai1:<name_width$} wins: {:3} / {}  ({:.1}%)\n",
            self.ai1_wins,
            self.games,
            Self::percent(self.ai1_wins, self.games)
        ));
        out.push_str(&format!(
            "  {ai2:<name_width$} wins: {:3} / {}  ({:.1}%)\n",
            self.ai2_wins,
            self.games,
            Self::percent(self.ai2_wins, self.games)
        ));
        out.push_str(&format!(
            "  {:<name_width$}     : {:3} / {}\n\n",
            "draws", self.draws, self.games
        ));
        out.push_str(&format!(
            "  decided by elimination: {}\n  decided by hex count:   {}\n\n",
            self.eliminations, self.hex_count_wins
        ));
        out.push_str(&format!(
            "  avg game length:  {:.1} turns\n  avg winner hexes: {:.1}\n\n",
            self.avg_turns, self.avg_winner_hexes
        ));
        out.push_str(&format!(
            "  {ai1} moving first:  {}/{} wins\n  {ai1} moving second: {}/{} wins\n",
            self.ai1_wins_as_first,
            self.ai1_games_as_first,
            self.ai1_wins_as_second,
            self.ai1_games_as_second
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(swapped: bool, winner: Option<u8>, decided_by: DecidedBy) -> MatchOutcome {
        MatchOutcome {
            seed: 1,
            swapped,
            winner,
            decided_by,
            turns: 20,
            hex_counts: [30, 10],
        }
    }

    #[test]
    fn test_summary_counts_sides() {
        let outcomes = vec![
            outcome(false, Some(0), DecidedBy::Elimination),
            outcome(true, Some(1), DecidedBy::HexCount),
            outcome(false, None, DecidedBy::Draw),
        ];
        let summary = ArenaSummary::from_outcomes(&outcomes);
        assert_eq!(summary.games, 3);
        // Game 2 was swapped: raw winner 1 is the first configured AI.
        assert_eq!(summary.ai1_wins, 2);
        assert_eq!(summary.ai2_wins, 0);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.eliminations, 1);
        assert_eq!(summary.hex_count_wins, 1);
        assert_eq!(summary.ai1_games_as_first, 2);
        assert_eq!(summary.ai1_games_as_second, 1);
        assert_eq!(summary.avg_turns, 20.0);
    }

    #[test]
    fn test_render_mentions_both_names() {
        let summary = ArenaSummary::from_outcomes(&[outcome(
            false,
            Some(0),
            DecidedBy::Elimination,
        )]);
        let text = summary.render("greedy", "random");
        assert!(text.contains("greedy"));
        assert!(text.contains("random"));
        assert!(text.contains("100.0%"));
    }
}
