//! Decides which game the player is routed to next.

use exercise_core::model::GameType;

use crate::completion::CompletionCache;

/// Terminal route once every game in the daily sequence is finished.
pub const DONE_PATH: &str = "/done";

/// Outcome of a sequencing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextGame {
    Game(GameType),
    AllDone,
}

impl NextGame {
    /// Route the UI should navigate to.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            NextGame::Game(game) => game.path(),
            NextGame::AllDone => DONE_PATH,
        }
    }
}

/// Today's position in the daily sequence, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodayProgress {
    pub completed_count: usize,
    pub total_games: usize,
    pub is_complete: bool,
}

/// Walks the fixed daily sequence against the completion cache.
///
/// Deterministic given the cache contents: no randomness, no I/O beyond the
/// cache. Cached games outside the sequence cannot occur (`GameType` is a
/// closed set and stores skip unknown slugs on load), so stale data is
/// ignored rather than an error.
#[derive(Clone)]
pub struct GameSequencer {
    completions: CompletionCache,
}

impl GameSequencer {
    #[must_use]
    pub fn new(completions: CompletionCache) -> Self {
        Self { completions }
    }

    /// First game in the sequence not yet completed today.
    #[must_use]
    pub fn next_game(&self) -> NextGame {
        let completed = self.completions.completed_today();
        GameType::DAILY_SEQUENCE
            .into_iter()
            .find(|game| !completed.contains(game))
            .map_or(NextGame::AllDone, NextGame::Game)
    }

    /// Convenience wrapper returning the route directly.
    #[must_use]
    pub fn next_game_path(&self) -> &'static str {
        self.next_game().path()
    }

    /// How far through today's sequence the player is.
    #[must_use]
    pub fn today_progress(&self) -> TodayProgress {
        let completed = self.completions.completed_today();
        let completed_count = completed.len();
        let total_games = GameType::DAILY_SEQUENCE.len();
        TodayProgress {
            completed_count,
            total_games,
            is_complete: completed_count >= total_games,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercise_core::time::fixed_clock;

    fn sequencer() -> GameSequencer {
        GameSequencer::new(CompletionCache::in_memory(fixed_clock()))
    }

    #[test]
    fn fresh_day_starts_at_the_front() {
        let seq = sequencer();
        assert_eq!(seq.next_game(), NextGame::Game(GameType::DateCheck));
        assert_eq!(seq.next_game_path(), "/games/date-check");
    }

    #[test]
    fn skips_completed_games_in_order() {
        let seq = sequencer();
        seq.completions.mark_completed(GameType::DateCheck);
        assert_eq!(seq.next_game(), NextGame::Game(GameType::MemoryCards));

        // Completing out of order still yields the first gap.
        seq.completions.mark_completed(GameType::PatternRecall);
        assert_eq!(seq.next_game(), NextGame::Game(GameType::MemoryCards));
    }

    #[test]
    fn decision_is_stable_for_fixed_cache_state() {
        let seq = sequencer();
        seq.completions.mark_completed(GameType::DateCheck);
        for _ in 0..3 {
            assert_eq!(seq.next_game_path(), "/games/memory-cards");
        }
    }

    #[test]
    fn all_completed_routes_to_done() {
        let seq = sequencer();
        for game in GameType::DAILY_SEQUENCE {
            seq.completions.mark_completed(game);
        }
        assert_eq!(seq.next_game(), NextGame::AllDone);
        assert_eq!(seq.next_game_path(), DONE_PATH);

        let progress = seq.today_progress();
        assert_eq!(progress.completed_count, 8);
        assert_eq!(progress.total_games, 8);
        assert!(progress.is_complete);
    }

    #[test]
    fn progress_counts_partial_days() {
        let seq = sequencer();
        seq.completions.mark_completed(GameType::DateCheck);
        seq.completions.mark_completed(GameType::Translation);

        let progress = seq.today_progress();
        assert_eq!(progress.completed_count, 2);
        assert!(!progress.is_complete);
    }
}
