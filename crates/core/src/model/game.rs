use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed, closed set of mini-games.
///
/// `DAILY_SEQUENCE` lists all eight in the order they are presented each day;
/// the order is constant for the lifetime of the application and is not
/// derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GameType {
    DateCheck,
    MemoryCards,
    PatternRecall,
    Translation,
    WordPuzzle,
    TypingPractice,
    MathGames,
    SpeedGame,
}

impl GameType {
    /// Daily presentation order, front to back.
    pub const DAILY_SEQUENCE: [GameType; 8] = [
        GameType::DateCheck,
        GameType::MemoryCards,
        GameType::PatternRecall,
        GameType::Translation,
        GameType::WordPuzzle,
        GameType::TypingPractice,
        GameType::MathGames,
        GameType::SpeedGame,
    ];

    /// Stable kebab-case name used on the wire and in stored data.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            GameType::DateCheck => "date-check",
            GameType::MemoryCards => "memory-cards",
            GameType::PatternRecall => "pattern-recall",
            GameType::Translation => "translation",
            GameType::WordPuzzle => "word-puzzle",
            GameType::TypingPractice => "typing-practice",
            GameType::MathGames => "math-games",
            GameType::SpeedGame => "speed-game",
        }
    }

    /// Route the UI navigates to for this game.
    ///
    /// Three paths are shorter than their slugs; this matches the app's
    /// routing table, so do not derive paths from slugs.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            GameType::DateCheck => "/games/date-check",
            GameType::MemoryCards => "/games/memory-cards",
            GameType::PatternRecall => "/games/pattern-recall",
            GameType::Translation => "/games/translation",
            GameType::WordPuzzle => "/games/word-puzzle",
            GameType::TypingPractice => "/games/typing",
            GameType::MathGames => "/games/math",
            GameType::SpeedGame => "/games/speed",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error for an unrecognized game slug.
///
/// Stored data can legitimately contain slugs of games that no longer exist;
/// callers decide whether that is an error or something to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGameTypeError {
    slug: String,
}

impl ParseGameTypeError {
    /// The slug that failed to parse.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for ParseGameTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game type: {}", self.slug)
    }
}

impl std::error::Error for ParseGameTypeError {}

impl FromStr for GameType {
    type Err = ParseGameTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::DAILY_SEQUENCE
            .into_iter()
            .find(|g| g.slug() == s)
            .ok_or_else(|| ParseGameTypeError { slug: s.to_owned() })
    }
}

impl TryFrom<String> for GameType {
    type Error = ParseGameTypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GameType> for String {
    fn from(game: GameType) -> Self {
        game.slug().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_contains_each_game_once() {
        let mut seen = std::collections::HashSet::new();
        for game in GameType::DAILY_SEQUENCE {
            assert!(seen.insert(game), "{game} appears twice");
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn slug_roundtrip() {
        for game in GameType::DAILY_SEQUENCE {
            let parsed: GameType = game.slug().parse().unwrap();
            assert_eq!(parsed, game);
        }
    }

    #[test]
    fn unknown_slug_is_an_error() {
        let err = "sudoku".parse::<GameType>().unwrap_err();
        assert_eq!(err.slug(), "sudoku");
    }

    #[test]
    fn shortened_paths_match_routing_table() {
        assert_eq!(GameType::TypingPractice.path(), "/games/typing");
        assert_eq!(GameType::MathGames.path(), "/games/math");
        assert_eq!(GameType::SpeedGame.path(), "/games/speed");
        assert_eq!(GameType::DateCheck.path(), "/games/date-check");
    }
}
