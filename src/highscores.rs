//! High score leaderboard system
//!
//! The leaderboard keeps the top 10 scores. A [`ScoreService`] stores it
//! (LocalStorage on the web build, memory on native) and a [`ScoreKeeper`]
//! decides when a finished episode is worth submitting.

use serde::{Deserialize, Serialize};

use crate::engine::GameObserver;
use crate::error::PersistenceError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player never entered one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub player_name: String,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    #[serde(rename = "high_scores", default)]
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new entry (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Find insertion point (sorted descending by score, ties keep age order)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let mut scores: Self = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Where the leaderboard lives
pub trait ScoreService {
    /// Current leaderboard, best first
    fn fetch(&mut self) -> Result<HighScores, PersistenceError>;

    /// Record a new entry
    fn submit(&mut self, entry: HighScoreEntry) -> Result<(), PersistenceError>;
}

/// Leaderboard stored on this device
#[derive(Debug, Default)]
pub struct LocalScoreService {
    board: HighScores,
}

impl LocalScoreService {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_engine_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn load(&mut self) -> Result<(), PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Storage("LocalStorage unavailable".to_string()))?;

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                self.board = HighScores::from_json(&json)?;
                log::info!("Loaded {} high scores", self.board.entries.len());
            }
            Ok(None) => log::info!("No high scores found, starting fresh"),
            Err(_) => {
                return Err(PersistenceError::Storage("LocalStorage read failed".to_string()));
            }
        }
        Ok(())
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) -> Result<(), PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Storage("LocalStorage unavailable".to_string()))?;

        storage
            .set_item(Self::STORAGE_KEY, &self.board.to_json()?)
            .map_err(|_| PersistenceError::Storage("LocalStorage write failed".to_string()))?;
        log::info!("High scores saved ({} entries)", self.board.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    fn load(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) -> Result<(), PersistenceError> {
        // No-op for native
        Ok(())
    }
}

impl ScoreService for LocalScoreService {
    fn fetch(&mut self) -> Result<HighScores, PersistenceError> {
        self.load()?;
        Ok(self.board.clone())
    }

    fn submit(&mut self, entry: HighScoreEntry) -> Result<(), PersistenceError> {
        self.board.add(entry);
        self.save()
    }
}

/// Outcome of reporting a finished episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Score did not beat the last known high score
    NotHighScore,
    /// New high score submitted
    Submitted,
    /// New high score, but the service failed (logged)
    Failed,
}

/// Calling-layer policy around a [`ScoreService`]
///
/// Submits once per game over, and only when the episode beats the last
/// known high score. Service failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct ScoreKeeper<S: ScoreService> {
    service: S,
    player_name: String,
    high_score: u32,
    /// Score of the episode in progress, as reported by the engine
    current: u32,
}

impl<S: ScoreService> ScoreKeeper<S> {
    pub fn new(service: S, player_name: impl Into<String>) -> Self {
        Self {
            service,
            player_name: player_name.into(),
            high_score: 0,
            current: 0,
        }
    }

    /// Pull the leaderboard to learn the current high score
    pub fn refresh(&mut self) -> Option<HighScores> {
        match self.service.fetch() {
            Ok(board) => {
                self.high_score = self.high_score.max(board.top_score().unwrap_or(0));
                Some(board)
            }
            Err(e) => {
                log::warn!("Error fetching high scores: {}", e);
                None
            }
        }
    }

    /// Report a finished episode
    pub fn record_game_over(&mut self, score: u32) -> SubmitOutcome {
        self.current = 0;
        if score <= self.high_score {
            return SubmitOutcome::NotHighScore;
        }

        self.high_score = score;
        let entry = HighScoreEntry {
            score,
            player_name: self.player_name.clone(),
        };
        match self.service.submit(entry) {
            Ok(()) => {
                log::info!("New high score {} submitted", score);
                SubmitOutcome::Submitted
            }
            Err(e) => {
                log::warn!("Error saving high score: {}", e);
                SubmitOutcome::Failed
            }
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn current_score(&self) -> u32 {
        self.current
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: ScoreService> GameObserver for ScoreKeeper<S> {
    fn on_score(&mut self, score: u32) {
        self.current = score;
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.record_game_over(final_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> HighScoreEntry {
        HighScoreEntry {
            score,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }

    /// Service that records submissions and can be told to fail
    #[derive(Default)]
    struct FakeService {
        board: HighScores,
        submitted: Vec<u32>,
        fail: bool,
    }

    impl ScoreService for FakeService {
        fn fetch(&mut self) -> Result<HighScores, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Network("connection refused".to_string()));
            }
            Ok(self.board.clone())
        }

        fn submit(&mut self, entry: HighScoreEntry) -> Result<(), PersistenceError> {
            self.submitted.push(entry.score);
            if self.fail {
                return Err(PersistenceError::Network("connection refused".to_string()));
            }
            self.board.add(entry);
            Ok(())
        }
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(5)), Some(1));
        assert_eq!(scores.add(entry(9)), Some(1));
        assert_eq!(scores.add(entry(7)), Some(2));
        let values: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![9, 7, 5]);
    }

    #[test]
    fn test_board_capped_at_ten() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.add(entry(s));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(12));
        assert!(!scores.qualifies(3));
        assert!(scores.qualifies(4));
    }

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!HighScores::new().qualifies(0));
    }

    #[test]
    fn test_json_shape_matches_service() {
        let json = r#"{"high_scores":[
            {"score":3,"player_name":"Ana"},
            {"score":8,"player_name":"Bo"}
        ]}"#;
        let scores = HighScores::from_json(json).expect("parse");
        assert_eq!(scores.top_score(), Some(8));
        assert_eq!(scores.entries[0].player_name, "Bo");
        assert!(scores.to_json().expect("serialize").starts_with(r#"{"high_scores":"#));
    }

    #[test]
    fn test_keeper_submits_only_new_highs() {
        let mut service = FakeService::default();
        service.board.add(entry(10));
        let mut keeper = ScoreKeeper::new(service, DEFAULT_PLAYER_NAME);
        keeper.refresh();
        assert_eq!(keeper.high_score(), 10);

        assert_eq!(keeper.record_game_over(4), SubmitOutcome::NotHighScore);
        assert_eq!(keeper.record_game_over(10), SubmitOutcome::NotHighScore);
        assert_eq!(keeper.record_game_over(12), SubmitOutcome::Submitted);
        assert_eq!(keeper.record_game_over(12), SubmitOutcome::NotHighScore);
        assert_eq!(keeper.service().submitted, vec![12]);
    }

    #[test]
    fn test_keeper_survives_service_failure() {
        let service = FakeService {
            fail: true,
            ..Default::default()
        };
        let mut keeper = ScoreKeeper::new(service, "Ana");
        assert!(keeper.refresh().is_none());
        assert_eq!(keeper.record_game_over(3), SubmitOutcome::Failed);
        assert_eq!(keeper.high_score(), 3);
        assert_eq!(keeper.service().submitted, vec![3]);
    }

    #[test]
    fn test_keeper_as_observer() {
        let mut keeper = ScoreKeeper::new(LocalScoreService::new(), DEFAULT_PLAYER_NAME);
        keeper.on_score(1);
        keeper.on_score(2);
        assert_eq!(keeper.current_score(), 2);
        keeper.on_game_over(2);
        assert_eq!(keeper.current_score(), 0);
        assert_eq!(keeper.high_score(), 2);
    }

    #[test]
    fn test_local_service_roundtrip() {
        let mut service = LocalScoreService::new();
        service.submit(entry(6)).expect("submit");
        service.submit(entry(2)).expect("submit");
        let board = service.fetch().expect("fetch");
        assert_eq!(board.top_score(), Some(6));
        assert_eq!(board.entries.len(), 2);
    }
}
