//! High score leaderboard
//!
//! Wraps the SQLite ranking store. If the store can't be opened the
//! leaderboard is absent for the whole run: nothing qualifies, nothing is
//! listed and saves are dropped. Errors never reach the game loop.

use std::path::Path;

use crate::persistence::{RankingLimits, RankingRow, RankingStore};

/// Leaderboard facade used by the game controller
#[derive(Debug, Clone)]
pub struct HighScores {
    store: Option<RankingStore>,
    limits: RankingLimits,
}

impl HighScores {
    /// Open the ranking database, degrading to an absent leaderboard on failure
    pub fn open(path: &Path, limits: RankingLimits) -> Self {
        match RankingStore::open(path, limits) {
            Ok(store) => Self::from_store(store),
            Err(e) => {
                log::warn!("Ranking unavailable, continuing without it: {e:#}");
                Self::unavailable(limits)
            }
        }
    }

    pub fn from_store(store: RankingStore) -> Self {
        let limits = store.limits();
        Self {
            store: Some(store),
            limits,
        }
    }

    /// A leaderboard with no backing storage
    pub fn unavailable(limits: RankingLimits) -> Self {
        Self {
            store: None,
            limits,
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        store.is_high_score(i64::from(score)).unwrap_or_else(|e| {
            log::error!("High score check failed: {e:#}");
            false
        })
    }

    /// Get the rank a score would achieve (1-indexed, None if it wouldn't show)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        let store = self.store.as_ref()?;
        match store.rank_position(i64::from(score)) {
            Ok(rank) if rank <= self.limits.display_cap => Some(rank),
            Ok(_) => None,
            Err(e) => {
                log::error!("Rank lookup failed: {e:#}");
                None
            }
        }
    }

    /// Record a score. Returns the rank achieved if it made the board
    pub fn add_score(&self, name: &str, score: u32) -> Option<usize> {
        let store = self.store.as_ref()?;
        store
            .save_score(name, i64::from(score))
            .unwrap_or_else(|e| {
                log::error!("Failed to save score {score} for {name}: {e:#}");
                None
            })
    }

    /// Current leaderboard, best first
    pub fn top_scores(&self) -> Vec<RankingRow> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        store
            .top_scores(self.limits.display_cap)
            .unwrap_or_else(|e| {
                log::error!("Failed to read leaderboard: {e:#}");
                Vec::new()
            })
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.top_scores()
            .first()
            .and_then(|row| u32::try_from(row.score).ok())
    }
}
