//! Durable storage
//!
//! Features:
//! - SQLite ranking table with a score index
//! - One connection and one transaction per write
//! - Retention pruning with a stable first-come tie-break

mod ranking_db;

pub use ranking_db::{
    DATE_PLACEHOLDER, RankingEntry, RankingLimits, RankingRow, RankingStore, format_date,
};
