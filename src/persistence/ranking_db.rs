use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use rusqlite::{Connection, params};

use crate::consts::{DISPLAY_CAP, MAX_NAME_LENGTH, PLACEHOLDER_NAME, RETENTION_CAP};

/// Shown instead of a date that can't be parsed
pub const DATE_PLACEHOLDER: &str = "--/--/--";

/// Capacity and name rules for the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingLimits {
    /// Rows on the leaderboard
    pub display_cap: usize,
    /// Rows kept on disk
    pub retention_cap: usize,
    /// Characters kept from a player name
    pub max_name_length: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            display_cap: DISPLAY_CAP,
            retention_cap: RETENTION_CAP,
            max_name_length: MAX_NAME_LENGTH,
        }
    }
}

/// A stored score, as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    /// Insertion sequence, breaks score ties
    pub id: i64,
    pub name: String,
    pub score: i64,
    /// Raw `created_at` text, if the column holds text
    pub created_at: Option<String>,
}

/// One leaderboard line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    /// 1-indexed
    pub rank: usize,
    pub name: String,
    pub score: i64,
    /// DD/MM/YY or `DATE_PLACEHOLDER`
    pub date: String,
}

/// SQLite-backed ranking table.
///
/// A connection is opened per operation and dropped when it returns, so a
/// failed write rolls back instead of leaving a transaction open. Order is
/// always `score DESC, id ASC`: equal scores rank by who got there first.
#[derive(Debug, Clone)]
pub struct RankingStore {
    path: PathBuf,
    limits: RankingLimits,
}

impl RankingStore {
    /// Open (or create) the ranking database and its schema.
    ///
    /// The parent directory must already exist.
    pub fn open(path: &Path, limits: RankingLimits) -> anyhow::Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
            limits,
        };

        let conn = store.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("failed to set pragmas")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS rankings (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name TEXT NOT NULL DEFAULT 'AAA',
                score       INTEGER NOT NULL CHECK (score >= 0),
                created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
             );
             CREATE INDEX IF NOT EXISTS idx_rankings_score ON rankings(score DESC);",
        )
        .context("failed to create ranking schema")?;

        log::info!("Ranking store ready at {}", store.path.display());
        Ok(store)
    }

    pub fn limits(&self) -> RankingLimits {
        self.limits
    }

    fn connect(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("failed to open SQLite at {}", self.path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("failed to set busy timeout")?;
        Ok(conn)
    }

    /// Whether `score` would make the leaderboard.
    ///
    /// Non-positive scores never qualify. With fewer than `display_cap`
    /// entries any positive score does; otherwise it must beat the lowest
    /// score currently shown.
    pub fn is_high_score(&self, score: i64) -> anyhow::Result<bool> {
        if score <= 0 {
            return Ok(false);
        }

        let conn = self.connect()?;
        let total = count(&conn, "SELECT COUNT(*) FROM rankings", [])?;
        if total < self.limits.display_cap {
            return Ok(true);
        }

        let lowest_shown: i64 = conn
            .query_row(
                "SELECT MIN(score) FROM (
                    SELECT score FROM rankings ORDER BY score DESC, id ASC LIMIT ?1
                 )",
                params![sql_limit(self.limits.display_cap)],
                |row| row.get(0),
            )
            .context("failed to read lowest leaderboard score")?;

        Ok(score > lowest_shown)
    }

    /// Record a score and prune to the retention cap in one transaction.
    ///
    /// Returns the 1-indexed rank if it lands on the leaderboard, `None` if
    /// it doesn't.
    pub fn save_score(&self, name: &str, score: i64) -> anyhow::Result<Option<usize>> {
        if score < 0 {
            bail!("refusing to store negative score {score}");
        }
        let name = clean_name(name, self.limits.max_name_length);

        let mut conn = self.connect()?;
        let tx = conn.transaction().context("failed to begin transaction")?;

        tx.execute(
            "INSERT INTO rankings (player_name, score) VALUES (?1, ?2)",
            params![name, score],
        )
        .context("insert score failed")?;

        let rank = 1 + count(
            &tx,
            "SELECT COUNT(*) FROM rankings WHERE score > ?1",
            params![score],
        )?;

        let pruned = tx
            .execute(
                "DELETE FROM rankings WHERE id NOT IN (
                    SELECT id FROM rankings ORDER BY score DESC, id ASC LIMIT ?1
                 )",
                params![sql_limit(self.limits.retention_cap)],
            )
            .context("prune rankings failed")?;

        tx.commit().context("failed to commit score")?;

        if pruned > 0 {
            log::debug!("Pruned {pruned} ranking entries");
        }
        log::info!("Saved score {score} for {name} (rank {rank})");

        Ok((rank <= self.limits.display_cap).then_some(rank))
    }

    /// Best `limit` scores, ranked
    pub fn top_scores(&self, limit: usize) -> anyhow::Result<Vec<RankingRow>> {
        let rows = self.query_entries(Some(limit))?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankingRow {
                rank: i + 1,
                date: entry
                    .created_at
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| DATE_PLACEHOLDER.to_string()),
                name: entry.name,
                score: entry.score,
            })
            .collect())
    }

    /// Rank `score` would get, without inserting it
    pub fn rank_position(&self, score: i64) -> anyhow::Result<usize> {
        let conn = self.connect()?;
        let better = count(
            &conn,
            "SELECT COUNT(*) FROM rankings WHERE score > ?1",
            params![score],
        )?;
        Ok(better + 1)
    }

    /// Number of stored entries
    pub fn len(&self) -> anyhow::Result<usize> {
        let conn = self.connect()?;
        count(&conn, "SELECT COUNT(*) FROM rankings", [])
    }

    /// Every stored entry, best first
    pub fn entries(&self) -> anyhow::Result<Vec<RankingEntry>> {
        self.query_entries(None)
    }

    fn query_entries(&self, limit: Option<usize>) -> anyhow::Result<Vec<RankingEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, player_name, score, created_at
                 FROM rankings
                 ORDER BY score DESC, id ASC
                 LIMIT ?1",
            )
            .context("failed to prepare ranking query")?;

        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(sql_limit).unwrap_or(-1);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(RankingEntry {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    score: row.get(2)?,
                    created_at: row.get_ref(3)?.as_str().ok().map(str::to_owned),
                })
            })
            .context("failed to query rankings")?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.context("failed to read ranking row")?);
        }
        Ok(entries)
    }
}

fn count<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> anyhow::Result<usize> {
    let n: i64 = conn
        .query_row(sql, params, |row| row.get(0))
        .with_context(|| format!("count query failed: {sql}"))?;
    Ok(n.max(0) as usize)
}

fn sql_limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Trim and truncate a name; blank names get the placeholder
fn clean_name(name: &str, max_len: usize) -> String {
    let name: String = name.trim().chars().take(max_len).collect();
    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name
    }
}

/// Format a stored `YYYY-MM-DD[ HH:MM:SS]` timestamp as DD/MM/YY
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some((year, month, day)) => format!("{day:02}/{month:02}/{:02}", year % 100),
        None => {
            log::warn!("Unparseable ranking timestamp {raw:?}");
            DATE_PLACEHOLDER.to_string()
        }
    }
}

fn parse_date(raw: &str) -> Option<(u32, u32, u32)> {
    let raw = raw.trim();
    let date = raw.get(..10)?;
    let rest = &raw[10..];
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
        return None;
    }

    let mut parts = date.split('-');
    let year = digits(parts.next()?, 4)?;
    let month = digits(parts.next()?, 2)?;
    let day = digits(parts.next()?, 2)?;
    if parts.next().is_some() || !(1..=12).contains(&month) {
        return None;
    }
    if !(1..=days_in_month(year, month)).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

fn digits(s: &str, len: usize) -> Option<u32> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
