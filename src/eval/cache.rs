// SQLite-backed cache of player narrative reviews.
//
// Keyed by the stable player id (never by name -- names collide). Entries
// survive across page visits; the store is bounded LRU with explicit
// invalidation hooks, so it cannot grow without limit.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Durable key/value store mapping a player id to a stored review.
///
/// Invariant: at most one entry per player id. Writes are last-write-wins
/// upserts; re-storing the same review is harmless.
pub struct ReviewCache {
    conn: Mutex<Connection>,
    capacity: usize,
}

impl ReviewCache {
    /// Open (or create) the cache database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database (used in tests).
    ///
    /// `capacity` bounds the number of retained entries; least-recently-used
    /// rows are pruned on write once the bound is exceeded.
    pub fn open(path: &str, capacity: usize) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open review cache at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS reviews (
                player_id TEXT PRIMARY KEY,
                review    TEXT NOT NULL,
                stored_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                last_used TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
            capacity: capacity.max(1),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock means a panic mid-statement; propagating the panic
        // is the only sane option for an embedded cache.
        self.conn.lock().expect("review cache lock poisoned")
    }

    /// Look up the stored review for a player. A hit refreshes the entry's
    /// recency so it survives LRU pruning.
    pub fn get(&self, player_id: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let review: Option<String> = conn
            .query_row(
                "SELECT review FROM reviews WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query review cache")?;

        if review.is_some() {
            conn.execute(
                "UPDATE reviews
                 SET last_used = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE player_id = ?1",
                params![player_id],
            )
            .context("failed to touch cache entry")?;
        }

        Ok(review)
    }

    /// Store (or replace) the review for a player, then prune anything
    /// beyond the capacity bound, oldest-use first.
    pub fn put(&self, player_id: &str, review: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO reviews (player_id, review)
             VALUES (?1, ?2)
             ON CONFLICT(player_id) DO UPDATE SET
                 review = excluded.review,
                 stored_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                 last_used = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![player_id, review],
        )
        .context("failed to store review")?;

        conn.execute(
            "DELETE FROM reviews WHERE player_id NOT IN (
                 SELECT player_id FROM reviews
                 ORDER BY last_used DESC, rowid DESC
                 LIMIT ?1
             )",
            params![self.capacity as i64],
        )
        .context("failed to prune review cache")?;

        Ok(())
    }

    /// Drop a single player's entry (e.g. after a grade change makes the
    /// stored review stale).
    pub fn invalidate(&self, player_id: &str) -> Result<()> {
        self.lock()
            .execute("DELETE FROM reviews WHERE player_id = ?1", params![player_id])
            .context("failed to invalidate cache entry")?;
        Ok(())
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<()> {
        self.lock()
            .execute("DELETE FROM reviews", [])
            .context("failed to clear review cache")?;
        Ok(())
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
            .context("failed to count cache entries")?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> ReviewCache {
        ReviewCache::open(":memory:", capacity).expect("in-memory cache should open")
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = cache(16);
        cache.put("4984", "A cannon arm and no fear.").unwrap();
        assert_eq!(
            cache.get("4984").unwrap().as_deref(),
            Some("A cannon arm and no fear.")
        );
    }

    #[test]
    fn miss_returns_none() {
        let cache = cache(16);
        assert_eq!(cache.get("unknown").unwrap(), None);
    }

    #[test]
    fn put_is_last_write_wins() {
        let cache = cache(16);
        cache.put("4984", "first take").unwrap();
        cache.put("4984", "second take").unwrap();
        assert_eq!(cache.get("4984").unwrap().as_deref(), Some("second take"));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn prune_evicts_beyond_capacity() {
        let cache = cache(2);
        cache.put("a", "ra").unwrap();
        cache.put("b", "rb").unwrap();
        cache.put("c", "rc").unwrap();
        assert_eq!(cache.len().unwrap(), 2);
        // The newest entries survive; the oldest-use entry is gone.
        assert!(cache.get("c").unwrap().is_some());
        assert!(cache.get("a").unwrap().is_none());
    }

    #[test]
    fn invalidate_removes_only_the_target() {
        let cache = cache(16);
        cache.put("a", "ra").unwrap();
        cache.put("b", "rb").unwrap();
        cache.invalidate("a").unwrap();
        assert!(cache.get("a").unwrap().is_none());
        assert!(cache.get("b").unwrap().is_some());
    }

    #[test]
    fn clear_empties_the_store() {
        let cache = cache(16);
        cache.put("a", "ra").unwrap();
        cache.put("b", "rb").unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }
}
