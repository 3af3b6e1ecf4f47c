use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 2;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    // Errors are non-fatal: in-memory DBs and fresh files legitimately fail this.
    if conn
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
        .is_ok()
    {
        tracing::debug!("startup WAL checkpoint complete");
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL UNIQUE COLLATE NOCASE,
            mantra       TEXT,
            category     TEXT NOT NULL DEFAULT 'japa',
            color        TEXT NOT NULL,
            icon         TEXT NOT NULL,
            cycle_length INTEGER NOT NULL,
            daily_goal   INTEGER NOT NULL,
            tally_day    TEXT NOT NULL,
            tally_raw    INTEGER NOT NULL DEFAULT 0,
            tally_delta  INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS history (
            counter_id    TEXT NOT NULL REFERENCES counters(id) ON DELETE CASCADE,
            day           TEXT NOT NULL,
            maalas        INTEGER NOT NULL,
            raw           INTEGER NOT NULL,
            goal_achieved INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (counter_id, day)
        );

        CREATE TABLE IF NOT EXISTS milestones (
            counter_id  TEXT NOT NULL REFERENCES counters(id) ON DELETE CASCADE,
            days        INTEGER NOT NULL,
            achieved_at TEXT,
            PRIMARY KEY (counter_id, days)
        );

        CREATE TABLE IF NOT EXISTS weekly_plan (
            weekday   TEXT PRIMARY KEY,
            theme_id  TEXT NOT NULL,
            mantra_id TEXT NOT NULL,
            beads     INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS plan_override (
            id        INTEGER PRIMARY KEY CHECK (id = 1),
            day       TEXT NOT NULL,
            theme_id  TEXT NOT NULL,
            mantra_id TEXT NOT NULL,
            beads     INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_day ON history(counter_id, day DESC);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = 'schema_version'")?;
    let version = stmt
        .query_row([], |row| {
            let v: String = row.get(0)?;
            Ok(v.parse::<i64>().unwrap_or(0))
        })
        .ok();
    Ok(version)
}
