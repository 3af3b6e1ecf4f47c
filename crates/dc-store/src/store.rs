use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use dc_core::{
    Category, Counter, CounterConfig, DayKey, DayTally, HistoryEntry, MAX_HISTORY_ENTRIES,
    MilestoneState, Snapshot, streaks,
};

use crate::error::{Result, StoreError};
use crate::schema;

const ACTIVE_COUNTER_KEY: &str = "active_counter";
const ANNOUNCED_STREAK_PREFIX: &str = "longest_streak:";

const COUNTER_COLUMNS: &str = "id, name, mantra, category, color, icon, cycle_length, daily_goal,
     tally_day, tally_raw, tally_delta, created_at, updated_at";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        set_metadata_on(&self.conn, key, value)
    }

    pub fn active_counter(&self) -> Result<Option<Uuid>> {
        self.get_metadata(ACTIVE_COUNTER_KEY)?
            .filter(|s| !s.is_empty())
            .map(|s| parse_uuid(&s))
            .transpose()
    }

    pub fn set_active_counter(&self, id: Option<Uuid>) -> Result<()> {
        let value = id.map(|id| id.to_string()).unwrap_or_default();
        self.set_metadata(ACTIVE_COUNTER_KEY, &value)
    }

    /// Longest streak whose rewards have already been announced.
    pub fn announced_streak(&self, counter_id: Uuid) -> Result<u32> {
        let value = self.get_metadata(&announced_streak_key(counter_id))?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    pub fn set_announced_streak(&self, counter_id: Uuid, days: u32) -> Result<()> {
        self.set_metadata(&announced_streak_key(counter_id), &days.to_string())
    }

    // --- Counters ---

    pub fn insert_counter(&self, counter: &Counter) -> Result<()> {
        counter.config.validate()?;
        if self.counter_by_name(counter.name())?.is_some() {
            return Err(StoreError::InvalidData(format!(
                "a counter named '{}' already exists",
                counter.name()
            )));
        }
        insert_counter_on(&self.conn, counter)?;
        tracing::debug!(id = %counter.id, name = counter.name(), "inserted counter");
        Ok(())
    }

    /// Persist config and today's tally of an existing counter.
    pub fn save_counter(&self, counter: &Counter) -> Result<()> {
        counter.config.validate()?;
        let c = &counter.config;
        let rows = self.conn.execute(
            "UPDATE counters SET name = ?2, mantra = ?3, category = ?4, color = ?5, icon = ?6,
                    cycle_length = ?7, daily_goal = ?8, tally_day = ?9, tally_raw = ?10,
                    tally_delta = ?11, updated_at = ?12
             WHERE id = ?1",
            params![
                counter.id.to_string(),
                c.name,
                c.mantra,
                c.category.as_str(),
                c.color,
                c.icon,
                c.cycle_length,
                c.daily_goal,
                counter.today.day.to_string(),
                to_sql_count(counter.today.raw)?,
                counter.today.manual_delta,
                counter.updated_at,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(format!("counter {}", counter.id)));
        }
        Ok(())
    }

    pub fn load_counter(&self, id: Uuid) -> Result<Option<Counter>> {
        let sql = format!("SELECT {COUNTER_COLUMNS} FROM counters WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, [id.to_string()], CounterRow::from_row)
            .optional()?;
        row.map(CounterRow::into_counter).transpose()
    }

    fn counter_by_name(&self, name: &str) -> Result<Option<Counter>> {
        let sql = format!("SELECT {COUNTER_COLUMNS} FROM counters WHERE name = ?1 COLLATE NOCASE");
        let row = self
            .conn
            .query_row(&sql, [name.trim()], CounterRow::from_row)
            .optional()?;
        row.map(CounterRow::into_counter).transpose()
    }

    /// Look a counter up by name (case-insensitive) or by a unique id prefix.
    pub fn find_counter(&self, key: &str) -> Result<Option<Counter>> {
        if let Some(counter) = self.counter_by_name(key)? {
            return Ok(Some(counter));
        }

        let prefix = key.trim().to_ascii_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(None);
        }
        let sql = format!("SELECT {COUNTER_COLUMNS} FROM counters WHERE id LIKE ?1 || '%' LIMIT 2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows: Vec<CounterRow> = stmt
            .query_map([&prefix], CounterRow::from_row)?
            .collect::<std::result::Result<_, _>>()?;
        match rows.len() {
            0 => Ok(None),
            1 => rows.pop().map(CounterRow::into_counter).transpose(),
            _ => Err(StoreError::InvalidData(format!(
                "id prefix '{key}' matches more than one counter"
            ))),
        }
    }

    pub fn list_counters(&self) -> Result<Vec<Counter>> {
        let sql = format!("SELECT {COUNTER_COLUMNS} FROM counters ORDER BY created_at, rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows: Vec<CounterRow> = stmt
            .query_map([], CounterRow::from_row)?
            .collect::<std::result::Result<_, _>>()?;
        rows.into_iter().map(CounterRow::into_counter).collect()
    }

    /// Delete a counter with its history and milestones. Returns false if absent.
    pub fn delete_counter(&self, id: Uuid) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM counters WHERE id = ?1", [id.to_string()])?;
        self.conn.execute(
            "DELETE FROM metadata WHERE key = ?1",
            [announced_streak_key(id)],
        )?;
        if rows > 0 && self.active_counter()? == Some(id) {
            self.set_active_counter(None)?;
        }
        Ok(rows > 0)
    }

    // --- History ---

    /// Upsert one closed day, then prune the counter to its newest entries.
    pub fn record_history(&self, entry: &HistoryEntry) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_history_on(&tx, entry)?;
        let pruned = tx.execute(
            "DELETE FROM history WHERE counter_id = ?1 AND day NOT IN (
                 SELECT day FROM history WHERE counter_id = ?1 ORDER BY day DESC LIMIT ?2
             )",
            params![entry.counter_id.to_string(), MAX_HISTORY_ENTRIES as i64],
        )?;
        tx.commit()?;
        if pruned > 0 {
            tracing::debug!(counter = %entry.counter_id, pruned, "pruned history");
        }
        Ok(())
    }

    /// History of one counter, newest first.
    pub fn history(&self, counter_id: Uuid, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT counter_id, day, maalas, raw, goal_achieved FROM history
             WHERE counter_id = ?1 ORDER BY day DESC LIMIT ?2",
        )?;
        let rows: Vec<HistoryRow> = stmt
            .query_map(params![counter_id.to_string(), limit], HistoryRow::from_row)?
            .collect::<std::result::Result<_, _>>()?;
        rows.into_iter().map(HistoryRow::into_entry).collect()
    }

    fn all_history(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT counter_id, day, maalas, raw, goal_achieved FROM history
             ORDER BY day DESC, counter_id",
        )?;
        let rows: Vec<HistoryRow> = stmt
            .query_map([], HistoryRow::from_row)?
            .collect::<std::result::Result<_, _>>()?;
        rows.into_iter().map(HistoryRow::into_entry).collect()
    }

    // --- Milestones ---

    pub fn milestones(&self, counter_id: Uuid) -> Result<Vec<MilestoneState>> {
        let mut stmt = self.conn.prepare(
            "SELECT days, achieved_at FROM milestones WHERE counter_id = ?1 ORDER BY days",
        )?;
        let states = stmt
            .query_map([counter_id.to_string()], |row| {
                Ok(MilestoneState {
                    days: row.get(0)?,
                    achieved_at: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        Ok(states)
    }

    pub fn save_milestones(&self, counter_id: Uuid, states: &[MilestoneState]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        save_milestones_on(&tx, counter_id, states)?;
        tx.commit()?;
        Ok(())
    }

    // --- Snapshot ---

    pub fn snapshot(&self) -> Result<Snapshot> {
        let counters = self.list_counters()?;
        let history = self.all_history()?;
        let mut milestones = BTreeMap::new();
        for counter in &counters {
            let states = self.milestones(counter.id)?;
            if !states.is_empty() {
                milestones.insert(counter.id, states);
            }
        }
        Ok(Snapshot::new(counters, history, milestones))
    }

    /// Replace all counters, history and milestones with `snapshot`.
    pub fn restore(&self, snapshot: &Snapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute_batch("DELETE FROM milestones; DELETE FROM history; DELETE FROM counters;")?;

        for counter in &snapshot.counters {
            counter.config.validate()?;
            insert_counter_on(&tx, counter)?;
        }
        for entry in &snapshot.history {
            insert_history_on(&tx, entry)?;
        }
        for (counter_id, states) in &snapshot.milestones {
            save_milestones_on(&tx, *counter_id, states)?;
        }

        // imported streaks count as announced
        tx.execute(
            "DELETE FROM metadata WHERE key LIKE ?1 || '%'",
            [ANNOUNCED_STREAK_PREFIX],
        )?;
        for counter in &snapshot.counters {
            let history: Vec<HistoryEntry> = snapshot
                .history
                .iter()
                .filter(|e| e.counter_id == counter.id)
                .cloned()
                .collect();
            let longest = streaks(&history, counter.today.day, counter.goal_met()).longest;
            if longest > 0 {
                set_metadata_on(
                    &tx,
                    &announced_streak_key(counter.id),
                    &longest.to_string(),
                )?;
            }
        }

        let active = snapshot.counters.first().map(|c| c.id.to_string());
        set_metadata_on(&tx, ACTIVE_COUNTER_KEY, active.as_deref().unwrap_or_default())?;

        tx.commit()?;
        tracing::info!(
            counters = snapshot.counters.len(),
            history = snapshot.history.len(),
            "restored snapshot"
        );
        Ok(())
    }
}

fn announced_streak_key(counter_id: Uuid) -> String {
    format!("{ANNOUNCED_STREAK_PREFIX}{counter_id}")
}

fn set_metadata_on(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

fn insert_counter_on(conn: &Connection, counter: &Counter) -> Result<()> {
    let c = &counter.config;
    conn.execute(
        "INSERT INTO counters (id, name, mantra, category, color, icon, cycle_length, daily_goal,
                               tally_day, tally_raw, tally_delta, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            counter.id.to_string(),
            c.name,
            c.mantra,
            c.category.as_str(),
            c.color,
            c.icon,
            c.cycle_length,
            c.daily_goal,
            counter.today.day.to_string(),
            to_sql_count(counter.today.raw)?,
            counter.today.manual_delta,
            counter.created_at,
            counter.updated_at,
        ],
    )?;
    Ok(())
}

fn insert_history_on(conn: &Connection, entry: &HistoryEntry) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO history (counter_id, day, maalas, raw, goal_achieved)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.counter_id.to_string(),
            entry.day.to_string(),
            to_sql_count(entry.maalas)?,
            to_sql_count(entry.raw)?,
            entry.goal_achieved as i32,
        ],
    )?;
    Ok(())
}

fn save_milestones_on(
    conn: &Connection,
    counter_id: Uuid,
    states: &[MilestoneState],
) -> Result<()> {
    let id = counter_id.to_string();
    conn.execute("DELETE FROM milestones WHERE counter_id = ?1", [&id])?;
    let mut stmt = conn.prepare(
        "INSERT INTO milestones (counter_id, days, achieved_at) VALUES (?1, ?2, ?3)",
    )?;
    for state in states {
        stmt.execute(params![id, state.days, state.achieved_at])?;
    }
    Ok(())
}

/// Raw column values of one `counters` row.
struct CounterRow {
    id: String,
    name: String,
    mantra: Option<String>,
    category: String,
    color: String,
    icon: String,
    cycle_length: u32,
    daily_goal: u32,
    tally_day: String,
    tally_raw: i64,
    tally_delta: i64,
    created_at: String,
    updated_at: String,
}

impl CounterRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            mantra: row.get(2)?,
            category: row.get(3)?,
            color: row.get(4)?,
            icon: row.get(5)?,
            cycle_length: row.get(6)?,
            daily_goal: row.get(7)?,
            tally_day: row.get(8)?,
            tally_raw: row.get(9)?,
            tally_delta: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_counter(self) -> Result<Counter> {
        let category: Category = self.category.parse()?;
        Ok(Counter {
            id: parse_uuid(&self.id)?,
            config: CounterConfig {
                name: self.name,
                mantra: self.mantra,
                category,
                color: self.color,
                icon: self.icon,
                cycle_length: self.cycle_length,
                daily_goal: self.daily_goal,
            },
            today: DayTally {
                day: parse_day(&self.tally_day)?,
                raw: from_sql_count(self.tally_raw)?,
                manual_delta: self.tally_delta,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

struct HistoryRow {
    counter_id: String,
    day: String,
    maalas: i64,
    raw: i64,
    goal_achieved: bool,
}

impl HistoryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            counter_id: row.get(0)?,
            day: row.get(1)?,
            maalas: row.get(2)?,
            raw: row.get(3)?,
            goal_achieved: row.get::<_, i32>(4)? != 0,
        })
    }

    fn into_entry(self) -> Result<HistoryEntry> {
        Ok(HistoryEntry {
            counter_id: parse_uuid(&self.counter_id)?,
            day: parse_day(&self.day)?,
            maalas: from_sql_count(self.maalas)?,
            raw: from_sql_count(self.raw)?,
            goal_achieved: self.goal_achieved,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}

fn parse_day(s: &str) -> Result<DayKey> {
    DayKey::parse(s).map_err(|e| StoreError::InvalidData(e.to_string()))
}

/// SQLite integers are signed; counts above `i64::MAX` are rejected.
fn to_sql_count(n: u64) -> Result<i64> {
    i64::try_from(n).map_err(|_| StoreError::InvalidData(format!("count {n} too large to store")))
}

fn from_sql_count(n: i64) -> Result<u64> {
    u64::try_from(n).map_err(|_| StoreError::InvalidData(format!("negative count {n}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn make_counter(name: &str) -> Counter {
        let config = CounterConfig {
            mantra: Some("Om Namah Shivaya".into()),
            category: Category::Japa,
            cycle_length: 54,
            ..CounterConfig::new(name)
        };
        Counter::new(config, day("2026-10-19")).unwrap()
    }

    fn entry(counter: &Counter, d: DayKey, maalas: u64) -> HistoryEntry {
        HistoryEntry {
            counter_id: counter.id,
            day: d,
            maalas,
            raw: maalas * 54,
            goal_achieved: maalas >= 3,
        }
    }

    #[test]
    fn test_insert_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let mut counter = make_counter("Shiva");
        counter.tap(60);
        counter.adjust(2);

        store.insert_counter(&counter).unwrap();
        let loaded = store.load_counter(counter.id).unwrap().unwrap();
        assert_eq!(loaded, counter);
        assert_eq!(loaded.maalas_today(), 3);
    }

    #[test]
    fn test_insert_duplicate_name_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.insert_counter(&make_counter("Shiva")).unwrap();
        let err = store.insert_counter(&make_counter("SHIVA")).unwrap_err();
        assert!(err.to_string().contains("already exists"), "got: {err}");
    }

    #[test]
    fn test_insert_invalid_config_rejected() {
        let store = Store::open_in_memory().unwrap();
        let mut counter = make_counter("Shiva");
        counter.config.cycle_length = 0;
        assert!(matches!(
            store.insert_counter(&counter),
            Err(StoreError::Counter(_))
        ));
    }

    #[test]
    fn test_save_counter_updates_tally() {
        let store = Store::open_in_memory().unwrap();
        let mut counter = make_counter("Shiva");
        store.insert_counter(&counter).unwrap();

        counter.tap(108);
        store.save_counter(&counter).unwrap();

        let loaded = store.load_counter(counter.id).unwrap().unwrap();
        assert_eq!(loaded.today.raw, 108);
        assert_eq!(loaded.maalas_today(), 2);
    }

    #[test]
    fn test_save_missing_counter() {
        let store = Store::open_in_memory().unwrap();
        let result = store.save_counter(&make_counter("ghost"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_find_by_name_and_prefix() {
        let store = Store::open_in_memory().unwrap();
        let counter = make_counter("Gayatri Mantra");
        store.insert_counter(&counter).unwrap();

        let by_name = store.find_counter("gayatri mantra").unwrap().unwrap();
        assert_eq!(by_name.id, counter.id);

        let prefix = &counter.id.to_string()[..8];
        let by_prefix = store.find_counter(prefix).unwrap().unwrap();
        assert_eq!(by_prefix.id, counter.id);

        assert!(store.find_counter("nobody").unwrap().is_none());
    }

    #[test]
    fn test_list_counters_in_creation_order() {
        let store = Store::open_in_memory().unwrap();
        for name in ["a", "b", "c"] {
            store.insert_counter(&make_counter(name)).unwrap();
        }
        let names: Vec<String> = store
            .list_counters()
            .unwrap()
            .into_iter()
            .map(|c| c.config.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_cascades() {
        let store = Store::open_in_memory().unwrap();
        let counter = make_counter("Shiva");
        store.insert_counter(&counter).unwrap();
        store.set_active_counter(Some(counter.id)).unwrap();
        store.record_history(&entry(&counter, day("2026-10-18"), 3)).unwrap();
        store
            .save_milestones(
                counter.id,
                &[MilestoneState {
                    days: 1,
                    achieved_at: Some("t".into()),
                }],
            )
            .unwrap();

        assert!(store.delete_counter(counter.id).unwrap());
        assert!(store.load_counter(counter.id).unwrap().is_none());
        assert!(store.history(counter.id, None).unwrap().is_empty());
        assert!(store.milestones(counter.id).unwrap().is_empty());
        assert_eq!(store.active_counter().unwrap(), None);
        assert!(!store.delete_counter(counter.id).unwrap());
    }

    #[test]
    fn test_record_history_upserts_by_day() {
        let store = Store::open_in_memory().unwrap();
        let counter = make_counter("Shiva");
        store.insert_counter(&counter).unwrap();

        store.record_history(&entry(&counter, day("2026-10-18"), 1)).unwrap();
        store.record_history(&entry(&counter, day("2026-10-18"), 4)).unwrap();
        store.record_history(&entry(&counter, day("2026-10-17"), 2)).unwrap();

        let history = store.history(counter.id, None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].day, day("2026-10-18"));
        assert_eq!(history[0].maalas, 4);
        assert!(history[0].goal_achieved);

        let limited = store.history(counter.id, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_record_history_prunes_oldest() {
        let store = Store::open_in_memory().unwrap();
        let counter = make_counter("Shiva");
        store.insert_counter(&counter).unwrap();

        let mut d = day("2025-01-01");
        for _ in 0..(MAX_HISTORY_ENTRIES + 3) {
            store.record_history(&entry(&counter, d, 1)).unwrap();
            d = d.succ();
        }

        let history = store.history(counter.id, None).unwrap();
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.last().unwrap().day, day("2025-01-04"));
    }

    #[test]
    fn test_milestones_replace() {
        let store = Store::open_in_memory().unwrap();
        let counter = make_counter("Shiva");
        store.insert_counter(&counter).unwrap();

        let states = vec![
            MilestoneState { days: 1, achieved_at: Some("t1".into()) },
            MilestoneState { days: 3, achieved_at: None },
        ];
        store.save_milestones(counter.id, &states).unwrap();
        assert_eq!(store.milestones(counter.id).unwrap(), states);

        store.save_milestones(counter.id, &states[..1]).unwrap();
        assert_eq!(store.milestones(counter.id).unwrap().len(), 1);
    }

    #[test]
    fn test_metadata() {
        let store = Store::open_in_memory().unwrap();

        assert!(store.get_metadata("foo").unwrap().is_none());

        store.set_metadata("foo", "bar").unwrap();
        assert_eq!(store.get_metadata("foo").unwrap(), Some("bar".to_string()));

        store.set_metadata("foo", "baz").unwrap();
        assert_eq!(store.get_metadata("foo").unwrap(), Some("baz".to_string()));
    }

    #[test]
    fn test_active_counter() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.active_counter().unwrap(), None);
        let id = Uuid::new_v4();
        store.set_active_counter(Some(id)).unwrap();
        assert_eq!(store.active_counter().unwrap(), Some(id));
        store.set_active_counter(None).unwrap();
        assert_eq!(store.active_counter().unwrap(), None);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let source = Store::open_in_memory().unwrap();
        let mut counter = make_counter("Shiva");
        counter.tap(77);
        source.insert_counter(&counter).unwrap();
        source.record_history(&entry(&counter, day("2026-10-18"), 3)).unwrap();
        source
            .save_milestones(
                counter.id,
                &[MilestoneState {
                    days: 1,
                    achieved_at: Some("t".into()),
                }],
            )
            .unwrap();

        let snapshot = source.snapshot().unwrap();

        let target = Store::open_in_memory().unwrap();
        target.insert_counter(&make_counter("to be replaced")).unwrap();
        target.restore(&snapshot).unwrap();

        let counters = target.list_counters().unwrap();
        assert_eq!(counters, vec![counter.clone()]);
        assert_eq!(target.history(counter.id, None).unwrap().len(), 1);
        assert_eq!(target.milestones(counter.id).unwrap().len(), 1);
        assert_eq!(target.active_counter().unwrap(), Some(counter.id));
    }
}
