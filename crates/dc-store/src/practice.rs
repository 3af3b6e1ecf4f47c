use std::path::{Path, PathBuf};
use std::{env, fs};

use dc_core::{
    Counter, CounterConfig, DailyOverride, DayKey, HistoryEntry, MalaPlan, REWARDS, Reward,
    StreakSummary, TodayPractice, now_iso8601, streaks, today_practice, update_milestones,
};

use crate::config::{CONFIG_FILE, Config};
use crate::error::{Result, StoreError};
use crate::store::Store;

/// File name of the SQLite database inside the data directory.
pub const DB_FILE: &str = "counters.db";

/// Default base directory for all counter data.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".divine-counter")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Streak figures after a change, with anything newly earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub streak: StreakSummary,
    /// Milestone thresholds (in days) reached by this change.
    pub new_milestones: Vec<u32>,
    pub new_rewards: Vec<&'static Reward>,
}

/// Counter store plus config, rooted in one data directory.
///
/// Layout:
/// ```text
/// ~/.divine-counter/
/// ├── config.toml
/// └── counters.db
/// ```
///
/// Every counter handed out by `resolve` has already been rolled over to
/// the current day, with the closed day written to history.
pub struct PracticeStore {
    store: Store,
    config: Config,
    pinned_today: Option<DayKey>,
}

impl PracticeStore {
    /// Open the store under `base_dir` (default `~/.divine-counter`), creating it as needed.
    pub fn open(base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        fs::create_dir_all(&base).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", base.display()))
        })?;

        let config = Config::load(&base.join(CONFIG_FILE))?;
        let store = Store::open(&base.join(DB_FILE))?;
        tracing::debug!("opened store at {}", base.display());

        Ok(Self {
            store,
            config,
            pinned_today: None,
        })
    }

    /// Open with an in-memory store (for testing).
    pub fn open_in_memory(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Store::open_in_memory()?,
            config,
            pinned_today: None,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fix the current day instead of reading the clock.
    pub fn pin_today(&mut self, day: DayKey) {
        self.pinned_today = Some(day);
    }

    pub fn today(&self) -> DayKey {
        self.pinned_today
            .unwrap_or_else(|| DayKey::today(self.config.utc_offset_minutes))
    }

    /// Config for a new counter named `name`, using the configured defaults.
    pub fn new_counter_config(&self, name: &str) -> CounterConfig {
        CounterConfig {
            cycle_length: self.config.default_cycle_length,
            daily_goal: self.config.default_daily_goal,
            ..CounterConfig::new(name)
        }
    }

    /// Create a counter and make it the active one.
    pub fn create_counter(&self, config: CounterConfig) -> Result<Counter> {
        let counter = Counter::new(config, self.today())?;
        self.store.insert_counter(&counter)?;
        self.store.set_active_counter(Some(counter.id))?;
        tracing::info!(name = counter.name(), id = %counter.id, "created counter");
        Ok(counter)
    }

    /// Find a counter by name or id prefix, or the active counter when `key` is None.
    pub fn resolve(&self, key: Option<&str>) -> Result<Counter> {
        let mut counter = match key {
            Some(key) => self
                .store
                .find_counter(key)?
                .ok_or_else(|| StoreError::NotFound(format!("counter '{key}'")))?,
            None => {
                let id = self.store.active_counter()?.ok_or_else(|| {
                    StoreError::NotFound("active counter (create one with `dc new`)".to_string())
                })?;
                self.store
                    .load_counter(id)?
                    .ok_or_else(|| StoreError::NotFound(format!("active counter {id}")))?
            }
        };
        self.open_day(&mut counter)?;
        Ok(counter)
    }

    /// Make `key` the active counter.
    pub fn activate(&self, key: &str) -> Result<Counter> {
        let counter = self.resolve(Some(key))?;
        self.store.set_active_counter(Some(counter.id))?;
        Ok(counter)
    }

    pub fn delete(&self, key: &str) -> Result<Counter> {
        let counter = self
            .store
            .find_counter(key)?
            .ok_or_else(|| StoreError::NotFound(format!("counter '{key}'")))?;
        self.store.delete_counter(counter.id)?;
        tracing::info!(name = counter.name(), "deleted counter");
        Ok(counter)
    }

    /// Roll the counter over to today, recording the closed day.
    pub fn open_day(&self, counter: &mut Counter) -> Result<Option<HistoryEntry>> {
        let today = self.today();
        if counter.today.day == today {
            return Ok(None);
        }
        if today < counter.today.day {
            // clock or offset moved back: keep counting on the tally's day
            tracing::warn!(
                counter = counter.name(),
                tally_day = %counter.today.day,
                %today,
                "current day is before the open tally, not rolling over"
            );
            return Ok(None);
        }
        let closed = counter.roll_over(today);
        if let Some(entry) = &closed {
            self.store.record_history(entry)?;
            tracing::info!(
                counter = counter.name(),
                day = %entry.day,
                maalas = entry.maalas,
                "closed day"
            );
        }
        // the tally restarted even when nothing was recorded
        self.store.save_counter(counter)?;
        Ok(closed)
    }

    /// Streaks from history plus the live progress of the open tally.
    pub fn streak(&self, counter: &Counter) -> Result<StreakSummary> {
        let history = self.store.history(counter.id, None)?;
        Ok(streaks(&history, counter.today.day, counter.goal_met()))
    }

    /// Save the counter and re-evaluate milestones and rewards.
    pub fn commit(&self, counter: &Counter) -> Result<Standing> {
        self.store.save_counter(counter)?;

        let streak = self.streak(counter)?;
        let existing = self.store.milestones(counter.id)?;
        let update = update_milestones(&existing, streak.longest, &now_iso8601());
        if update.milestones != existing {
            self.store.save_milestones(counter.id, &update.milestones)?;
        }

        let announced = self.store.announced_streak(counter.id)?;
        let new_rewards = REWARDS
            .iter()
            .filter(|r| r.streak_days > announced && r.streak_days <= streak.longest)
            .collect();
        if streak.longest > announced {
            self.store.set_announced_streak(counter.id, streak.longest)?;
        }

        for days in &update.newly_achieved {
            tracing::info!(counter = counter.name(), days, "milestone achieved");
        }

        Ok(Standing {
            streak,
            new_milestones: update.newly_achieved,
            new_rewards,
        })
    }

    /// Today's planned practice. An override left from an earlier day is dropped.
    pub fn today_practice(&self) -> Result<TodayPractice> {
        let today = self.today();
        let mut daily_override = self.store.daily_override()?;
        if daily_override.as_ref().is_some_and(|o| o.day < today) {
            tracing::debug!("clearing expired plan override");
            self.store.set_daily_override(None)?;
            daily_override = None;
        }
        let schedule = self.store.weekly_schedule()?;
        Ok(today_practice(&schedule, daily_override.as_ref(), today))
    }

    /// Practise `plan` instead of the schedule until the day ends.
    pub fn set_override(&self, plan: MalaPlan) -> Result<DailyOverride> {
        let daily_override = DailyOverride {
            day: self.today(),
            plan,
        };
        self.store.set_daily_override(Some(&daily_override))?;
        Ok(daily_override)
    }

    pub fn clear_override(&self) -> Result<()> {
        self.store.set_daily_override(None)
    }

    /// Activate the counter named after today's mantra, creating it if needed.
    pub fn start_today_plan(&self) -> Result<(TodayPractice, Counter)> {
        let practice = self.today_practice()?;
        let config = practice.plan.counter_config();
        let counter = if self.store.find_counter(&config.name)?.is_some() {
            self.activate(&config.name)?
        } else {
            self.create_counter(config)?
        };
        Ok((practice, counter))
    }
}
