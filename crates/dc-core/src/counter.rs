use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_COLOR, DEFAULT_CYCLE_LENGTH, DEFAULT_DAILY_GOAL, DEFAULT_ICON, MAX_CYCLE_LENGTH,
    MIN_CYCLE_LENGTH,
};
use crate::cycle::{Crossing, CycleProgress, boundary_crossing, derive_cycles};
use crate::time::{DayKey, now_iso8601};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    EmptyName,
    CycleLength(u32),
    DailyGoal(u32),
    Color(String),
    Category(String),
}

impl fmt::Display for CounterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterError::EmptyName => write!(f, "counter name must not be empty"),
            CounterError::CycleLength(n) => write!(
                f,
                "cycle length {n} out of range {MIN_CYCLE_LENGTH}-{MAX_CYCLE_LENGTH}"
            ),
            CounterError::DailyGoal(n) => write!(f, "daily goal {n} must be at least 1"),
            CounterError::Color(c) => write!(f, "invalid colour '{c}': expected #RRGGBB"),
            CounterError::Category(c) => write!(
                f,
                "unknown category '{c}': expected japa, pranayama, meditation or custom"
            ),
        }
    }
}

impl std::error::Error for CounterError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Japa,
    Pranayama,
    Meditation,
    Custom,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Japa => "japa",
            Category::Pranayama => "pranayama",
            Category::Meditation => "meditation",
            Category::Custom => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "japa" => Ok(Category::Japa),
            "pranayama" => Ok(Category::Pranayama),
            "meditation" => Ok(Category::Meditation),
            "custom" => Ok(Category::Custom),
            other => Err(CounterError::Category(other.to_string())),
        }
    }
}

/// User-facing settings of one counter profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mantra: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub color: String,
    pub icon: String,
    /// Taps per maala.
    pub cycle_length: u32,
    /// Maalas per day that count toward a streak.
    pub daily_goal: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            name: "Practice".to_string(),
            mantra: None,
            category: Category::default(),
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            cycle_length: DEFAULT_CYCLE_LENGTH,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

impl CounterConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CounterError> {
        if self.name.trim().is_empty() {
            return Err(CounterError::EmptyName);
        }
        if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&self.cycle_length) {
            return Err(CounterError::CycleLength(self.cycle_length));
        }
        if self.daily_goal == 0 {
            return Err(CounterError::DailyGoal(self.daily_goal));
        }
        if !HEX_COLOR.is_match(&self.color) {
            return Err(CounterError::Color(self.color.clone()));
        }
        Ok(())
    }
}

/// Taps and manual adjustment accumulated on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTally {
    pub day: DayKey,
    pub raw: u64,
    #[serde(default)]
    pub manual_delta: i64,
}

impl DayTally {
    pub fn empty(day: DayKey) -> Self {
        Self {
            day,
            raw: 0,
            manual_delta: 0,
        }
    }
}

/// One closed day of practice for one counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub counter_id: Uuid,
    pub day: DayKey,
    pub maalas: u64,
    pub raw: u64,
    pub goal_achieved: bool,
}

/// Result of moving the raw count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapOutcome {
    pub previous_raw: u64,
    pub raw: u64,
    pub crossing: Crossing,
    pub progress: CycleProgress,
}

impl TapOutcome {
    pub fn completed_cycle(&self) -> bool {
        self.crossing == Crossing::Upper
    }
}

/// A named counter and its progress for the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: Uuid,
    pub config: CounterConfig,
    pub today: DayTally,
    pub created_at: String,
    pub updated_at: String,
}

impl Counter {
    pub fn new(config: CounterConfig, today: DayKey) -> Result<Self, CounterError> {
        config.validate()?;
        let now = now_iso8601();
        Ok(Self {
            id: Uuid::new_v4(),
            config,
            today: DayTally::empty(today),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn cycle_length(&self) -> i64 {
        i64::from(self.config.cycle_length)
    }

    /// Add `n` taps.
    pub fn tap(&mut self, n: u64) -> TapOutcome {
        let next = self.today.raw.saturating_add(n);
        self.move_to(next)
    }

    /// Remove `n` taps, stopping at zero.
    pub fn undo(&mut self, n: u64) -> TapOutcome {
        let next = self.today.raw.saturating_sub(n);
        self.move_to(next)
    }

    /// Drop the partial cycle; completed maalas are kept.
    pub fn reset_count(&mut self) -> TapOutcome {
        let position = self.progress().position;
        let next = self.today.raw - position;
        self.move_to(next)
    }

    fn move_to(&mut self, next: u64) -> TapOutcome {
        let previous_raw = self.today.raw;
        self.today.raw = next;
        self.touch();
        TapOutcome {
            previous_raw,
            raw: next,
            crossing: boundary_crossing(previous_raw, next, self.cycle_length()),
            progress: self.progress(),
        }
    }

    /// Manually add (or remove) completed maalas. Returns today's maalas.
    ///
    /// The stored delta never goes below the amount that would cancel the
    /// maalas earned by taps, so later taps are never hidden by an excess
    /// negative adjustment.
    pub fn adjust(&mut self, delta: i64) -> u64 {
        let earned = derive_cycles(self.today.raw, 0, self.cycle_length());
        let floor = -(i64::try_from(earned).unwrap_or(i64::MAX));
        self.today.manual_delta = self.today.manual_delta.saturating_add(delta).max(floor);
        self.touch();
        self.maalas_today()
    }

    pub fn progress(&self) -> CycleProgress {
        CycleProgress::compute(self.today.raw, self.today.manual_delta, self.cycle_length())
    }

    pub fn maalas_today(&self) -> u64 {
        derive_cycles(self.today.raw, self.today.manual_delta, self.cycle_length())
    }

    pub fn goal_met(&self) -> bool {
        self.maalas_today() >= u64::from(self.config.daily_goal)
    }

    /// Close the tally if `today` is a later day.
    ///
    /// Returns the history entry for the closed day when any maala was
    /// completed on it. The tally restarts empty on `today`. A `today`
    /// earlier than the tally's day leaves the tally untouched.
    pub fn roll_over(&mut self, today: DayKey) -> Option<HistoryEntry> {
        if today <= self.today.day {
            return None;
        }
        let maalas = self.maalas_today();
        let entry = (maalas > 0).then(|| HistoryEntry {
            counter_id: self.id,
            day: self.today.day,
            maalas,
            raw: self.today.raw,
            goal_achieved: self.goal_met(),
        });
        self.today = DayTally::empty(today);
        self.touch();
        entry
    }

    fn touch(&mut self) {
        self.updated_at = now_iso8601();
    }
}
