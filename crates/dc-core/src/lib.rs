//! Divine Counter core: cycle arithmetic and the practice model.
//!
//! Maps a raw tap count onto completed maalas (cycles of, traditionally,
//! 108 taps), detects boundary crossings in both directions and derives the
//! per-day progress, streak and milestone figures built on top of them.
//!
//! Zero I/O: persistence and presentation live in other crates.

pub mod constants;
pub mod counter;
pub mod cycle;
pub mod plan;
pub mod snapshot;
pub mod streak;
pub mod time;

pub use constants::{
    CYCLE_PRESETS, DEFAULT_CYCLE_LENGTH, DEFAULT_DAILY_GOAL, MAX_CYCLE_LENGTH,
    MAX_HISTORY_ENTRIES, MIN_CYCLE_LENGTH,
};
pub use counter::{
    Category, Counter, CounterConfig, CounterError, DayTally, HistoryEntry, TapOutcome,
};
pub use cycle::{
    Crossing, CycleProgress, boundary_crossing, crossed_lower_boundary, crossed_upper_boundary,
    derive_cycles, progress_percent, taps_until_next_boundary,
};
pub use plan::{
    DailyOverride, MANTRAS, MalaPlan, Mantra, PlanError, PlanSource, THEMES, Theme, TodayPractice,
    Weekday, WeeklySchedule, find_mantra, mantras_for_theme, theme, today_practice,
};
pub use snapshot::{
    CURRENT_VERSION, Snapshot, SnapshotError, cap_history, export_json, import_json,
};
pub use streak::{
    MILESTONES, Milestone, MilestoneState, MilestoneUpdate, REWARDS, Reward, RewardKind,
    StreakSummary, milestone, rewards_unlocked_at, rewards_up_to, streaks, update_milestones,
};
pub use time::{DayKey, DayKeyError, now_iso8601, now_unix_secs, unix_to_iso8601};
