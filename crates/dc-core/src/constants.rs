/// Traditional maala length: 108 beads.
pub const DEFAULT_CYCLE_LENGTH: u32 = 108;

/// Smallest cycle a counter may be configured with.
pub const MIN_CYCLE_LENGTH: u32 = 1;

/// Largest cycle a counter may be configured with.
pub const MAX_CYCLE_LENGTH: u32 = 1000;

/// Default daily goal, in completed maalas.
pub const DEFAULT_DAILY_GOAL: u32 = 3;

/// Default counter colour (gold).
pub const DEFAULT_COLOR: &str = "#D4AF37";

/// Default counter icon.
pub const DEFAULT_ICON: &str = "lotus";

/// History entries retained per counter (one year of daily records).
pub const MAX_HISTORY_ENTRIES: usize = 365;

/// Upper bound of `progress_percent`.
pub const PERCENT_MAX: u8 = 100;

/// Cycle presets offered when creating a counter: (length, label).
pub const CYCLE_PRESETS: [(u32, &str); 4] = [
    (108, "Traditional"),
    (54, "Half"),
    (27, "Quarter"),
    (21, "Short"),
];
