//! Daily streaks, streak milestones and the rewards they unlock.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::counter::HistoryEntry;
use crate::time::DayKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive goal days ending today.
    pub current: u32,
    /// Longest run of consecutive goal days ever recorded.
    pub longest: u32,
}

/// Compute streaks from closed days plus today's live progress.
///
/// A streak is only current if it includes `today`: a goal met yesterday
/// but not yet today gives `current == 0`.
pub fn streaks(history: &[HistoryEntry], today: DayKey, today_goal_met: bool) -> StreakSummary {
    let mut achieved: BTreeSet<DayKey> = history
        .iter()
        .filter(|e| e.goal_achieved)
        .map(|e| e.day)
        .collect();
    if today_goal_met {
        achieved.insert(today);
    }

    let mut current = 0u32;
    let mut cursor = today;
    while achieved.contains(&cursor) {
        current += 1;
        cursor = cursor.pred();
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<DayKey> = None;
    for &day in &achieved {
        run = match previous {
            Some(p) if p.days_until(day) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    StreakSummary {
        current,
        longest: longest.max(current),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub days: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const MILESTONES: [Milestone; 7] = [
    Milestone {
        days: 1,
        name: "First Spark",
        description: "Your journey begins with a single day.",
        icon: "✨",
    },
    Milestone {
        days: 3,
        name: "Early Momentum",
        description: "Three days of focused practice.",
        icon: "🌱",
    },
    Milestone {
        days: 7,
        name: "Weekly Warrior",
        description: "A full week of dedication!",
        icon: "🔥",
    },
    Milestone {
        days: 21,
        name: "Steady Bloom",
        description: "Three weeks of steady growth.",
        icon: "🌿",
    },
    Milestone {
        days: 30,
        name: "Monthly Master",
        description: "One month of unwavering focus.",
        icon: "🏆",
    },
    Milestone {
        days: 60,
        name: "Seasoned Seeker",
        description: "Two months of radiant practice.",
        icon: "🧘",
    },
    Milestone {
        days: 108,
        name: "The Great Cycle",
        description: "108 days, a complete circle of dedication.",
        icon: "🌟",
    },
];

pub fn milestone(days: u32) -> Option<&'static Milestone> {
    MILESTONES.iter().find(|m| m.days == days)
}

/// Persisted achievement state of one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneState {
    pub days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<String>,
}

impl MilestoneState {
    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneUpdate {
    /// One state per entry of `MILESTONES`, in the same order.
    pub milestones: Vec<MilestoneState>,
    /// Day thresholds achieved by this update and not before.
    pub newly_achieved: Vec<u32>,
}

/// Re-evaluate milestones against the longest streak.
///
/// Previously achieved milestones keep their timestamp. A milestone whose
/// threshold is no longer met is cleared.
pub fn update_milestones(existing: &[MilestoneState], longest: u32, now: &str) -> MilestoneUpdate {
    let previous: HashMap<u32, &MilestoneState> = existing.iter().map(|m| (m.days, m)).collect();
    let mut newly_achieved = Vec::new();

    let milestones = MILESTONES
        .iter()
        .map(|base| {
            let prior = previous.get(&base.days).and_then(|m| m.achieved_at.clone());
            let achieved_at = if longest >= base.days {
                prior.or_else(|| {
                    newly_achieved.push(base.days);
                    Some(now.to_string())
                })
            } else {
                None
            };
            MilestoneState {
                days: base.days,
                achieved_at,
            }
        })
        .collect();

    MilestoneUpdate {
        milestones,
        newly_achieved,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    ColorTheme,
    SacredSymbol,
    BackgroundPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: RewardKind,
    /// Streak length that unlocks the reward.
    pub streak_days: u32,
    pub icon: &'static str,
}

const fn reward(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    kind: RewardKind,
    streak_days: u32,
    icon: &'static str,
) -> Reward {
    Reward {
        id,
        name,
        description,
        kind,
        streak_days,
        icon,
    }
}

#[rustfmt::skip]
pub const REWARDS: [Reward; 14] = [
    reward("sunset_theme", "Sunset Meditation", "Warm orange and purple gradients", RewardKind::ColorTheme, 3, "🌅"),
    reward("ocean_theme", "Ocean Depths", "Deep blue and teal serenity", RewardKind::ColorTheme, 7, "🌊"),
    reward("forest_theme", "Forest Sanctuary", "Natural green and earth tones", RewardKind::ColorTheme, 14, "🌲"),
    reward("cosmic_theme", "Cosmic Journey", "Deep purple and starry night", RewardKind::ColorTheme, 30, "🌌"),
    reward("golden_theme", "Golden Enlightenment", "Luxurious gold and amber", RewardKind::ColorTheme, 60, "✨"),
    reward("diamond_theme", "Diamond Clarity", "Pure white and crystal clear", RewardKind::ColorTheme, 100, "💎"),
    reward("om_symbol", "Sacred Om", "The primordial sound of the universe", RewardKind::SacredSymbol, 7, "🕉"),
    reward("lotus_symbol", "Lotus Flower", "Symbol of spiritual awakening", RewardKind::SacredSymbol, 14, "🪷"),
    reward("yin_yang", "Yin Yang", "Balance and harmony", RewardKind::SacredSymbol, 30, "☯"),
    reward("mandala", "Sacred Mandala", "Cosmic order and unity", RewardKind::SacredSymbol, 60, "🌀"),
    reward("chakra", "Chakra Wheel", "Energy centers of the body", RewardKind::SacredSymbol, 100, "🔮"),
    reward("zen_pattern", "Zen Circles", "Minimalist circular patterns", RewardKind::BackgroundPattern, 14, "⭕"),
    reward("sacred_geometry", "Sacred Geometry", "Ancient geometric patterns", RewardKind::BackgroundPattern, 30, "🔷"),
    reward("cosmic_pattern", "Cosmic Patterns", "Starry constellation designs", RewardKind::BackgroundPattern, 60, "⭐"),
];

/// Rewards whose threshold is exactly `streak` days.
pub fn rewards_unlocked_at(streak: u32) -> Vec<&'static Reward> {
    REWARDS.iter().filter(|r| r.streak_days == streak).collect()
}

/// Every reward a streak of `streak` days has earned.
pub fn rewards_up_to(streak: u32) -> Vec<&'static Reward> {
    REWARDS.iter().filter(|r| r.streak_days <= streak).collect()
}
