//! Weekly practice planner: a mantra library grouped by theme, a plan per
//! weekday and a one-day override.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CYCLE_LENGTH, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH};
use crate::counter::CounterConfig;
use crate::time::DayKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    UnknownTheme(String),
    UnknownMantra(String),
    Beads(u32),
    Weekday(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::UnknownTheme(id) => write!(f, "unknown theme '{id}'"),
            PlanError::UnknownMantra(id) => write!(f, "unknown mantra '{id}'"),
            PlanError::Beads(n) => write!(
                f,
                "beads {n} out of range {MIN_CYCLE_LENGTH}-{MAX_CYCLE_LENGTH}"
            ),
            PlanError::Weekday(s) => write!(f, "unknown weekday '{s}'"),
        }
    }
}

impl std::error::Error for PlanError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn of(day: DayKey) -> Self {
        // 1970-01-01 was a Thursday
        let index = (day.epoch_days() + 4).rem_euclid(7);
        Self::ALL[index as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sun => "Sunday",
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = PlanError;

    /// Accepts the short form (`mon`) or the full name (`Monday`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == lower || d.name().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| PlanError::Weekday(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mantra {
    pub id: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub energy: &'static str,
    pub theme_id: &'static str,
}

pub const THEMES: [Theme; 7] = [
    Theme {
        id: "vitality",
        name: "Vitality",
        icon: "☀️",
        description: "Sunday focuses on vitality and renewal.",
    },
    Theme {
        id: "calm",
        name: "Calm Mind",
        icon: "🌊",
        description: "Monday focuses on mental calm and peace.",
    },
    Theme {
        id: "strength",
        name: "Strength",
        icon: "🔥",
        description: "Tuesday focuses on inner strength and resilience.",
    },
    Theme {
        id: "clarity",
        name: "Clarity",
        icon: "✨",
        description: "Wednesday focuses on mental clarity and insight.",
    },
    Theme {
        id: "wisdom",
        name: "Wisdom",
        icon: "🌟",
        description: "Thursday focuses on wisdom and understanding.",
    },
    Theme {
        id: "compassion",
        name: "Compassion",
        icon: "💚",
        description: "Friday focuses on compassion and kindness.",
    },
    Theme {
        id: "discipline",
        name: "Discipline",
        icon: "🎯",
        description: "Saturday focuses on discipline and dedication.",
    },
];

const fn mantra(
    id: &'static str,
    title: &'static str,
    text: &'static str,
    energy: &'static str,
    theme_id: &'static str,
) -> Mantra {
    Mantra {
        id,
        title,
        text,
        energy,
        theme_id,
    }
}

#[rustfmt::skip]
pub const MANTRAS: [Mantra; 21] = [
    mantra("om_radiant_source_namah", "Radiant Source", "Om Radiant Source Namah", "Focus Vitality", "vitality"),
    mantra("om_sunrise_energy_namah", "Sunrise Energy", "Om Sunrise Energy Namah", "Focus Vitality", "vitality"),
    mantra("om_living_light_namah", "Living Light", "Om Living Light Namah", "Focus Vitality", "vitality"),
    mantra("om_serenity_flow_namah", "Serenity Flow", "Om Serenity Flow Namah", "Focus Calm", "calm"),
    mantra("om_peace_within_namah", "Peace Within", "Om Peace Within Namah", "Focus Calm", "calm"),
    mantra("om_still_waters_namah", "Still Waters", "Om Still Waters Namah", "Focus Calm", "calm"),
    mantra("om_steady_heart_namah", "Steady Heart", "Om Steady Heart Namah", "Focus Strength", "strength"),
    mantra("om_inner_fortitude_namah", "Inner Fortitude", "Om Inner Fortitude Namah", "Focus Strength", "strength"),
    mantra("om_resilient_spirit_namah", "Resilient Spirit", "Om Resilient Spirit Namah", "Focus Strength", "strength"),
    mantra("om_clear_vision_namah", "Clear Vision", "Om Clear Vision Namah", "Focus Clarity", "clarity"),
    mantra("om_awakened_mind_namah", "Awakened Mind", "Om Awakened Mind Namah", "Focus Clarity", "clarity"),
    mantra("om_insight_flow_namah", "Insight Flow", "Om Insight Flow Namah", "Focus Clarity", "clarity"),
    mantra("om_guiding_light_namah", "Guiding Light", "Om Guiding Light Namah", "Focus Wisdom", "wisdom"),
    mantra("om_deep_knowing_namah", "Deep Knowing", "Om Deep Knowing Namah", "Focus Wisdom", "wisdom"),
    mantra("om_ancient_wisdom_namah", "Ancient Wisdom", "Om Ancient Wisdom Namah", "Focus Wisdom", "wisdom"),
    mantra("om_gentle_grace_namah", "Gentle Grace", "Om Gentle Grace Namah", "Focus Compassion", "compassion"),
    mantra("om_loving_kindness_namah", "Loving Kindness", "Om Loving Kindness Namah", "Focus Compassion", "compassion"),
    mantra("om_open_heart_namah", "Open Heart", "Om Open Heart Namah", "Focus Compassion", "compassion"),
    mantra("om_steadfast_path_namah", "Steadfast Path", "Om Steadfast Path Namah", "Focus Discipline", "discipline"),
    mantra("om_dedicated_practice_namah", "Dedicated Practice", "Om Dedicated Practice Namah", "Focus Discipline", "discipline"),
    mantra("om_commitment_namah", "Commitment", "Om Commitment Namah", "Focus Discipline", "discipline"),
];

pub fn theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

pub fn find_mantra(id: &str) -> Option<&'static Mantra> {
    MANTRAS.iter().find(|m| m.id == id)
}

pub fn mantras_for_theme(theme_id: &str) -> Vec<&'static Mantra> {
    MANTRAS.iter().filter(|m| m.theme_id == theme_id).collect()
}

/// What to practise on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalaPlan {
    pub theme_id: String,
    pub mantra_id: String,
    pub beads: u32,
}

impl MalaPlan {
    /// Plan for `mantra_id` under the mantra's own theme.
    pub fn for_mantra(mantra_id: &str, beads: u32) -> Result<Self, PlanError> {
        let m = find_mantra(mantra_id).ok_or_else(|| PlanError::UnknownMantra(mantra_id.into()))?;
        let plan = Self {
            theme_id: m.theme_id.to_string(),
            mantra_id: m.id.to_string(),
            beads,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if theme(&self.theme_id).is_none() {
            return Err(PlanError::UnknownTheme(self.theme_id.clone()));
        }
        if find_mantra(&self.mantra_id).is_none() {
            return Err(PlanError::UnknownMantra(self.mantra_id.clone()));
        }
        if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&self.beads) {
            return Err(PlanError::Beads(self.beads));
        }
        Ok(())
    }

    pub fn mantra(&self) -> Option<&'static Mantra> {
        find_mantra(&self.mantra_id)
    }

    pub fn theme(&self) -> Option<&'static Theme> {
        theme(&self.theme_id)
    }

    /// Counter settings for practising this plan: one maala of `beads` a day.
    pub fn counter_config(&self) -> CounterConfig {
        let mut config = CounterConfig::new("Daily Practice");
        if let Some(m) = self.mantra() {
            config.name = m.title.to_string();
            config.mantra = Some(m.text.to_string());
        }
        config.cycle_length = self.beads;
        config.daily_goal = 1;
        config
    }
}

/// One plan per weekday, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [MalaPlan; 7],
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        const DEFAULT_MANTRAS: [&str; 7] = [
            "om_radiant_source_namah",
            "om_serenity_flow_namah",
            "om_steady_heart_namah",
            "om_clear_vision_namah",
            "om_guiding_light_namah",
            "om_gentle_grace_namah",
            "om_steadfast_path_namah",
        ];
        let days = DEFAULT_MANTRAS.map(|id| {
            let theme_id = find_mantra(id).map(|m| m.theme_id).unwrap_or_default();
            MalaPlan {
                theme_id: theme_id.to_string(),
                mantra_id: id.to_string(),
                beads: DEFAULT_CYCLE_LENGTH,
            }
        });
        Self { days }
    }
}

impl WeeklySchedule {
    pub fn get(&self, day: Weekday) -> &MalaPlan {
        &self.days[day.index()]
    }

    pub fn set(&mut self, day: Weekday, plan: MalaPlan) {
        self.days[day.index()] = plan;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &MalaPlan)> {
        Weekday::ALL.into_iter().zip(self.days.iter())
    }
}

/// A plan that replaces the schedule for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOverride {
    pub day: DayKey,
    pub plan: MalaPlan,
}

impl DailyOverride {
    /// Overrides lapse once their day has passed.
    pub fn is_active(&self, today: DayKey) -> bool {
        self.day == today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Schedule,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayPractice {
    pub weekday: Weekday,
    pub source: PlanSource,
    pub plan: MalaPlan,
}

/// Today's plan: an active override wins over the weekly schedule.
pub fn today_practice(
    schedule: &WeeklySchedule,
    daily_override: Option<&DailyOverride>,
    today: DayKey,
) -> TodayPractice {
    let weekday = Weekday::of(today);
    match daily_override.filter(|o| o.is_active(today)) {
        Some(o) => TodayPractice {
            weekday,
            source: PlanSource::Override,
            plan: o.plan.clone(),
        },
        None => TodayPractice {
            weekday,
            source: PlanSource::Schedule,
            plan: schedule.get(weekday).clone(),
        },
    }
}
