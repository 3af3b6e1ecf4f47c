use rusqlite::{OptionalExtension, params};

use dc_core::{DailyOverride, DayKey, MalaPlan, Weekday, WeeklySchedule};

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// The weekly schedule; days never saved keep their default plan.
    pub fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        let mut schedule = WeeklySchedule::default();
        let mut stmt = self
            .conn()
            .prepare("SELECT weekday, theme_id, mantra_id, beads FROM weekly_plan")?;
        let rows: Vec<(String, MalaPlan)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    MalaPlan {
                        theme_id: row.get(1)?,
                        mantra_id: row.get(2)?,
                        beads: row.get(3)?,
                    },
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        for (weekday, plan) in rows {
            let weekday: Weekday = weekday.parse()?;
            match plan.validate() {
                Ok(()) => schedule.set(weekday, plan),
                Err(e) => tracing::warn!(%weekday, "ignoring stored plan: {e}"),
            }
        }
        Ok(schedule)
    }

    pub fn save_day_plan(&self, weekday: Weekday, plan: &MalaPlan) -> Result<()> {
        plan.validate()?;
        self.conn().execute(
            "INSERT OR REPLACE INTO weekly_plan (weekday, theme_id, mantra_id, beads)
             VALUES (?1, ?2, ?3, ?4)",
            params![weekday.as_str(), plan.theme_id, plan.mantra_id, plan.beads],
        )?;
        Ok(())
    }

    /// Drop every saved day, returning to the default schedule.
    pub fn reset_weekly_schedule(&self) -> Result<()> {
        self.conn().execute("DELETE FROM weekly_plan", [])?;
        Ok(())
    }

    pub fn daily_override(&self) -> Result<Option<DailyOverride>> {
        let row = self
            .conn()
            .query_row(
                "SELECT day, theme_id, mantra_id, beads FROM plan_override WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        MalaPlan {
                            theme_id: row.get(1)?,
                            mantra_id: row.get(2)?,
                            beads: row.get(3)?,
                        },
                    ))
                },
            )
            .optional()?;
        row.map(|(day, plan)| {
            let day = DayKey::parse(&day).map_err(|e| StoreError::InvalidData(e.to_string()))?;
            Ok(DailyOverride { day, plan })
        })
        .transpose()
    }

    /// Replace (or with `None`, clear) the daily override.
    pub fn set_daily_override(&self, daily_override: Option<&DailyOverride>) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute("DELETE FROM plan_override", [])?;
        if let Some(o) = daily_override {
            o.plan.validate()?;
            tx.execute(
                "INSERT INTO plan_override (id, day, theme_id, mantra_id, beads)
                 VALUES (1, ?1, ?2, ?3, ?4)",
                params![o.day.to_string(), o.plan.theme_id, o.plan.mantra_id, o.plan.beads],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
