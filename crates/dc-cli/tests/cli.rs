//! CLI command integration tests.
//! Each test uses a temp directory via DC_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dc_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("dc").unwrap();
    cmd.env("DC_DATA_DIR", data_dir.path());
    cmd.env_remove("DC_TODAY");
    cmd
}

/// Command pinned to a calendar day.
fn dc_on(data_dir: &TempDir, day: &str) -> Command {
    let mut cmd = dc_cmd(data_dir);
    cmd.env("DC_TODAY", day);
    cmd
}

#[test]
fn list_fresh_db() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no counters)"));
}

#[test]
fn new_then_status() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["new", "Gayatri", "--goal", "2", "--mantra", "Om Bhur Bhuva Swaha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created Gayatri (cycle 108, goal 2)"));

    dc_cmd(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("counter:    Gayatri"))
        .stdout(predicate::str::contains("mantra:     Om Bhur Bhuva Swaha"))
        .stdout(predicate::str::contains("maalas:     0 / 2"))
        .stdout(predicate::str::contains("remaining:  108"));
}

#[test]
fn tap_across_boundary_and_undo() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["new", "Short", "--cycle", "27", "--goal", "1"])
        .assert()
        .success();

    dc_cmd(&dir)
        .args(["tap", "-n", "26"])
        .assert()
        .success()
        .stdout(predicate::str::contains("26/27 in cycle (96%), 1 to next"))
        .stdout(predicate::str::contains("cycle complete").not());

    dc_cmd(&dir)
        .arg("tap")
        .assert()
        .success()
        .stdout(predicate::str::contains("cycle complete: maala 1"))
        .stdout(predicate::str::contains("daily goal reached"))
        .stdout(predicate::str::contains("milestone reached"))
        .stdout(predicate::str::contains("First Spark"));

    dc_cmd(&dir)
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("cycle undone"))
        .stdout(predicate::str::contains("0 / 1 maalas today"));
}

#[test]
fn adjust_accepts_negative_delta() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir).args(["new", "Japa"]).assert().success();

    dc_cmd(&dir)
        .args(["adjust", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("adjusted Japa: 3 maalas today"));

    dc_cmd(&dir)
        .args(["adjust", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("adjusted Japa: 0 maalas today"));
}

#[test]
fn reset_keeps_completed_maalas() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["new", "Short", "--cycle", "27"])
        .assert()
        .success();
    dc_cmd(&dir).args(["tap", "-n", "30"]).assert().success();

    dc_cmd(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropped 3 taps, 1 maalas kept"));
}

#[test]
fn use_and_counter_flag_select_counters() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir).args(["new", "Gayatri"]).assert().success();
    dc_cmd(&dir).args(["new", "Shiva"]).assert().success();

    // the newest counter is active
    dc_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("* Shiva"))
        .stdout(predicate::str::contains("  Gayatri"));

    dc_cmd(&dir)
        .args(["use", "gayatri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active counter: Gayatri"));

    dc_cmd(&dir)
        .args(["tap", "-n", "5", "--counter", "Shiva"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shiva: 5 taps"));

    dc_cmd(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("counter:    Gayatri"))
        .stdout(predicate::str::contains("taps:       0"));
}

#[test]
fn day_change_records_history() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-18")
        .args(["new", "Short", "--cycle", "27", "--goal", "1"])
        .assert()
        .success();
    dc_on(&dir, "2026-10-18")
        .args(["tap", "-n", "60"])
        .assert()
        .success();

    dc_on(&dir, "2026-10-19")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("day:        2026-10-19"))
        .stdout(predicate::str::contains("taps:       0"))
        .stdout(predicate::str::contains("streak:     current 0, longest 1"));

    dc_on(&dir, "2026-10-19")
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-10-18"))
        .stdout(predicate::str::contains("2 maalas"))
        .stdout(predicate::str::contains("goal met"));
}

#[test]
fn streak_over_three_days() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-17")
        .args(["new", "Short", "--cycle", "21", "--goal", "1"])
        .assert()
        .success();

    for day in ["2026-10-17", "2026-10-18"] {
        dc_on(&dir, day).args(["tap", "-n", "21"]).assert().success();
    }
    dc_on(&dir, "2026-10-19")
        .args(["tap", "-n", "21"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Early Momentum"))
        .stdout(predicate::str::contains("reward unlocked"))
        .stdout(predicate::str::contains("Sunset Meditation"));

    dc_on(&dir, "2026-10-19")
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("current: 3 days"))
        .stdout(predicate::str::contains("longest: 3 days"))
        .stdout(predicate::str::contains("[x]   3 days"))
        .stdout(predicate::str::contains("[ ]   7 days"))
        .stdout(predicate::str::contains("Sunset Meditation"))
        // announced once, listed afterwards
        .stdout(predicate::str::contains("reward unlocked").not());
}

#[test]
fn history_empty_counter() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir).args(["new", "Fresh"]).assert().success();
    dc_cmd(&dir)
        .args(["history", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no history)"));
}

#[test]
fn history_reports_milestones_reached_on_load() {
    let dir = TempDir::new().unwrap();
    let id = "0b7e3c1a-5d2f-4c8e-9a61-3f2d7e4b8c10";
    // two goal days but no milestone state yet
    let json = format!(
        r##"{{
  "version": "1",
  "counters": [{{
    "id": "{id}",
    "config": {{ "name": "Imported", "color": "#D4AF37", "icon": "lotus",
                 "cycleLength": 21, "dailyGoal": 1 }},
    "today": {{ "day": "2026-10-19", "raw": 0 }},
    "createdAt": "2026-10-17T06:00:00Z",
    "updatedAt": "2026-10-18T06:00:00Z"
  }}],
  "history": [
    {{ "counterId": "{id}", "day": "2026-10-17", "maalas": 1, "raw": 21, "goalAchieved": true }},
    {{ "counterId": "{id}", "day": "2026-10-18", "maalas": 1, "raw": 21, "goalAchieved": true }}
  ]
}}"##
    );
    let path = dir.path().join("import.json");
    std::fs::write(&path, json).unwrap();
    dc_on(&dir, "2026-10-19").arg("import").arg(&path).assert().success();

    dc_on(&dir, "2026-10-19")
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-10-18"))
        .stdout(predicate::str::contains("milestone reached"))
        .stdout(predicate::str::contains("First Spark"))
        .stdout(predicate::str::contains("reward unlocked").not());
}

#[test]
fn delete_counter() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir).args(["new", "Gone"]).assert().success();
    dc_cmd(&dir)
        .args(["delete", "gone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted Gone"));
    dc_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no counters)"));
}

#[test]
fn export_import_roundtrip() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["new", "Gayatri", "--cycle", "54"])
        .assert()
        .success();
    dc_cmd(&dir).args(["tap", "-n", "60"]).assert().success();

    let export_path = dir.path().join("export.json");
    dc_cmd(&dir)
        .arg("export")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported to"));
    assert!(export_path.exists(), "export file should exist");

    let other = TempDir::new().unwrap();
    dc_cmd(&other)
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("counters=1"));

    dc_cmd(&other)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("counter:    Gayatri"))
        .stdout(predicate::str::contains("taps:       60"))
        .stdout(predicate::str::contains("cycle:      6/54 (11%)"));
}

#[test]
fn config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "default_cycle_length = 54\ndefault_daily_goal = 5\n",
    )
    .unwrap();

    dc_cmd(&dir)
        .args(["new", "Half"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cycle 54, goal 5"));
}

#[test]
fn tap_without_counter_fails() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .arg("tap")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load counter"));
}

#[test]
fn new_rejects_out_of_range_cycle() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["new", "Bad", "--cycle", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create counter"));
}

#[test]
fn invalid_pinned_day_fails() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "19-10-2026")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid DC_TODAY"));
}

#[test]
fn plan_defaults_to_weekday_theme() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-19")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday: Serenity Flow (Calm Mind, 108 beads)"))
        .stdout(predicate::str::contains("mantra: Om Serenity Flow Namah"));

    dc_on(&dir, "2026-10-19")
        .args(["plan", "week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Monday"))
        .stdout(predicate::str::contains("Sunday     Radiant Source"));
}

#[test]
fn plan_set_changes_one_weekday() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["plan", "set", "tue", "--mantra", "om_inner_fortitude_namah", "--beads", "54"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday: Inner Fortitude (Strength, 54 beads)"));

    dc_on(&dir, "2026-10-20")
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday: Inner Fortitude"));

    dc_cmd(&dir).args(["plan", "reset"]).assert().success();
    dc_on(&dir, "2026-10-20")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday: Steady Heart"));
}

#[test]
fn plan_set_rejects_unknown_mantra() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["plan", "set", "mon", "--mantra", "om_nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mantra"));
    dc_cmd(&dir)
        .args(["plan", "set", "someday", "--mantra", "om_commitment_namah"])
        .assert()
        .failure();
}

#[test]
fn plan_override_lasts_one_day() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-19")
        .args(["plan", "override", "--mantra", "om_loving_kindness_namah", "--beads", "27"])
        .assert()
        .success()
        .stdout(predicate::str::contains("today (2026-10-19) only: Loving Kindness"));

    dc_on(&dir, "2026-10-19")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loving Kindness (Compassion, 27 beads) [override]"));

    dc_on(&dir, "2026-10-20")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday: Steady Heart"))
        .stdout(predicate::str::contains("[override]").not());
}

#[test]
fn plan_clear_override() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-19")
        .args(["plan", "override", "--mantra", "om_open_heart_namah"])
        .assert()
        .success();
    dc_on(&dir, "2026-10-19")
        .args(["plan", "clear-override"])
        .assert()
        .success();
    dc_on(&dir, "2026-10-19")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday: Serenity Flow"));
}

#[test]
fn plan_mantras_by_theme() {
    let dir = TempDir::new().unwrap();
    dc_cmd(&dir)
        .args(["plan", "mantras", "--theme", "wisdom"])
        .assert()
        .success()
        .stdout(predicate::str::contains("om_deep_knowing_namah"))
        .stdout(predicate::str::contains("om_serenity_flow_namah").not());
    dc_cmd(&dir)
        .args(["plan", "mantras", "--theme", "chaos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
}

#[test]
fn plan_start_creates_then_reuses_counter() {
    let dir = TempDir::new().unwrap();
    dc_on(&dir, "2026-10-19")
        .args(["plan", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active counter: Serenity Flow"));
    dc_on(&dir, "2026-10-19").args(["tap", "-n", "108"]).assert().success();

    dc_on(&dir, "2026-10-19")
        .args(["plan", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("108 taps, 1 / 1 maalas today"));
    dc_on(&dir, "2026-10-19")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("* Serenity Flow"));
}
