use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dc_core::{
    Category, Counter, CounterConfig, Crossing, DEFAULT_CYCLE_LENGTH, DayKey, MILESTONES, MalaPlan,
    PlanSource, THEMES, Weekday, mantras_for_theme, milestone, rewards_up_to,
};
use dc_store::{PracticeStore, Standing};

#[derive(Parser)]
#[command(name = "dc", about = "Divine Counter: mantra and maala tracking")]
struct Cli {
    /// Counter name or id prefix (defaults to the active counter)
    #[arg(long, short = 'c', global = true)]
    counter: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a counter and make it active
    New {
        name: String,

        /// Taps per maala (presets: 108, 54, 27, 21)
        #[arg(long)]
        cycle: Option<u32>,

        /// Daily goal in maalas
        #[arg(long)]
        goal: Option<u32>,

        #[arg(long)]
        mantra: Option<String>,

        /// Hex colour such as #D4AF37
        #[arg(long)]
        color: Option<String>,

        /// japa, pranayama, meditation or custom
        #[arg(long)]
        category: Option<Category>,
    },

    /// List all counters
    List,

    /// Set the active counter
    Use { counter: String },

    /// Count taps
    Tap {
        #[arg(short = 'n', long = "count", default_value_t = 1)]
        n: u64,
    },

    /// Take back taps
    Undo {
        #[arg(short = 'n', long = "count", default_value_t = 1)]
        n: u64,
    },

    /// Add or remove completed maalas by hand
    Adjust {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Drop the partial cycle, keeping completed maalas
    Reset,

    /// Show today's progress and streaks
    Status,

    /// Show past days, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show streaks, milestones and rewards
    Streak,

    /// Delete a counter with its history
    Delete { counter: String },

    /// Export all counters to a JSON file
    Export { path: PathBuf },

    /// Replace all counters with a JSON export
    Import { path: PathBuf },

    /// Weekly mantra plan (shows today's plan by default)
    Plan {
        #[command(subcommand)]
        action: Option<PlanAction>,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Show today's planned practice
    Show,

    /// Show the plan for every weekday
    Week,

    /// Plan a mantra for one weekday
    Set {
        /// sun, mon, .. or the full name
        weekday: Weekday,

        #[command(flatten)]
        choice: PlanChoice,
    },

    /// Practise a different mantra today only
    Override {
        #[command(flatten)]
        choice: PlanChoice,
    },

    /// Return to the weekly plan for today
    ClearOverride,

    /// List the mantra library
    Mantras {
        #[arg(long)]
        theme: Option<String>,
    },

    /// Activate (or create) the counter for today's mantra
    Start,

    /// Restore the default weekly plan
    Reset,
}

#[derive(clap::Args)]
struct PlanChoice {
    /// Mantra id, see `dc plan mantras`
    #[arg(long)]
    mantra: String,

    /// Theme id (defaults to the mantra's own theme)
    #[arg(long)]
    theme: Option<String>,

    /// Beads per maala
    #[arg(long, default_value_t = DEFAULT_CYCLE_LENGTH)]
    beads: u32,
}

impl PlanChoice {
    fn to_plan(&self) -> Result<MalaPlan> {
        let mut plan = MalaPlan::for_mantra(&self.mantra, self.beads)?;
        if let Some(theme) = &self.theme {
            plan.theme_id = theme.clone();
            plan.validate()?;
        }
        Ok(plan)
    }
}

fn open_store() -> Result<PracticeStore> {
    let base_dir = std::env::var("DC_DATA_DIR").ok().map(PathBuf::from);
    let mut store =
        PracticeStore::open(base_dir.as_deref()).context("failed to open counter store")?;
    if let Ok(day) = std::env::var("DC_TODAY") {
        let day = DayKey::parse(&day).context("invalid DC_TODAY")?;
        store.pin_today(day);
    }
    Ok(store)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = open_store()?;
    let key = cli.counter.as_deref();

    match &cli.command {
        Commands::New {
            name,
            cycle,
            goal,
            mantra,
            color,
            category,
        } => {
            let mut config = store.new_counter_config(name);
            if let Some(cycle) = cycle {
                config.cycle_length = *cycle;
            }
            if let Some(goal) = goal {
                config.daily_goal = *goal;
            }
            if let Some(color) = color {
                config.color = color.clone();
            }
            if let Some(category) = category {
                config.category = *category;
            }
            config.mantra = mantra.clone();
            cmd_new(&store, config)
        }
        Commands::List => cmd_list(&store),
        Commands::Use { counter } => cmd_use(&store, counter),
        Commands::Tap { n } => cmd_tap(&store, key, *n, false),
        Commands::Undo { n } => cmd_tap(&store, key, *n, true),
        Commands::Adjust { delta } => cmd_adjust(&store, key, *delta),
        Commands::Reset => cmd_reset(&store, key),
        Commands::Status => cmd_status(&store, key),
        Commands::History { limit } => cmd_history(&store, key, *limit),
        Commands::Streak => cmd_streak(&store, key),
        Commands::Delete { counter } => cmd_delete(&store, counter),
        Commands::Export { path } => cmd_export(&store, path),
        Commands::Import { path } => cmd_import(&store, path),
        Commands::Plan { action } => match action {
            None | Some(PlanAction::Show) => cmd_plan_show(&store),
            Some(PlanAction::Week) => cmd_plan_week(&store),
            Some(PlanAction::Set { weekday, choice }) => cmd_plan_set(&store, *weekday, choice),
            Some(PlanAction::Override { choice }) => cmd_plan_override(&store, choice),
            Some(PlanAction::ClearOverride) => cmd_plan_clear_override(&store),
            Some(PlanAction::Mantras { theme }) => cmd_plan_mantras(theme.as_deref()),
            Some(PlanAction::Start) => cmd_plan_start(&store),
            Some(PlanAction::Reset) => cmd_plan_reset(&store),
        },
    }
}

fn resolve(store: &PracticeStore, key: Option<&str>) -> Result<Counter> {
    store.resolve(key).context("failed to load counter")
}

fn commit(store: &PracticeStore, counter: &Counter) -> Result<Standing> {
    store.commit(counter).context("failed to save counter")
}

fn print_progress(counter: &Counter) {
    let p = counter.progress();
    println!(
        "{}: {} taps, {} / {} maalas today, {}/{} in cycle ({}%), {} to next",
        counter.name(),
        p.raw,
        p.cycles,
        counter.config.daily_goal,
        p.position,
        p.cycle_length,
        p.percent,
        p.remaining
    );
}

fn print_standing(standing: &Standing) {
    for days in &standing.new_milestones {
        if let Some(m) = milestone(*days) {
            println!("milestone reached: {} {} ({days} days)", m.icon, m.name);
        }
    }
    for reward in &standing.new_rewards {
        println!("reward unlocked: {} {}", reward.icon, reward.name);
    }
}

fn cmd_new(store: &PracticeStore, config: CounterConfig) -> Result<()> {
    let counter = store
        .create_counter(config)
        .context("failed to create counter")?;
    println!(
        "created {} (cycle {}, goal {}), id {}",
        counter.name(),
        counter.config.cycle_length,
        counter.config.daily_goal,
        counter.id.simple()
    );
    Ok(())
}

fn cmd_list(store: &PracticeStore) -> Result<()> {
    let counters = store
        .store()
        .list_counters()
        .context("failed to list counters")?;
    if counters.is_empty() {
        println!("(no counters)");
        return Ok(());
    }
    let active = store.store().active_counter()?;
    let today = store.today();
    for counter in &counters {
        let marker = if Some(counter.id) == active { '*' } else { ' ' };
        // a tally from an earlier day counts nothing today
        let maalas = if counter.today.day == today {
            counter.maalas_today()
        } else {
            0
        };
        println!(
            "{marker} {:<20} {maalas} / {} maalas  (cycle {})",
            counter.name(),
            counter.config.daily_goal,
            counter.config.cycle_length
        );
    }
    Ok(())
}

fn cmd_use(store: &PracticeStore, key: &str) -> Result<()> {
    let counter = store.activate(key).context("failed to switch counter")?;
    println!("active counter: {}", counter.name());
    Ok(())
}

fn cmd_tap(store: &PracticeStore, key: Option<&str>, n: u64, undo: bool) -> Result<()> {
    let mut counter = resolve(store, key)?;
    let goal_before = counter.goal_met();
    let outcome = if undo {
        counter.undo(n)
    } else {
        counter.tap(n)
    };
    let standing = commit(store, &counter)?;

    print_progress(&counter);
    match outcome.crossing {
        Crossing::Upper => println!("cycle complete: maala {}", outcome.progress.cycles),
        Crossing::Lower => println!("cycle undone"),
        Crossing::None => {}
    }
    if !goal_before && counter.goal_met() {
        println!("daily goal reached");
    }
    print_standing(&standing);
    Ok(())
}

fn cmd_adjust(store: &PracticeStore, key: Option<&str>, delta: i64) -> Result<()> {
    let mut counter = resolve(store, key)?;
    let maalas = counter.adjust(delta);
    let standing = commit(store, &counter)?;
    println!("adjusted {}: {maalas} maalas today", counter.name());
    print_standing(&standing);
    Ok(())
}

fn cmd_reset(store: &PracticeStore, key: Option<&str>) -> Result<()> {
    let mut counter = resolve(store, key)?;
    let outcome = counter.reset_count();
    commit(store, &counter)?;
    println!(
        "reset {}: dropped {} taps, {} maalas kept",
        counter.name(),
        outcome.previous_raw - outcome.raw,
        counter.maalas_today()
    );
    Ok(())
}

fn cmd_status(store: &PracticeStore, key: Option<&str>) -> Result<()> {
    let counter = resolve(store, key)?;
    let standing = commit(store, &counter)?;
    let p = counter.progress();

    println!("counter:    {}", counter.name());
    if let Some(mantra) = &counter.config.mantra {
        println!("mantra:     {mantra}");
    }
    println!("category:   {}", counter.config.category);
    println!("day:        {}", counter.today.day);
    println!("taps:       {}", p.raw);
    println!(
        "maalas:     {} / {}{}",
        p.cycles,
        counter.config.daily_goal,
        if counter.goal_met() { " (goal met)" } else { "" }
    );
    println!("cycle:      {}/{} ({}%)", p.position, p.cycle_length, p.percent);
    println!("remaining:  {}", p.remaining);
    println!(
        "streak:     current {}, longest {}",
        standing.streak.current, standing.streak.longest
    );
    print_standing(&standing);
    Ok(())
}

fn cmd_history(store: &PracticeStore, key: Option<&str>, limit: Option<usize>) -> Result<()> {
    let counter = resolve(store, key)?;
    let standing = commit(store, &counter)?;
    let limit = limit.unwrap_or(store.config().history_limit);
    let history = store
        .store()
        .history(counter.id, Some(limit))
        .context("failed to load history")?;

    if history.is_empty() {
        println!("(no history)");
    }
    for entry in &history {
        println!(
            "{}  {:>4} maalas  {:>6} taps{}",
            entry.day,
            entry.maalas,
            entry.raw,
            if entry.goal_achieved { "  goal met" } else { "" }
        );
    }
    print_standing(&standing);
    Ok(())
}

fn cmd_streak(store: &PracticeStore, key: Option<&str>) -> Result<()> {
    let counter = resolve(store, key)?;
    let standing = commit(store, &counter)?;
    let milestones = store
        .store()
        .milestones(counter.id)
        .context("failed to load milestones")?;

    println!("current: {} days", standing.streak.current);
    println!("longest: {} days", standing.streak.longest);
    println!();
    for m in &MILESTONES {
        let achieved = milestones
            .iter()
            .find(|s| s.days == m.days)
            .and_then(|s| s.achieved_at.as_deref());
        match achieved {
            Some(at) => println!("[x] {:>3} days  {} {}  ({at})", m.days, m.icon, m.name),
            None => println!("[ ] {:>3} days  {}", m.days, m.name),
        }
    }

    let rewards = rewards_up_to(standing.streak.longest);
    if !rewards.is_empty() {
        println!();
        println!("rewards:");
        for reward in rewards {
            println!("  {} {}: {}", reward.icon, reward.name, reward.description);
        }
    }
    print_standing(&standing);
    Ok(())
}

fn cmd_delete(store: &PracticeStore, key: &str) -> Result<()> {
    let counter = store.delete(key).context("failed to delete counter")?;
    println!("deleted {}", counter.name());
    Ok(())
}

fn cmd_export(store: &PracticeStore, path: &Path) -> Result<()> {
    store
        .store()
        .export_json_file(path)
        .context("failed to export JSON")?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(store: &PracticeStore, path: &Path) -> Result<()> {
    store
        .store()
        .import_json_file(path)
        .context("failed to import JSON")?;
    let counters = store
        .store()
        .list_counters()
        .context("failed to list counters after import")?;
    println!("imported from {}. counters={}", path.display(), counters.len());
    Ok(())
}

fn describe_plan(plan: &MalaPlan) -> String {
    let title = plan.mantra().map_or(plan.mantra_id.as_str(), |m| m.title);
    let theme = plan.theme().map_or(plan.theme_id.as_str(), |t| t.name);
    format!("{title} ({theme}, {} beads)", plan.beads)
}

fn cmd_plan_show(store: &PracticeStore) -> Result<()> {
    let today = store.today_practice().context("failed to load plan")?;
    let source = match today.source {
        PlanSource::Schedule => "",
        PlanSource::Override => " [override]",
    };
    println!("{}: {}{source}", today.weekday.name(), describe_plan(&today.plan));
    if let Some(mantra) = today.plan.mantra() {
        println!("mantra: {}", mantra.text);
        println!("energy: {}", mantra.energy);
    }
    Ok(())
}

fn cmd_plan_week(store: &PracticeStore) -> Result<()> {
    let schedule = store
        .store()
        .weekly_schedule()
        .context("failed to load plan")?;
    let today = Weekday::of(store.today());
    for (weekday, plan) in schedule.iter() {
        let marker = if weekday == today { '*' } else { ' ' };
        println!("{marker} {:<10} {}", weekday.name(), describe_plan(plan));
    }
    Ok(())
}

fn cmd_plan_set(store: &PracticeStore, weekday: Weekday, choice: &PlanChoice) -> Result<()> {
    let plan = choice.to_plan()?;
    store
        .store()
        .save_day_plan(weekday, &plan)
        .context("failed to save plan")?;
    println!("{}: {}", weekday.name(), describe_plan(&plan));
    Ok(())
}

fn cmd_plan_override(store: &PracticeStore, choice: &PlanChoice) -> Result<()> {
    let daily_override = store
        .set_override(choice.to_plan()?)
        .context("failed to save override")?;
    println!(
        "today ({}) only: {}",
        daily_override.day,
        describe_plan(&daily_override.plan)
    );
    Ok(())
}

fn cmd_plan_clear_override(store: &PracticeStore) -> Result<()> {
    store.clear_override().context("failed to clear override")?;
    println!("override cleared");
    Ok(())
}

fn cmd_plan_mantras(theme: Option<&str>) -> Result<()> {
    let themes: Vec<_> = match theme {
        Some(id) => {
            let t = dc_core::theme(id).with_context(|| format!("unknown theme '{id}'"))?;
            vec![t]
        }
        None => THEMES.iter().collect(),
    };
    for t in themes {
        println!("{} {} ({}): {}", t.icon, t.name, t.id, t.description);
        for m in mantras_for_theme(t.id) {
            println!("    {:<30} {}", m.id, m.text);
        }
    }
    Ok(())
}

fn cmd_plan_start(store: &PracticeStore) -> Result<()> {
    let (today, counter) = store
        .start_today_plan()
        .context("failed to start today's plan")?;
    println!(
        "active counter: {} for {}",
        counter.name(),
        describe_plan(&today.plan)
    );
    print_progress(&counter);
    Ok(())
}

fn cmd_plan_reset(store: &PracticeStore) -> Result<()> {
    store
        .store()
        .reset_weekly_schedule()
        .context("failed to reset plan")?;
    println!("weekly plan reset to defaults");
    Ok(())
}
