//! WorldWrought Headless Simulation Harness
//!
//! Builds an engine from a config file (or the defaults), runs a seeded
//! scenario and checks the simulation's invariants along the way.
//! Runs entirely in-process: no rendering, no input.
//!
//! Usage:
//!   cargo run -p worldwrought-simtest
//!   cargo run -p worldwrought-simtest -- --verbose --ticks 600
//!   cargo run -p worldwrought-simtest -- --config colony.toml --json report.json

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use worldwrought_core::persistence::SaveError;
use worldwrought_core::prelude::*;
use worldwrought_core::systems::tier_name;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML simulation config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation ticks to run in the long-run scenario
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// Write a JSON report here
    #[arg(long)]
    json: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    seed: Option<u64>,
    sim_time: f64,
    characters: usize,
    settlement_tier: u32,
    settlement: &'static str,
    resources: BTreeMap<String, i64>,
    events_seen: usize,
    results: Vec<TestResult>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    println!("=== WorldWrought Simulation Harness ===\n");

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    log::info!("config: {:?}", config);

    let mut results = Vec::new();

    // 1. Needs & mood
    results.extend(validate_needs_and_mood(&config, args.verbose));

    // 2. Colony resources & settlement tiers
    results.extend(validate_colony(&config));

    // 3. Nemeses & relationships
    results.extend(validate_social(&config));

    // 4. Job schedules
    results.extend(validate_schedules(&config));

    // 5. Families & lineage
    results.extend(validate_families(&config));

    // 6. Long run
    let (engine, events_seen, long_run) = run_long_scenario(&config, &args);
    results.extend(long_run);

    // 7. Save / load
    results.extend(validate_persistence(&engine)?);

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if let Some(path) = &args.json {
        let report = Report {
            seed: config.seed,
            sim_time: engine.sim_time(),
            characters: engine.character_count(),
            settlement_tier: engine.colony().settlement_tier(),
            settlement: tier_name(engine.colony().settlement_tier()),
            resources: engine.colony().resources().clone(),
            events_seen,
            results,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn fresh_engine(config: &SimulationConfig) -> SimulationEngine {
    SimulationEngine::with_config(config.clone())
}

// ── 1. Needs & Mood ─────────────────────────────────────────────────────

fn validate_needs_and_mood(config: &SimulationConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Needs & Mood ---");
    let mut results = Vec::new();

    let mut engine = fresh_engine(config);
    let id = engine.spawn_character(CharacterSheet::citizen("Probe", 30, config));

    // Fulfilling past either end clamps
    engine.fulfill_need(id, NeedType::Hunger, 5.0);
    let full = engine.need_level(id, NeedType::Hunger).unwrap_or(-1.0);
    engine.fulfill_need(id, NeedType::Hunger, -5.0);
    let empty = engine.need_level(id, NeedType::Hunger).unwrap_or(-1.0);
    let max = config
        .needs
        .defaults
        .iter()
        .find(|s| s.need_type == NeedType::Hunger)
        .map_or(config.needs.lazy_max, |s| s.max);
    results.push(TestResult::new(
        "need_fulfill_clamps",
        (full - max).abs() < 1e-6 && empty == 0.0,
        format!("over-fill -> {:.2}, over-drain -> {:.2}", full, empty),
    ));

    // Decay never raises a need
    let mut previous = engine.need_level(id, NeedType::Rest);
    let mut monotone = true;
    for _ in 0..50 {
        engine.update(1.0);
        let now = engine.need_level(id, NeedType::Rest);
        if let (Some(p), Some(n)) = (previous, now) {
            monotone &= n <= p;
        }
        previous = now;
    }
    results.push(TestResult::new(
        "need_decay_monotone",
        monotone,
        format!("rest after 50s: {:?}", previous),
    ));

    // Lazily created need starts from the lazy defaults
    let bare = engine.spawn_character(CharacterSheet::new("Bare", 20));
    engine.fulfill_need(bare, NeedType::Social, 0.0);
    let lazy = engine.need_level(bare, NeedType::Social);
    results.push(TestResult::new(
        "need_lazy_creation",
        lazy == Some(config.needs.lazy_max),
        format!("social created at {:?}", lazy),
    ));

    // Exactly one mood authority per character
    let mut derived = config.clone();
    derived.mood.model = MoodModel::NeedAverage;
    let mut engine = fresh_engine(&derived);
    let id = engine.spawn_character(CharacterSheet::citizen("Derived", 40, &derived));
    let rejected = !engine.modify_mood(id, 0.3);
    engine.update(0.0);
    let mood = engine.mood(id).unwrap_or(-1.0);
    results.push(TestResult::new(
        "mood_single_authority",
        rejected && (0.0..=1.0).contains(&mood),
        format!("need-derived mood {:.3}, delta rejected={}", mood, rejected),
    ));

    if verbose {
        println!("  Default needs:");
        for spec in &config.needs.defaults {
            println!(
                "    {:10?} max {:.2} decay {:.4}/s",
                spec.need_type, spec.max, spec.decay_rate
            );
        }
    }

    results
}

// ── 2. Colony ───────────────────────────────────────────────────────────

fn validate_colony(config: &SimulationConfig) -> Vec<TestResult> {
    println!("--- Colony ---");
    let mut results = Vec::new();
    let mut engine = fresh_engine(config);
    let wood_step = config.colony.wood_per_tier;
    let stone_step = config.colony.stone_per_tier;

    // Upgrade from village with 1.5 steps of wood and exactly one of stone
    engine.add_resource("wood", wood_step + wood_step / 2);
    engine.add_resource("stone", stone_step);
    let upgraded = engine.try_upgrade_settlement();
    results.push(TestResult::new(
        "upgrade_from_village",
        upgraded
            && engine.colony().settlement_tier() == 1
            && engine.resource_amount("wood") == wood_step / 2
            && engine.resource_amount("stone") == 0,
        format!(
            "tier {} ({}), wood {}, stone {}",
            engine.colony().settlement_tier(),
            tier_name(engine.colony().settlement_tier()),
            engine.resource_amount("wood"),
            engine.resource_amount("stone")
        ),
    ));

    // A half-affordable basket changes nothing
    let mut engine = fresh_engine(config);
    engine.add_resource("wood", 10);
    engine.add_resource("stone", 2);
    let consumed = engine.try_consume_resources(&[("wood", 5), ("stone", 3)]);
    results.push(TestResult::new(
        "consume_all_or_nothing",
        !consumed && engine.resource_amount("wood") == 10 && engine.resource_amount("stone") == 2,
        format!(
            "consumed={}, wood {}, stone {}",
            consumed,
            engine.resource_amount("wood"),
            engine.resource_amount("stone")
        ),
    ));

    // Spent resources leave the ledger
    engine.try_consume_resources(&[("Stone", 2)]);
    results.push(TestResult::new(
        "empty_resource_removed",
        !engine.colony().resources().contains_key("stone"),
        format!("ledger: {:?}", engine.colony().resources()),
    ));

    results
}

// ── 3. Social ───────────────────────────────────────────────────────────

fn validate_social(config: &SimulationConfig) -> Vec<TestResult> {
    println!("--- Nemeses & Relationships ---");
    let mut results = Vec::new();
    let mut engine = fresh_engine(config);
    let a = engine.spawn_character(CharacterSheet::new("Ada", 30));
    let b = engine.spawn_character(CharacterSheet::new("Bram", 31));

    engine.add_nemesis(a, b, 0.6);
    engine.add_nemesis(a, b, 0.6);
    let clamped = engine.hostility(a, b);
    results.push(TestResult::new(
        "nemesis_hostility_clamps",
        clamped == 1.0,
        format!("0.6 + 0.6 -> {:.2}", clamped),
    ));

    let c = engine.spawn_character(CharacterSheet::new("Cael", 29));
    engine.add_nemesis(a, c, 0.3);
    engine.reduce_hostility(a, c, 0.5);
    results.push(TestResult::new(
        "nemesis_forgiven_at_zero",
        !engine.is_nemesis(a, c) && engine.hostility(a, c) == 0.0,
        format!("is_nemesis={}", engine.is_nemesis(a, c)),
    ));

    let untouched = engine.relationship(a, c);
    engine.modify_relationship(a, b, 0.8);
    engine.modify_relationship(a, b, 0.8);
    results.push(TestResult::new(
        "relationship_default_and_clamp",
        untouched == 0.0 && engine.relationship(a, b) == 1.0 && engine.relationship(b, a) == 0.0,
        format!(
            "untouched {:.1}, a->b {:.1}, b->a {:.1}",
            untouched,
            engine.relationship(a, b),
            engine.relationship(b, a)
        ),
    ));

    engine.remove_character(b);
    let purged = engine
        .entity(a)
        .and_then(|e| {
            let ledger = engine.world.get::<&NemesisLedger>(e).ok()?;
            let relationships = engine.world.get::<&Relationships>(e).ok()?;
            Some(!ledger.is_nemesis(b) && relationships.scores().get(&b).is_none())
        })
        .unwrap_or(false);
    results.push(TestResult::new(
        "removal_purges_ledgers",
        purged,
        "departed character gone from hostility and relationship ledgers",
    ));

    results
}

// ── 4. Schedules ────────────────────────────────────────────────────────

fn validate_schedules(config: &SimulationConfig) -> Vec<TestResult> {
    println!("--- Job Schedules ---");
    let mut results = Vec::new();

    let mut schedule = JobSchedule::new(vec![JobType::Sleep, JobType::Eat], vec![6.0, 2.0]);
    for _ in 0..7 {
        schedule.tick(1.0);
    }
    results.push(TestResult::new(
        "schedule_advances_once",
        schedule.current_job() == Some(JobType::Eat)
            && (schedule.time_remaining() - 1.0).abs() < 1e-5,
        format!(
            "after 7s: {:?} with {:.2}s left",
            schedule.current_job(),
            schedule.time_remaining()
        ),
    ));

    let mut empty = JobSchedule::new(Vec::new(), Vec::new());
    results.push(TestResult::new(
        "schedule_empty_is_noop",
        empty.tick(1.0).is_none(),
        "empty schedule performs nothing",
    ));

    let mut engine = fresh_engine(config);
    let sleeper = engine.spawn_character(
        CharacterSheet::new("Sleeper", 30)
            .with_schedule(JobSchedule::new(vec![JobType::Sleep], vec![100.0])),
    );
    let rioter = engine.spawn_character(
        CharacterSheet::new("Rioter", 30)
            .with_schedule(JobSchedule::new(vec![JobType::Mutiny], vec![100.0])),
    );
    for _ in 0..10 {
        engine.update(1.0);
    }
    let up = engine.mood(sleeper).unwrap_or(0.0);
    let down = engine.mood(rioter).unwrap_or(1.0);
    results.push(TestResult::new(
        "schedule_mood_feedback",
        up > 0.5 && down < 0.5,
        format!("sleep -> {:.3}, mutiny -> {:.3}", up, down),
    ));

    results
}

// ── 5. Families & Lineage ───────────────────────────────────────────────

fn validate_families(config: &SimulationConfig) -> Vec<TestResult> {
    println!("--- Families & Lineage ---");
    let mut results = Vec::new();
    let mut engine = fresh_engine(config);

    let elder = engine.spawn_citizen(CharacterSheet::new("Orla", 64).in_family("Vale"));
    let heir = engine.spawn_citizen(CharacterSheet::new("Finn", 38).in_family("Vale"));
    let young = engine.spawn_citizen(CharacterSheet::new("Ivy", 38).in_family("Vale"));
    engine.add_child(elder, heir, ParentRole::Mother);
    engine.add_child(elder, young, ParentRole::Mother);

    let synced = engine
        .identity(heir)
        .is_some_and(|i| i.family_name == "Vale");
    results.push(TestResult::new(
        "roster_syncs_family_name",
        synced && engine.colony().family("Vale").map_or(0, |f| f.members().len()) == 3,
        "family name set on join",
    ));

    let before = engine.heir("Vale");
    engine.remove_character(elder);
    let after = engine.heir("Vale");
    results.push(TestResult::new(
        "heir_oldest_living",
        before == Some(elder) && after == Some(heir),
        format!("heir before {:?}, after {:?}", before, after),
    ));

    let cleared = engine.remove_citizen(young)
        && engine.identity(young).is_some_and(|i| i.family_name.is_empty());
    results.push(TestResult::new(
        "roster_leave_clears_name",
        cleared,
        "family name cleared on leave",
    ));

    results
}

// ── 6. Long run ─────────────────────────────────────────────────────────

fn run_long_scenario(
    config: &SimulationConfig,
    args: &Args,
) -> (SimulationEngine, usize, Vec<TestResult>) {
    println!("--- Long Run ({} ticks of {}s) ---", args.ticks, args.dt);
    let mut results = Vec::new();
    let mut engine = fresh_engine(config);
    let ids = engine.generate(config.initial_citizens);

    let seen = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&seen);
    engine.subscribe(Box::new(move |_: &ColonyEvent| *sink.borrow_mut() += 1));

    // Seed a few grudges so interactions go both ways
    for pair in ids.windows(2).step_by(2) {
        engine.add_nemesis(pair[0], pair[1], NemesisLedger::DEFAULT_HOSTILITY);
    }

    let mut mood_ok = true;
    let mut need_ok = true;
    for tick in 0..args.ticks {
        engine.update(args.dt);

        if ids.len() > 1 {
            let a = ids[tick as usize % ids.len()];
            let b = ids[(tick as usize + 1) % ids.len()];
            engine.interact(a, b);
        }

        for (_, mood) in engine.world.query::<&Mood>().iter() {
            mood_ok &= (0.0..=1.0).contains(&mood.value);
        }
        for (_, needs) in engine.world.query::<&Needs>().iter() {
            need_ok &= needs
                .iter()
                .all(|n| n.current() >= 0.0 && n.current() <= n.max());
        }
    }

    results.push(TestResult::new(
        "long_run_mood_bounds",
        mood_ok,
        "every mood stayed within 0..=1",
    ));
    results.push(TestResult::new(
        "long_run_need_bounds",
        need_ok,
        "every need stayed within 0..=max",
    ));

    let ledger_ok = engine
        .colony()
        .resources()
        .iter()
        .all(|(name, amount)| *amount > 0 && *name == name.to_lowercase());
    results.push(TestResult::new(
        "long_run_resource_ledger",
        ledger_ok,
        format!(
            "tier {} ({}), resources {:?}",
            engine.colony().settlement_tier(),
            tier_name(engine.colony().settlement_tier()),
            engine.colony().resources()
        ),
    ));

    let events_seen = *seen.borrow();
    if args.verbose {
        println!(
            "  {} characters, {} colony events, {} urgent needs",
            engine.character_count(),
            events_seen,
            engine.characters_with_urgent_needs(0.25).len()
        );
    }

    (engine, events_seen, results)
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(engine: &SimulationEngine) -> anyhow::Result<Vec<TestResult>> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();

    let mut bytes = Vec::new();
    engine.save(&mut bytes).context("saving engine")?;

    let mut restored = SimulationEngine::with_config(engine.config().clone());
    let loaded: Result<(), SaveError> = restored.load(bytes.as_slice());
    let roundtrip = loaded.is_ok()
        && restored.character_ids() == engine.character_ids()
        && restored.colony().resources() == engine.colony().resources()
        && restored.colony().settlement_tier() == engine.colony().settlement_tier()
        && engine
            .character_ids()
            .into_iter()
            .all(|id| restored.mood(id) == engine.mood(id) && restored.nemeses(id) == engine.nemeses(id));
    results.push(TestResult::new(
        "save_load_roundtrip",
        roundtrip,
        format!("{} bytes, load: {:?}", bytes.len(), loaded.err()),
    ));

    let corrupted = restored.load(&bytes[..bytes.len() / 2]).is_err();
    results.push(TestResult::new(
        "truncated_save_rejected",
        corrupted,
        "half a save file fails to load",
    ));

    Ok(results)
}
