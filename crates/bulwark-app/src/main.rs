use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bulwark_app::autopilot::{run_headless, Autopilot, RunSummary};
use bulwark_app::control;
use bulwark_app::state::AppState;
use bulwark_campaign::JsonFileStore;
use bulwark_core::commands::PlayerCommand;
use bulwark_core::content::ContentTables;
use bulwark_core::enums::GamePhase;
use bulwark_sim::{SimConfig, SimulationEngine};

#[derive(Parser, Debug)]
#[command(about = "Headless Bulwark tower-defense runner", version)]
struct Args {
    /// Level to play.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Simulation speed multiplier (0 to 4).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
    /// Give up after this many seconds of caller time.
    #[arg(long, default_value_t = 600.0)]
    seconds: f64,
    /// Directory holding the progress file.
    #[arg(long, default_value = ".bulwark")]
    save_dir: PathBuf,
    /// Profile name; progress is kept in `<save-dir>/<profile>.json`.
    #[arg(long)]
    profile: Option<String>,
    /// Seed for roulette draws.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Optional content tables JSON replacing the built-in catalog.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Run on the 60 Hz game loop thread in wall-clock time instead of
    /// as fast as possible.
    #[arg(long)]
    realtime: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run(Args::parse()) {
        error!(error = %err, "run failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_content(path: Option<&PathBuf>) -> Result<ContentTables> {
    let Some(path) = path else {
        return Ok(ContentTables::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ContentTables::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn progress_store(args: &Args) -> JsonFileStore {
    let store = JsonFileStore::new(&args.save_dir);
    match &args.profile {
        Some(profile) => store.with_file_name(format!("{profile}.json")),
        None => store,
    }
}

fn run(args: Args) -> Result<()> {
    let content = load_content(args.content.as_ref())?;
    let mut pilot = Autopilot::new(&content, args.level)
        .ok_or_else(|| anyhow!("unknown level {}", args.level))?;
    let store = progress_store(&args);
    info!(level = args.level, save = %store.path().display(), "starting");

    let mut engine = SimulationEngine::new(
        SimConfig {
            seed: args.seed,
            content: content.clone(),
            start_speed: args.speed,
        },
        store,
    );

    let summary = if args.realtime {
        run_realtime(engine, &mut pilot, &content, args.seconds)?
    } else {
        run_headless(&mut engine, &mut pilot, args.seconds)
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Drive the game loop thread, polling snapshots ten times a second.
fn run_realtime(
    engine: SimulationEngine,
    pilot: &mut Autopilot,
    content: &ContentTables,
    seconds: f64,
) -> Result<RunSummary> {
    let state = AppState::new();
    control::start_simulation(&state, engine)?;
    control::send_command(
        &state,
        PlayerCommand::StartLevel {
            level_id: pilot.level_id(),
        },
    )?;

    let deadline = Instant::now() + Duration::from_secs_f64(seconds.max(0.0));
    let mut last = None;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));
        let Some(snap) = control::get_snapshot(&state)? else {
            continue;
        };
        if matches!(snap.phase, GamePhase::Victory | GamePhase::GameOver) {
            last = Some(snap);
            break;
        }
        for cmd in pilot.decide(&snap, content) {
            control::send_command(&state, cmd)?;
        }
        last = Some(snap);
    }

    control::stop_simulation(&state)?;
    let snap = match control::get_snapshot(&state)? {
        Some(snap) => snap,
        None => last.ok_or_else(|| anyhow!("game loop produced no snapshot"))?,
    };
    Ok(RunSummary::from_snapshot(&snap))
}
