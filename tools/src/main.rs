//! idle-runner: headless driver for the idle engine.
//!
//! Usage:
//!   idle-runner --ticks 3000 --db save.db
//!   idle-runner --ticks 600 --away-secs 3600 --data-dir ./data
//!   idle-runner --db save.db --ipc-mode

use anyhow::Result;
use idle_core::{
    clock::{Clock, ManualClock},
    command::PlayerCommand,
    config::GameConfig,
    engine::IdleEngine,
    event::GameEvent,
    purchase::ShopEntry,
    store::SaveStore,
    types::EpochMillis,
};
use std::env;
use std::io::{self, BufRead, Write};

type Engine = IdleEngine<ManualClock, SaveStore>;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Command { command: PlayerCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    now_ms: EpochMillis,
    currency: f64,
    currency_lifetime: f64,
    wisdom: f64,
    experience: f64,
    rate: f64,
    click_power: f64,
    prestige_preview: u64,
    boost_active: bool,
    boost_remaining_secs: f64,
    total_clicks: u64,
    prestige_count: u32,
    achievements: Vec<String>,
    shop: Vec<ShopEntry>,
    events: Vec<GameEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ticks = parse_arg(&args, "--ticks", 600u64);
    let away_secs = parse_arg(&args, "--away-secs", 0i64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = str_arg(&args, "--data-dir");

    let config = match data_dir {
        Some(dir) => GameConfig::load(dir)?,
        None => GameConfig::study_wizard(),
    };

    if !ipc_mode {
        println!("idle-runner: headless idle engine");
        println!("  ticks:     {ticks}");
        println!("  away:      {away_secs}s");
        println!("  db:        {db}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in)"));
        println!();
    }

    let clock = ManualClock::starting_now();
    let mut engine = open_engine(db, config.clone(), clock.clone())?;
    let start_events = engine.start();

    if ipc_mode {
        run_ipc_loop(&mut engine, start_events)?;
        engine.shutdown();
        return Ok(());
    }

    report_events(&start_events);
    fast_forward(&mut engine, ticks);
    engine.shutdown();
    print_summary(&engine, "SESSION")?;

    if away_secs > 0 {
        // Reopen against the same slot after time away, like a page reload.
        clock.advance(away_secs * 1_000);
        let store = engine.into_storage();
        let mut engine = IdleEngine::new(config, clock, store);
        report_events(&engine.start());
        print_summary(&engine, "AFTER RETURN")?;
        engine.shutdown();
    }

    Ok(())
}

fn open_engine(db: &str, config: GameConfig, clock: ManualClock) -> Result<Engine> {
    let store = SaveStore::open(db)?;
    store.migrate()?;
    Ok(IdleEngine::new(config, clock, store))
}

/// Step the manual clock one tick interval at a time, buying the cheapest
/// affordable upgrade whenever possible.
fn fast_forward(engine: &mut Engine, ticks: u64) {
    let step = engine.config().timing.tick_interval_ms;
    for _ in 0..ticks {
        engine.clock().advance(step);
        let mut events = engine.pump();

        if let Some(id) = cheapest_affordable(&engine.shop()) {
            events.extend(engine.apply(PlayerCommand::Purchase { upgrade_id: id }));
        }
        report_events(&events);
    }
}

fn cheapest_affordable(shop: &[ShopEntry]) -> Option<String> {
    shop.iter()
        .filter(|e| e.affordable)
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .map(|e| e.id.clone())
}

fn report_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Accrued { .. } | GameEvent::Saved { .. } => {
                log::trace!("{}", event.type_name());
            }
            GameEvent::SaveFailed { reason } => log::warn!("save failed: {reason}"),
            other => log::info!("{}", serde_json::to_string(other).unwrap_or_default()),
        }
    }
}

fn run_ipc_loop(engine: &mut Engine, start_events: Vec<GameEvent>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut pending = start_events;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => {
                let step = engine.config().timing.tick_interval_ms;
                for _ in 0..count {
                    engine.clock().advance(step);
                    pending.extend(engine.pump());
                }
            }
            IpcCommand::GetState => {}
            IpcCommand::Command { command } => {
                pending.extend(engine.apply(command));
            }
        }
        let state = build_ui_state(engine, std::mem::take(&mut pending));
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &Engine, events: Vec<GameEvent>) -> UiState {
    let state = engine.state();
    UiState {
        now_ms: engine.clock().now_ms(),
        currency: state.resources.currency.amount,
        currency_lifetime: state.resources.currency.lifetime,
        wisdom: state.resources.wisdom.amount,
        experience: state.resources.experience.amount,
        rate: engine.rate(),
        click_power: engine.click_power(),
        prestige_preview: engine.prestige_preview(),
        boost_active: state.boost.active,
        boost_remaining_secs: state.boost.remaining_secs,
        total_clicks: state.total_clicks,
        prestige_count: state.prestige_count,
        achievements: state
            .achievements
            .iter()
            .filter(|(_, unlocked)| **unlocked)
            .map(|(id, _)| id.clone())
            .collect(),
        shop: engine.shop(),
        events,
    }
}

fn print_summary(engine: &Engine, title: &str) -> Result<()> {
    let state = engine.state();
    let last_saved = state
        .last_saved
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".into());

    println!("=== {title} SUMMARY ===");
    println!("  currency:       {:.2}", state.resources.currency.amount);
    println!("  lifetime:       {:.2}", state.resources.currency.lifetime);
    println!("  wisdom:         {:.0}", state.resources.wisdom.amount);
    println!("  experience:     {:.2}", state.resources.experience.lifetime);
    println!("  rate:           {:.3}/s", engine.rate());
    println!("  click power:    {:.2}", engine.click_power());
    println!("  prestige ready: {}", engine.prestige_preview());
    println!("  last saved:     {last_saved}");
    if let Some(revision) = engine.storage().revision(&engine.config().storage_key)? {
        println!("  save revision:  {revision}");
    }

    println!();
    println!("=== OWNED ===");
    let owned: Vec<_> = engine.shop().into_iter().filter(|e| e.level > 0).collect();
    if owned.is_empty() {
        println!("  (nothing yet)");
    } else {
        for e in owned {
            println!("  {:<20} lv {:>3} | next {:.0}", e.name, e.level, e.cost);
        }
    }
    println!();
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
