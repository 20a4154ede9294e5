use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hourglass_cli::{CliContext, commands, logging, prompt, spawn_reader};
use tokio::time::{Instant, MissedTickBehavior};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    let mut ctx = CliContext::new();
    tracing::info!(
        backend = ctx.config.backend.label(),
        restored = ctx.schedule.len(),
        "hourglass started"
    );

    let mut frame = tokio::time::interval(Duration::from_secs_f64(ctx.config.frame_interval()));
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut fixed = tokio::time::interval(Duration::from_secs_f64(ctx.ticks.fixed_step()));
    fixed.set_missed_tick_behavior(MissedTickBehavior::Burst);

    let mut lines = spawn_reader();
    let mut last_frame = Instant::now();
    prompt()?;

    loop {
        tokio::select! {
            now = frame.tick() => {
                let delta = now.saturating_duration_since(last_frame).as_secs_f64();
                last_frame = now;
                ctx.ticks.dispatch_frame(delta);
            }
            _ = fixed.tick() => ctx.ticks.dispatch_fixed(),
            line = lines.recv() => {
                let Some(line) = line else {
                    tracing::info!("stdin closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    prompt()?;
                    continue;
                }

                match respond(line, &mut ctx) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(err) => {
                        writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                        std::io::stdout().flush().map_err(|e| e.to_string())?;
                    }
                }
                prompt()?;
            }
        }
    }

    if !ctx.shutdown() {
        tracing::error!("countdowns were not saved");
    }
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "countdown scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a countdown, or show the one already under KEY
    Start {
        key: String,
        secs: f64,
        #[arg(short, long, default_value_t = 0)]
        tiers: i32,
    },
    /// Start a restored countdown; all of them without KEY
    Resume { key: Option<String> },
    Remove { key: String },
    Tier { key: String, tier: i32 },
    Pause { key: String },
    Unpause { key: String },
    List,
    Config,
    Exit,
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "hourglass".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Start { key, secs, tiers }) => commands::start(ctx, key, *secs, *tiers)?,
        Some(Commands::Resume { key: Some(key) }) => commands::resume(ctx, key)?,
        Some(Commands::Resume { key: None }) => commands::resume_all(ctx)?,
        Some(Commands::Remove { key }) => commands::remove(ctx, key)?,
        Some(Commands::Tier { key, tier }) => commands::set_tier(ctx, key, *tier)?,
        Some(Commands::Pause { key }) => commands::pause(ctx, key, true)?,
        Some(Commands::Unpause { key }) => commands::pause(ctx, key, false)?,
        Some(Commands::List) => commands::list(ctx)?,
        Some(Commands::Config) => commands::show_config(ctx)?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
