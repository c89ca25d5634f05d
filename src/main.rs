use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use snake::clock::{Clock, IntervalClock};
use snake::config::{GameConfig, Theme, load_config};
use snake::error::AppError;
use snake::input::{GameInput, InputMapper};
use snake::renderer::TerminalSink;
use snake::scheduler::GameLoop;
use snake::terminal_runtime::{TerminalSession, install_panic_hook};

#[derive(Debug, Parser)]
#[command(version, about = "Steer a snake around a walled arena until it fills up or crashes")]
struct Cli {
    /// JSON config file. Defaults to <config dir>/arena-snake/config.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed food seed for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick period in milliseconds.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Write logs to this file (filter with RUST_LOG, default `info`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_period_ms = tick_ms;
    }
    config.validate()?;

    if cli.print_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        println!("{json}");
        return Ok(());
    }

    let theme = config.theme.resolve()?;
    let mut game = GameLoop::from_config(&config)?;

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    run(&mut session, &mut game, &config, theme)?;
    info!("quit");
    Ok(())
}

fn run(
    session: &mut TerminalSession,
    game: &mut GameLoop<StdRng>,
    config: &GameConfig,
    theme: Theme,
) -> io::Result<()> {
    let input = InputMapper::new(config.keys.clone());
    let mut sink = TerminalSink::new(session, *game.arena(), theme);
    let mut clock = IntervalClock::new(config.tick_period(), Instant::now());

    let _ = game.start(&mut sink)?;

    loop {
        let timeout = if game.is_finished() {
            clock.period()
        } else {
            clock.time_until_pulse(Instant::now())
        };

        match input.poll_input(timeout)? {
            Some(GameInput::Quit) => break,
            Some(GameInput::Direction(direction)) => game.request(direction),
            Some(GameInput::Redraw) => sink.redraw()?,
            Some(GameInput::Restart) if game.is_finished() => {
                let _ = game.restart(&mut sink)?;
                clock.reset(Instant::now());
            }
            Some(GameInput::Restart) | None => {}
        }

        if !game.is_finished() && clock.poll_pulse(Instant::now()) {
            let _ = game.on_pulse(&mut sink)?;
        }
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
