//! Monster Pen - Entry Point
//!
//! Emulates the 16x2 LCD and the five-button analog keypad in a terminal and
//! runs the pen's polling loop on the wall clock.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing_subscriber::EnvFilter;

use monster_pen::core::error::Result;
use monster_pen::core::{Clock, PenConfig, SystemClock};
use monster_pen::simulation::{ClockWander, PenEngine, SeededWander, Wander};
use monster_pen::ui::{button_for_key, lcd_view, GameUI, KeypadEmulator, LogCategory, TerminalGuard};

/// How long a key press counts as a held button
const KEY_HOLD_MS: u64 = 150;

/// Monster Pen - feed the monsters before they starve
#[derive(Parser, Debug)]
#[command(name = "monster-pen")]
#[command(about = "Keep a pen of monsters alive on an emulated 16x2 LCD")]
struct Args {
    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the wander source
    #[arg(long)]
    seed: Option<u64>,

    /// Pen number shown in the corner
    #[arg(long)]
    pen: Option<u8>,

    /// Derive movement from the clock instead of a seeded PRNG
    #[arg(long, default_value_t = false)]
    clock_wander: bool,

    /// Write logs to this file (the screen is taken by the LCD)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => PenConfig::load(path)?,
        None => PenConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(pen) = args.pen {
        config.pen_index = pen;
    }

    let wander: Box<dyn Wander> = if args.clock_wander {
        Box::new(ClockWander)
    } else {
        Box::new(SeededWander::new(config.seed))
    };

    tracing::info!("Monster Pen starting with seed {}", config.seed);

    let mut engine = PenEngine::new(config, SystemClock::new(), wander)?;
    let poll_interval = Duration::from_millis(engine.config().poll_interval_ms);
    let mut keypad = KeypadEmulator::new(KEY_HOLD_MS);
    let mut ui = GameUI::new();
    let mut announced_empty = false;

    let mut guard = TerminalGuard::enter()?;

    'running: loop {
        // Wait for input up to one poll interval, then drain what arrived
        if event::poll(poll_interval)? {
            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'running,
                    KeyCode::Char('h') => ui.toggle_help(),
                    KeyCode::Char('m') => ui.log_moves = !ui.log_moves,
                    code => {
                        if let Some(button) = button_for_key(code) {
                            keypad.press(button, engine.clock().now_ms());
                        }
                    }
                }
            }
        }

        let sample = keypad.sample(engine.clock().now_ms());
        let report = engine.poll(sample);
        ui.record(&report);

        if engine.is_empty() && !announced_empty {
            ui.log(report.now, "the pen is empty".into(), LogCategory::System);
            announced_empty = true;
        }

        let frame = engine.frame();
        let economy = engine.config().economy;
        guard
            .terminal
            .draw(|f| lcd_view::draw(f, &frame, &ui, economy))?;
    }

    drop(guard);
    tracing::info!("Monster Pen stopped after {} polls", engine.polls());
    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monster_pen=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
