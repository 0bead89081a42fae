//! Headless pen runner
//!
//! Drives the pen on a manual clock for a fixed stretch of simulated time and
//! prints what happened. Treats can be placed up front through the same
//! button gestures a player would use.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use monster_pen::core::error::Result;
use monster_pen::core::types::{Button, Species, WRITABLE_WIDTH};
use monster_pen::core::{Clock, ManualClock, PenConfig};
use monster_pen::input::Gesture;
use monster_pen::simulation::{ClockWander, PenEngine, PenEvent, PollReport, SeededWander, Wander};

/// Headless Pen Runner - simulate a pen without a display
#[derive(Parser, Debug)]
#[command(name = "pen_sim")]
#[command(about = "Run a monster pen on a simulated clock and summarize the outcome")]
struct Args {
    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated time to run (ms)
    #[arg(long, default_value_t = 300_000)]
    duration_ms: u64,

    /// Time between polls (ms); defaults to the config's poll interval
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Columns to place treats on before the run, e.g. --treats 2,6,10
    #[arg(long, value_delimiter = ',')]
    treats: Vec<u8>,

    /// Derive movement from the clock instead of a seeded PRNG
    #[arg(long, default_value_t = false)]
    clock_wander: bool,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    duration_ms: u64,
    polls: u64,
    hunger_ticks: u32,
    meals: u32,
    moves: u32,
    deaths: u32,
    removals: u32,
    treats_placed: u32,
    treats_refused: u32,
    bank_balance: u32,
    treats_left: usize,
    monsters: Vec<MonsterSummary>,
    final_frame: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MonsterSummary {
    id: u32,
    species: Species,
    position: u8,
    hunger: u32,
    alive: bool,
}

impl Summary {
    fn tally(&mut self, report: &PollReport) {
        match report.gesture {
            Some(Gesture::TreatPlaced { .. }) => self.treats_placed += 1,
            Some(Gesture::TreatRefused { .. }) => self.treats_refused += 1,
            _ => {}
        }
        for event in &report.events {
            match event {
                PenEvent::Hungered { .. } => self.hunger_ticks += 1,
                PenEvent::Died { .. } => self.deaths += 1,
                PenEvent::Ate { .. } => self.meals += 1,
                PenEvent::Moved { .. } => self.moves += 1,
                PenEvent::Removed { .. } => self.removals += 1,
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the summary stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monster_pen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => PenConfig::load(path)?,
        None => PenConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let poll_ms = args.poll_ms.unwrap_or(config.poll_interval_ms).max(1);
    let seed = config.seed;

    let wander: Box<dyn Wander> = if args.clock_wander {
        Box::new(ClockWander)
    } else {
        Box::new(SeededWander::new(seed))
    };

    let clock = ManualClock::new(0);
    let mut engine = PenEngine::new(config, &clock, wander)?;
    let mut summary = Summary {
        seed,
        duration_ms: args.duration_ms,
        ..Summary::default()
    };

    place_treats(&mut engine, &args.treats, &mut summary);

    while clock.now_ms() < args.duration_ms {
        clock.advance(poll_ms);
        let report = engine.poll(Button::None);
        summary.tally(&report);
    }

    let state = engine.state();
    summary.polls = engine.polls();
    summary.bank_balance = state.pen.bank_balance;
    summary.treats_left = state.pen.treat_count();
    summary.monsters = state
        .pen
        .monsters
        .iter()
        .map(|(_, m)| MonsterSummary {
            id: m.id.0,
            species: m.species,
            position: m.position,
            hunger: m.hunger,
            alive: m.alive,
        })
        .collect();
    let frame = engine.frame();
    summary.final_frame = vec![frame.row(0), frame.row(1)];

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Walk the cursor to each column and press Select there
///
/// Columns off the strip or already holding a treat are skipped, so a
/// repeated column never toggles its treat back off.
fn place_treats<W: Wander>(
    engine: &mut PenEngine<&ManualClock, W>,
    columns: &[u8],
    summary: &mut Summary,
) {
    for &column in columns {
        if column as usize >= WRITABLE_WIDTH {
            tracing::warn!("Skipping treat column {} (strip is {} wide)", column, WRITABLE_WIDTH);
            continue;
        }
        if engine.state().pen.treat_at(column) {
            tracing::warn!("Skipping treat column {} (already placed)", column);
            continue;
        }
        while engine.state().cursor.position != column {
            tap(engine, Button::Right, summary);
        }
        tap(engine, Button::Select, summary);
    }
}

/// Press and release one button
fn tap<W: Wander>(engine: &mut PenEngine<&ManualClock, W>, button: Button, summary: &mut Summary) {
    let report = engine.poll(button);
    summary.tally(&report);
    let report = engine.poll(Button::None);
    summary.tally(&report);
}

fn print_summary(summary: &Summary) {
    println!("=== PEN RUN (seed {}) ===", summary.seed);
    println!(
        "Simulated {}ms in {} polls",
        summary.duration_ms, summary.polls
    );
    println!(
        "Treats placed: {}  refused: {}  left: {}  bank: {}",
        summary.treats_placed, summary.treats_refused, summary.treats_left, summary.bank_balance
    );
    println!(
        "Hunger ticks: {}  meals: {}  moves: {}  deaths: {}  removed: {}",
        summary.hunger_ticks, summary.meals, summary.moves, summary.deaths, summary.removals
    );
    println!();
    for monster in &summary.monsters {
        println!(
            "  #{} {:?} at {} hunger {} {}",
            monster.id,
            monster.species,
            monster.position,
            monster.hunger,
            if monster.alive { "alive" } else { "dead" }
        );
    }
    println!();
    println!("+----------------+");
    for row in &summary.final_frame {
        println!("|{}|", row);
    }
    println!("+----------------+");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_treat_column_is_placed_once() {
        let clock = ManualClock::new(0);
        let mut engine = PenEngine::new(PenConfig::default(), &clock, SeededWander::new(1)).unwrap();
        let mut summary = Summary::default();

        place_treats(&mut engine, &[2, 2, 40, 5, 2], &mut summary);

        let pen = &engine.state().pen;
        assert!(pen.treat_at(2));
        assert!(pen.treat_at(5));
        assert_eq!(pen.treat_count(), 2);
        assert_eq!(pen.bank_balance, 8);
        assert_eq!(summary.treats_placed, 2);
    }
}
