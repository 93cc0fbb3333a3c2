//! Space Invaders headless runner
//!
//! Plays one autopilot game on the fixed timestep and prints the final
//! snapshot as JSON.
//!
//! Usage: space-invaders [--tuning PATH] [--seed N] [--ticks N]

use std::sync::Arc;

use space_invaders::sim::{Intent, LogSink, MenuAction, PhaseId};
use space_invaders::{Game, GameError, Tuning};

struct Args {
    tuning: Option<String>,
    seed: u64,
    max_ticks: u64,
}

fn parse_args() -> Result<Args, GameError> {
    let mut args = Args {
        tuning: None,
        seed: 0,
        max_ticks: 60_000,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| GameError::Usage(format!("missing value for {}", flag)))?;
        let number = || {
            value.parse::<u64>().map_err(|_| {
                GameError::Usage(format!("{} expects a number, got {}", flag, value))
            })
        };
        match flag.as_str() {
            "--tuning" => args.tuning = Some(value.clone()),
            "--seed" => args.seed = number()?,
            "--ticks" => args.max_ticks = number()?,
            other => return Err(GameError::Usage(format!("unknown flag {}", other))),
        }
    }
    Ok(args)
}

fn run() -> Result<(), GameError> {
    let args = parse_args()?;
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let (mut game, input) = Game::new(tuning, args.seed, Arc::new(LogSink))?;
    game.set_idle_mode(true);
    input.send(Intent::MenuSelect(MenuAction::Start));

    let mut ticks = 0;
    loop {
        let phase = game.step();
        ticks += 1;
        if phase.is_terminal() || ticks >= args.max_ticks {
            break;
        }
    }

    let snapshot = game.snapshot();
    match snapshot.phase {
        PhaseId::Won => log::info!("Wave cleared in {} ticks", ticks),
        PhaseId::Lost => log::info!("Invaders landed after {} ticks", ticks),
        _ => log::warn!("Stopped after {} ticks without a result", ticks),
    }
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Space Invaders (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
