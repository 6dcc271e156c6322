//! Headless effect runner.
//!
//! ```text
//! particle-fx <effect> [particles] [seconds]
//! ```
//!
//! Steps the effect at 60 Hz and logs particle counts once per simulated
//! second. Set `RUST_LOG=debug` to see assembly details.

use particle_fx::time::Time;
use particle_fx::{create_effect, Effect, EffectKind, SystemError};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SECONDS: f64 = 10.0;

struct Args {
    kind: EffectKind,
    particles: usize,
    seconds: f64,
}

fn usage() -> String {
    let names: Vec<&str> = EffectKind::ALL.iter().map(|k| k.name()).collect();
    format!("usage: particle-fx <{}> [particles] [seconds]", names.join("|"))
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let kind = args
        .next()
        .ok_or_else(|| "missing effect name".to_string())?
        .parse::<EffectKind>()
        .map_err(|e| e.to_string())?;
    let particles = match args.next() {
        Some(s) => s.parse().map_err(|_| format!("invalid particle count '{}'", s))?,
        None => 0,
    };
    let seconds = match args.next() {
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid duration '{}'", s))?,
        None => DEFAULT_SECONDS,
    };

    Ok(Args {
        kind,
        particles,
        seconds,
    })
}

fn run(args: Args) -> Result<(), SystemError> {
    let mut effect = create_effect(args.kind, args.particles)?;
    info!(
        effect = effect.name(),
        capacity = effect.num_all_particles(),
        "{}",
        effect.description()
    );

    let mut time = Time::fixed(1.0 / 60.0);
    for _ in 0..time.steps_for(args.seconds) {
        let dt = time.tick();
        effect.update(dt);
        time.measure(|| effect.cpu_update(dt));

        if time.crossed_second() {
            info!(
                t = time.elapsed().round(),
                alive = effect.num_alive_particles(),
                ratio = effect.alive_to_all_ratio(),
                us_per_step = time.take_report(),
                "step"
            );
        }
    }

    info!(
        frames = time.frame(),
        us_per_step = time.mean_step_micros(),
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("{}", usage());
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
