//! Headless runner: load a universe config, run it for a while and print
//! per-color statistics. Handy for tuning `assets/universe.toml` without a
//! browser.
//!
//! ```text
//! particle-life [config.toml]
//! PARTICLE_LIFE_TICKS=500 PARTICLE_LIFE_EXPLORE=50 particle-life
//! RUST_LOG=particle_life=debug particle-life
//! ```
//!
//! Logging goes through `tracing-subscriber`, which also picks up the
//! library's `log` records. `RUST_LOG` wins; otherwise `debug = true` in the
//! config raises the level from `info` to `debug`.

use particle_life::{Universe, UniverseConfig};
use std::env;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "assets/universe.toml";
const DEFAULT_TICKS: u64 = 200;

/// Read a numeric env var, falling back (with a warning) on parse failure.
fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{name}={raw} is not a number; using {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn print_stats(universe: &Universe) {
    let counts = universe.color_counts();
    let mut sums = vec![(0.0f64, 0.0f64, 0.0f64); counts.len()];
    for a in universe.atom_list() {
        let s = &mut sums[a.color as usize];
        s.0 += a.x as f64;
        s.1 += a.y as f64;
        s.2 += ((a.vx * a.vx + a.vy * a.vy) as f64).sqrt();
    }
    println!("color  atoms   mean x   mean y  mean speed");
    for (color, (&n, &(x, y, speed))) in counts.iter().zip(&sums).enumerate() {
        let n_f = n.max(1) as f64;
        println!(
            "{color:>5} {n:>6} {:>8.1} {:>8.1} {:>11.4}",
            x / n_f,
            y / n_f,
            speed / n_f
        );
    }
}

fn main() -> ExitCode {
    let rust_log_set = env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(false))),
        )
        .with_filter_reloading();
    let filter = builder.reload_handle();
    builder.init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let ticks = env_u64("PARTICLE_LIFE_TICKS", DEFAULT_TICKS);
    let explore_every = env_u64("PARTICLE_LIFE_EXPLORE", 0);

    let config = UniverseConfig::load_or_default(&path);
    if config.debug && !rust_log_set {
        if let Err(e) = filter.reload(EnvFilter::new(default_directive(true))) {
            log::warn!("could not raise log level: {e}");
        }
    }

    let mut universe = match Universe::new(config) {
        Ok(u) => u,
        Err(e) => {
            log::error!("invalid universe config: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "[SETUP] {} atoms in {} colors, {} ticks",
        universe.num_atoms(),
        universe.rules().num_colors(),
        ticks
    );

    let start = Instant::now();
    for t in 1..=ticks {
        universe.tick();
        if explore_every > 0 && t % explore_every == 0 {
            universe.explore();
        }
    }
    let elapsed = start.elapsed();

    print_stats(&universe);
    if ticks > 0 {
        log::info!(
            "[DONE] {:.2} ms/tick",
            elapsed.as_secs_f64() * 1000.0 / ticks as f64
        );
    }
    ExitCode::SUCCESS
}
