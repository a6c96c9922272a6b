//! Recoil Island entry point
//!
//! Native builds run a headless demo: a seeded session driven at 60 Hz by a
//! small autopilot until the run ends, persisting the best level reached.
//!
//! Usage: `recoil-island [seed] [maps-dir]`. Set `RECOIL_TUNING` to a JSON
//! file to override balance values.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use glam::Vec2;
    use recoil_island::maps::{DirMapSource, EmbeddedMaps, MapSource};
    use recoil_island::platform;
    use recoil_island::sim::{GamePhase, Session, TickInput};
    use recoil_island::{BestLevel, Driver, Tuning};

    /// Simulated frame interval
    const FRAME: f64 = 1.0 / 60.0;
    /// Give up on a run after this much simulated time
    const MAX_RUN_SECONDS: f64 = 600.0;
    const BEST_FILE: &str = "recoil-island-best.json";

    /// Shoot at the nearest enemy when it is in reach, otherwise shoot away
    /// from it and let the recoil carry the player closer
    fn autopilot(session: &Session) -> TickInput {
        match session.phase {
            GamePhase::Menu | GamePhase::Ready => TickInput {
                confirm: true,
                ..Default::default()
            },
            GamePhase::Playing => {
                let player = session.player.pos;
                let nearest = session.enemies.iter().map(|e| e.pos).min_by(|a, b| {
                    a.distance_squared(player)
                        .partial_cmp(&b.distance_squared(player))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                match nearest {
                    Some(target) => {
                        let reach = session.tuning.player_range * 0.9;
                        let aim = if target.distance(player) <= reach {
                            target
                        } else {
                            player - (target - player)
                        };
                        TickInput {
                            aim: Some(aim),
                            begin_fire: true,
                            ..Default::default()
                        }
                    }
                    None => TickInput {
                        aim: Some(player + Vec2::X),
                        end_fire: true,
                        ..Default::default()
                    },
                }
            }
            GamePhase::Paused | GamePhase::Countdown | GamePhase::Lost => TickInput::default(),
        }
    }

    fn load_tuning() -> Tuning {
        match std::env::var("RECOIL_TUNING") {
            Ok(path) => Tuning::load(Path::new(&path)).unwrap_or_else(|e| {
                log::warn!("Using default tuning: {e}");
                Tuning::default()
            }),
            Err(_) => Tuning::default(),
        }
    }

    pub fn run() {
        platform::init_logging();

        let mut args = std::env::args().skip(1);
        let seed: u64 = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        let maps: Box<dyn MapSource> = match args.next() {
            Some(dir) => Box::new(DirMapSource::new(dir)),
            None => Box::new(EmbeddedMaps),
        };

        let tuning = load_tuning();
        let best_path = PathBuf::from(BEST_FILE);
        let best = BestLevel::load(&best_path);

        log::info!("Recoil Island (headless) starting with seed {}", seed);
        let session = Session::with_source(seed, best.level, tuning, maps);
        let mut driver = Driver::new(session, best);

        let max_frames = (MAX_RUN_SECONDS / FRAME) as u64;
        for frame in 0..max_frames {
            let now = frame as f64 * FRAME;
            driver.queue(&autopilot(&driver.session));
            let outcome = driver.frame(now);

            for cue in &outcome.cues {
                log::debug!("cue: {}", cue.as_str());
            }
            if outcome.best_changed {
                driver.best.save(&best_path);
            }
            if let Some(message) = outcome.load_failed {
                log::error!("No playable map: {}", message);
                return;
            }
            if outcome.run_over {
                log::info!(
                    "Run over at level {} after {:.1}s (best {})",
                    driver.session.level,
                    now,
                    driver.best.level
                );
                return;
            }
        }

        log::info!(
            "Stopped after {:.0}s at level {} (best {})",
            MAX_RUN_SECONDS,
            driver.session.level,
            driver.best.level
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds start from `recoil_island::web::wasm_main`
}
