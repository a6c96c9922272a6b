//! Per-tick state machine
//!
//! Input intents are applied against the phase the tick started in, then the
//! active phase is stepped. Physics, AI and hit resolution only run while
//! `Playing`; `Countdown` and `Lost` let in-flight bullets keep moving until
//! their timer runs out.

use glam::Vec2;
use rand::Rng;

use super::map::TileMap;
use super::state::{Enemy, GameEvent, GamePhase, Player, Session, SoundCue};
use super::{ai, bullets, physics};
use crate::consts::{FALLBACK_MAP_INDEX, SPAWN_ATTEMPTS};

/// Discrete intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim point in world space (pointer moved)
    pub aim: Option<Vec2>,
    /// Fire button pressed
    pub begin_fire: bool,
    /// Fire button released
    pub end_fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start / continue / resume
    pub confirm: bool,
    /// Abandon the run from the pause screen
    pub home: bool,
    /// The game lost foreground visibility
    pub hidden: bool,
}

/// Advance the session by one tick.
///
/// `now` is the driver's monotonic clock in seconds; `dt` is clamped to
/// `tuning.max_dt`.
pub fn tick(session: &mut Session, input: &TickInput, now: f64, dt: f32) {
    // Never negative, even if max_dt was edited to a bad value after construction
    let dt = dt.min(session.tuning.max_dt).max(0.0);

    apply_input(session, input, now);

    match session.phase {
        GamePhase::Playing => step_playing(session, now, dt),
        GamePhase::Countdown => {
            bullets::advance(&mut session.bullets, dt);
            if now - session.timer > session.tuning.countdown {
                let next = session.level + 1;
                session.start_level(next, now);
            }
        }
        GamePhase::Lost => {
            bullets::advance(&mut session.bullets, dt);
            if now - session.timer > session.tuning.countdown {
                session.go_home();
            }
        }
        GamePhase::Menu | GamePhase::Ready | GamePhase::Paused => {}
    }
}

fn apply_input(session: &mut Session, input: &TickInput, now: f64) {
    if let Some(aim) = input.aim {
        session.controls.aim = aim;
    }

    match session.phase {
        GamePhase::Menu => {
            if input.confirm {
                session.start_level(1, now);
            }
        }
        GamePhase::Ready => {
            if input.confirm {
                session.set_phase(GamePhase::Playing);
                session.cue(SoundCue::StartLevel);
            }
        }
        GamePhase::Playing => {
            if input.pause || input.hidden {
                session.controls.shooting = false;
                session.set_phase(GamePhase::Paused);
                if input.pause {
                    session.cue(SoundCue::Action);
                }
            } else if input.begin_fire {
                session.controls.shooting = true;
            }
        }
        GamePhase::Paused => {
            if input.home {
                session.cue(SoundCue::Action);
                session.go_home();
            } else if input.pause || input.confirm {
                session.set_phase(GamePhase::Playing);
                session.cue(SoundCue::Action);
            }
        }
        GamePhase::Countdown | GamePhase::Lost => {}
    }

    if input.end_fire {
        session.controls.shooting = false;
    }
}

fn step_playing(session: &mut Session, now: f64, dt: f32) {
    let s = session;

    if let Some(bullet) = physics::try_fire(
        &mut s.player,
        &s.controls,
        &mut s.last_shot,
        &s.tuning,
        now,
    ) {
        s.bullets.push(bullet);
        s.cue(SoundCue::Shot);
    }
    physics::integrate(&mut s.player, s.controls.aim, &s.map, &s.tuning, dt);

    let fired = ai::update_enemies(&mut s.enemies, &s.player, &s.tuning, s.level, now, &mut s.rng);
    for _ in &fired {
        s.cue(SoundCue::Shot);
    }
    s.bullets.extend(fired);

    bullets::advance(&mut s.bullets, dt);
    let report = bullets::resolve(&mut s.bullets, &s.player, &mut s.enemies, &s.map, &s.tuning);

    for pos in &report.kills {
        s.decals.push(*pos);
        s.cue(SoundCue::Death);
    }

    if report.player_hit {
        s.decals.push(s.player.pos);
        s.cue(SoundCue::Death);
        s.timer = now;
        s.set_phase(GamePhase::Lost);
    } else if report.cleared {
        let level = s.level;
        s.record_level(level);
        s.timer = now;
        s.set_phase(GamePhase::Countdown);
    }
}

/// Draw a spawn point at least `min_dist` from `from`.
///
/// Gives up after `SPAWN_ATTEMPTS` draws and takes the cached point farthest
/// from `from`, so a map with no qualifying point cannot stall level setup.
pub fn place_enemy<R: Rng + ?Sized>(map: &TileMap, from: Vec2, min_dist: f32, rng: &mut R) -> Vec2 {
    for _ in 0..SPAWN_ATTEMPTS {
        let pos = map.random_spawn_point(rng);
        if pos.distance(from) >= min_dist {
            return pos;
        }
    }
    let pos = map.farthest_spawn_point(from);
    log::warn!(
        "No spawn point {} from {:?} after {} draws, using farthest {:?}",
        min_dist,
        from,
        SPAWN_ATTEMPTS,
        pos
    );
    pos
}

impl Session {
    /// Set up `level` and enter `Playing` (level 1) or `Ready`.
    /// Returns to the menu if no map can be loaded.
    pub(crate) fn start_level(&mut self, level: u32, now: f64) {
        let reuse_home = level == 1 && self.home_map.is_some() && self.map.index() == self.home_map;
        if reuse_home {
            self.decals.clear();
        } else {
            let index = if level == 1 { self.home_map } else { None };
            if !self.load_map(index) {
                self.enemies.clear();
                self.bullets.clear();
                self.set_phase(GamePhase::Menu);
                return;
            }
        }

        self.level = level;
        self.timer = now;
        self.player = Player::default();
        self.enemies.clear();
        self.bullets.clear();
        self.populate_enemies();
        log::info!(
            "Level {} on map {:?} with {} enemies",
            level,
            self.map.index(),
            self.enemies.len()
        );

        if level == 1 {
            self.set_phase(GamePhase::Playing);
            self.cue(SoundCue::StartLevel);
        } else {
            self.set_phase(GamePhase::Ready);
        }
    }

    /// Abandon the run and show the menu on a fresh home map
    pub(crate) fn go_home(&mut self) {
        self.set_phase(GamePhase::Menu);
        self.load_home_map();
    }

    pub(crate) fn load_home_map(&mut self) {
        let index = self.rng.random_range(0..self.maps.pool_size().max(1));
        self.home_map = if self.load_map(Some(index)) {
            self.map.index()
        } else {
            None
        };
        self.player = Player::default();
        self.enemies.clear();
        self.bullets.clear();
    }

    /// Load a map (random when `index` is `None`), falling back to the
    /// default map on failure.
    /// Returns false if neither could be loaded; the current map is kept.
    fn load_map(&mut self, index: Option<usize>) -> bool {
        let requested =
            index.unwrap_or_else(|| self.rng.random_range(0..self.maps.pool_size().max(1)));
        let result = self.map.load(self.maps.as_ref(), Some(requested), &mut self.rng);
        let result = match result {
            Ok(i) => Ok(i),
            Err(e) => {
                log::warn!("Map {requested} failed: {e}; falling back to map {FALLBACK_MAP_INDEX}");
                self.map
                    .load(self.maps.as_ref(), Some(FALLBACK_MAP_INDEX), &mut self.rng)
            }
        };
        match result {
            Ok(_) => {
                self.decals.clear();
                true
            }
            Err(e) => {
                log::error!("Fallback map failed: {e}");
                self.emit(GameEvent::LoadFailed {
                    requested,
                    fallback: FALLBACK_MAP_INDEX,
                    error: e.to_string(),
                });
                false
            }
        }
    }

    fn populate_enemies(&mut self) {
        let count = self.tuning.enemy_count(self.level);
        let from = self.player.pos;
        for _ in 0..count {
            let pos = place_enemy(&self.map, from, self.tuning.min_spawn_dist, &mut self.rng);
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            self.enemies.push(Enemy::new(pos, angle));
        }
    }
}
