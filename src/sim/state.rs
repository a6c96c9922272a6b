//! Game state and core simulation types
//!
//! `Session` owns everything a tick mutates: the loaded map, the player,
//! the enemies and the bullets. Components borrow the pieces they need.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::map::{CollisionRules, TileMap};
use crate::maps::{EmbeddedMaps, MapSource};
use crate::tuning::Tuning;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Home screen, home map in the background
    Menu,
    /// Level set up, waiting for the player to confirm
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, short delay before the next one
    Countdown,
    /// Player was hit, short delay before returning to the menu
    Lost,
}

/// Fire-and-forget audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Shot,
    Death,
    StartLevel,
    Action,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shot => "shot",
            SoundCue::Death => "death",
            SoundCue::StartLevel => "startlevel",
            SoundCue::Action => "action",
        }
    }
}

/// Things the outside world may want to react to, drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(SoundCue),
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// A new best level was reached; persist it
    NewBest(u32),
    /// Neither the requested map nor the fallback could be loaded
    LoadFailed {
        requested: usize,
        fallback: usize,
        error: String,
    },
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
        }
    }
}

/// An AI shooter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub angle: f32,
    /// Clock time after which the next shot may fire
    pub next_fire: f64,
    /// Whether the player was in range on the previous tick
    pub was_in_range: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle,
            next_fire: 0.0,
            was_in_range: false,
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub origin: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Retired once farther than this from `origin`
    pub range: f32,
    pub owner: Owner,
}

impl Bullet {
    pub fn new(origin: Vec2, dir: Vec2, speed: f32, range: f32, owner: Owner) -> Self {
        Self {
            origin,
            pos: origin,
            vel: dir * speed,
            range,
            owner,
        }
    }

    pub fn traveled(&self) -> f32 {
        self.pos.distance(self.origin)
    }

    pub fn expired(&self) -> bool {
        self.traveled() > self.range
    }
}

/// Held input state carried between ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    /// Fire button held
    pub shooting: bool,
    /// Latest aim point in world space
    pub aim: Vec2,
}

/// The whole game: map, entities, phase and progression
pub struct Session {
    pub tuning: Tuning,
    pub map: TileMap,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Best level ever completed
    pub best: u32,
    /// Clock time at which the current timed phase began
    pub timer: f64,
    /// Clock time of the last player shot
    pub last_shot: f64,
    pub player: Player,
    /// Stable order; hit tests credit the first match
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub controls: Controls,
    /// Cosmetic blood decals, cleared with every map load
    pub decals: Vec<Vec2>,
    /// Map index the menu is showing; level 1 is played on it
    pub home_map: Option<usize>,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) maps: Box<dyn MapSource>,
}

impl Session {
    /// New session on the embedded map pool, starting at the menu
    pub fn new(seed: u64, best: u32) -> Self {
        Self::with_source(seed, best, Tuning::default(), Box::new(EmbeddedMaps))
    }

    /// New session with explicit tuning and map source, starting at the menu.
    /// Tuning that fails validation is replaced by the defaults.
    pub fn with_source(seed: u64, best: u32, tuning: Tuning, maps: Box<dyn MapSource>) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning ({e}), using defaults");
                Tuning::default()
            }
        };
        let rules = CollisionRules::from(&tuning);
        let mut session = Self {
            tuning,
            map: TileMap::new(rules),
            phase: GamePhase::Menu,
            level: 1,
            best,
            timer: 0.0,
            last_shot: f64::NEG_INFINITY,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            controls: Controls::default(),
            decals: Vec::new(),
            home_map: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            maps,
        };
        session.load_home_map();
        session
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn cue(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Cue(cue));
    }

    /// Switch phase, logging and reporting the transition
    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?} (level {})", from, to, self.level);
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Record a completed level; returns true on a new best
    pub(crate) fn record_level(&mut self, level: u32) -> bool {
        if level > self.best {
            self.best = level;
            log::info!("New best level: {}", level);
            self.emit(GameEvent::NewBest(level));
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_range() {
        let b = Bullet::new(Vec2::new(1.0, 1.0), Vec2::X, 10.0, 5.0, Owner::Player);
        assert_eq!(b.vel, Vec2::new(10.0, 0.0));
        assert_eq!(b.traveled(), 0.0);
        assert!(!b.expired());
    }

    #[test]
    fn test_new_session_starts_at_menu_on_home_map() {
        let session = Session::new(42, 0);
        assert_eq!(session.phase, GamePhase::Menu);
        assert!(session.home_map.is_some());
        assert_eq!(session.map.index(), session.home_map);
        assert!(session.enemies.is_empty());
    }

    #[test]
    fn test_invalid_tuning_replaced_by_defaults() {
        let tuning = Tuning {
            max_dt: -0.1,
            max_enemies: 0,
            ..Default::default()
        };
        let session = Session::with_source(1, 0, tuning, Box::new(EmbeddedMaps));
        assert_eq!(session.tuning, Tuning::default());
    }

    #[test]
    fn test_record_level() {
        let mut session = Session::new(1, 2);
        assert!(session.record_level(3));
        assert_eq!(session.best, 3);
        assert!(!session.record_level(1));
        assert_eq!(session.best, 3);
        let events = session.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::NewBest(_))).count(),
            1
        );
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::StartLevel.as_str(), "startlevel");
        assert_eq!(serde_json::to_string(&SoundCue::Shot).unwrap(), "\"shot\"");
    }
}
