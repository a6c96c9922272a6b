//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the driver (`now`, `dt`), never from the system clock
//! - Seeded RNG only
//! - Stable iteration order (enemies and bullets keep insertion order)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod bullets;
pub mod map;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use bullets::HitReport;
pub use map::{CollisionRules, LoadTicket, Obstacle, PreparedMap, Tile, TileGrid, TileMap};
pub use snapshot::Snapshot;
pub use state::{
    Bullet, Controls, Enemy, GameEvent, GamePhase, Owner, Player, Session, SoundCue,
};
pub use tick::{TickInput, place_enemy, tick};
