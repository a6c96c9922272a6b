//! Recoil Island - a top-down recoil arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map, physics, bullets, AI, game state)
//! - `maps`: Map definition sources (embedded pool or a directory on disk)
//! - `platform`: Browser/native platform abstraction (logging, frame clock)
//! - `best`: Best-level persistence
//! - `driver`: Frame driver shared by the native and web front ends
//! - `web`: wasm-bindgen bindings for the browser host
//! - `tuning`: Data-driven game balance
//! - `error`: Error types for loading maps and tuning

pub mod best;
pub mod driver;
pub mod error;
pub mod maps;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use best::BestLevel;
pub use driver::{Driver, FrameOutcome};
pub use error::{LoadError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed layout constants (balance values live in [`Tuning`])
pub mod consts {
    /// Map grid dimensions in tiles (one tile = one world unit)
    pub const MAP_WIDTH: usize = 30;
    pub const MAP_HEIGHT: usize = 15;

    /// Number of map definitions in the pool
    pub const MAP_POOL_SIZE: usize = 10;
    /// Map used when a requested map cannot be loaded
    pub const FALLBACK_MAP_INDEX: usize = 0;

    /// Number of obstacle sprite variants the renderer can pick from
    pub const OBSTACLE_VARIANTS: u8 = 9;

    /// Draws from the spawn cache before falling back to the farthest point
    pub const SPAWN_ATTEMPTS: u32 = 64;
}

/// Angle (radians) of the direction from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction from `from` toward `to`, or `None` if the points are
/// closer than `epsilon`
#[inline]
pub fn direction_to(from: Vec2, to: Vec2, epsilon: f32) -> Option<Vec2> {
    let d = to - from;
    let len = d.length();
    if len > epsilon { Some(d / len) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_guards_epsilon() {
        assert!(direction_to(Vec2::ZERO, Vec2::new(0.05, 0.0), 0.1).is_none());
        let dir = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.1).unwrap();
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec2::new(1.0, 1.0), Vec2::new(1.0, 5.0));
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
