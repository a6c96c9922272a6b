//! Read-only view of a session for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::map::Obstacle;
use super::state::{GamePhase, Owner, Player, Session};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians), derived from `vel`
    pub angle: f32,
    pub owner: Owner,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub best: u32,
    /// Index of the loaded map; redraw the terrain when it changes
    pub map_index: Option<usize>,
    pub player: Player,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub obstacles: Vec<Obstacle>,
    pub decals: Vec<Vec2>,
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            level: self.level,
            best: self.best,
            map_index: self.map.index(),
            player: self.player,
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    angle: e.angle,
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    vel: b.vel,
                    angle: b.vel.y.atan2(b.vel.x),
                    owner: b.owner,
                })
                .collect(),
            obstacles: self.map.obstacles().to_vec(),
            decals: self.decals.clone(),
        }
    }
}
