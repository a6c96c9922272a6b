//! Bullet movement, retirement and hit resolution

use glam::Vec2;

use super::map::TileMap;
use super::state::{Bullet, Enemy, Owner, Player};
use crate::tuning::Tuning;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Player was struck by an enemy bullet
    pub player_hit: bool,
    /// Positions of enemies removed this pass, in hit order
    pub kills: Vec<Vec2>,
    /// The last enemy was removed this pass
    pub cleared: bool,
}

impl HitReport {
    /// A loss or a level clear has been decided
    pub fn is_terminal(&self) -> bool {
        self.player_hit || self.cleared
    }
}

/// Move every bullet along its velocity
pub fn advance(bullets: &mut [Bullet], dt: f32) {
    for bullet in bullets.iter_mut() {
        bullet.pos += bullet.vel * dt;
    }
}

/// Retire expired and obstructed bullets, then credit hits.
///
/// Enemies are tested in order and the first within `enemy_hitbox` is
/// removed. A bullet that hits is retired. Once a loss or clear is decided
/// later bullets are only pruned, never credited.
pub fn resolve(
    bullets: &mut Vec<Bullet>,
    player: &Player,
    enemies: &mut Vec<Enemy>,
    map: &TileMap,
    tuning: &Tuning,
) -> HitReport {
    let mut report = HitReport::default();

    bullets.retain(|bullet| {
        if bullet.expired() || map.blocks_at(bullet.pos.x, bullet.pos.y) {
            return false;
        }
        if report.is_terminal() {
            return true;
        }

        match bullet.owner {
            Owner::Enemy => {
                if bullet.pos.distance(player.pos) < tuning.player_hitbox {
                    report.player_hit = true;
                    return false;
                }
            }
            Owner::Player => {
                let hit = enemies
                    .iter()
                    .position(|e| bullet.pos.distance(e.pos) < tuning.enemy_hitbox);
                if let Some(i) = hit {
                    let enemy = enemies.remove(i);
                    report.kills.push(enemy.pos);
                    if enemies.is_empty() {
                        report.cleared = true;
                    }
                    return false;
                }
            }
        }
        true
    });

    report
}
