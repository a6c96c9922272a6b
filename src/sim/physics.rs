//! Player movement: recoil, friction and wall sliding

use glam::Vec2;

use super::map::TileMap;
use super::state::{Bullet, Controls, Owner, Player};
use crate::tuning::Tuning;
use crate::{angle_between, direction_to};

/// Fire if the trigger is held and the cooldown has elapsed.
///
/// On a shot the player is kicked opposite the bullet and `last_shot` is
/// reset. Aiming at (or within `aim_epsilon` of) the player does nothing.
pub fn try_fire(
    player: &mut Player,
    controls: &Controls,
    last_shot: &mut f64,
    tuning: &Tuning,
    now: f64,
) -> Option<Bullet> {
    if !controls.shooting || now - *last_shot < tuning.cooldown {
        return None;
    }
    let dir = direction_to(player.pos, controls.aim, tuning.aim_epsilon)?;

    player.vel -= dir * tuning.shoot_power;
    *last_shot = now;
    log::debug!("Player fired toward {:?}", dir);

    Some(Bullet::new(
        player.pos,
        dir,
        tuning.bullet_speed,
        tuning.player_range,
        Owner::Player,
    ))
}

/// Advance position by velocity, one axis at a time, then damp velocity
/// and turn toward the aim point
pub fn integrate(player: &mut Player, aim: Vec2, map: &TileMap, tuning: &Tuning, dt: f32) {
    let radius = tuning.collision_radius;

    // Each axis is accepted on its own so a blocked axis slides along walls
    let nx = player.pos.x + player.vel.x * dt;
    if map.can_occupy(nx, player.pos.y, radius) {
        player.pos.x = nx;
    }
    let ny = player.pos.y + player.vel.y * dt;
    if map.can_occupy(player.pos.x, ny, radius) {
        player.pos.y = ny;
    }

    // Damping is normalized to a nominal 60 Hz step
    player.vel *= tuning.friction.powf(dt * 60.0);
    player.angle = angle_between(player.pos, aim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAP_HEIGHT, MAP_WIDTH};
    use crate::sim::map::tests::{island_rows, map_from_rows};

    const DT: f32 = 1.0 / 60.0;

    fn firing_at(aim: Vec2) -> Controls {
        Controls {
            shooting: true,
            aim,
        }
    }

    #[test]
    fn test_fire_applies_recoil() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        let mut last_shot = f64::NEG_INFINITY;

        let bullet = try_fire(&mut player, &firing_at(Vec2::new(3.0, 0.0)), &mut last_shot, &tuning, 1.0)
            .expect("should fire");
        assert_eq!(bullet.owner, Owner::Player);
        assert_eq!(bullet.origin, Vec2::ZERO);
        assert_eq!(bullet.vel, Vec2::new(tuning.bullet_speed, 0.0));
        assert_eq!(bullet.range, tuning.player_range);
        assert_eq!(player.vel, Vec2::new(-tuning.shoot_power, 0.0));
        assert_eq!(last_shot, 1.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        let mut last_shot = 1.0;
        let controls = firing_at(Vec2::new(0.0, 2.0));

        assert!(try_fire(&mut player, &controls, &mut last_shot, &tuning, 1.1).is_none());
        assert!(try_fire(&mut player, &controls, &mut last_shot, &tuning, 1.25).is_some());
        assert!(try_fire(&mut player, &controls, &mut last_shot, &tuning, 1.3).is_none());
    }

    #[test]
    fn test_no_fire_without_trigger() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        let mut last_shot = f64::NEG_INFINITY;
        let controls = Controls {
            shooting: false,
            aim: Vec2::new(4.0, 0.0),
        };
        assert!(try_fire(&mut player, &controls, &mut last_shot, &tuning, 5.0).is_none());
    }

    #[test]
    fn test_aim_on_player_neither_fires_nor_recoils() {
        let tuning = Tuning::default();
        let mut player = Player {
            pos: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        let mut last_shot = f64::NEG_INFINITY;
        let aim = player.pos + Vec2::new(0.05, -0.05);

        assert!(try_fire(&mut player, &firing_at(aim), &mut last_shot, &tuning, 2.0).is_none());
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(last_shot, f64::NEG_INFINITY);
    }

    #[test]
    fn test_friction_normalized_to_sixty_hz() {
        let tuning = Tuning::default();
        let map = map_from_rows(&island_rows());

        let mut a = Player {
            vel: Vec2::new(2.0, 0.0),
            ..Default::default()
        };
        let mut b = a;
        integrate(&mut a, Vec2::X, &map, &tuning, DT * 2.0);
        integrate(&mut b, Vec2::X, &map, &tuning, DT);
        integrate(&mut b, Vec2::X, &map, &tuning, DT);
        assert!((a.vel.x - 2.0 * 0.81).abs() < 1e-4);
        assert!((a.vel.x - b.vel.x).abs() < 1e-4);
    }

    #[test]
    fn test_wall_stops_one_axis_and_slides_the_other() {
        let tuning = Tuning::default();
        // Single passable row through the origin, water from world x = 5
        let mut rows = vec![vec![0u8; MAP_WIDTH]; MAP_HEIGHT];
        for cell in rows[MAP_HEIGHT / 2].iter_mut().take(20).skip(1) {
            *cell = 1;
        }
        let map = map_from_rows(&rows);
        let mut player = Player {
            vel: Vec2::new(60.0, 0.5),
            ..Default::default()
        };

        for _ in 0..120 {
            integrate(&mut player, Vec2::new(10.0, 0.0), &map, &tuning, DT);
            assert!(player.pos.x + tuning.collision_radius < 5.0);
        }
        assert!(player.pos.x > 4.0);
        // The y-impulse still moved the player while x was blocked
        assert!(player.pos.y > 0.05);
    }

    #[test]
    fn test_blocked_both_axes_stays_put() {
        let tuning = Tuning::default();
        let map = map_from_rows(&vec![vec![0u8; MAP_WIDTH]; MAP_HEIGHT]);
        let mut player = Player {
            vel: Vec2::new(3.0, -3.0),
            ..Default::default()
        };
        integrate(&mut player, Vec2::new(0.0, 1.0), &map, &tuning, DT);
        assert_eq!(player.pos, Vec2::ZERO);
        assert!((player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
