//! Enemy targeting and fire scheduling
//!
//! An enemy only engages while the player is within `enemy_range`. Entering
//! range re-arms its fire timer with a random delay so it never shoots on the
//! same tick it first sees the player.

use rand::Rng;

use super::state::{Bullet, Enemy, Owner, Player};
use crate::tuning::Tuning;
use crate::{angle_between, direction_to};

/// Uniform delay in `[enemy_fire_min, enemy_fire_max)`
pub fn fire_interval<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f64 {
    tuning.enemy_fire_min + rng.random::<f64>() * (tuning.enemy_fire_max - tuning.enemy_fire_min)
}

/// Run one AI step for every enemy; returns the bullets fired
pub fn update_enemies<R: Rng + ?Sized>(
    enemies: &mut [Enemy],
    player: &Player,
    tuning: &Tuning,
    level: u32,
    now: f64,
    rng: &mut R,
) -> Vec<Bullet> {
    let mut fired = Vec::new();
    let speed = tuning.enemy_bullet_speed(level);

    for enemy in enemies.iter_mut() {
        let in_range = enemy.pos.distance(player.pos) <= tuning.enemy_range;

        if in_range {
            if !enemy.was_in_range {
                enemy.next_fire = now + fire_interval(tuning, rng);
            }

            enemy.angle = angle_between(enemy.pos, player.pos);

            if now > enemy.next_fire {
                if let Some(dir) = direction_to(enemy.pos, player.pos, tuning.aim_epsilon) {
                    fired.push(Bullet::new(enemy.pos, dir, speed, tuning.enemy_range, Owner::Enemy));
                }
                enemy.next_fire = now + fire_interval(tuning, rng);
            }
        }

        enemy.was_in_range = in_range;
    }

    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_out_of_range_enemy_is_idle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![Enemy::new(Vec2::new(13.0, 0.0), 1.0)];

        let fired = update_enemies(&mut enemies, &Player::default(), &tuning, 1, 100.0, &mut rng);
        assert!(fired.is_empty());
        assert_eq!(enemies[0].angle, 1.0);
        assert!(!enemies[0].was_in_range);
        assert_eq!(enemies[0].next_fire, 0.0);
    }

    #[test]
    fn test_range_entry_delays_first_shot() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut enemies = vec![Enemy::new(Vec2::new(12.0, 0.0), 0.0)];
        let player = Player::default();

        // next_fire starts at 0, so without re-arming this would fire now
        let fired = update_enemies(&mut enemies, &player, &tuning, 1, 50.0, &mut rng);
        assert!(fired.is_empty());
        assert!(enemies[0].was_in_range);
        assert!(enemies[0].next_fire >= 51.0 && enemies[0].next_fire < 53.0);
        assert!((enemies[0].angle - std::f32::consts::PI).abs() < 1e-6);

        let due = enemies[0].next_fire;
        assert!(update_enemies(&mut enemies, &player, &tuning, 1, due, &mut rng).is_empty());

        let fired = update_enemies(&mut enemies, &player, &tuning, 1, due + 0.01, &mut rng);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].owner, Owner::Enemy);
        assert_eq!(fired[0].origin, Vec2::new(12.0, 0.0));
        assert_eq!(fired[0].vel, Vec2::new(-tuning.bullet_speed, 0.0));
        assert_eq!(fired[0].range, tuning.enemy_range);
        assert!(enemies[0].next_fire >= due + 1.01);
    }

    #[test]
    fn test_leaving_and_reentering_rearms() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemies = vec![Enemy::new(Vec2::new(5.0, 0.0), 0.0)];
        let near = Player::default();
        let far = Player {
            pos: Vec2::new(-10.0, 0.0),
            ..Default::default()
        };

        update_enemies(&mut enemies, &near, &tuning, 1, 0.0, &mut rng);
        update_enemies(&mut enemies, &far, &tuning, 1, 10.0, &mut rng);
        assert!(!enemies[0].was_in_range);

        // Long overdue, but re-entering range must not fire instantly
        let fired = update_enemies(&mut enemies, &near, &tuning, 1, 20.0, &mut rng);
        assert!(fired.is_empty());
        assert!(enemies[0].next_fire >= 21.0);
    }

    #[test]
    fn test_enemy_on_top_of_player_holds_fire() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemies = vec![Enemy::new(Vec2::new(0.05, 0.0), 0.0)];
        enemies[0].was_in_range = true;
        let fired = update_enemies(&mut enemies, &Player::default(), &tuning, 1, 9.0, &mut rng);
        assert!(fired.is_empty());
        // Still rescheduled
        assert!(enemies[0].next_fire >= 10.0);
    }

    #[test]
    fn test_bullet_speed_bonus_past_cap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemies = vec![Enemy::new(Vec2::new(0.0, 4.0), 0.0)];
        enemies[0].was_in_range = true;
        let fired = update_enemies(&mut enemies, &Player::default(), &tuning, 14, 1.0, &mut rng);
        assert_eq!(fired.len(), 1);
        assert!((fired[0].vel.length() - tuning.bullet_speed * 1.2).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_entry_schedule_within_interval(seed in any::<u64>(), now in 0.0f64..10_000.0) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemies = vec![Enemy::new(Vec2::new(6.0, 0.0), 0.0)];
            update_enemies(&mut enemies, &Player::default(), &tuning, 1, now, &mut rng);
            let delay = enemies[0].next_fire - now;
            prop_assert!(delay >= tuning.enemy_fire_min - 1e-9);
            prop_assert!(delay <= tuning.enemy_fire_max + 1e-9);
        }

        #[test]
        fn prop_reschedule_after_shot_within_interval(
            seed in any::<u64>(),
            now in 0.0f64..10_000.0,
            offset in -4.0f32..4.0,
        ) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemies = vec![Enemy::new(Vec2::new(6.0, offset), 0.0)];
            enemies[0].was_in_range = true;
            enemies[0].next_fire = now - 0.5;
            let fired = update_enemies(&mut enemies, &Player::default(), &tuning, 1, now, &mut rng);
            prop_assert_eq!(fired.len(), 1);
            let delay = enemies[0].next_fire - now;
            prop_assert!(delay >= tuning.enemy_fire_min - 1e-9);
            prop_assert!(delay <= tuning.enemy_fire_max + 1e-9);
        }
    }
}
