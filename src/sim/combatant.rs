//! Damageable bodies: the shared combatant contract and laning creeps

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::timer::Countdown;
use crate::direction_to;
use crate::tuning::EnemyTuning;

/// Capabilities every damageable body exposes to skills and the collision pass
pub trait Combatant {
    fn position(&self) -> Vec2;
    /// Body side length (collision radius is half of it)
    fn size(&self) -> f32;
    fn hp(&self) -> f32;
    fn max_hp(&self) -> f32;
    fn take_damage(&mut self, damage: f32);
    fn apply_stun(&mut self, secs: f32);
    /// `direction` must be a unit vector
    fn apply_knockback(&mut self, direction: Vec2, force: f32, secs: f32);

    fn is_dead(&self) -> bool {
        self.hp() <= 0.0
    }

    fn hp_fraction(&self) -> f32 {
        if self.max_hp() <= 0.0 {
            0.0
        } else {
            (self.hp() / self.max_hp()).clamp(0.0, 1.0)
        }
    }
}

/// Forced displacement along a fixed direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub direction: Vec2,
    pub force: f32,
    pub timer: Countdown,
}

impl Knockback {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.timer.is_running()
    }

    /// Displacement for this tick, decaying the force by `friction`
    pub fn step(&mut self, dt: f32, friction: f32) -> Vec2 {
        let offset = self.direction * self.force * dt;
        self.force *= friction;
        self.timer.tick(dt);
        offset
    }
}

/// Crowd-control state shared by enemies and characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub stun: Countdown,
    pub knockback: Knockback,
}

impl Status {
    pub fn stun(&mut self, secs: f32) {
        self.stun.extend(secs);
    }

    /// Knockback also stuns for half its duration
    pub fn knock_back(&mut self, direction: Vec2, force: f32, secs: f32) {
        self.knockback = Knockback {
            direction,
            force,
            timer: Countdown::new(secs),
        };
        self.stun.extend(secs / 2.0);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A laning creep that walks straight at the world's character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub status: Status,
}

impl Enemy {
    pub fn new(pos: Vec2, tuning: &EnemyTuning) -> Self {
        debug_assert!(tuning.size > 0.0);
        Self {
            pos,
            size: tuning.size,
            speed: tuning.speed,
            hp: tuning.hp,
            max_hp: tuning.hp,
            status: Status::default(),
        }
    }

    /// Stunned: frozen. Knocked back: pushed. Otherwise chase `target`.
    pub fn update(&mut self, dt: f32, target: Vec2, friction: f32) {
        if self.status.stun.is_running() {
            self.status.stun.tick(dt);
            return;
        }

        if self.status.knockback.is_active() {
            self.pos += self.status.knockback.step(dt, friction);
            return;
        }

        self.pos += direction_to(self.pos, target) * self.speed * dt;
    }
}

impl Combatant for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn hp(&self) -> f32 {
        self.hp
    }

    fn max_hp(&self) -> f32 {
        self.max_hp
    }

    fn take_damage(&mut self, damage: f32) {
        self.hp = (self.hp - damage).max(0.0);
    }

    fn apply_stun(&mut self, secs: f32) {
        self.status.stun(secs);
    }

    fn apply_knockback(&mut self, direction: Vec2, force: f32, secs: f32) {
        self.status.knock_back(direction, force, secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), &EnemyTuning::default())
    }

    #[test]
    fn test_enemy_chases_target() {
        let mut e = enemy_at(0.0, 0.0);
        e.update(0.5, Vec2::new(100.0, 0.0), 0.9);
        assert!((e.pos.x - 50.0).abs() < 1e-4);
        assert_eq!(e.pos.y, 0.0);
    }

    #[test]
    fn test_enemy_on_target_stays_put() {
        let mut e = enemy_at(40.0, 40.0);
        e.update(0.5, Vec2::new(40.0, 40.0), 0.9);
        assert_eq!(e.pos, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_stunned_enemy_does_not_move() {
        let mut e = enemy_at(0.0, 0.0);
        e.apply_stun(1.0);
        e.update(0.5, Vec2::new(100.0, 0.0), 0.9);
        assert_eq!(e.pos, Vec2::ZERO);
        // Shorter stun never overrides a longer one
        e.apply_stun(0.1);
        assert!((e.status.stun.remaining() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_knockback_stuns_then_pushes() {
        let mut e = enemy_at(0.0, 0.0);
        e.apply_knockback(Vec2::X, 300.0, 0.2);
        assert!((e.status.stun.remaining() - 0.1).abs() < 1e-6);

        // Stun phase: no movement
        e.update(0.1, Vec2::new(-500.0, 0.0), 0.9);
        assert_eq!(e.pos, Vec2::ZERO);

        // Knockback phase: pushed along +X despite chasing -X
        e.update(0.05, Vec2::new(-500.0, 0.0), 0.9);
        assert!((e.pos.x - 15.0).abs() < 1e-4);
        assert!((e.status.knockback.force - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_hp_never_negative() {
        let mut e = enemy_at(0.0, 0.0);
        e.take_damage(1000.0);
        assert_eq!(e.hp, 0.0);
        assert!(e.is_dead());
        assert_eq!(e.hp_fraction(), 0.0);
    }
}
