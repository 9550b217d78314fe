//! Short-lived moving entities and static arena geometry

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::CharacterId;

/// Which ability fired a projectile (drives sprite choice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Shot,
    Volley,
}

/// Knockback carried by a projectile and applied on hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnockbackPayload {
    pub force: f32,
    pub secs: f32,
}

/// A straight-flying projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius
    pub size: f32,
    pub damage: f32,
    /// Firing character (never hit by its own projectile)
    pub owner: CharacterId,
    /// Seconds of flight left
    pub life: f32,
    pub stun: f32,
    pub knockback: Option<KnockbackPayload>,
    pub collided: bool,
}

impl Projectile {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Strictly inside the canvas
    pub fn in_bounds(&self, bounds: Vec2) -> bool {
        self.pos.x > 0.0 && self.pos.x < bounds.x && self.pos.y > 0.0 && self.pos.y < bounds.y
    }

    /// Should be dropped at cleanup
    pub fn is_spent(&self, bounds: Vec2) -> bool {
        self.collided || self.is_dead() || !self.in_bounds(bounds)
    }
}

/// Gold dropped by a slain enemy, homing on the world's character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gem {
    pub pos: Vec2,
    pub value: u32,
    pub size: f32,
    pub speed: f32,
}

impl Gem {
    pub fn new(pos: Vec2, value: u32, size: f32, speed: f32) -> Self {
        Self {
            pos,
            value,
            size,
            speed,
        }
    }

    pub fn update(&mut self, dt: f32, target: Vec2) {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > 1.0 {
            self.pos += to_target / dist * self.speed * dt;
        }
    }

    /// Picked up by a body of side `size` centred at `pos`
    pub fn reached(&self, pos: Vec2, size: f32) -> bool {
        self.pos.distance(pos) < size / 2.0 + self.size
    }
}

/// A fading circle marking where an area skill landed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualEffect {
    pub pos: Vec2,
    pub radius: f32,
    /// Caster, for tinting
    pub owner: Option<CharacterId>,
    pub duration: f32,
    pub life: f32,
}

impl VisualEffect {
    pub fn new(pos: Vec2, radius: f32, owner: Option<CharacterId>, duration: f32) -> Self {
        Self {
            pos,
            radius,
            owner,
            duration,
            life: duration,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fade factor in [0, 1]
    pub fn opacity(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.life / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Static axis-aligned wall (top-left corner + extent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub min: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "obstacle must have area");
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict point containment (edges do not count)
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }

    /// Overlap test against a square body of side `size` centred at `center`
    pub fn overlaps_square(&self, center: Vec2, size: f32) -> bool {
        let half = size / 2.0;
        let max = self.max();
        center.x - half < max.x
            && center.x + half > self.min.x
            && center.y - half < max.y
            && center.y + half > self.min.y
    }

    /// Area shared with a square body of side `size` centred at `center`
    pub fn overlap_area(&self, center: Vec2, size: f32) -> f32 {
        let half = Vec2::splat(size / 2.0);
        let extent = (self.max().min(center + half) - self.min.max(center - half)).max(Vec2::ZERO);
        extent.x * extent.y
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }

    /// Mirror across the vertical centre line of a canvas `width` wide
    pub fn mirrored(&self, width: f32) -> Self {
        Self {
            min: Vec2::new(width - self.min.x - self.size.x, self.min.y),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(life: f32) -> Projectile {
        Projectile {
            kind: ProjectileKind::Shot,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(10.0, 0.0),
            size: 5.0,
            damage: 5.0,
            owner: CharacterId::Player,
            life,
            stun: 0.0,
            knockback: None,
            collided: false,
        }
    }

    #[test]
    fn test_projectile_expires_over_any_dt_partition() {
        let mut p = shot(3.0);
        for dt in [1.0, 0.05, 1.25, 0.4, 0.4] {
            p.update(dt);
        }
        // 3.1 seconds total
        assert!(p.is_dead());
        assert!((p.pos.x - 131.0).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_bounds() {
        let bounds = Vec2::new(800.0, 600.0);
        let mut p = shot(1.0);
        assert!(!p.is_spent(bounds));
        p.pos.x = 800.0;
        assert!(p.is_spent(bounds));
    }

    #[test]
    fn test_gem_homes_and_is_reached() {
        let mut g = Gem::new(Vec2::ZERO, 10, 5.0, 800.0);
        g.update(0.1, Vec2::new(100.0, 0.0));
        assert!((g.pos.x - 80.0).abs() < 1e-3);
        assert!(g.reached(Vec2::new(94.0, 0.0), 20.0));
        assert!(!g.reached(Vec2::new(96.0, 0.0), 20.0));
    }

    #[test]
    fn test_effect_fades() {
        let mut fx = VisualEffect::new(Vec2::ZERO, 100.0, None, 0.3);
        fx.update(0.15);
        assert!((fx.opacity() - 0.5).abs() < 1e-4);
        fx.update(0.2);
        assert!(fx.is_dead());
        assert_eq!(fx.opacity(), 0.0);
    }

    #[test]
    fn test_obstacle_geometry() {
        let o = Obstacle::new(100.0, 100.0, 50.0, 20.0);
        assert!(o.contains_point(Vec2::new(120.0, 110.0)));
        assert!(!o.contains_point(Vec2::new(100.0, 110.0)));
        assert!(o.overlaps_square(Vec2::new(95.0, 110.0), 20.0));
        assert!(!o.overlaps_square(Vec2::new(85.0, 110.0), 20.0));
        assert_eq!(o.overlap_area(Vec2::new(95.0, 110.0), 20.0), 100.0);
        assert_eq!(o.overlap_area(Vec2::new(85.0, 110.0), 20.0), 0.0);
        assert_eq!(o.overlap_area(Vec2::new(120.0, 110.0), 20.0), 400.0);
        assert_eq!(o.closest_point(Vec2::new(0.0, 0.0)), Vec2::new(100.0, 100.0));

        let m = o.mirrored(1000.0);
        assert_eq!(m.min, Vec2::new(850.0, 100.0));
        assert_eq!(m.size, o.size);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn flight_time_is_independent_of_frame_split(
                life in 0.1f32..3.0,
                steps in prop::collection::vec(0.001f32..0.1, 1..200),
            ) {
                let mut p = shot(life);
                let mut elapsed = 0.0;
                for dt in steps {
                    p.update(dt);
                    elapsed += dt;
                    prop_assert!((p.life - (life - elapsed)).abs() < 1e-3);
                    if elapsed > life + 1e-3 {
                        prop_assert!(p.is_dead());
                    } else if elapsed < life - 1e-3 {
                        prop_assert!(!p.is_dead());
                    }
                }
            }
        }
    }
}
