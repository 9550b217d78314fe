//! Passive weapons that fire or strike on their own
//!
//! Level 0 means "not owned". Purchase and upgrades go through `upgrade()`,
//! which recomputes the derived stats for the new level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{KnockbackPayload, Projectile, ProjectileKind};
use super::state::CharacterId;
use super::timer::Cooldown;
use crate::tuning::AutoAttackTuning;
use crate::unit_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoAttackKind {
    OrbitingSphere,
    EightWayShot,
}

impl AutoAttackKind {
    pub const ALL: [AutoAttackKind; 2] = [AutoAttackKind::OrbitingSphere, AutoAttackKind::EightWayShot];

    pub fn name(self) -> &'static str {
        match self {
            AutoAttackKind::OrbitingSphere => "Orbiting Sphere",
            AutoAttackKind::EightWayShot => "Eight-Way Shot",
        }
    }
}

/// One orbiting ball, positioned by its angle around the owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub angle: f32,
}

/// Spheres circling the owner, damaging and stunning whatever they touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitingSphere {
    level: u32,
    pub spheres: Vec<Sphere>,
    pub damage: f32,
    pub orbit_radius: f32,
    pub rotation_speed: f32,
    pub sphere_radius: f32,
    pub hit_stun: f32,
    /// One hit per window across every sphere and target
    pub hit_gate: Cooldown,
    base_damage: f32,
    damage_per_level: f32,
    base_radius: f32,
    radius_per_level: f32,
    base_rotation: f32,
    rotation_per_level: f32,
    max_spheres: usize,
}

impl OrbitingSphere {
    pub fn new(t: &AutoAttackTuning) -> Self {
        let mut orbit = Self {
            level: 0,
            spheres: Vec::new(),
            damage: 0.0,
            orbit_radius: 0.0,
            rotation_speed: 0.0,
            sphere_radius: t.orbit_sphere_radius,
            hit_stun: t.orbit_hit_stun,
            hit_gate: Cooldown::new(t.orbit_hit_interval),
            base_damage: t.orbit_damage,
            damage_per_level: t.orbit_damage_per_level,
            base_radius: t.orbit_radius,
            radius_per_level: t.orbit_radius_per_level,
            base_rotation: t.orbit_rotation,
            rotation_per_level: t.orbit_rotation_per_level,
            max_spheres: t.orbit_max_spheres,
        };
        orbit.update_stats();
        orbit
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.update_stats();
    }

    fn stats_at(&self, level: u32) -> (f32, f32, f32, usize) {
        let steps = level.saturating_sub(1) as f32;
        (
            self.base_damage + steps * self.damage_per_level,
            self.base_radius + steps * self.radius_per_level,
            self.base_rotation + steps * self.rotation_per_level,
            (level as usize).min(self.max_spheres),
        )
    }

    fn update_stats(&mut self) {
        let (damage, radius, rotation, count) = self.stats_at(self.level);
        self.damage = damage;
        self.orbit_radius = radius;
        self.rotation_speed = rotation;

        // Re-space evenly when the count changes, anchored on the lead sphere
        if self.level > 0 && self.spheres.len() != count {
            let lead = self.spheres.first().map_or(0.0, |s| s.angle);
            self.spheres = (0..count)
                .map(|i| Sphere {
                    angle: lead + i as f32 * std::f32::consts::TAU / count as f32,
                })
                .collect();
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.hit_gate.tick(dt);
        for sphere in &mut self.spheres {
            sphere.angle += self.rotation_speed * dt;
        }
    }

    /// World positions of every sphere around `owner_pos`
    pub fn strike_points(&self, owner_pos: Vec2) -> Vec<Vec2> {
        self.spheres
            .iter()
            .map(|s| owner_pos + unit_at(s.angle) * self.orbit_radius)
            .collect()
    }

    pub fn description(&self) -> String {
        format!(
            "Spheres: {} / Damage: {} / Rotation: {:.1}",
            self.spheres.len(),
            self.damage,
            self.rotation_speed
        )
    }

    pub fn next_description(&self) -> String {
        let (damage, radius, rotation, count) = self.stats_at(self.level + 1);
        format!(
            "Spheres: {count} / Dmg: {damage} / Radius: {radius:.0} / Rotation: {rotation:.1}"
        )
    }
}

/// Periodic ring of knockback projectiles in eight directions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EightWayShot {
    level: u32,
    pub damage: f32,
    /// Flight time of each projectile (its range)
    pub life: f32,
    pub fire_timer: Cooldown,
    pub directions: usize,
    pub speed: f32,
    pub size: f32,
    pub knockback: KnockbackPayload,
    base_damage: f32,
    damage_per_level: f32,
    base_life: f32,
    life_per_level: f32,
    max_life: f32,
}

impl EightWayShot {
    /// `max_life` caps projectile flight time regardless of level
    pub fn new(t: &AutoAttackTuning, max_life: f32) -> Self {
        let mut volley = Self {
            level: 0,
            damage: 0.0,
            life: 0.0,
            fire_timer: Cooldown::armed(t.volley_interval),
            directions: t.volley_directions,
            speed: t.volley_speed,
            size: t.volley_size,
            knockback: KnockbackPayload {
                force: t.volley_knockback_force,
                secs: t.volley_knockback_secs,
            },
            base_damage: t.volley_damage,
            damage_per_level: t.volley_damage_per_level,
            base_life: t.volley_life,
            life_per_level: t.volley_life_per_level,
            max_life,
        };
        volley.update_stats();
        volley
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.update_stats();
    }

    fn stats_at(&self, level: u32) -> (f32, f32) {
        let steps = level.saturating_sub(1) as f32;
        (
            self.base_damage + steps * self.damage_per_level,
            (self.base_life + steps * self.life_per_level).min(self.max_life),
        )
    }

    fn update_stats(&mut self) {
        let (damage, life) = self.stats_at(self.level);
        self.damage = damage;
        self.life = life;
    }

    /// Advance the fire timer; returns the volley when it goes off
    pub fn update(&mut self, dt: f32, owner: CharacterId, owner_pos: Vec2) -> Vec<Projectile> {
        if self.level == 0 {
            return Vec::new();
        }
        self.fire_timer.tick(dt);
        if self.fire_timer.trigger() {
            self.fire(owner, owner_pos)
        } else {
            Vec::new()
        }
    }

    fn fire(&self, owner: CharacterId, owner_pos: Vec2) -> Vec<Projectile> {
        (0..self.directions)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / self.directions as f32;
                Projectile {
                    kind: ProjectileKind::Volley,
                    pos: owner_pos,
                    vel: unit_at(angle) * self.speed,
                    size: self.size,
                    damage: self.damage,
                    owner,
                    life: self.life,
                    stun: 0.0,
                    knockback: Some(self.knockback),
                    collided: false,
                }
            })
            .collect()
    }

    pub fn description(&self) -> String {
        format!("Damage: {} / Range: {:.1}s", self.damage, self.life)
    }

    pub fn next_description(&self) -> String {
        let (damage, life) = self.stats_at(self.level + 1);
        format!("Damage: {damage} / Range: {life:.1}s")
    }
}

/// Every auto-attack a character can buy, owned or not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arsenal {
    pub orbiting_sphere: OrbitingSphere,
    pub eight_way_shot: EightWayShot,
}

impl Arsenal {
    pub fn new(t: &AutoAttackTuning, volley_max_life: f32) -> Self {
        Self {
            orbiting_sphere: OrbitingSphere::new(t),
            eight_way_shot: EightWayShot::new(t, volley_max_life),
        }
    }

    pub fn level(&self, kind: AutoAttackKind) -> u32 {
        match kind {
            AutoAttackKind::OrbitingSphere => self.orbiting_sphere.level(),
            AutoAttackKind::EightWayShot => self.eight_way_shot.level(),
        }
    }

    pub fn upgrade(&mut self, kind: AutoAttackKind) {
        match kind {
            AutoAttackKind::OrbitingSphere => self.orbiting_sphere.upgrade(),
            AutoAttackKind::EightWayShot => self.eight_way_shot.upgrade(),
        }
    }

    pub fn description(&self, kind: AutoAttackKind) -> String {
        match kind {
            AutoAttackKind::OrbitingSphere => self.orbiting_sphere.description(),
            AutoAttackKind::EightWayShot => self.eight_way_shot.description(),
        }
    }

    pub fn next_description(&self, kind: AutoAttackKind) -> String {
        match kind {
            AutoAttackKind::OrbitingSphere => self.orbiting_sphere.next_description(),
            AutoAttackKind::EightWayShot => self.eight_way_shot.next_description(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn tuning() -> AutoAttackTuning {
        AutoAttackTuning::default()
    }

    /// Bought and upgraded to `level` without time passing in between
    fn orbit_at(level: u32) -> OrbitingSphere {
        let mut orbit = OrbitingSphere::new(&tuning());
        for _ in 0..level {
            orbit.upgrade();
        }
        orbit
    }

    #[test]
    fn test_unowned_orbit_has_no_spheres() {
        let orbit = OrbitingSphere::new(&tuning());
        assert_eq!(orbit.level(), 0);
        assert!(orbit.spheres.is_empty());
        assert!(orbit.strike_points(Vec2::ZERO).is_empty());
    }

    #[test]
    fn test_orbit_sphere_count_and_spacing() {
        let orbit = orbit_at(3);
        let angles: Vec<f32> = orbit.spheres.iter().map(|s| s.angle).collect();
        assert_eq!(angles.len(), 3);
        for (angle, expected) in angles.iter().zip([0.0, TAU / 3.0, 2.0 * TAU / 3.0]) {
            assert!((angle - expected).abs() < 1e-5);
        }
        assert_eq!(orbit.damage, 9.0);
        assert_eq!(orbit.orbit_radius, 70.0);
    }

    #[test]
    fn test_orbit_purchases_stay_evenly_spaced() {
        let mut orbit = OrbitingSphere::new(&tuning());
        orbit.upgrade();
        orbit.upgrade();
        let angles: Vec<f32> = orbit.spheres.iter().map(|s| s.angle).collect();
        assert_eq!(angles, vec![0.0, TAU / 2.0]);

        orbit.upgrade();
        let angles: Vec<f32> = orbit.spheres.iter().map(|s| s.angle).collect();
        assert_eq!(angles.len(), 3);
        for (angle, expected) in angles.iter().zip([0.0, TAU / 3.0, 2.0 * TAU / 3.0]) {
            assert!((angle - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_orbit_upgrade_keeps_lead_sphere_phase() {
        let mut orbit = orbit_at(3);
        orbit.update(0.25);
        let lead = orbit.spheres[0].angle;
        assert!(lead > 0.0);

        orbit.upgrade();
        assert_eq!(orbit.spheres.len(), 4);
        assert_eq!(orbit.spheres[0].angle, lead);
        for pair in orbit.spheres.windows(2) {
            assert!((pair[1].angle - pair[0].angle - TAU / 4.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_orbit_caps_at_six() {
        let mut orbit = orbit_at(6);
        let before: Vec<f32> = orbit.spheres.iter().map(|s| s.angle).collect();
        orbit.upgrade();
        assert_eq!(orbit.spheres.len(), 6);
        let after: Vec<f32> = orbit.spheres.iter().map(|s| s.angle).collect();
        assert_eq!(before, after);
        assert_eq!(orbit.level(), 7);
    }

    #[test]
    fn test_strike_points_follow_owner() {
        let orbit = orbit_at(1);
        let points = orbit.strike_points(Vec2::new(100.0, 100.0));
        assert_eq!(points.len(), 1);
        assert!((points[0] - Vec2::new(160.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn test_volley_waits_one_interval_after_purchase() {
        let mut volley = EightWayShot::new(&tuning(), 0.8);
        // Unowned: never fires
        assert!(volley.update(5.0, CharacterId::Player, Vec2::ZERO).is_empty());

        volley.upgrade();
        assert!(volley.update(1.0, CharacterId::Player, Vec2::ZERO).is_empty());
        let shots = volley.update(1.0, CharacterId::Player, Vec2::ZERO);
        assert_eq!(shots.len(), 8);
        assert!(shots.iter().all(|p| p.knockback.is_some() && p.owner == CharacterId::Player));
        assert!((shots[2].vel - Vec2::new(0.0, 250.0)).length() < 1e-3);
        // Range capped by the lane width
        assert!((shots[0].life - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_arsenal_dispatch() {
        let mut arsenal = Arsenal::new(&tuning(), 0.8);
        arsenal.upgrade(AutoAttackKind::EightWayShot);
        assert_eq!(arsenal.level(AutoAttackKind::EightWayShot), 1);
        assert_eq!(arsenal.level(AutoAttackKind::OrbitingSphere), 0);
        assert_eq!(arsenal.description(AutoAttackKind::EightWayShot), "Damage: 8 / Range: 0.8s");
    }
}
