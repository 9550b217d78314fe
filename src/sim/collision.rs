//! Hit detection and response
//!
//! Everything here works on [`Target`]s: a damageable body tagged with the
//! character that owns it (if any). Attacks never hit their own side, so the
//! same resolver serves laning (character vs creeps) and duels (character vs
//! character).

use glam::Vec2;

use super::auto_attack::OrbitingSphere;
use super::combatant::Combatant;
use super::entity::{Obstacle, Projectile};
use super::state::CharacterId;

/// A damageable body in a collision pass
pub struct Target<'a> {
    /// `Some` for characters, `None` for neutral creeps
    pub owner: Option<CharacterId>,
    pub body: &'a mut dyn Combatant,
}

impl<'a> Target<'a> {
    pub fn character(id: CharacterId, body: &'a mut dyn Combatant) -> Self {
        Self { owner: Some(id), body }
    }

    pub fn neutral(body: &'a mut dyn Combatant) -> Self {
        Self { owner: None, body }
    }

    #[inline]
    pub fn is_hostile_to(&self, attacker: CharacterId) -> bool {
        self.owner != Some(attacker)
    }
}

/// Circle (radius `radius` at `point`) against a body's half-size circle
#[inline]
pub fn touches(point: Vec2, radius: f32, body: &dyn Combatant) -> bool {
    point.distance(body.position()) < radius + body.size() / 2.0
}

/// Projectiles against targets, then against walls.
///
/// Each projectile hits at most one target and is marked `collided`.
/// Knockback pushes away from the shooter's position, looked up through
/// `shooter_pos`.
pub fn resolve_projectiles(
    projectiles: &mut [Projectile],
    targets: &mut [Target],
    obstacles: &[Obstacle],
    shooter_pos: impl Fn(CharacterId) -> Option<Vec2>,
) {
    for projectile in projectiles.iter_mut().filter(|p| !p.collided) {
        for target in targets.iter_mut() {
            if !target.is_hostile_to(projectile.owner) || !touches(projectile.pos, projectile.size, &*target.body) {
                continue;
            }

            target.body.take_damage(projectile.damage);
            if projectile.stun > 0.0 {
                target.body.apply_stun(projectile.stun);
            }
            if let Some(knockback) = projectile.knockback {
                let from = shooter_pos(projectile.owner).unwrap_or(projectile.pos);
                let away = target.body.position() - from;
                let direction = away.try_normalize().unwrap_or(Vec2::X);
                target.body.apply_knockback(direction, knockback.force, knockback.secs);
            }
            projectile.collided = true;
            break;
        }

        if !projectile.collided && obstacles.iter().any(|o| o.contains_point(projectile.pos)) {
            projectile.collided = true;
        }
    }
}

/// Orbiting spheres against targets.
///
/// The sphere weapon shares one hit gate: at most one target takes damage per
/// gate window, however many spheres overlap it. Returns whether a hit landed.
pub fn resolve_spheres(
    weapon: &mut OrbitingSphere,
    owner: CharacterId,
    owner_pos: Vec2,
    targets: &mut [Target],
) -> bool {
    if weapon.level() == 0 || !weapon.hit_gate.is_ready() {
        return false;
    }

    for point in weapon.strike_points(owner_pos) {
        for target in targets.iter_mut() {
            if !target.is_hostile_to(owner) || !touches(point, weapon.sphere_radius, &*target.body) {
                continue;
            }
            if !weapon.hit_gate.trigger() {
                return false;
            }
            target.body.take_damage(weapon.damage);
            target.body.apply_stun(weapon.hit_stun);
            return true;
        }
    }
    false
}

/// Instant area damage around `origin`. Returns the number of bodies hit.
pub fn resolve_blast(
    origin: Vec2,
    radius: f32,
    damage: f32,
    caster: CharacterId,
    targets: &mut [Target],
) -> usize {
    let mut hits = 0;
    for target in targets.iter_mut() {
        if target.is_hostile_to(caster) && target.body.position().distance(origin) <= radius {
            target.body.take_damage(damage);
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combatant::Enemy;
    use crate::sim::entity::{KnockbackPayload, ProjectileKind};
    use crate::tuning::{AutoAttackTuning, EnemyTuning};

    fn creep(x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), &EnemyTuning::default())
    }

    fn bullet(x: f32, y: f32, owner: CharacterId) -> Projectile {
        Projectile {
            kind: ProjectileKind::Shot,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: 5.0,
            damage: 5.0,
            owner,
            life: 1.0,
            stun: 0.2,
            knockback: None,
            collided: false,
        }
    }

    #[test]
    fn test_projectile_hits_one_target_only() {
        let mut a = creep(100.0, 100.0);
        let mut b = creep(102.0, 100.0);
        let mut shots = [bullet(101.0, 100.0, CharacterId::Player)];
        {
            let mut targets = [Target::neutral(&mut a), Target::neutral(&mut b)];
            resolve_projectiles(&mut shots, &mut targets, &[], |_| None);
        }
        assert!(shots[0].collided);
        assert_eq!(a.hp, 25.0);
        assert!(a.status.stun.is_running());
        assert_eq!(b.hp, 30.0);
    }

    #[test]
    fn test_projectile_ignores_own_side() {
        let mut me = creep(100.0, 100.0);
        let mut shots = [bullet(100.0, 100.0, CharacterId::Player)];
        {
            let mut targets = [Target::character(CharacterId::Player, &mut me)];
            resolve_projectiles(&mut shots, &mut targets, &[], |_| None);
        }
        assert!(!shots[0].collided);
        assert_eq!(me.hp, 30.0);
    }

    #[test]
    fn test_projectile_stopped_by_wall() {
        let wall = [Obstacle::new(90.0, 90.0, 20.0, 20.0)];
        let mut shots = [bullet(100.0, 100.0, CharacterId::Rival)];
        resolve_projectiles(&mut shots, &mut [], &wall, |_| None);
        assert!(shots[0].collided);
    }

    #[test]
    fn test_knockback_points_away_from_shooter() {
        let mut target = creep(200.0, 100.0);
        let mut shot = bullet(195.0, 100.0, CharacterId::Player);
        shot.stun = 0.0;
        shot.knockback = Some(KnockbackPayload {
            force: 300.0,
            secs: 0.2,
        });
        let mut shots = [shot];
        {
            let mut targets = [Target::neutral(&mut target)];
            resolve_projectiles(&mut shots, &mut targets, &[], |_| Some(Vec2::new(100.0, 100.0)));
        }
        assert_eq!(target.status.knockback.direction, Vec2::X);
        assert!((target.status.stun.remaining() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_gate_allows_one_hit_per_window() {
        let mut weapon = OrbitingSphere::new(&AutoAttackTuning::default());
        weapon.upgrade();
        weapon.upgrade();
        // Spheres at angle 0 and PI, orbit radius 65: both creeps touched
        let owner_pos = Vec2::new(300.0, 300.0);
        let mut left = creep(235.0, 300.0);
        let mut right = creep(365.0, 300.0);
        {
            let mut targets = [Target::neutral(&mut left), Target::neutral(&mut right)];
            assert!(resolve_spheres(&mut weapon, CharacterId::Player, owner_pos, &mut targets));
            assert!(!resolve_spheres(&mut weapon, CharacterId::Player, owner_pos, &mut targets));
        }
        assert_eq!(left.hp + right.hp, 60.0 - 7.0);

        weapon.hit_gate.tick(0.5);
        let mut targets = [Target::neutral(&mut left), Target::neutral(&mut right)];
        assert!(resolve_spheres(&mut weapon, CharacterId::Player, owner_pos, &mut targets));
    }

    #[test]
    fn test_unowned_sphere_never_hits() {
        let mut weapon = OrbitingSphere::new(&AutoAttackTuning::default());
        let mut c = creep(360.0, 300.0);
        let mut targets = [Target::neutral(&mut c)];
        assert!(!resolve_spheres(&mut weapon, CharacterId::Player, Vec2::new(300.0, 300.0), &mut targets));
    }

    #[test]
    fn test_blast_radius_is_inclusive() {
        let mut near = creep(200.0, 100.0);
        let mut far = creep(201.0, 100.0);
        {
            let mut targets = [Target::neutral(&mut near), Target::neutral(&mut far)];
            let hits = resolve_blast(Vec2::new(100.0, 100.0), 100.0, 10.0, CharacterId::Rival, &mut targets);
            assert_eq!(hits, 1);
        }
        assert_eq!(near.hp, 20.0);
        assert_eq!(far.hp, 30.0);
    }
}
