//! Computer-controlled decision making
//!
//! Three independent pieces, all pure functions of the character and its
//! surroundings apart from the RNG draw for range misjudgement:
//! - economy: what to buy next
//! - combat: which skills to fire this tick
//! - steering: where to walk

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::auto_attack::AutoAttackKind;
use super::character::{Character, Surroundings};
use super::combatant::Combatant;
use super::entity::Obstacle;
use super::shop::ShopKey;
use super::skill::{SkillKind, SkillSlot};
use crate::tuning::{AiTuning, EconomyTuning};
use crate::{direction_to, unit_at};

/// Upgrade rotation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMemory {
    /// Even: next skill in slot order. Odd: the orbiting sphere.
    pub next_upgrade: u32,
}

/// A skill activation chosen for this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cast {
    pub slot: SkillSlot,
    /// Dash heading (ignored by other skills)
    pub heading: Vec2,
}

/// Everything the AI wants to do this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatPlan {
    pub casts: Vec<Cast>,
    /// Area skill to hold before releasing
    pub aim: Option<SkillSlot>,
    /// Desired movement direction (unit length or zero)
    pub movement: Vec2,
}

const SPHERE: ShopKey = ShopKey::AutoAttack(AutoAttackKind::OrbitingSphere);

/// Make at most one purchase.
///
/// The orbiting sphere is bought first. After that upgrades alternate between
/// the next skill (Q, W, E, R round-robin) and another sphere level.
pub fn run_economy(ch: &mut Character, econ: &EconomyTuning) {
    if ch.arsenal.level(AutoAttackKind::OrbitingSphere) == 0 {
        if ch.purchase(SPHERE, econ) {
            log::info!("{} picked up {}", ch.name, AutoAttackKind::OrbitingSphere.name());
        }
        return;
    }

    let n = ch.ai.next_upgrade;
    let key = if n % 2 == 0 {
        ShopKey::Skill(SkillSlot::ALL[(n as usize / 2) % SkillSlot::ALL.len()])
    } else {
        SPHERE
    };
    if ch.purchase(key, econ) {
        log::info!("{} upgraded {key:?} to level {}", ch.name, ch.level_of(key));
        ch.ai.next_upgrade = n.wrapping_add(1);
    }
}

/// Choose skills and movement for this tick
pub fn plan(ch: &Character, env: &Surroundings, ai: &AiTuning, rng: &mut SimRng) -> CombatPlan {
    let mut plan = CombatPlan {
        movement: steer(ch, env, ai),
        ..Default::default()
    };
    let Some(threat) = env.threat else {
        return plan;
    };
    let to_threat = threat - ch.pos;
    let dist = to_threat.length();

    let dash = ch.slot_of(|k| matches!(k, SkillKind::Dash { .. }));
    let blast = ch.slot_of(|k| matches!(k, SkillKind::Blast { .. }));

    // Low on health: get away and skip everything else
    if let Some(slot) = dash {
        if ch.skill(slot).can_use() && ch.hp_fraction() < ai.retreat_hp_fraction {
            plan.casts.push(Cast {
                slot,
                heading: -to_threat,
            });
            return plan;
        }
    }

    for slot in SkillSlot::ALL {
        if plan.aim.is_some() {
            break;
        }
        let skill = ch.skill(slot);
        if !skill.can_use() {
            continue;
        }
        match skill.kind {
            SkillKind::Blast { .. } => {
                let perceived = skill.radius() + (rng.random::<f32>() - 0.5) * ai.range_error_margin;
                if dist <= perceived {
                    plan.aim = Some(slot);
                }
            }
            SkillKind::Shot { .. } => plan.casts.push(Cast {
                slot,
                heading: Vec2::ZERO,
            }),
            SkillKind::Dash { .. } => {
                let gap_close = blast.is_some_and(|b| {
                    let blast = ch.skill(b);
                    blast.can_use() && dist > blast.radius() && dist < blast.radius() + ai.gap_close_band
                });
                if gap_close {
                    plan.casts.push(Cast {
                        slot,
                        heading: to_threat,
                    });
                }
            }
            SkillKind::Toughness { .. } => {}
        }
    }
    plan
}

/// Desired movement direction.
///
/// Duel: advance or kite depending on blast readiness, strafe on a slow sine,
/// and push away from nearby walls. Laning: flee a close enemy, otherwise
/// patrol a circle around the arena centre.
pub fn steer(ch: &Character, env: &Surroundings, ai: &AiTuning) -> Vec2 {
    if env.is_duel {
        let mut movement = Vec2::ZERO;
        if let Some(threat) = env.threat {
            let to_threat = threat - ch.pos;
            let dist = to_threat.length();
            if dist > 0.0 {
                let forward = to_threat / dist;
                let blast = ch
                    .slot_of(|k| matches!(k, SkillKind::Blast { .. }))
                    .map(|slot| ch.skill(slot));
                let advance = match blast {
                    Some(b) if b.can_use() => {
                        if dist > b.radius() * ai.attack_distance_factor {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    _ => {
                        if dist < ai.kite_distance {
                            -1.0
                        } else if dist > ai.kite_distance + ai.kite_band {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };
                let strafe = if (env.clock / ai.strafe_period).sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                };
                let side = Vec2::new(-forward.y, forward.x);
                movement = forward * advance + side * strafe;
            }
        }
        movement += obstacle_avoidance(ch.pos, ch.size, env.obstacles, ai.avoidance_radius_factor)
            * ai.avoidance_weight;
        return movement.normalize_or_zero();
    }

    if let Some(threat) = env.threat {
        let away = ch.pos - threat;
        let dist = away.length();
        if dist > 0.0 && dist < ai.panic_distance {
            return away / dist;
        }
    }

    let patrol_target = env.bounds / 2.0 + unit_at(env.clock) * ai.patrol_radius;
    if ch.pos.distance(patrol_target) > 1.0 {
        direction_to(ch.pos, patrol_target)
    } else {
        Vec2::ZERO
    }
}

/// Repulsion from every wall closer than `size * radius_factor`, scaled by
/// how deep inside that radius the body is
pub fn obstacle_avoidance(pos: Vec2, size: f32, obstacles: &[Obstacle], radius_factor: f32) -> Vec2 {
    let radius = size * radius_factor;
    obstacles
        .iter()
        .filter_map(|o| {
            let away = pos - o.closest_point(pos);
            let dist = away.length();
            (dist > 0.0 && dist < radius).then(|| away / dist * ((radius - dist) / radius))
        })
        .sum()
}
