//! Activated and passive skills
//!
//! A skill is a level plus a cooldown gate wrapped around one of four variants.
//! Activation never touches the world directly: it yields a [`SkillEffect`]
//! that the owning character (dash) or the world (blast, shot) carries out.

use serde::{Deserialize, Serialize};

use super::timer::Cooldown;
use crate::tuning::SkillTuning;

/// Key a skill is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillSlot {
    Q,
    W,
    E,
    R,
}

impl SkillSlot {
    /// Binding order (also the AI's round-robin upgrade order)
    pub const ALL: [SkillSlot; 4] = [SkillSlot::Q, SkillSlot::W, SkillSlot::E, SkillSlot::R];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> char {
        match self {
            SkillSlot::Q => 'q',
            SkillSlot::W => 'w',
            SkillSlot::E => 'e',
            SkillSlot::R => 'r',
        }
    }
}

/// Variant-specific base stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillKind {
    /// Instant damage to everything in a circle around the caster
    Blast {
        radius: f32,
        radius_per_level: f32,
        damage: f32,
        damage_per_level: f32,
        effect_secs: f32,
    },
    /// A fast stunning projectile aimed at the current target
    Shot {
        speed: f32,
        damage: f32,
        damage_per_level: f32,
        size: f32,
        life: f32,
        stun: f32,
        /// AI aim error (side of the square around the target)
        inaccuracy: f32,
    },
    /// Puts the owner into a short high-speed dash
    Dash {
        speed: f32,
        duration: f32,
        base_cooldown: f32,
        cooldown_per_level: f32,
        cooldown_floor: f32,
    },
    /// Passive max hp bonus; cannot be activated
    Toughness { hp_per_level: f32 },
}

/// What a successful activation asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    Blast {
        radius: f32,
        damage: f32,
        effect_secs: f32,
    },
    Shot {
        speed: f32,
        damage: f32,
        size: f32,
        life: f32,
        stun: f32,
    },
    Dash {
        speed: f32,
        duration: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub kind: SkillKind,
    level: u32,
    cooldown: Cooldown,
}

impl Skill {
    fn with_kind(kind: SkillKind, cooldown: f32) -> Self {
        Self {
            kind,
            level: 1,
            cooldown: Cooldown::new(cooldown),
        }
    }

    pub fn blast(t: &SkillTuning) -> Self {
        Self::with_kind(
            SkillKind::Blast {
                radius: t.blast_radius,
                radius_per_level: t.blast_radius_per_level,
                damage: t.blast_damage,
                damage_per_level: t.blast_damage_per_level,
                effect_secs: t.blast_effect_secs,
            },
            t.blast_cooldown,
        )
    }

    pub fn shot(t: &SkillTuning) -> Self {
        Self::with_kind(
            SkillKind::Shot {
                speed: t.shot_speed,
                damage: t.shot_damage,
                damage_per_level: t.shot_damage_per_level,
                size: t.shot_size,
                life: t.shot_life,
                stun: t.shot_stun,
                inaccuracy: t.shot_ai_inaccuracy,
            },
            t.shot_cooldown,
        )
    }

    pub fn dash(t: &SkillTuning) -> Self {
        Self::with_kind(
            SkillKind::Dash {
                speed: t.dash_speed,
                duration: t.dash_duration,
                base_cooldown: t.dash_cooldown,
                cooldown_per_level: t.dash_cooldown_per_level,
                cooldown_floor: t.dash_cooldown_floor,
            },
            t.dash_cooldown,
        )
    }

    pub fn toughness(t: &SkillTuning) -> Self {
        Self::with_kind(
            SkillKind::Toughness {
                hp_per_level: t.toughness_hp_per_level,
            },
            0.0,
        )
    }

    /// Standard Q/W/E/R loadout
    pub fn loadout(t: &SkillTuning) -> [Skill; 4] {
        [Self::blast(t), Self::shot(t), Self::dash(t), Self::toughness(t)]
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            SkillKind::Blast { .. } => "Blast",
            SkillKind::Shot { .. } => "Shot",
            SkillKind::Dash { .. } => "Dash",
            SkillKind::Toughness { .. } => "Toughness",
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    #[inline]
    pub fn is_passive(&self) -> bool {
        matches!(self.kind, SkillKind::Toughness { .. })
    }

    /// Ready to activate right now
    pub fn can_use(&self) -> bool {
        !self.is_passive() && self.cooldown.is_ready()
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    /// Blast radius at the current level (0 for other variants)
    pub fn radius(&self) -> f32 {
        self.radius_at(self.level)
    }

    /// Damage at the current level (0 for non-damaging variants)
    pub fn damage(&self) -> f32 {
        self.damage_at(self.level)
    }

    /// Bonus max hp granted by a passive at the current level
    pub fn hp_bonus(&self) -> f32 {
        match self.kind {
            SkillKind::Toughness { hp_per_level } => (self.level - 1) as f32 * hp_per_level,
            _ => 0.0,
        }
    }

    /// AI aim error for shots (0 for other variants)
    pub fn inaccuracy(&self) -> f32 {
        match self.kind {
            SkillKind::Shot { inaccuracy, .. } => inaccuracy,
            _ => 0.0,
        }
    }

    fn radius_at(&self, level: u32) -> f32 {
        match self.kind {
            SkillKind::Blast {
                radius,
                radius_per_level,
                ..
            } => radius + (level - 1) as f32 * radius_per_level,
            _ => 0.0,
        }
    }

    fn damage_at(&self, level: u32) -> f32 {
        match self.kind {
            SkillKind::Blast {
                damage,
                damage_per_level,
                ..
            }
            | SkillKind::Shot {
                damage,
                damage_per_level,
                ..
            } => damage + (level - 1) as f32 * damage_per_level,
            _ => 0.0,
        }
    }

    fn cooldown_at(&self, level: u32) -> f32 {
        match self.kind {
            SkillKind::Dash {
                base_cooldown,
                cooldown_per_level,
                cooldown_floor,
                ..
            } => (base_cooldown - (level - 1) as f32 * cooldown_per_level).max(cooldown_floor),
            _ => self.cooldown.duration(),
        }
    }

    /// Raise the level by one and recompute derived stats
    pub fn upgrade(&mut self) {
        self.level += 1;
        if matches!(self.kind, SkillKind::Dash { .. }) {
            let cd = self.cooldown_at(self.level);
            self.cooldown.set_duration(cd);
        }
    }

    /// Whether a level change alters the owner's stats (hp cap, move speed)
    pub fn affects_owner_stats(&self) -> bool {
        matches!(
            self.kind,
            SkillKind::Dash { .. } | SkillKind::Toughness { .. }
        )
    }

    /// Gate on the cooldown and describe the activation.
    ///
    /// Passive skills and skills still cooling down return `None` and leave
    /// all state untouched.
    pub fn try_activate(&mut self) -> Option<SkillEffect> {
        let effect = match self.kind {
            SkillKind::Blast { effect_secs, .. } => SkillEffect::Blast {
                radius: self.radius(),
                damage: self.damage(),
                effect_secs,
            },
            SkillKind::Shot {
                speed,
                size,
                life,
                stun,
                ..
            } => SkillEffect::Shot {
                speed,
                damage: self.damage(),
                size,
                life,
                stun,
            },
            SkillKind::Dash {
                speed, duration, ..
            } => SkillEffect::Dash { speed, duration },
            SkillKind::Toughness { .. } => {
                log::trace!("{} is passive and cannot be used", self.name());
                return None;
            }
        };

        if !self.cooldown.trigger() {
            log::trace!("{} is on cooldown ({:.2}s)", self.name(), self.cooldown.remaining());
            return None;
        }
        log::debug!("{} activated (level {})", self.name(), self.level);
        Some(effect)
    }

    /// Current-level stat line for the shop
    pub fn description(&self) -> String {
        self.describe(self.level)
    }

    /// Stat line after the next upgrade
    pub fn next_description(&self) -> String {
        self.describe(self.level + 1)
    }

    fn describe(&self, level: u32) -> String {
        match self.kind {
            SkillKind::Blast { .. } => format!(
                "Damage: {} / Radius: {}",
                self.damage_at(level),
                self.radius_at(level)
            ),
            SkillKind::Shot { .. } => format!("Damage: {}", self.damage_at(level)),
            SkillKind::Dash { .. } => format!("Cooldown: {:.1}s", self.cooldown_at(level)),
            SkillKind::Toughness { hp_per_level } => {
                format!("Max HP: +{}", (level - 1) as f32 * hp_per_level)
            }
        }
    }
}
