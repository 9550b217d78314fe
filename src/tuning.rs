//! Game balance table
//!
//! Every gameplay number lives here so a session can be re-balanced from a JSON
//! file without touching simulation code. Missing fields fall back to defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Arena dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Laning canvas size (one per side)
    pub laning_size: Vec2,
    /// Shared duel canvas size
    pub duel_size: Vec2,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            laning_size: Vec2::new(800.0, 600.0),
            duel_size: Vec2::new(1000.0, 600.0),
        }
    }
}

/// Base character stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    pub size: f32,
    pub base_max_hp: f32,
    /// Hard cap on max hp after passive bonuses
    pub max_hp_cap: f32,
    pub base_speed: f32,
    /// Base speed gained per dash skill level above 1
    pub dash_speed_per_level: f32,
    /// Speed multiplier granted when a dash ends
    pub dash_speed_buff: f32,
    pub dash_speed_buff_secs: f32,
    /// Invincibility granted when a dash starts
    pub dash_invincibility_secs: f32,
    /// Respawn delay for the loser of a duel round
    pub respawn_secs: f32,
    /// Per-tick decay applied to knockback force
    pub knockback_friction: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            base_max_hp: 100.0,
            max_hp_cap: 200.0,
            base_speed: 200.0,
            dash_speed_per_level: 10.0,
            dash_speed_buff: 1.5,
            dash_speed_buff_secs: 3.0,
            dash_invincibility_secs: 0.7,
            respawn_secs: 5.0,
            knockback_friction: 0.9,
        }
    }
}

/// Activated and passive skill parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTuning {
    pub blast_cooldown: f32,
    pub blast_radius: f32,
    pub blast_radius_per_level: f32,
    pub blast_damage: f32,
    pub blast_damage_per_level: f32,
    pub blast_effect_secs: f32,

    pub shot_cooldown: f32,
    pub shot_speed: f32,
    pub shot_damage: f32,
    pub shot_damage_per_level: f32,
    pub shot_size: f32,
    pub shot_life: f32,
    pub shot_stun: f32,
    /// Side of the square an AI shot may land in around its target
    pub shot_ai_inaccuracy: f32,

    pub dash_cooldown: f32,
    pub dash_cooldown_per_level: f32,
    pub dash_cooldown_floor: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,

    pub toughness_hp_per_level: f32,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            blast_cooldown: 5.0,
            blast_radius: 100.0,
            blast_radius_per_level: 2.0,
            blast_damage: 10.0,
            blast_damage_per_level: 5.0,
            blast_effect_secs: 0.3,

            shot_cooldown: 1.0,
            shot_speed: 1300.0,
            shot_damage: 5.0,
            shot_damage_per_level: 3.0,
            shot_size: 5.0,
            shot_life: 3.0,
            shot_stun: 0.2,
            shot_ai_inaccuracy: 90.0,

            dash_cooldown: 8.0,
            dash_cooldown_per_level: 0.5,
            dash_cooldown_floor: 3.0,
            dash_speed: 1200.0,
            dash_duration: 0.15,

            toughness_hp_per_level: 5.0,
        }
    }
}

/// Auto-attack parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAttackTuning {
    pub orbit_damage: f32,
    pub orbit_damage_per_level: f32,
    pub orbit_radius: f32,
    pub orbit_radius_per_level: f32,
    pub orbit_rotation: f32,
    pub orbit_rotation_per_level: f32,
    pub orbit_max_spheres: usize,
    pub orbit_sphere_radius: f32,
    pub orbit_hit_interval: f32,
    pub orbit_hit_stun: f32,

    pub volley_interval: f32,
    pub volley_directions: usize,
    pub volley_speed: f32,
    pub volley_size: f32,
    pub volley_damage: f32,
    pub volley_damage_per_level: f32,
    pub volley_life: f32,
    pub volley_life_per_level: f32,
    pub volley_knockback_force: f32,
    pub volley_knockback_secs: f32,
}

impl Default for AutoAttackTuning {
    fn default() -> Self {
        Self {
            orbit_damage: 5.0,
            orbit_damage_per_level: 2.0,
            orbit_radius: 60.0,
            orbit_radius_per_level: 5.0,
            orbit_rotation: 2.0,
            orbit_rotation_per_level: 0.2,
            orbit_max_spheres: 6,
            orbit_sphere_radius: 8.0,
            orbit_hit_interval: 0.5,
            orbit_hit_stun: 1.0,

            volley_interval: 2.0,
            volley_directions: 8,
            volley_speed: 250.0,
            volley_size: 6.0,
            volley_damage: 8.0,
            volley_damage_per_level: 4.0,
            volley_life: 1.0,
            volley_life_per_level: 0.05,
            volley_knockback_force: 300.0,
            volley_knockback_secs: 0.2,
        }
    }
}

/// Equipment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub armor_defense: f32,
    pub armor_defense_per_level: f32,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            armor_defense: 5.0,
            armor_defense_per_level: 2.0,
        }
    }
}

/// Laning creep parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub speed: f32,
    pub hp: f32,
    pub spawn_interval: f32,
    /// Knockback force multiplier applied every tick
    pub knockback_friction: f32,
    pub gem_value: u32,
    pub gem_size: f32,
    pub gem_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            speed: 100.0,
            hp: 30.0,
            spawn_interval: 1.0,
            knockback_friction: 0.9,
            gem_value: 10,
            gem_size: 5.0,
            gem_speed: 800.0,
        }
    }
}

/// AI behaviour knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Hp fraction below which the AI dashes away
    pub retreat_hp_fraction: f32,
    /// Extra distance past blast radius where a gap-closing dash is used
    pub gap_close_band: f32,
    /// Total width of the blast range misjudgment
    pub range_error_margin: f32,
    pub aim_delay: f32,
    pub kite_distance: f32,
    pub kite_band: f32,
    /// Fraction of blast radius the AI closes to before holding position
    pub attack_distance_factor: f32,
    pub strafe_period: f32,
    /// Obstacle sensing radius as a multiple of body size
    pub avoidance_radius_factor: f32,
    pub avoidance_weight: f32,
    pub panic_distance: f32,
    pub patrol_radius: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            retreat_hp_fraction: 0.35,
            gap_close_band: 200.0,
            range_error_margin: 40.0,
            aim_delay: 0.1,
            kite_distance: 350.0,
            kite_band: 50.0,
            attack_distance_factor: 0.8,
            strafe_period: 0.7,
            avoidance_radius_factor: 3.0,
            avoidance_weight: 2.0,
            panic_distance: 100.0,
            patrol_radius: 80.0,
        }
    }
}

/// Shop prices and gold grants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub skill_base_cost: u32,
    pub skill_cost_per_level: u32,
    pub auto_attack_base_cost: u32,
    pub auto_attack_cost_per_level: u32,
    pub item_base_cost: u32,
    pub item_cost_per_level: u32,
    pub starting_gold: u32,
    pub round_bonus_player: u32,
    pub round_bonus_ai: u32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            skill_base_cost: 10,
            skill_cost_per_level: 15,
            auto_attack_base_cost: 25,
            auto_attack_cost_per_level: 25,
            item_base_cost: 20,
            item_cost_per_level: 20,
            starting_gold: 3000,
            round_bonus_player: 3000,
            round_bonus_ai: 5000,
        }
    }
}

/// Match structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTuning {
    pub laning_secs: f32,
    pub rounds_to_win: usize,
    pub min_obstacle_pairs: u32,
    pub max_obstacle_pairs: u32,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub obstacle_margin: f32,
    /// Distance of each duelist's spawn from its side wall
    pub duel_spawn_inset: f32,
}

impl Default for PhaseTuning {
    fn default() -> Self {
        Self {
            laning_secs: 30.0,
            rounds_to_win: 3,
            min_obstacle_pairs: 1,
            max_obstacle_pairs: 2,
            obstacle_min_size: 20.0,
            obstacle_max_size: 120.0,
            obstacle_margin: 150.0,
            duel_spawn_inset: 100.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub character: CharacterTuning,
    pub skills: SkillTuning,
    pub auto_attacks: AutoAttackTuning,
    pub items: ItemTuning,
    pub enemies: EnemyTuning,
    pub ai: AiTuning,
    pub economy: EconomyTuning,
    pub phases: PhaseTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning table, rejecting values the
    /// simulation cannot run with
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(tuning)
    }

    /// Serialize the full table, handy for dumping defaults to edit
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Longest flight time an eight-way shot may reach (a quarter of the lane width)
    pub fn volley_max_life(&self) -> f32 {
        (self.arena.laning_size.x / 4.0) / self.auto_attacks.volley_speed
    }

    /// Check the values the simulation relies on being sane
    pub fn validate(&self) -> Result<(), &'static str> {
        let p = &self.phases;
        if self.character.size <= 0.0 {
            return Err("character size must be positive");
        }
        if self.enemies.size <= 0.0 {
            return Err("enemy size must be positive");
        }
        if p.rounds_to_win == 0 {
            return Err("rounds_to_win must be positive");
        }
        if p.min_obstacle_pairs > p.max_obstacle_pairs {
            return Err("obstacle pair range is inverted");
        }
        if p.obstacle_min_size <= 0.0 {
            return Err("obstacle size must be positive");
        }
        if p.obstacle_min_size > p.obstacle_max_size {
            return Err("obstacle size range is inverted");
        }
        Ok(())
    }
}
