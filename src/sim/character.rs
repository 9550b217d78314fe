//! Player-controlled and AI-controlled characters
//!
//! A character owns its skills, auto-attacks, items and gold, and runs a
//! priority state machine each tick:
//! stunned > knocked back > respawning > dashing > AI aiming > input/AI.
//! Anything that reaches beyond the character (blast damage, new projectiles)
//! is returned as a [`CombatAction`] for the world to carry out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::ai::{self, AiMemory};
use super::auto_attack::{Arsenal, AutoAttackKind};
use super::combatant::{Combatant, Status};
use super::entity::{Obstacle, Projectile, ProjectileKind};
use super::item::Item;
use super::skill::{Skill, SkillEffect, SkillKind, SkillSlot};
use super::state::{CharacterId, Controller};
use super::tick::TickInput;
use super::timer::Countdown;
use crate::clamp_to_bounds;
use crate::tuning::{CharacterTuning, Tuning};

/// Float noise allowed when comparing wall overlap before and after a move
const OVERLAP_SLACK: f32 = 1e-3;

/// What a character can see of its arena this tick
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub is_duel: bool,
    pub bounds: Vec2,
    pub obstacles: &'a [Obstacle],
    /// Nearest hostile: the opponent in a duel, the nearest enemy while laning
    pub threat: Option<Vec2>,
    /// World clock in seconds
    pub clock: f32,
}

/// Side effects a character asks its world to apply
#[derive(Debug, Clone)]
pub enum CombatAction {
    Blast {
        origin: Vec2,
        radius: f32,
        damage: f32,
        effect_secs: f32,
    },
    Fire(Projectile),
}

/// An area skill held ready before release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub slot: SkillSlot,
    /// AI release delay
    pub timer: Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashState {
    pub speed: f32,
    pub timer: Countdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub controller: Controller,
    pub pos: Vec2,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub defense: f32,
    pub base_speed: f32,
    pub speed: f32,
    pub speed_buff: Countdown,
    pub status: Status,
    pub invincibility: Countdown,
    pub dash: Option<DashState>,
    /// Last resolved dash heading (kept when no new heading is given)
    pub dash_direction: Vec2,
    pub aiming: Option<Aim>,
    pub respawn: Countdown,
    gold: u32,
    pub skills: [Skill; 4],
    pub arsenal: Arsenal,
    /// Owned auto-attacks in purchase order
    pub owned_auto_attacks: Vec<AutoAttackKind>,
    pub items: Vec<Item>,
    /// Round numbers this character has won
    pub won_rounds: Vec<u32>,
    pub ai: AiMemory,
    /// Player character currently driven by the AI routine
    #[serde(default)]
    pub autopilot: bool,
    stats: CharacterTuning,
}

impl Character {
    pub fn new(id: CharacterId, name: impl Into<String>, controller: Controller, pos: Vec2, tuning: &Tuning) -> Self {
        let stats = tuning.character.clone();
        debug_assert!(stats.size > 0.0, "character size must be positive");
        let mut character = Self {
            id,
            name: name.into(),
            controller,
            pos,
            size: stats.size,
            hp: stats.base_max_hp,
            max_hp: stats.base_max_hp,
            defense: 0.0,
            base_speed: stats.base_speed,
            speed: stats.base_speed,
            speed_buff: Countdown::default(),
            status: Status::default(),
            invincibility: Countdown::default(),
            dash: None,
            dash_direction: Vec2::ZERO,
            aiming: None,
            respawn: Countdown::default(),
            gold: 0,
            skills: Skill::loadout(&tuning.skills),
            arsenal: Arsenal::new(&tuning.auto_attacks, tuning.volley_max_life()),
            owned_auto_attacks: Vec::new(),
            items: vec![Item::armor(&tuning.items)],
            won_rounds: Vec::new(),
            ai: AiMemory::default(),
            autopilot: false,
            stats,
        };
        character.recalculate_stats();
        character
    }

    pub fn skill(&self, slot: SkillSlot) -> &Skill {
        &self.skills[slot.index()]
    }

    pub fn skill_mut(&mut self, slot: SkillSlot) -> &mut Skill {
        &mut self.skills[slot.index()]
    }

    /// First slot holding a skill of the given variant
    pub fn slot_of(&self, matches: impl Fn(&SkillKind) -> bool) -> Option<SkillSlot> {
        SkillSlot::ALL
            .into_iter()
            .find(|slot| matches(&self.skill(*slot).kind))
    }

    pub fn is_ai_driven(&self) -> bool {
        self.controller == Controller::Ai || self.autopilot
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_running()
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn.is_running()
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deduct `amount` if affordable. Leaves gold untouched otherwise.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold >= amount {
            self.gold -= amount;
            true
        } else {
            log::trace!("{} cannot afford {amount} gold (has {})", self.name, self.gold);
            false
        }
    }

    /// Grant temporary invincibility
    pub fn make_invincible(&mut self, secs: f32) {
        self.invincibility.set(secs);
    }

    /// Re-derive max hp, speed and defense from skill and item levels
    pub fn recalculate_stats(&mut self) {
        let old_max_hp = self.max_hp;
        let hp_bonus: f32 = self.skills.iter().map(Skill::hp_bonus).sum();
        let new_max_hp = (self.stats.base_max_hp + hp_bonus).min(self.stats.max_hp_cap);

        let dash_levels = self
            .slot_of(|k| matches!(k, SkillKind::Dash { .. }))
            .map_or(0, |slot| self.skill(slot).level().saturating_sub(1));
        self.base_speed = self.stats.base_speed + dash_levels as f32 * self.stats.dash_speed_per_level;
        if !self.speed_buff.is_running() {
            self.speed = self.base_speed;
        }

        self.defense = self.items.iter().map(Item::defense).sum();

        self.max_hp = new_max_hp;
        if new_max_hp > old_max_hp {
            self.hp += new_max_hp - old_max_hp;
        }
        self.hp = self.hp.min(self.max_hp);
    }

    /// Full heal (used between rounds)
    pub fn restore_hp(&mut self) {
        self.hp = self.max_hp;
    }

    /// Place at `pos` and drop any in-flight combat state
    pub fn enter_arena(&mut self, pos: Vec2) {
        self.pos = pos;
        self.status.clear();
        self.dash = None;
        self.aiming = None;
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        dt: f32,
        env: &Surroundings,
        input: &TickInput,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Vec<CombatAction> {
        if self.controller == Controller::Human {
            self.autopilot = input.autopilot;
        }

        for skill in &mut self.skills {
            skill.tick(dt);
        }

        self.invincibility.tick(dt);

        if self.speed_buff.tick(dt) {
            self.speed = self.base_speed;
        }

        if self.status.stun.is_running() {
            self.status.stun.tick(dt);
            return Vec::new();
        }

        if self.status.knockback.is_active() {
            // Knockback ignores obstacles but never leaves the canvas
            self.pos += self.status.knockback.step(dt, self.stats.knockback_friction);
            self.pos = clamp_to_bounds(self.pos, self.size, env.bounds);
            return Vec::new();
        }

        if self.respawn.is_running() {
            self.respawn.tick(dt);
            return Vec::new();
        }

        if self.dash.is_some() {
            self.handle_dash(dt, env.obstacles);
            self.pos = clamp_to_bounds(self.pos, self.size, env.bounds);
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.is_ai_driven() {
            if let Some(mut aim) = self.aiming {
                if aim.timer.tick(dt) || !aim.timer.is_running() {
                    actions.extend(self.release_aim(env, rng));
                } else {
                    self.aiming = Some(aim);
                }
                return actions;
            }
            actions.extend(self.handle_ai(dt, env, tuning, rng));
        } else {
            actions.extend(self.handle_input(dt, env, input, rng));
        }

        self.pos = clamp_to_bounds(self.pos, self.size, env.bounds);
        actions
    }

    fn handle_input(
        &mut self,
        dt: f32,
        env: &Surroundings,
        input: &TickInput,
        rng: &mut SimRng,
    ) -> Vec<CombatAction> {
        let mut actions = Vec::new();
        let movement = input.keys.movement();
        self.step(movement, self.speed * dt, env.obstacles);

        // Holding Q aims the blast, releasing fires it
        if input.keys.q {
            if self.skill(SkillSlot::Q).can_use() {
                self.aiming = Some(Aim {
                    slot: SkillSlot::Q,
                    timer: Countdown::default(),
                });
            }
        } else if self.aiming.is_some_and(|aim| aim.slot == SkillSlot::Q) {
            actions.extend(self.release_aim(env, rng));
        }

        if input.keys.w {
            actions.extend(self.activate(SkillSlot::W, env, Vec2::ZERO, rng));
        }
        if input.keys.e {
            let heading = if movement != Vec2::ZERO {
                movement
            } else {
                input.cursor.map_or(Vec2::ZERO, |cursor| cursor - self.pos)
            };
            actions.extend(self.activate(SkillSlot::E, env, heading, rng));
        }
        actions
    }

    fn handle_ai(
        &mut self,
        dt: f32,
        env: &Surroundings,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Vec<CombatAction> {
        ai::run_economy(self, &tuning.economy);

        let plan = ai::plan(self, env, &tuning.ai, rng);
        let mut actions = Vec::new();
        for cast in plan.casts {
            actions.extend(self.activate(cast.slot, env, cast.heading, rng));
        }
        if let Some(slot) = plan.aim {
            self.aiming = Some(Aim {
                slot,
                timer: Countdown::new(tuning.ai.aim_delay),
            });
        }
        self.step(plan.movement, self.speed * dt, env.obstacles);
        actions
    }

    /// Fire the held skill (if any) and stop aiming
    pub fn release_aim(&mut self, env: &Surroundings, rng: &mut SimRng) -> Option<CombatAction> {
        let aim = self.aiming.take()?;
        self.activate(aim.slot, env, Vec2::ZERO, rng)
    }

    /// Try to use the skill in `slot`.
    ///
    /// `heading` steers a dash; it is ignored by the other variants. Cooldown,
    /// missing target and already-dashing are silent no-ops.
    pub fn activate(
        &mut self,
        slot: SkillSlot,
        env: &Surroundings,
        heading: Vec2,
        rng: &mut SimRng,
    ) -> Option<CombatAction> {
        let kind = self.skill(slot).kind.clone();
        match kind {
            SkillKind::Shot { .. } if env.threat.is_none() => return None,
            SkillKind::Dash { .. } if self.is_dashing() => return None,
            _ => {}
        }

        let inaccuracy = self.skill(slot).inaccuracy();
        match self.skill_mut(slot).try_activate()? {
            SkillEffect::Blast {
                radius,
                damage,
                effect_secs,
            } => Some(CombatAction::Blast {
                origin: self.pos,
                radius,
                damage,
                effect_secs,
            }),
            SkillEffect::Shot {
                speed,
                damage,
                size,
                life,
                stun,
            } => {
                let mut target = env.threat?;
                if self.is_ai_driven() {
                    target += Vec2::new(
                        (rng.random::<f32>() - 0.5) * inaccuracy,
                        (rng.random::<f32>() - 0.5) * inaccuracy,
                    );
                }
                let to_target = target - self.pos;
                let dist = to_target.length();
                if dist <= 0.0 {
                    return None;
                }
                Some(CombatAction::Fire(Projectile {
                    kind: ProjectileKind::Shot,
                    pos: self.pos,
                    vel: to_target / dist * speed,
                    size,
                    damage,
                    owner: self.id,
                    life,
                    stun,
                    knockback: None,
                    collided: false,
                }))
            }
            SkillEffect::Dash { speed, duration } => {
                self.start_dash(speed, duration, heading);
                None
            }
        }
    }

    /// Enter the dashing state. Ignored while already dashing.
    pub fn start_dash(&mut self, speed: f32, duration: f32, heading: Vec2) {
        if self.is_dashing() {
            return;
        }
        self.dash = Some(DashState {
            speed,
            timer: Countdown::new(duration),
        });
        self.make_invincible(self.stats.dash_invincibility_secs);
        if heading != Vec2::ZERO {
            self.dash_direction = heading.normalize();
        }
        log::debug!("{} dashes toward {:?}", self.name, self.dash_direction);
    }

    fn handle_dash(&mut self, dt: f32, obstacles: &[Obstacle]) {
        let Some(mut dash) = self.dash else {
            return;
        };
        if dash.timer.tick(dt) || !dash.timer.is_running() {
            self.dash = None;
            self.speed_buff.set(self.stats.dash_speed_buff_secs);
            self.speed = self.base_speed * self.stats.dash_speed_buff;
            return;
        }
        self.dash = Some(dash);

        // A wall stops the dash outright instead of sliding along it
        let next = self.pos + self.dash_direction * dash.speed * dt;
        if !self.blocked_at(self.pos, next, obstacles) {
            self.pos = next;
        }
    }

    /// A move is blocked when it pushes the body deeper into any wall. A body
    /// already inside one (after knockback) may still move out of it.
    fn blocked_at(&self, from: Vec2, to: Vec2, obstacles: &[Obstacle]) -> bool {
        obstacles.iter().any(|o| {
            o.overlap_area(to, self.size) > o.overlap_area(from, self.size) + OVERLAP_SLACK
        })
    }

    /// Move up to `distance` along `direction`, resolving each axis on its own
    /// so a blocked axis doesn't cancel motion on the other one.
    pub fn step(&mut self, direction: Vec2, distance: f32, obstacles: &[Obstacle]) {
        if direction == Vec2::ZERO {
            return;
        }
        let direction = if direction.length() > 1.0 {
            direction.normalize()
        } else {
            direction
        };
        let next = self.pos + direction * distance;

        if !self.blocked_at(self.pos, Vec2::new(next.x, self.pos.y), obstacles) {
            self.pos.x = next.x;
        }
        if !self.blocked_at(self.pos, Vec2::new(self.pos.x, next.y), obstacles) {
            self.pos.y = next.y;
        }
    }
}

impl Combatant for Character {
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
        if self.is_invincible() {
            return;
        }
        let final_damage = (damage - self.defense).max(1.0);
        self.hp = (self.hp - final_damage).max(0.0);
        log::debug!(
            "{} took {final_damage} damage ({damage} raw), hp {}",
            self.name,
            self.hp
        );
    }

    fn apply_stun(&mut self, secs: f32) {
        if self.is_invincible() {
            return;
        }
        self.status.stun(secs);
    }

    fn apply_knockback(&mut self, direction: Vec2, force: f32, secs: f32) {
        if self.is_invincible() {
            return;
        }
        self.status.knock_back(direction, force, secs);
    }
}
