//! Read-only render snapshot
//!
//! The presentation layer paints whatever [`Frame`] describes; it never
//! reaches into the simulation types directly. Frames serialize to JSON for a
//! browser front end.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::combatant::Combatant;
use super::entity::ProjectileKind;
use super::skill::SkillSlot;
use super::state::{CharacterId, Match, Phase, Signals};
use super::world::{World, WorldKind};

/// One drawable thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sprite {
    Character {
        id: CharacterId,
        pos: Vec2,
        size: f32,
        hp_fraction: f32,
        invincible: bool,
        stunned: bool,
        respawning: bool,
    },
    /// Blast radius preview while a character holds an area skill
    AimIndicator {
        owner: CharacterId,
        pos: Vec2,
        radius: f32,
    },
    Enemy {
        pos: Vec2,
        size: f32,
        hp_fraction: f32,
    },
    Projectile {
        projectile: ProjectileKind,
        owner: CharacterId,
        pos: Vec2,
        size: f32,
    },
    Sphere {
        owner: CharacterId,
        pos: Vec2,
        radius: f32,
    },
    Gem {
        pos: Vec2,
        size: f32,
    },
    Effect {
        owner: Option<CharacterId>,
        pos: Vec2,
        radius: f32,
        opacity: f32,
    },
    Obstacle {
        min: Vec2,
        size: Vec2,
    },
}

/// Cooldown readout for one skill button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillHud {
    pub key: char,
    pub name: String,
    pub level: u32,
    /// 0 when ready, up to 1 right after use
    pub cooldown: f32,
    pub passive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterHud {
    pub id: CharacterId,
    pub name: String,
    pub hp: f32,
    pub max_hp: f32,
    pub gold: u32,
    pub skills: Vec<SkillHud>,
    pub won_rounds: Vec<u32>,
}

/// Everything visible in one arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub kind: WorldKind,
    pub bounds: Vec2,
    /// Back-to-front paint order
    pub sprites: Vec<Sprite>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub signals: Signals,
    pub worlds: Vec<WorldView>,
    pub hud: Vec<CharacterHud>,
}

impl Frame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Snapshot the arenas the current phase shows
pub fn frame(m: &Match) -> Frame {
    let worlds = match &m.duel {
        Some(duel) if m.phase != Phase::Laning => vec![world_view(duel, m)],
        _ => m.homes.iter().map(|home| world_view(home, m)).collect(),
    };
    Frame {
        signals: m.signals(),
        worlds,
        hud: m.roster.iter().map(hud).collect(),
    }
}

pub fn world_view(world: &World, m: &Match) -> WorldView {
    let mut sprites = Vec::new();

    sprites.extend(world.obstacles.iter().map(|o| Sprite::Obstacle {
        min: o.min,
        size: o.size,
    }));
    sprites.extend(world.projectiles.iter().map(|p| Sprite::Projectile {
        projectile: p.kind,
        owner: p.owner,
        pos: p.pos,
        size: p.size,
    }));
    sprites.extend(world.effects.iter().map(|e| Sprite::Effect {
        owner: e.owner,
        pos: e.pos,
        radius: e.radius,
        opacity: e.opacity(),
    }));
    sprites.extend(world.enemies.iter().map(|e| Sprite::Enemy {
        pos: e.pos,
        size: e.size,
        hp_fraction: e.hp_fraction(),
    }));
    sprites.extend(world.gems.iter().map(|g| Sprite::Gem {
        pos: g.pos,
        size: g.size,
    }));

    for &id in world.residents() {
        character_sprites(m.roster.get(id), &mut sprites);
    }

    WorldView {
        kind: world.kind,
        bounds: world.bounds,
        sprites,
    }
}

fn character_sprites(c: &Character, sprites: &mut Vec<Sprite>) {
    let orbit = &c.arsenal.orbiting_sphere;
    sprites.extend(orbit.strike_points(c.pos).into_iter().map(|pos| Sprite::Sphere {
        owner: c.id,
        pos,
        radius: orbit.sphere_radius,
    }));
    sprites.push(Sprite::Character {
        id: c.id,
        pos: c.pos,
        size: c.size,
        hp_fraction: c.hp_fraction(),
        invincible: c.is_invincible(),
        stunned: c.status.stun.is_running(),
        respawning: c.is_respawning(),
    });
    if let Some(aim) = c.aiming {
        sprites.push(Sprite::AimIndicator {
            owner: c.id,
            pos: c.pos,
            radius: c.skill(aim.slot).radius(),
        });
    }
}

fn hud(c: &Character) -> CharacterHud {
    CharacterHud {
        id: c.id,
        name: c.name.clone(),
        hp: c.hp,
        max_hp: c.max_hp,
        gold: c.gold(),
        skills: c
            .skills
            .iter()
            .zip(SkillSlot::ALL)
            .map(|(skill, slot)| SkillHud {
                key: slot.key(),
                name: skill.name().to_string(),
                level: skill.level(),
                cooldown: skill.cooldown().progress(),
                passive: skill.is_passive(),
            })
            .collect(),
        won_rounds: c.won_rounds.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::auto_attack::AutoAttackKind;
    use crate::sim::shop::ShopKey;
    use crate::sim::tick::{self, TickInput};

    #[test]
    fn test_laning_frame_shows_both_lanes() {
        let mut m = Match::new(3, Tuning::default());
        assert!(m.purchase(ShopKey::AutoAttack(AutoAttackKind::OrbitingSphere)));
        let f = frame(&m);
        assert_eq!(f.worlds.len(), 2);
        assert_eq!(f.hud.len(), 2);
        assert_eq!(f.hud[0].skills[0].key, 'q');
        assert!(f.hud[0].skills[3].passive);

        let player_world = &f.worlds[0];
        assert_eq!(player_world.kind, WorldKind::Laning { home: CharacterId::Player });
        let spheres = player_world
            .sprites
            .iter()
            .filter(|s| matches!(s, Sprite::Sphere { .. }))
            .count();
        assert_eq!(spheres, 1);
        assert!(player_world.sprites.iter().any(|s| matches!(
            s,
            Sprite::Character { id: CharacterId::Player, hp_fraction, .. } if *hp_fraction == 1.0
        )));
    }

    #[test]
    fn test_duel_frame_shows_one_arena() {
        let mut tuning = Tuning::default();
        tuning.phases.laning_secs = 0.01;
        let mut m = Match::new(3, tuning);
        tick::tick(&mut m, &TickInput::default(), 0.02);
        assert_eq!(m.phase, Phase::Dueling);

        let f = frame(&m);
        assert_eq!(f.worlds.len(), 1);
        let characters = f.worlds[0]
            .sprites
            .iter()
            .filter(|s| matches!(s, Sprite::Character { .. }))
            .count();
        assert_eq!(characters, 2);
        assert!(f.worlds[0].sprites.iter().any(|s| matches!(s, Sprite::Obstacle { .. })));
    }

    #[test]
    fn test_frame_json_is_tagged() {
        let m = Match::new(3, Tuning::default());
        let json = frame(&m).to_json().unwrap();
        assert!(json.contains(r#""kind":"character""#));
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.signals.round, 1);
    }
}
