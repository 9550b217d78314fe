//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only ([`SimRng`], owned by [`Match`])
//! - Stable iteration order (player before rival, insertion order for entities)
//! - No rendering or platform dependencies

pub mod ai;
pub mod auto_attack;
pub mod character;
pub mod collision;
pub mod combatant;
pub mod entity;
pub mod item;
pub mod shop;
pub mod skill;
pub mod state;
pub mod tick;
pub mod timer;
pub mod view;
pub mod world;

/// The single random source every gameplay roll draws from
pub type SimRng = rand_pcg::Pcg32;

pub use auto_attack::{Arsenal, AutoAttackKind};
pub use character::{Character, CombatAction};
pub use combatant::{Combatant, Enemy};
pub use entity::{Gem, Obstacle, Projectile, ProjectileKind, VisualEffect};
pub use item::{Item, ItemKind};
pub use shop::{ShopEntry, ShopKey};
pub use skill::{Skill, SkillKind, SkillSlot};
pub use state::{CharacterId, Controller, Match, MatchEvent, Phase, Roster, Signals};
pub use tick::{HeldKeys, TickInput, TickReport, tick};
pub use view::{Frame, Sprite, frame};
pub use world::{World, WorldKind};
