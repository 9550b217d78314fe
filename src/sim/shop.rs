//! Upgrade shop: pricing, catalogue and purchases

use serde::{Deserialize, Serialize};

use super::auto_attack::AutoAttackKind;
use super::character::Character;
use super::item::ItemKind;
use super::skill::SkillSlot;
use crate::tuning::EconomyTuning;

/// Anything that can be bought or levelled up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopKey {
    Skill(SkillSlot),
    AutoAttack(AutoAttackKind),
    Item(ItemKind),
}

impl ShopKey {
    /// Every purchasable entry, in display order
    pub fn all() -> impl Iterator<Item = ShopKey> {
        SkillSlot::ALL
            .into_iter()
            .map(ShopKey::Skill)
            .chain(AutoAttackKind::ALL.into_iter().map(ShopKey::AutoAttack))
            .chain(ItemKind::ALL.into_iter().map(ShopKey::Item))
    }
}

/// One row of the shop as presented to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopEntry {
    pub key: ShopKey,
    pub name: String,
    /// Category label ("Active", "Passive", "Auto-Attack", "Item")
    pub category: String,
    pub level: u32,
    pub cost: u32,
    pub description: String,
    pub next_description: String,
    pub affordable: bool,
}

impl Character {
    pub fn level_of(&self, key: ShopKey) -> u32 {
        match key {
            ShopKey::Skill(slot) => self.skill(slot).level(),
            ShopKey::AutoAttack(kind) => self.arsenal.level(kind),
            ShopKey::Item(kind) => self
                .items
                .iter()
                .find(|item| item.kind == kind)
                .map_or(0, |item| item.level()),
        }
    }

    /// Price of the next level of `key`
    pub fn cost_of(&self, key: ShopKey, econ: &EconomyTuning) -> u32 {
        let level = self.level_of(key);
        match key {
            ShopKey::Skill(_) => econ.skill_base_cost + level.saturating_sub(1) * econ.skill_cost_per_level,
            ShopKey::AutoAttack(_) => econ.auto_attack_base_cost + level * econ.auto_attack_cost_per_level,
            ShopKey::Item(_) => econ.item_base_cost + level * econ.item_cost_per_level,
        }
    }

    /// Spend gold on one level of `key`. Returns false (and changes nothing)
    /// when the character cannot afford it.
    pub fn purchase(&mut self, key: ShopKey, econ: &EconomyTuning) -> bool {
        let cost = self.cost_of(key, econ);
        if !self.spend_gold(cost) {
            return false;
        }

        match key {
            ShopKey::Skill(slot) => {
                self.skill_mut(slot).upgrade();
                if self.skill(slot).affects_owner_stats() {
                    self.recalculate_stats();
                }
            }
            ShopKey::AutoAttack(kind) => {
                self.arsenal.upgrade(kind);
                if !self.owned_auto_attacks.contains(&kind) {
                    self.owned_auto_attacks.push(kind);
                }
            }
            ShopKey::Item(kind) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.kind == kind) {
                    item.upgrade();
                }
                self.recalculate_stats();
            }
        }

        log::debug!(
            "{} bought {key:?} for {cost} gold (now level {}, {} gold left)",
            self.name,
            self.level_of(key),
            self.gold()
        );
        true
    }

    /// Full shop listing for this character
    pub fn catalogue(&self, econ: &EconomyTuning) -> Vec<ShopEntry> {
        ShopKey::all()
            .map(|key| {
                let cost = self.cost_of(key, econ);
                let (name, category, description, next_description) = match key {
                    ShopKey::Skill(slot) => {
                        let skill = self.skill(slot);
                        (
                            format!("{} ({})", skill.name(), slot.key().to_ascii_uppercase()),
                            if skill.is_passive() { "Passive" } else { "Active" },
                            skill.description(),
                            skill.next_description(),
                        )
                    }
                    ShopKey::AutoAttack(kind) => (
                        kind.name().to_string(),
                        "Auto-Attack",
                        self.arsenal.description(kind),
                        self.arsenal.next_description(kind),
                    ),
                    ShopKey::Item(kind) => {
                        let item = self.items.iter().find(|item| item.kind == kind);
                        (
                            kind.name().to_string(),
                            "Item",
                            item.map(|i| i.description()).unwrap_or_default(),
                            item.map(|i| i.next_description()).unwrap_or_default(),
                        )
                    }
                };
                ShopEntry {
                    key,
                    name,
                    category: category.to_string(),
                    level: self.level_of(key),
                    cost,
                    description,
                    next_description,
                    affordable: self.gold() >= cost,
                }
            })
            .collect()
    }
}
