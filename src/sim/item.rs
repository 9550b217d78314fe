//! Equipment bought from the shop

use serde::{Deserialize, Serialize};

use crate::tuning::ItemTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Armor,
}

impl ItemKind {
    pub const ALL: [ItemKind; 1] = [ItemKind::Armor];

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Armor => "Armor",
        }
    }
}

/// An item and its level (0 = not owned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    level: u32,
    base_defense: f32,
    defense_per_level: f32,
}

impl Item {
    pub fn armor(t: &ItemTuning) -> Self {
        Self {
            kind: ItemKind::Armor,
            level: 0,
            base_defense: t.armor_defense,
            defense_per_level: t.armor_defense_per_level,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
    }

    fn defense_at(&self, level: u32) -> f32 {
        match (self.kind, level) {
            (_, 0) => 0.0,
            (ItemKind::Armor, l) => self.base_defense + (l - 1) as f32 * self.defense_per_level,
        }
    }

    /// Flat damage reduction granted at the current level
    pub fn defense(&self) -> f32 {
        self.defense_at(self.level)
    }

    pub fn description(&self) -> String {
        format!("Damage Reduction: {}", self.defense())
    }

    pub fn next_description(&self) -> String {
        format!("Damage Reduction: {}", self.defense_at(self.level + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_defense_curve() {
        let mut armor = Item::armor(&ItemTuning::default());
        assert_eq!(armor.defense(), 0.0);
        assert_eq!(armor.next_description(), "Damage Reduction: 5");
        armor.upgrade();
        assert_eq!(armor.defense(), 5.0);
        armor.upgrade();
        assert_eq!(armor.defense(), 7.0);
        assert_eq!(armor.description(), "Damage Reduction: 7");
    }
}
