//! Match state and core identifiers
//!
//! Everything needed to resume or reproduce a session lives in [`Match`]:
//! both characters, their home worlds, the duel arena, and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::character::Character;
use super::shop::{ShopEntry, ShopKey};
use super::world::World;
use crate::tuning::Tuning;

/// Handle for one of the two combatants in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterId {
    Player,
    Rival,
}

impl CharacterId {
    pub const ALL: [CharacterId; 2] = [CharacterId::Player, CharacterId::Rival];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opponent(self) -> CharacterId {
        match self {
            CharacterId::Player => CharacterId::Rival,
            CharacterId::Rival => CharacterId::Player,
        }
    }
}

/// Who drives a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai,
}

/// Owns both characters; worlds refer to them by [`CharacterId`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    characters: [Character; 2],
}

impl Roster {
    pub fn new(player: Character, rival: Character) -> Self {
        debug_assert_eq!(player.id, CharacterId::Player);
        debug_assert_eq!(rival.id, CharacterId::Rival);
        Self {
            characters: [player, rival],
        }
    }

    pub fn get(&self, id: CharacterId) -> &Character {
        &self.characters[id.index()]
    }

    pub fn get_mut(&mut self, id: CharacterId) -> &mut Character {
        &mut self.characters[id.index()]
    }

    /// Both characters at once (player, rival)
    pub fn pair_mut(&mut self) -> (&mut Character, &mut Character) {
        let [player, rival] = &mut self.characters;
        (player, rival)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Each character farms its own world
    Laning,
    /// Both characters share the duel arena
    Dueling,
    /// Terminal: simulation halted
    MatchOver { winner: CharacterId },
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    DuelStarted { round: u32 },
    RoundWon { winner: CharacterId, round: u32 },
    MatchWon { winner: CharacterId },
    /// An enemy died in `world`'s home lane
    EnemySlain { world: CharacterId },
    GoldCollected { character: CharacterId, amount: u32 },
}

/// Phase and score summary for the screen layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub phase: Phase,
    pub phase_timer: f32,
    pub round: u32,
    /// Rounds won, indexed by [`CharacterId::index`]
    pub wins: [usize; 2],
    pub winner: Option<CharacterId>,
    pub paused: bool,
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: SimRng,
    pub tuning: Tuning,
    pub phase: Phase,
    /// Seconds left in the laning phase
    pub phase_timer: f32,
    /// 1-based round number of the next (or current) duel
    pub current_round: u32,
    pub roster: Roster,
    /// Laning worlds, indexed by [`CharacterId::index`]
    pub homes: [World; 2],
    pub duel: Option<World>,
    pub paused: bool,
}

impl Match {
    /// Start a new match with default names
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_names(seed, tuning, "Player", "AI Opponent")
    }

    pub fn with_names(seed: u64, tuning: Tuning, player_name: &str, rival_name: &str) -> Self {
        let lane = tuning.arena.laning_size;
        let center = lane / 2.0;
        let mut player = Character::new(CharacterId::Player, player_name, Controller::Human, center, &tuning);
        let mut rival = Character::new(CharacterId::Rival, rival_name, Controller::Ai, center, &tuning);
        player.add_gold(tuning.economy.starting_gold);
        rival.add_gold(tuning.economy.starting_gold);

        log::info!("New match (seed {seed}): {player_name} vs {rival_name}");
        Self {
            seed,
            rng: SimRng::seed_from_u64(seed),
            phase: Phase::Laning,
            phase_timer: tuning.phases.laning_secs,
            current_round: 1,
            roster: Roster::new(player, rival),
            homes: [
                World::laning(CharacterId::Player, lane),
                World::laning(CharacterId::Rival, lane),
            ],
            duel: None,
            paused: false,
            tuning,
        }
    }

    pub fn character(&self, id: CharacterId) -> &Character {
        self.roster.get(id)
    }

    pub fn winner(&self) -> Option<CharacterId> {
        match self.phase {
            Phase::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn signals(&self) -> Signals {
        Signals {
            phase: self.phase,
            phase_timer: self.phase_timer.max(0.0),
            round: self.current_round,
            wins: CharacterId::ALL.map(|id| self.roster.get(id).won_rounds.len()),
            winner: self.winner(),
            paused: self.paused,
        }
    }

    /// Shop listing for a character
    pub fn catalogue(&self, id: CharacterId) -> Vec<ShopEntry> {
        self.roster.get(id).catalogue(&self.tuning.economy)
    }

    /// Player purchase from the shop UI
    pub fn purchase(&mut self, key: ShopKey) -> bool {
        if matches!(self.phase, Phase::MatchOver { .. }) {
            return false;
        }
        self.roster
            .get_mut(CharacterId::Player)
            .purchase(key, &self.tuning.economy)
    }

    /// Spawn point for a character in a laning world
    pub fn home_spawn(&self) -> Vec2 {
        self.tuning.arena.laning_size / 2.0
    }
}
