//! Per-frame simulation tick and phase transitions
//!
//! The outer loop samples input, calls [`tick`] once per frame, and reads the
//! returned events and [`super::view`] snapshots. Nothing here blocks or
//! touches the platform.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::state::{CharacterId, Match, MatchEvent, Phase};
use super::world::World;

/// Logical keys currently held by the human player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub q: bool,
    pub w: bool,
    pub e: bool,
}

impl HeldKeys {
    pub const NONE: HeldKeys = HeldKeys {
        up: false,
        down: false,
        left: false,
        right: false,
        q: false,
        w: false,
        e: false,
    };

    /// Raw movement intent (components in {-1, 0, 1}, not normalized)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub keys: HeldKeys,
    /// Cursor in world coordinates (dash direction fallback)
    pub cursor: Option<Vec2>,
    /// While set, ticks are discarded instead of accumulated
    pub paused: bool,
    /// Let the AI routine drive the player character (demo mode)
    pub autopilot: bool,
}

impl TickInput {
    pub const IDLE: TickInput = TickInput {
        keys: HeldKeys::NONE,
        cursor: None,
        paused: false,
        autopilot: false,
    };
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<MatchEvent>,
}

/// Advance the match by `dt` seconds
pub fn tick(m: &mut Match, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();

    if input.paused != m.paused {
        log::info!("{}", if input.paused { "Paused" } else { "Resumed" });
        m.paused = input.paused;
    }
    // Paused time is dropped, not banked
    if m.paused || dt <= 0.0 {
        return report;
    }

    match m.phase {
        Phase::Laning => {
            for world in &mut m.homes {
                let events = world.update(dt, &mut m.roster, input, &m.tuning, &mut m.rng);
                report.events.extend(events);
            }
            m.phase_timer -= dt;
            if m.phase_timer <= 0.0 {
                begin_duel(m, &mut report);
            }
        }
        Phase::Dueling => {
            if let Some(duel) = &mut m.duel {
                let events = duel.update(dt, &mut m.roster, input, &m.tuning, &mut m.rng);
                report.events.extend(events);
            }
            finish_round(m, &mut report);
        }
        Phase::MatchOver { .. } => {}
    }

    report
}

/// Laning -> Dueling: build the arena and move both characters into it
pub fn begin_duel(m: &mut Match, report: &mut TickReport) {
    let duel = World::generate_duel(&m.tuning, &mut m.rng);
    let (w, h) = (duel.bounds.x, duel.bounds.y);
    let inset = m.tuning.phases.duel_spawn_inset;

    let (player, rival) = m.roster.pair_mut();
    player.enter_arena(Vec2::new(inset, h / 2.0));
    rival.enter_arena(Vec2::new(w - inset, h / 2.0));
    for home in &mut m.homes {
        home.clear_enemies();
    }

    m.duel = Some(duel);
    m.phase = Phase::Dueling;
    log::info!("Round {} duel started", m.current_round);
    report.events.push(MatchEvent::DuelStarted {
        round: m.current_round,
    });
}

/// Dueling -> Laning or MatchOver once someone has fallen.
///
/// A tick where both characters die goes to the rival.
pub fn finish_round(m: &mut Match, report: &mut TickReport) {
    let player_dead = m.roster.get(CharacterId::Player).is_dead();
    let rival_dead = m.roster.get(CharacterId::Rival).is_dead();
    if !player_dead && !rival_dead {
        return;
    }

    let winner = if player_dead {
        CharacterId::Rival
    } else {
        CharacterId::Player
    };
    let round = m.current_round;
    let respawn_secs = m.tuning.character.respawn_secs;
    m.roster.get_mut(winner.opponent()).respawn.set(respawn_secs);
    let winner_char = m.roster.get_mut(winner);
    winner_char.won_rounds.push(round);
    let wins = winner_char.won_rounds.len();
    log::info!("{} won round {round} ({wins} total)", winner_char.name);
    m.current_round += 1;
    report.events.push(MatchEvent::RoundWon { winner, round });

    if wins >= m.tuning.phases.rounds_to_win {
        m.phase = Phase::MatchOver { winner };
        log::info!("{} is the champion!", m.roster.get(winner).name);
        report.events.push(MatchEvent::MatchWon { winner });
    } else {
        return_to_laning(m);
    }
}

/// Back to the home lanes: full heal, recentre, round bonus gold
fn return_to_laning(m: &mut Match) {
    let spawn = m.home_spawn();
    for id in CharacterId::ALL {
        let bonus = match id {
            CharacterId::Player => m.tuning.economy.round_bonus_player,
            CharacterId::Rival => m.tuning.economy.round_bonus_ai,
        };
        let ch = m.roster.get_mut(id);
        ch.restore_hp();
        ch.enter_arena(spawn);
        ch.add_gold(bonus);
    }
    m.duel = None;
    m.phase = Phase::Laning;
    m.phase_timer = m.tuning.phases.laning_secs;
    log::info!("Round {} laning phase ({}s)", m.current_round, m.phase_timer);
}
