//! Duel Arena - headless native driver
//!
//! Runs an autopilot-vs-AI match at the fixed timestep and logs the outcome.
//!
//! Usage: `duel-arena [seed] [tuning.json]` (logging via `RUST_LOG`)

use duel_arena::Tuning;
use duel_arena::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use duel_arena::sim::{Match, MatchEvent, Phase, TickInput, frame, tick};

/// Simulated display refresh the driver pretends to run at
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after this much simulated time
const MAX_MATCH_SECS: f32 = 60.0 * 60.0;

/// Frame loop state, mirrors what a browser host would keep
struct Driver {
    state: Match,
    input: TickInput,
    accumulator: f32,
    elapsed: f32,
}

impl Driver {
    fn new(state: Match) -> Self {
        Self {
            state,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let report = tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            self.elapsed += SIM_DT;
            substeps += 1;

            for event in report.events {
                match event {
                    MatchEvent::RoundWon { winner, round } => {
                        let wins = self.state.signals().wins;
                        log::info!(
                            "[{:7.1}s] round {round} -> {winner:?} (score {}-{})",
                            self.elapsed,
                            wins[0],
                            wins[1]
                        );
                    }
                    MatchEvent::EnemySlain { .. } | MatchEvent::GoldCollected { .. } => {
                        log::trace!("{event:?}");
                    }
                    _ => log::debug!("[{:7.1}s] {event:?}", self.elapsed),
                }
            }
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.state.phase, Phase::MatchOver { .. })
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({e}); using 1");
            1
        }
        None => 1,
    };
    let tuning = args.next().map(Tuning::load).unwrap_or_default();

    log::info!("Duel Arena (headless) starting, seed {seed}");
    let mut driver = Driver::new(Match::with_names(seed, tuning, "Autopilot", "AI Opponent"));

    while !driver.is_finished() && driver.elapsed < MAX_MATCH_SECS {
        driver.update(FRAME_DT);
    }

    let state = &driver.state;
    match state.winner() {
        Some(winner) => log::info!(
            "{} wins after {:.1}s of simulated play",
            state.character(winner).name,
            driver.elapsed
        ),
        None => log::warn!("No winner after {MAX_MATCH_SECS}s; stopping"),
    }
    for c in state.roster.iter() {
        log::info!(
            "{}: rounds {:?}, {} gold, hp {:.0}/{:.0}",
            c.name,
            c.won_rounds,
            c.gold(),
            c.hp,
            c.max_hp
        );
    }

    if log::log_enabled!(log::Level::Debug) {
        match frame(state).to_json() {
            Ok(json) => log::debug!("Final frame: {json}"),
            Err(e) => log::warn!("Could not serialize final frame: {e}"),
        }
    }
}
