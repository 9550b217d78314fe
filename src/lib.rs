//! Duel Arena - laning/duel combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (characters, skills, collisions, match phases)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, DOM shop UI and input capture live outside this crate. They feed
//! [`sim::TickInput`] in and read [`sim::view`] snapshots out.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp a square body of side `size` so it stays inside `[0, bounds]`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, size: f32, bounds: Vec2) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        pos.x.clamp(half, (bounds.x - half).max(half)),
        pos.y.clamp(half, (bounds.y - half).max(half)),
    )
}

/// Unit vector at `angle` radians
#[inline]
pub fn unit_at(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
