//! Countdown timers
//!
//! Every timed behaviour in the simulation (ability cooldowns, stun, knockback,
//! invincibility, dash, respawn) is a value that counts down by `dt` each tick.

use serde::{Deserialize, Serialize};

/// A re-armable cooldown gate for activated abilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Full cooldown length in seconds
    duration: f32,
    /// Seconds until ready (0 = ready)
    remaining: f32,
}

impl Cooldown {
    /// A cooldown that starts ready
    pub fn new(duration: f32) -> Self {
        debug_assert!(duration >= 0.0, "cooldown duration must be non-negative");
        Self {
            duration,
            remaining: 0.0,
        }
    }

    /// A cooldown that must elapse once before first use
    pub fn armed(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Remaining fraction: 0 when ready, otherwise in (0, 1]
    pub fn progress(&self) -> f32 {
        if self.is_ready() || self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).min(1.0)
        }
    }

    /// Re-arm if ready. Returns false (and changes nothing) while cooling down.
    pub fn trigger(&mut self) -> bool {
        if self.is_ready() {
            self.remaining = self.duration;
            true
        } else {
            false
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Change the full length, keeping any running countdown within it
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
        self.remaining = self.remaining.min(duration);
    }
}

/// A plain countdown used for status effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        Self { remaining: secs }
    }

    /// Advance by `dt`. Returns true on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                return true;
            }
        }
        false
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn set(&mut self, secs: f32) {
        self.remaining = secs;
    }

    /// Lengthen to `secs` if that is longer; never shortens
    pub fn extend(&mut self, secs: f32) {
        self.remaining = self.remaining.max(secs);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_cycle() {
        let mut cd = Cooldown::new(2.0);
        assert!(cd.is_ready());
        assert_eq!(cd.progress(), 0.0);

        assert!(cd.trigger());
        assert!(!cd.is_ready());
        assert_eq!(cd.progress(), 1.0);

        cd.tick(1.0);
        assert!((cd.progress() - 0.5).abs() < 1e-6);

        // Not ready: trigger is a no-op
        assert!(!cd.trigger());
        assert!((cd.remaining() - 1.0).abs() < 1e-6);

        cd.tick(1.5);
        assert!(cd.is_ready());
        assert_eq!(cd.remaining(), 0.0);
    }

    #[test]
    fn test_set_duration_clamps_remaining() {
        let mut cd = Cooldown::armed(8.0);
        cd.set_duration(3.0);
        assert_eq!(cd.remaining(), 3.0);
        assert_eq!(cd.progress(), 1.0);
    }

    #[test]
    fn test_countdown_expiry_edge() {
        let mut t = Countdown::new(0.5);
        assert!(!t.tick(0.25));
        assert!(t.tick(0.25));
        assert!(!t.is_running());
        // Already expired: no second edge
        assert!(!t.tick(0.25));
    }

    #[test]
    fn test_countdown_extend_never_shortens() {
        let mut t = Countdown::new(1.0);
        t.extend(0.2);
        assert_eq!(t.remaining(), 1.0);
        t.extend(2.0);
        assert_eq!(t.remaining(), 2.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cooldown_never_negative(duration in 0.0f32..20.0, steps in prop::collection::vec(0.0f32..1.0, 0..50)) {
                let mut cd = Cooldown::new(duration);
                cd.trigger();
                for dt in steps {
                    cd.tick(dt);
                    prop_assert!(cd.remaining() >= 0.0);
                    prop_assert!(cd.remaining() <= duration);
                    prop_assert!((0.0..=1.0).contains(&cd.progress()));
                }
            }

            #[test]
            fn trigger_while_cooling_is_a_no_op(duration in 0.1f32..20.0, elapsed in 0.0f32..0.09) {
                let mut cd = Cooldown::new(duration);
                prop_assert!(cd.trigger());
                cd.tick(elapsed);
                let before = cd;
                prop_assert!(!cd.trigger());
                prop_assert!(!cd.trigger());
                prop_assert_eq!(cd, before);
            }

            #[test]
            fn split_ticks_match_one_tick(duration in 0.0f32..10.0, a in 0.0f32..5.0, b in 0.0f32..5.0) {
                let mut whole = Cooldown::armed(duration);
                whole.tick(a + b);
                let mut split = Cooldown::armed(duration);
                split.tick(a);
                split.tick(b);
                prop_assert!((whole.remaining() - split.remaining()).abs() < 1e-4);
            }
        }
    }
}
