//! Training configuration.

use crate::error::{Error, Result};

/// Exploration constant in `N0 / (N0 + N(s))`
pub const DEFAULT_N0: f64 = 100.0;
/// Hard cap on transitions per episode
pub const EPISODE_STEP_CAP: usize = 10;
/// Hard cap on dealer draws after the player sticks
pub const DEALER_DRAW_CAP: usize = 10;
pub const DEFAULT_EPISODES: usize = 1000;

/// Settings handed to the episode simulator and control update at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Exploration constant. Larger values keep exploring for longer.
    pub n0: f64,
    /// Discount applied when accumulating returns. Easy21 is undiscounted.
    pub discount: f64,
    /// Transitions after which an episode is forcibly terminated.
    pub step_cap: usize,
    /// Dealer draws after which the dealer stops regardless of total.
    /// Applied by `Trainer` and `evaluate` when they build their engines; an
    /// `Episode` uses whatever cap its `Engine` was built with.
    pub dealer_draw_cap: usize,
    /// Seed for cards and exploration. `None` draws fresh entropy.
    pub seed: Option<u64>,
    /// Log a progress line every this many episodes. 0 disables.
    pub log_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n0: DEFAULT_N0,
            discount: 1.0,
            step_cap: EPISODE_STEP_CAP,
            dealer_draw_cap: DEALER_DRAW_CAP,
            seed: None,
            log_every: 100,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(self.n0.is_finite() && self.n0 > 0.0) {
            return Err(Error::InvalidConfig(format!("n0 must be positive, got {}", self.n0)));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::InvalidConfig(format!("discount must be in [0, 1], got {}", self.discount)));
        }
        if self.step_cap == 0 {
            return Err(Error::InvalidConfig("step_cap must be at least 1".into()));
        }
        if self.dealer_draw_cap == 0 {
            return Err(Error::InvalidConfig("dealer_draw_cap must be at least 1".into()));
        }
        Ok(())
    }

    /// Decaying exploration rate for a state visited `visits` times
    #[inline]
    pub fn epsilon(&self, visits: u64) -> f64 {
        self.n0 / (self.n0 + visits as f64)
    }
}
