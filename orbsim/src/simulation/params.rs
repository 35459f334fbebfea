//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant `G`,
//! - minimum separation and what to do below it,
//! - position history tracking (size and which end observers see)

use serde::Deserialize;

use crate::simulation::errors::{Result, SimError};

/// What the force term does with pairs closer than `min_separation`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparationPolicy {
    #[serde(rename = "reject")] // abort the tick with DegenerateSeparation
    #[default]
    Reject,

    #[serde(rename = "clamp")] // evaluate the pair at min_separation
    Clamp,
}

/// Which tracked position observers are handed after an update
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    #[serde(rename = "leading")] // newest sample, where the body is now
    #[default]
    Leading,

    #[serde(rename = "trailing")] // oldest sample, lagging history_size ticks behind
    Trailing,
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub min_separation: f64, // distance floor for pairwise forces
    pub separation: SeparationPolicy, // reject or clamp below min_separation
    pub track_history: bool, // keep a position history per moving body
    pub history_size: usize, // capacity of each history
    pub history_mode: HistoryMode, // newest or oldest sample to observers
}

impl Parameters {
    pub const DEFAULT_G: f64 = 0.00003;
    pub const DEFAULT_MIN_SEPARATION: f64 = 1e-6;
    pub const DEFAULT_HISTORY_SIZE: usize = 2000;

    pub fn validate(&self) -> Result<()> {
        if !(self.G.is_finite() && self.G > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "G must be finite and positive, got {}",
                self.G
            )));
        }
        if !(self.min_separation.is_finite() && self.min_separation >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "min_separation must be finite and non-negative, got {}",
                self.min_separation
            )));
        }
        if self.track_history && self.history_size == 0 {
            return Err(SimError::InvalidParameter(
                "history_size must be at least 1 when tracking history".into(),
            ));
        }
        Ok(())
    }

    pub fn with_history(mut self, size: usize, mode: HistoryMode) -> Self {
        self.track_history = true;
        self.history_size = size;
        self.history_mode = mode;
        self
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G: Self::DEFAULT_G,
            min_separation: Self::DEFAULT_MIN_SEPARATION,
            separation: SeparationPolicy::Reject,
            track_history: false,
            history_size: Self::DEFAULT_HISTORY_SIZE,
            history_mode: HistoryMode::Leading,
        }
    }
}
