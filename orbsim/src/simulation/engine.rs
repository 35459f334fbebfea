//! Run settings of the headless driver
//!
//! Fixed step size, tick count, diagnostics period and whether histories are
//! warmed up before the run starts

use crate::configuration::config::EngineConfig;
use crate::simulation::errors::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub dt: f64, // fixed time step
    pub steps: usize, // ticks to run
    pub log_every: usize, // 0 = no periodic diagnostics
    pub warmup: bool, // fill histories first
}

impl Engine {
    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        if !(cfg.dt.is_finite() && cfg.dt > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "engine dt must be positive, got {}",
                cfg.dt
            )));
        }
        Ok(Self {
            dt: cfg.dt,
            steps: cfg.steps,
            log_every: cfg.log_every,
            warmup: cfg.warmup,
        })
    }

    /// Whether diagnostics are due after tick `tick` (1-based)
    pub fn should_log(&self, tick: usize) -> bool {
        self.log_every != 0 && tick % self.log_every == 0
    }
}
