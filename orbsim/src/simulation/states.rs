//! Core state types for the planetary system.
//!
//! - `NVec3`       3d vector (nalgebra, f64, copied by value)
//! - `BodyId`      stable identity of a body, carried over by clones
//! - `IdAllocator` explicit id source shared by a system and its clones
//! - `Body`        one gravitating point mass

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nalgebra::Vector3;

use crate::simulation::errors::{Result, SimError};

pub type NVec3 = Vector3<f64>;

/// Identity of a body. Lookups go through the id, never the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter.
///
/// Cloning the handle shares the counter, so a system and every clone of it
/// draw from the same sequence. A fresh allocator starts at zero.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: Arc<AtomicU64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id
    pub fn allocate(&self) -> BodyId {
        BodyId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Id the next call to [`IdAllocator::allocate`] would return
    pub fn peek(&self) -> BodyId {
        BodyId(self.next.load(Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) id: BodyId,
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass, always > 0
    pub stationary: bool, // never moved by the integrator
}

impl Body {
    /// Build a body after checking its mass and state are usable.
    pub fn new(id: BodyId, m: f64, x: NVec3, v: NVec3, stationary: bool) -> Result<Self> {
        validate_mass(m)?;
        if !is_finite(&x) || !is_finite(&v) {
            return Err(SimError::InvalidParameter(format!(
                "body {id} has a non-finite position or velocity"
            )));
        }
        Ok(Self { id, x, v, m, stationary })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}

pub(crate) fn validate_mass(m: f64) -> Result<()> {
    if m.is_finite() && m > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidMass { mass: m })
    }
}

pub(crate) fn is_finite(v: &NVec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
