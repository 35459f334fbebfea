//! Fixed-step time integration for the planetary system
//!
//! The step is semi-implicit (symplectic) Euler, split in two halves so the
//! system can record history between them:
//! - `kick`:  v_n+1 = v_n + dt * a(x_n)
//! - `drift`: x_n+1 = x_n + dt * v_n+1
//!
//! Stationary bodies are skipped by both.

use crate::simulation::states::{Body, NVec3};

/// Velocity update from precomputed accelerations, one per body
pub fn kick(bodies: &mut [Body], accels: &[NVec3], dt: f64) {
    debug_assert_eq!(bodies.len(), accels.len());
    for (b, a) in bodies.iter_mut().zip(accels.iter()) {
        if !b.stationary {
            b.v += dt * *a;
        }
    }
}

/// Position update from the current velocities
pub fn drift(bodies: &mut [Body], dt: f64) {
    for b in bodies.iter_mut() {
        if !b.stationary {
            b.x += dt * b.v;
        }
    }
}
