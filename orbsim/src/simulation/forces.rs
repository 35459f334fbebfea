//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, a set that sums several terms, and the
//! direct Newtonian gravity term used by the planetary system

use std::sync::Arc;

use log::warn;

use crate::simulation::errors::{Result, SimError};
use crate::simulation::params::{Parameters, SeparationPolicy};
use crate::simulation::states::{Body, NVec3};

/// Trait for acceleration sources operating on a slice of bodies
/// Implementations add their contribution into `out[i]` for each body and
/// must not touch `out` when they return an error they detected up front
pub trait Acceleration {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()>;
}

/// Collection of acceleration terms
/// Terms are shared behind `Arc` so a system and its clones use the same set
#[derive(Clone, Default)]
pub struct AccelSet {
    terms: Vec<Arc<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Set holding only Newtonian gravity configured from `params`
    pub fn gravity(params: &Parameters) -> Self {
        Self::new().with(NewtonianGravity::from_params(params))
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Arc::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations for all bodies
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(bodies, out)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AccelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccelSet")
            .field("terms", &self.terms.len())
            .finish()
    }
}

/// Newtonian gravity, direct n^2 sum
/// F = G m1 m2 / r^2 along the unit vector between the pair
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub min_separation: f64, // distance floor
    pub policy: SeparationPolicy, // what happens below the floor
}

impl NewtonianGravity {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            G: params.G,
            min_separation: params.min_separation,
            policy: params.separation,
        }
    }

    /// First pair closer than `min_separation`, if any
    fn closest_violation(&self, bodies: &[Body]) -> Option<SimError> {
        let floor2 = self.min_separation * self.min_separation;
        let n = bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let r2 = (bodies[j].x - bodies[i].x).norm_squared();
                if r2 == 0.0 || r2 < floor2 {
                    return Some(SimError::DegenerateSeparation {
                        a: bodies[i].id(),
                        b: bodies[j].id(),
                        distance: r2.sqrt(),
                    });
                }
            }
        }
        None
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        let n = bodies.len();
        if n < 2 { // Nothing to attract
            return Ok(());
        }

        // Validate the whole configuration before writing anything
        if self.policy == SeparationPolicy::Reject {
            if let Some(err) = self.closest_violation(bodies) {
                return Err(err);
            }
        }

        let floor2 = self.min_separation * self.min_separation;

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            // bi: body i (left side of the pair)
            let bi = &bodies[i];

            for j in (i + 1)..n {
                // bj: body j (right side of the pair)
                let bj = &bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - bi.x;
                let r2 = r.norm_squared();

                if r2 == 0.0 {
                    // direction undefined, only reachable under Clamp
                    warn!("bodies {} and {} coincide, pair skipped", bi.id(), bj.id());
                    continue;
                }

                let d2 = if r2 < floor2 {
                    warn!(
                        "bodies {} and {} closer than {}, clamped",
                        bi.id(),
                        bj.id(),
                        self.min_separation
                    );
                    floor2
                } else {
                    r2
                };

                // unit direction from i to j
                let dir = r / r2.sqrt();

                // G / d^2, scaled by the partner's mass below
                let coef = self.G / d2;

                // a_i += G m_j r_hat / d^2
                out[i] += coef * bj.m * dir;

                // a_j -= G m_i r_hat / d^2
                out[j] -= coef * bi.m * dir;
            }
        }
        Ok(())
    }
}
