//! The planetary system: a flat set of gravitating bodies advanced with a
//! fixed-step semi-implicit Euler integrator.
//!
//! Each tick is two calls, always in this order for the same `dt`:
//! 1. [`PlanetarySystem::accelerate_system`]: forces at the current
//!    positions, velocities updated
//! 2. [`PlanetarySystem::update_system`]: positions updated from the new
//!    velocities, history recorded, observers notified
//!
//! Calling `update_system` twice in a row is allowed and extrapolates along
//! straight lines with the stale velocity.
//!
//! With history tracking enabled every body keeps a bounded position history
//! ([`PoseHistory`]). [`PlanetarySystem::warmup`] fills it ahead of time and
//! [`PlanetarySystem::backtrack`] rewinds each body to its oldest sample.

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::simulation::errors::{Result, SimError};
use crate::simulation::forces::AccelSet;
use crate::simulation::history::PoseHistory;
use crate::simulation::integrator::{drift, kick};
use crate::simulation::kepler::{keplerian_to_cartesian, KeplerianElements};
use crate::simulation::params::{HistoryMode, Parameters};
use crate::simulation::states::{is_finite, validate_mass, Body, BodyId, IdAllocator, NVec3};

/// Callback notified with a body's position after each update
pub type Observer = Box<dyn FnMut(BodyId, NVec3) + Send>;

pub struct PlanetarySystem {
    params: Parameters,
    ids: IdAllocator,
    forces: AccelSet,
    bodies: Vec<Body>, // insertion order is simulation order
    histories: HashMap<BodyId, PoseHistory>,
    observers: HashMap<BodyId, Vec<Observer>>,
}

impl PlanetarySystem {
    /// Empty system with its own id allocator and Newtonian gravity
    pub fn new(params: Parameters) -> Result<Self> {
        Self::with_ids(params, IdAllocator::new())
    }

    /// Empty system drawing ids from `ids`
    pub fn with_ids(params: Parameters, ids: IdAllocator) -> Result<Self> {
        let forces = AccelSet::gravity(&params);
        Self::with_accel_set(params, ids, forces)
    }

    /// Empty system with a custom set of acceleration terms
    pub fn with_accel_set(params: Parameters, ids: IdAllocator, forces: AccelSet) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ids,
            forces,
            bodies: Vec::new(),
            histories: HashMap::new(),
            observers: HashMap::new(),
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.iter().any(|b| b.id == id)
    }

    pub fn body(&self, id: BodyId) -> Result<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    fn index_of(&self, id: BodyId) -> Result<usize> {
        self.bodies
            .iter()
            .position(|b| b.id == id)
            .ok_or(SimError::UnknownBody(id))
    }

    /// Register a new body and return its id
    pub fn construct_body(&mut self, m: f64, x: NVec3, v: NVec3, stationary: bool) -> Result<BodyId> {
        // validate before an id is spent
        let mut body = Body::new(self.ids.peek(), m, x, v, stationary)?;
        body.id = self.ids.allocate();
        let id = body.id;

        if self.params.track_history {
            self.histories
                .insert(id, PoseHistory::seeded(self.params.history_size, x));
        }
        self.bodies.push(body);
        Ok(id)
    }

    /// Register a new moving body on the orbit `elements` around `reference`
    pub fn construct_body_relative(
        &mut self,
        m: f64,
        reference: BodyId,
        elements: &KeplerianElements,
    ) -> Result<BodyId> {
        validate_mass(m)?;
        let central = self.body(reference)?;
        let (x, v) = keplerian_to_cartesian(self.params.G, central, m, elements)?;
        self.construct_body(m, x, v, false)
    }

    /// Velocity half of a tick: v += a(x) dt for every moving body.
    /// Either every body is updated or, on error, none is. A velocity that
    /// would overflow is an error.
    pub fn accelerate_system(&mut self, dt: f64) -> Result<()> {
        check_dt(dt)?;

        let mut accels = vec![NVec3::zeros(); self.bodies.len()];
        self.forces.accumulate_accels(&self.bodies, &mut accels)?;

        if let Some(i) = accels.iter().position(|a| !is_finite(a)) {
            return Err(SimError::InvalidParameter(format!(
                "non-finite acceleration on body {}",
                self.bodies[i].id
            )));
        }
        let overflow = self
            .bodies
            .iter()
            .zip(&accels)
            .find(|(b, a)| !b.stationary && !is_finite(&(b.v + dt * **a)));
        if let Some((b, _)) = overflow {
            return Err(SimError::InvalidParameter(format!(
                "time step {dt} gives body {} a non-finite velocity",
                b.id
            )));
        }

        kick(&mut self.bodies, &accels, dt);
        Ok(())
    }

    /// Position half of a tick: x += v dt for every moving body, then the
    /// new position is recorded and handed to the body's observers.
    pub fn update_system(&mut self, dt: f64) -> Result<()> {
        check_dt(dt)?;
        if let Some(b) = self
            .bodies
            .iter()
            .find(|b| !b.stationary && !is_finite(&(b.x + dt * b.v)))
        {
            return Err(SimError::InvalidParameter(format!(
                "time step {dt} gives body {} a non-finite position",
                b.id
            )));
        }

        drift(&mut self.bodies, dt);

        let mode = self.params.history_mode;
        for body in self.bodies.iter().filter(|b| !b.stationary) {
            let reported = match self.histories.get_mut(&body.id) {
                Some(history) => {
                    history.push(body.x);
                    match mode {
                        HistoryMode::Leading => history.newest(),
                        HistoryMode::Trailing => history.oldest(),
                    }
                }
                None => body.x,
            };

            if let Some(observers) = self.observers.get_mut(&body.id) {
                for observer in observers.iter_mut() {
                    observer(body.id, reported);
                }
            }
        }
        Ok(())
    }

    /// One full tick: accelerate then update
    pub fn step(&mut self, dt: f64) -> Result<()> {
        self.accelerate_system(dt)?;
        self.update_system(dt)
    }

    /// Forward-simulate a throwaway copy and return the positions of `id`,
    /// starting with its current one. The live system is never touched.
    pub fn predict_path(&self, id: BodyId, dt: f64, steps: usize) -> Result<Vec<NVec3>> {
        let mut shadow = self.speculative_copy();
        let index = shadow.index_of(id)?;

        let mut path = Vec::with_capacity(steps + 1);
        path.push(shadow.bodies[index].x);
        for _ in 0..steps {
            shadow.accelerate_system(dt)?;
            shadow.update_system(dt)?;
            path.push(shadow.bodies[index].x);
        }
        Ok(path)
    }

    /// Copy of the bodies and forces only, enough to integrate ahead
    fn speculative_copy(&self) -> Self {
        let mut params = self.params.clone();
        params.track_history = false;
        Self {
            params,
            ids: self.ids.clone(),
            forces: self.forces.clone(),
            bodies: self.bodies.clone(),
            histories: HashMap::new(),
            observers: HashMap::new(),
        }
    }

    /// Rewind every tracked body to the oldest sample of its history.
    ///
    /// Velocity is rebuilt from the two oldest samples as
    /// `(second - oldest) / dt`; with a single sample it is left alone.
    /// Each history is then reset to the new position.
    pub fn backtrack(&mut self, dt: f64) -> Result<()> {
        check_dt(dt)?;
        if dt == 0.0 {
            return Err(SimError::InvalidParameter(
                "backtrack needs a non-zero dt".into(),
            ));
        }

        for body in self.bodies.iter_mut().filter(|b| !b.stationary) {
            let Some(history) = self.histories.get_mut(&body.id) else {
                continue;
            };
            let oldest = history.oldest();
            if let Some(next) = history.second_oldest() {
                body.v = (next - oldest) / dt;
            }
            body.x = oldest;
            history.reset_to(oldest);
        }
        Ok(())
    }

    /// Run `history_size` ticks so every history is full before it is queried.
    /// Does nothing when history tracking is off.
    pub fn warmup(&mut self, dt: f64) -> Result<()> {
        if !self.params.track_history {
            debug!("warmup skipped, history tracking is off");
            return Ok(());
        }
        debug!(
            "warming up {} bodies for {} ticks",
            self.bodies.len(),
            self.params.history_size
        );
        for _ in 0..self.params.history_size {
            self.step(dt)?;
        }
        Ok(())
    }

    /// Tracked positions of `id`, oldest first
    pub fn pose_history(&self, id: BodyId) -> Result<&PoseHistory> {
        self.index_of(id)?;
        self.histories.get(&id).ok_or_else(|| {
            SimError::InvalidParameter(format!("history tracking is off for body {id}"))
        })
    }

    /// Put bodies and histories back to those of `snapshot`, a clone of this
    /// system. Observers stay registered.
    pub(crate) fn restore(&mut self, snapshot: PlanetarySystem) {
        self.bodies = snapshot.bodies;
        self.histories = snapshot.histories;
    }

    /// Subscribe to position updates of `id`
    pub fn observe<F>(&mut self, id: BodyId, observer: F) -> Result<()>
    where
        F: FnMut(BodyId, NVec3) + Send + 'static,
    {
        self.index_of(id)?;
        self.observers.entry(id).or_default().push(Box::new(observer));
        Ok(())
    }

    pub fn clear_observers(&mut self, id: BodyId) -> Result<()> {
        self.index_of(id)?;
        self.observers.remove(&id);
        Ok(())
    }

    /// Overwrite position and velocity; the history restarts at `x`
    pub fn set_state(&mut self, id: BodyId, x: NVec3, v: NVec3) -> Result<()> {
        let index = self.index_of(id)?;
        if !is_finite(&x) || !is_finite(&v) {
            return Err(SimError::InvalidParameter(format!(
                "body {id} given a non-finite state"
            )));
        }
        let body = &mut self.bodies[index];
        body.x = x;
        body.v = v;
        if let Some(history) = self.histories.get_mut(&id) {
            history.reset_to(x);
        }
        Ok(())
    }

    pub fn set_mass(&mut self, id: BodyId, m: f64) -> Result<()> {
        let index = self.index_of(id)?;
        validate_mass(m)?;
        self.bodies[index].m = m;
        Ok(())
    }

    /// Put `id` on the orbit `elements` around the current state of `reference`
    pub fn place_relative(
        &mut self,
        id: BodyId,
        reference: BodyId,
        elements: &KeplerianElements,
    ) -> Result<()> {
        if id == reference {
            return Err(SimError::InvalidParameter(format!(
                "body {id} cannot orbit itself"
            )));
        }
        let m = self.body(id)?.m;
        let central = self.body(reference)?;
        let (x, v) = keplerian_to_cartesian(self.params.G, central, m, elements)?;
        self.set_state(id, x, v)
    }

    /// Kinetic energy plus pairwise potential energy.
    /// Coincident pairs are left out of the potential term.
    pub fn total_energy(&self) -> f64 {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();

        let mut potential = 0.0;
        for (i, bi) in self.bodies.iter().enumerate() {
            for bj in &self.bodies[i + 1..] {
                let r = (bj.x - bi.x).norm();
                if r > 0.0 {
                    potential -= self.params.G * bi.m * bj.m / r;
                }
            }
        }
        kinetic + potential
    }
}

fn check_dt(dt: f64) -> Result<()> {
    if dt.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter(format!("time step {dt} is not finite")))
    }
}

/// Deep copy of bodies (ids included), histories and forces.
/// Observers stay behind: a clone notifies nobody.
impl Clone for PlanetarySystem {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            ids: self.ids.clone(),
            forces: self.forces.clone(),
            bodies: self.bodies.clone(),
            histories: self.histories.clone(),
            observers: HashMap::new(),
        }
    }
}

impl fmt::Debug for PlanetarySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanetarySystem")
            .field("params", &self.params)
            .field("forces", &self.forces)
            .field("bodies", &self.bodies)
            .field("tracked", &self.histories.len())
            .field("observed", &self.observers.len())
            .finish()
    }
}
