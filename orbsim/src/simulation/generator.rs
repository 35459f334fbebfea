//! Procedural planetary systems
//!
//! Builds a stationary sun, then planets on widening orbits around it, each
//! possibly carrying a chain of moons. Every generated body remembers its
//! parent and the orbital elements it was placed with, so orbits can be
//! inspected and edited later. Once placed, all bodies attract each other as
//! one flat n-body system.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::errors::{Result, SimError};
use crate::simulation::kepler::KeplerianElements;
use crate::simulation::params::Parameters;
use crate::simulation::states::{BodyId, IdAllocator, NVec3};
use crate::simulation::system::PlanetarySystem;

/// Knobs for procedural generation. Angular ranges are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub sun_mass: f64,
    pub planet_count: usize, // planets and moons together
    pub distance_threshold: f64, // spacing scale between neighbouring orbits
    pub complexity: u32, // maximum moon depth
    pub moon_probability: f64, // chance of a moon at each depth
    pub moon_distance_divisor: f64, // moons orbit at threshold / divisor
    pub inclination_deg: [f64; 2],
    pub ascending_node_deg: [f64; 2],
    pub periapsis_deg: [f64; 2],
    pub true_anomaly_deg: [f64; 2],
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sun_mass: 10000.0,
            planet_count: 10,
            distance_threshold: 100.0,
            complexity: 0,
            moon_probability: 0.2,
            moon_distance_divisor: 10.0,
            inclination_deg: [250.0, 290.0],
            ascending_node_deg: [-20.0, 20.0],
            periapsis_deg: [0.0, 360.0],
            true_anomaly_deg: [0.0, 360.0],
            seed: 0,
        }
    }
}

/// A body together with how it was placed
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub body: BodyId,
    pub parent: Option<BodyId>, // None for the sun and free bodies
    pub elements: Option<KeplerianElements>, // orbit around `parent`
    pub depth: u32, // 0 sun, 1 planet, 2 moon, ...
}

/// Limits shared by one moon recursion
#[derive(Debug, Clone, Copy)]
struct MoonBudget {
    max_bodies: usize,
    complexity: u32,
    probability: f64,
    divisor: f64,
}

#[derive(Debug)]
pub struct SystemGenerator {
    params: Parameters,
    config: GeneratorConfig,
    ids: IdAllocator,
    rng: StdRng,
    system: PlanetarySystem,
    entities: Vec<Entity>,
    sun: Option<BodyId>,
    outermost_apoapsis: HashMap<BodyId, f64>, // per parent
}

impl SystemGenerator {
    pub fn new(params: Parameters, config: GeneratorConfig) -> Result<Self> {
        Self::with_ids(params, config, IdAllocator::new())
    }

    /// Generator whose systems draw ids from `ids`, across every randomize
    pub fn with_ids(params: Parameters, config: GeneratorConfig, ids: IdAllocator) -> Result<Self> {
        let system = PlanetarySystem::with_ids(params.clone(), ids.clone())?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            params,
            config,
            ids,
            rng,
            system,
            entities: Vec::new(),
            sun: None,
            outermost_apoapsis: HashMap::new(),
        })
    }

    /// `randomize` with the counts and probabilities from the config
    pub fn randomize_from_config(&mut self) -> Result<()> {
        let GeneratorConfig {
            planet_count,
            distance_threshold,
            complexity,
            moon_probability,
            ..
        } = self.config;
        self.randomize(planet_count, distance_threshold, complexity, moon_probability)
    }

    /// Throw away the current system and grow a new one.
    ///
    /// `planet_count` bounds planets and moons together. After each planet,
    /// moons are attempted up to `complexity` levels deep, each level with
    /// probability `moon_probability`.
    pub fn randomize(
        &mut self,
        planet_count: usize,
        distance_threshold: f64,
        complexity: u32,
        moon_probability: f64,
    ) -> Result<()> {
        if !(distance_threshold.is_finite() && distance_threshold > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "distance threshold must be positive, got {distance_threshold}"
            )));
        }
        if !(0.0..=1.0).contains(&moon_probability) {
            return Err(SimError::InvalidParameter(format!(
                "moon probability must lie in [0, 1], got {moon_probability}"
            )));
        }
        if !(self.config.moon_distance_divisor.is_finite() && self.config.moon_distance_divisor > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "moon distance divisor must be positive, got {}",
                self.config.moon_distance_divisor
            )));
        }

        self.system = PlanetarySystem::with_ids(self.params.clone(), self.ids.clone())?;
        self.entities.clear();
        self.outermost_apoapsis.clear();
        self.sun = None;

        let sun = self.add_body(self.config.sun_mass, NVec3::zeros(), NVec3::zeros(), true)?;

        let budget = MoonBudget {
            max_bodies: planet_count,
            complexity,
            probability: moon_probability,
            divisor: self.config.moon_distance_divisor,
        };

        while self.orbiting_count() < planet_count {
            let planet = self.add_random_planet(distance_threshold, sun)?;
            let moons = self.grow_moons(planet, 0, distance_threshold / budget.divisor, &budget)?;
            debug!("planet {planet} placed with {} moons", moons.len());
        }

        info!(
            "generated system with {} bodies ({} orbiting {sun})",
            self.system.len(),
            self.orbiting_count()
        );
        Ok(())
    }

    /// Try to hang a moon on `parent`, then keep hanging moons on that moon
    /// one level deeper for as long as attempts succeed. Returns every body
    /// created by this call, in creation order.
    fn grow_moons(
        &mut self,
        parent: BodyId,
        depth: u32,
        scale: f64,
        budget: &MoonBudget,
    ) -> Result<Vec<BodyId>> {
        let roll: f64 = self.rng.random();
        if roll >= budget.probability
            || self.orbiting_count() >= budget.max_bodies
            || depth >= budget.complexity
        {
            return Ok(Vec::new());
        }

        let moon = self.add_random_planet(scale, parent)?;
        let mut created = vec![moon];

        while self.orbiting_count() < budget.max_bodies {
            let deeper = self.grow_moons(moon, depth + 1, scale / budget.divisor, budget)?;
            if deeper.is_empty() {
                break;
            }
            created.extend(deeper);
        }
        Ok(created)
    }

    /// Place a body on a random orbit around `parent`, outside the orbits of
    /// its earlier siblings. Mass is 1% to 5% of the parent's.
    pub fn add_random_planet(&mut self, distance_threshold: f64, parent: BodyId) -> Result<BodyId> {
        let central_mass = self.system.body(parent)?.m;
        let last_apoapsis = self.outermost_apoapsis.get(&parent).copied().unwrap_or(0.0);

        let periapsis = last_apoapsis + distance_threshold * (1.0 + self.rng.random::<f64>());
        let semi_major_axis = periapsis + self.rng.random::<f64>() * distance_threshold;
        let eccentricity = 1.0 - periapsis / semi_major_axis;
        let mass = self.rng.random::<f64>() * (central_mass / 25.0) + central_mass / 100.0;

        let elements = self.random_orientation(eccentricity, semi_major_axis);
        self.add_planet(mass, parent, elements)
    }

    fn random_orientation(&mut self, eccentricity: f64, semi_major_axis: f64) -> KeplerianElements {
        let inclination = uniform(&mut self.rng, self.config.inclination_deg);
        let ascending_node = uniform(&mut self.rng, self.config.ascending_node_deg);
        let periapsis = uniform(&mut self.rng, self.config.periapsis_deg);
        let true_anomaly = uniform(&mut self.rng, self.config.true_anomaly_deg);
        KeplerianElements::from_degrees(
            eccentricity,
            semi_major_axis,
            inclination,
            ascending_node,
            periapsis,
            true_anomaly,
        )
    }

    /// Place a body of `mass` on `elements` around `parent`
    pub fn add_planet(
        &mut self,
        mass: f64,
        parent: BodyId,
        elements: KeplerianElements,
    ) -> Result<BodyId> {
        let depth = self.entity(parent)?.depth + 1;
        let body = self.system.construct_body_relative(mass, parent, &elements)?;

        let apoapsis = self.outermost_apoapsis.entry(parent).or_insert(0.0);
        *apoapsis = apoapsis.max(elements.apoapsis_distance());

        debug!(
            "body {body} (m = {mass:.3}) around {parent}: a = {:.3}, e = {:.4}",
            elements.semi_major_axis, elements.eccentricity
        );

        self.entities.push(Entity {
            body,
            parent: Some(parent),
            elements: Some(elements),
            depth,
        });
        Ok(body)
    }

    /// Add a body with an explicit state and no parent.
    /// The first stationary body added becomes the sun.
    pub fn add_body(&mut self, mass: f64, x: NVec3, v: NVec3, stationary: bool) -> Result<BodyId> {
        let body = self.system.construct_body(mass, x, v, stationary)?;
        if stationary && self.sun.is_none() {
            self.sun = Some(body);
        }
        self.entities.push(Entity {
            body,
            parent: None,
            elements: None,
            depth: 0,
        });
        Ok(body)
    }

    /// Give `id` new orbital elements around its parent.
    ///
    /// With history tracking the system is first rewound to its oldest
    /// samples, so the new orbit starts from the state the history began at,
    /// and the history is warmed up again afterwards. Moons of `id` (and their
    /// moons) are carried along on their stored elements.
    ///
    /// On error the system is left as it was before the call.
    pub fn edit_orbit(&mut self, id: BodyId, elements: KeplerianElements, dt: f64) -> Result<()> {
        let index = self.entity_index(id)?;
        let parent = self.entities[index].parent.ok_or_else(|| {
            SimError::InvalidParameter(format!("body {id} has no parent to orbit"))
        })?;
        elements.validate()?;

        let snapshot = self.system.clone();
        if let Err(err) = self.replace_orbit(id, parent, &elements, dt) {
            self.system.restore(snapshot);
            return Err(err);
        }
        self.entities[index].elements = Some(elements);
        Ok(())
    }

    fn replace_orbit(
        &mut self,
        id: BodyId,
        parent: BodyId,
        elements: &KeplerianElements,
        dt: f64,
    ) -> Result<()> {
        let tracking = self.system.params().track_history;
        if tracking {
            self.system.backtrack(dt)?;
        }
        self.system.place_relative(id, parent, elements)?;
        for (moon, around, orbit) in self.descendants(id) {
            self.system.place_relative(moon, around, &orbit)?;
        }
        if tracking {
            self.system.warmup(dt)?;
        }
        Ok(())
    }

    /// Everything orbiting `id` directly or through other moons, parents
    /// before children, with the elements each was placed on
    fn descendants(&self, id: BodyId) -> Vec<(BodyId, BodyId, KeplerianElements)> {
        // creation order puts every parent ahead of its children
        let mut moved = HashSet::from([id]);
        let mut found = Vec::new();
        for entity in &self.entities {
            let (Some(parent), Some(orbit)) = (entity.parent, entity.elements) else {
                continue;
            };
            if moved.contains(&parent) {
                moved.insert(entity.body);
                found.push((entity.body, parent, orbit));
            }
        }
        found
    }

    pub fn system(&self) -> &PlanetarySystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut PlanetarySystem {
        &mut self.system
    }

    pub fn into_system(self) -> PlanetarySystem {
        self.system
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: BodyId) -> Result<&Entity> {
        self.entity_index(id).map(|i| &self.entities[i])
    }

    fn entity_index(&self, id: BodyId) -> Result<usize> {
        self.entities
            .iter()
            .position(|e| e.body == id)
            .ok_or(SimError::UnknownBody(id))
    }

    pub fn sun(&self) -> Option<BodyId> {
        self.sun
    }

    /// Elements `id` was placed with, None for bodies added with a raw state
    pub fn elements(&self, id: BodyId) -> Result<Option<KeplerianElements>> {
        self.entity(id).map(|e| e.elements)
    }

    pub fn parent(&self, id: BodyId) -> Result<Option<BodyId>> {
        self.entity(id).map(|e| e.parent)
    }

    pub fn depth(&self, id: BodyId) -> Result<u32> {
        self.entity(id).map(|e| e.depth)
    }

    /// Bodies placed on an orbit (planets and moons)
    pub fn orbiting_count(&self) -> usize {
        self.entities.iter().filter(|e| e.elements.is_some()).count()
    }

    /// Parent chain of `id` up to its root, starting with `id` itself
    pub fn lineage(&self, id: BodyId) -> Result<Vec<BodyId>> {
        let mut chain = vec![id];
        let mut current = self.entity(id)?;
        while let Some(parent) = current.parent {
            chain.push(parent);
            current = self.entity(parent)?;
        }
        Ok(chain)
    }
}

fn uniform(rng: &mut StdRng, [lo, hi]: [f64; 2]) -> f64 {
    lo + rng.random::<f64>() * (hi - lo)
}
