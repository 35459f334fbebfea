//! Orbital mechanics helpers
//!
//! Converts Keplerian orbital elements into a Cartesian state vector around a
//! central body, and evaluates the specific orbital energy of a pair.
//!
//! Angles are stored in radians. Degrees only appear at the boundary
//! (configuration files, [`KeplerianElements::from_degrees`]).

use nalgebra::{Rotation3, Vector3};

use crate::simulation::errors::{Result, SimError};
use crate::simulation::states::{Body, NVec3};

/// Six elements describing an elliptical orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    pub eccentricity: f64, // e, in [0, 1)
    pub semi_major_axis: f64, // a, > 0
    pub inclination: f64, // i, radians
    pub ascending_node: f64, // longitude of the ascending node, radians
    pub periapsis: f64, // argument of periapsis, radians
    pub true_anomaly: f64, // radians
}

impl KeplerianElements {
    /// Circular, equatorial orbit of radius `a` starting on the +x axis
    pub fn circular(semi_major_axis: f64) -> Self {
        Self {
            eccentricity: 0.0,
            semi_major_axis,
            inclination: 0.0,
            ascending_node: 0.0,
            periapsis: 0.0,
            true_anomaly: 0.0,
        }
    }

    /// Build from angles given in degrees
    pub fn from_degrees(
        eccentricity: f64,
        semi_major_axis: f64,
        inclination: f64,
        ascending_node: f64,
        periapsis: f64,
        true_anomaly: f64,
    ) -> Self {
        Self {
            eccentricity,
            semi_major_axis,
            inclination: inclination.to_radians(),
            ascending_node: ascending_node.to_radians(),
            periapsis: periapsis.to_radians(),
            true_anomaly: true_anomaly.to_radians(),
        }
    }

    /// Reject parabolic, hyperbolic and degenerate orbits before they turn into NaN
    pub fn validate(&self) -> Result<()> {
        let angles = [
            self.inclination,
            self.ascending_node,
            self.periapsis,
            self.true_anomaly,
        ];
        if !self.eccentricity.is_finite()
            || !self.semi_major_axis.is_finite()
            || angles.iter().any(|a| !a.is_finite())
        {
            return Err(invalid("orbital elements must be finite"));
        }
        if self.eccentricity < 0.0 {
            return Err(invalid(format!("eccentricity {} is negative", self.eccentricity)));
        }
        if self.eccentricity >= 1.0 {
            return Err(invalid(format!(
                "eccentricity {} does not describe an ellipse",
                self.eccentricity
            )));
        }
        if self.semi_major_axis <= 0.0 {
            return Err(invalid(format!(
                "semi-major axis {} must be positive",
                self.semi_major_axis
            )));
        }
        Ok(())
    }

    /// a (1 - e)
    pub fn periapsis_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// a (1 + e)
    pub fn apoapsis_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Orbital period 2 pi sqrt(a^3 / mu)
    pub fn period(&self, mu: f64) -> f64 {
        std::f64::consts::TAU * (self.semi_major_axis.powi(3) / mu).sqrt()
    }
}

fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidOrbit { reason: reason.into() }
}

/// mu = G * M
#[allow(non_snake_case)]
pub fn standard_gravitational_parameter(G: f64, mass: f64) -> f64 {
    G * mass
}

/// Convert orbital elements into a position and velocity around `central`.
///
/// `_orbiting_mass` is accepted for symmetry with the body constructors; the
/// orbiting mass is negligible next to the central one, so mu only uses the
/// central mass.
///
/// The orbital-plane state is rotated by `Rz(node) * Rx(i) * Rz(periapsis)`
/// and then offset by the central body's position and velocity.
#[allow(non_snake_case)]
pub fn keplerian_to_cartesian(
    G: f64,
    central: &Body,
    _orbiting_mass: f64,
    elements: &KeplerianElements,
) -> Result<(NVec3, NVec3)> {
    elements.validate()?;

    let e = elements.eccentricity;
    let a = elements.semi_major_axis;
    let nu = elements.true_anomaly;

    let mu = standard_gravitational_parameter(G, central.m);

    // sqrt(1 - e^2) shows up in both the anomaly and the velocity
    let b_ratio = (1.0 - e * e).sqrt();

    // Eccentric anomaly
    let ecc_anomaly = (b_ratio * nu.sin()).atan2(e + nu.cos());

    // Radial distance
    let r = a * (1.0 - e * ecc_anomaly.cos());

    // Orbital plane state
    let pos = NVec3::new(nu.cos(), nu.sin(), 0.0) * r;
    let vel = NVec3::new(-ecc_anomaly.sin(), b_ratio * ecc_anomaly.cos(), 0.0)
        * ((mu * a).sqrt() / r);

    let rotation = orbit_rotation(elements);

    Ok((
        rotation * pos + central.x,
        rotation * vel + central.v,
    ))
}

/// Rotation from the orbital plane into the reference frame
fn orbit_rotation(elements: &KeplerianElements) -> Rotation3<f64> {
    let to_periapsis = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.periapsis);
    let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination);
    let to_node = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.ascending_node);

    // applied right to left: periapsis first, node last
    to_node * tilt * to_periapsis
}

/// Specific orbital energy v^2/2 - mu/r of a pair.
///
/// Negative means bound, zero parabolic, positive hyperbolic.
#[allow(non_snake_case)]
pub fn specific_orbital_energy(G: f64, a: &Body, b: &Body) -> Result<f64> {
    let v = (b.v - a.v).norm(); // relative speed
    let mu = standard_gravitational_parameter(G, a.m + b.m);
    let r = (b.x - a.x).norm(); // separation

    if r == 0.0 {
        return Err(SimError::DegenerateSeparation {
            a: a.id(),
            b: b.id(),
            distance: r,
        });
    }

    Ok(v * v / 2.0 - mu / r)
}
