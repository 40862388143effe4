/*
    Orbitflow, mission analysis pipeline for satellite constellations
    Copyright (C) 2024 The Orbitflow developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{PropagationError, Stepper, StepperFailureSnafu};
use crate::cosmic::{
    KeplerianElements, Orbit, OrbitError, EARTH_EQUATORIAL_RADIUS_KM, EARTH_GM_KM3_S2, EARTH_J2,
};
use crate::time::Epoch;
use crate::utils::between_0_360;
use snafu::ResultExt;
use std::f64::consts::TAU;
use std::fmt;

const KEPLER_MAX_ITER: usize = 50;
const KEPLER_TOL_RAD: f64 = 1e-14;

/// Analytical propagation of the secular effects of the Earth's oblateness: the RAAN, the argument of periapsis and
/// the mean anomaly drift linearly while the semi-major axis, eccentricity and inclination are constant.
///
/// Source: Vallado, Fundamentals of Astrodynamics and Applications, 4th ed., algorithm 65 (PKepler), first order
/// secular rates only.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct J2AnalyticalStepper {
    pub j2: f64,
}

impl Default for J2AnalyticalStepper {
    fn default() -> Self {
        Self { j2: EARTH_J2 }
    }
}

impl J2AnalyticalStepper {
    /// A stepper which ignores the oblateness, i.e. a Keplerian propagator.
    pub fn two_body() -> Self {
        Self { j2: 0.0 }
    }

    /// Secular rates of the RAAN, argument of periapsis and mean anomaly, in radians per second.
    pub fn secular_rates(&self, elements: &KeplerianElements) -> (f64, f64, f64) {
        let a = elements.sma_km;
        let e = elements.ecc;
        let mean_motion = (EARTH_GM_KM3_S2 / a.powi(3)).sqrt();
        let k = self.j2 * (EARTH_EQUATORIAL_RADIUS_KM / elements.semi_parameter_km()).powi(2);
        let cos_inc = elements.inc_deg.to_radians().cos();

        let raan_dot = -1.5 * mean_motion * k * cos_inc;
        let aop_dot = 0.75 * mean_motion * k * (5.0 * cos_inc.powi(2) - 1.0);
        let ma_dot = mean_motion
            * (1.0 + 0.75 * k * (1.0 - e.powi(2)).sqrt() * (3.0 * cos_inc.powi(2) - 1.0));
        (raan_dot, aop_dot, ma_dot)
    }

    fn advance(&self, state: &Orbit, epoch: Epoch) -> Result<Orbit, OrbitError> {
        let elements = state.to_elements();
        if !(0.0..1.0).contains(&elements.ecc) {
            return Err(OrbitError::NotElliptical { ecc: elements.ecc });
        }
        if elements.sma_km <= 0.0 {
            return Err(OrbitError::InvalidSma {
                sma_km: elements.sma_km,
            });
        }
        let periapsis_km = elements.sma_km * (1.0 - elements.ecc);
        if periapsis_km < EARTH_EQUATORIAL_RADIUS_KM {
            return Err(OrbitError::SubSurface {
                rmag_km: periapsis_km,
            });
        }

        let dt_s = (epoch - state.epoch).to_seconds();
        let (raan_dot, aop_dot, ma_dot) = self.secular_rates(&elements);

        let ecc = elements.ecc;
        let ma0 = mean_anomaly(ecc, elements.ta_deg.to_radians());
        let ma = (ma0 + ma_dot * dt_s).rem_euclid(TAU);
        let ta = true_anomaly(ecc, eccentric_anomaly(ecc, ma));

        Orbit::keplerian(
            elements.sma_km,
            ecc,
            elements.inc_deg,
            between_0_360(elements.raan_deg + (raan_dot * dt_s).to_degrees()),
            between_0_360(elements.aop_deg + (aop_dot * dt_s).to_degrees()),
            between_0_360(ta.to_degrees()),
            epoch,
        )
    }
}

impl Stepper for J2AnalyticalStepper {
    fn propagate(&self, state: &Orbit, epoch: Epoch) -> Result<Orbit, PropagationError> {
        if epoch == state.epoch {
            return Ok(*state);
        }
        self.advance(state, epoch)
            .context(StepperFailureSnafu { epoch })
    }
}

impl fmt::Display for J2AnalyticalStepper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.j2 == 0.0 {
            write!(f, "two body analytical stepper")
        } else {
            write!(f, "J2 analytical stepper (J2 = {:e})", self.j2)
        }
    }
}

/// Mean anomaly from the true anomaly, both in radians.
fn mean_anomaly(ecc: f64, ta_rad: f64) -> f64 {
    let ea = 2.0 * (((1.0 - ecc) / (1.0 + ecc)).sqrt() * (0.5 * ta_rad).tan()).atan();
    ea - ecc * ea.sin()
}

/// Solves Kepler's equation with Newton iterations.
fn eccentric_anomaly(ecc: f64, ma_rad: f64) -> f64 {
    let mut ea = if ecc < 0.8 { ma_rad } else { std::f64::consts::PI };
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ea - ecc * ea.sin() - ma_rad) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOL_RAD {
            break;
        }
    }
    ea
}

fn true_anomaly(ecc: f64, ea_rad: f64) -> f64 {
    2.0 * ((1.0 + ecc).sqrt() * (0.5 * ea_rad).sin()).atan2((1.0 - ecc).sqrt() * (0.5 * ea_rad).cos())
}
