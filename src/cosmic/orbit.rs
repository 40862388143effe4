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

use super::{OrbitError, EARTH_EQUATORIAL_RADIUS_KM, EARTH_GM_KM3_S2};
use crate::io::{epoch_from_str, epoch_to_str};
use crate::linalg::{Vector3, Vector6};
use crate::time::{Duration, Epoch, Unit};
use crate::utils::between_0_360;
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// If an orbit has an eccentricity below the following value, it is considered circular
pub const ECC_EPSILON: f64 = 1e-11;

/// Below this ratio of the node vector to the angular momentum, the orbit is considered equatorial.
const EQUATORIAL_EPSILON: f64 = 1e-11;

/// Orbit defines an Earth centered inertial orbital state (equatorial plane).
///
/// Regardless of the constructor used, this struct stores all the state information in Cartesian coordinates
/// as these are always non singular. The Keplerian elements are computed on request, with the usual conventions
/// for the singular cases:
/// + circular orbits have an argument of periapsis of zero, and the true anomaly holds the argument of latitude;
/// + equatorial orbits have a RAAN of zero, and the argument of periapsis holds the longitude of periapsis;
/// + circular equatorial orbits hold the true longitude in the true anomaly.
///
/// These conventions are consistent with [`Orbit::keplerian`], such that converting to elements and back yields the same state.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// in km
    pub x_km: f64,
    /// in km
    pub y_km: f64,
    /// in km
    pub z_km: f64,
    /// in km/s
    pub vx_km_s: f64,
    /// in km/s
    pub vy_km_s: f64,
    /// in km/s
    pub vz_km_s: f64,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
}

/// The six classical orbital elements, angles in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeplerianElements {
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_deg: f64,
    pub raan_deg: f64,
    pub aop_deg: f64,
    pub ta_deg: f64,
}

impl Orbit {
    /// Creates a new Orbit at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    pub fn cartesian(
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
    ) -> Self {
        Self {
            x_km,
            y_km,
            z_km,
            vx_km_s,
            vy_km_s,
            vz_km_s,
            epoch,
        }
    }

    /// Creates a new Orbit from the borrowed state vector, which **must** be x, y, z, vx, vy, vz.
    pub fn cartesian_vec(state: &Vector6<f64>, epoch: Epoch) -> Self {
        Self::cartesian(
            state[0], state[1], state[2], state[3], state[4], state[5], epoch,
        )
    }

    /// Creates a new Orbit from the Keplerian orbital elements.
    ///
    /// **Units:** km, none, degrees, degrees, degrees, degrees
    ///
    /// Only elliptical orbits are supported: this returns an error for an eccentricity outside of [0; 1) or a non-positive SMA.
    pub fn keplerian(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
    ) -> Result<Self, OrbitError> {
        if !(0.0..1.0).contains(&ecc) {
            return Err(OrbitError::NotElliptical { ecc });
        }
        if sma_km <= 0.0 {
            return Err(OrbitError::InvalidSma { sma_km });
        }
        // Algorithm from GMAT's StateConversionUtil::ComputeKeplToCart
        let gm = EARTH_GM_KM3_S2;
        let inc = inc_deg.to_radians();
        let raan = raan_deg.to_radians();
        let aop = aop_deg.to_radians();
        let ta = ta_deg.to_radians();
        let p = sma_km * (1.0 - ecc.powi(2));
        let radius = p / (1.0 + ecc * ta.cos());
        let (sin_aop_ta, cos_aop_ta) = (aop + ta).sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_aop, cos_aop) = aop.sin_cos();
        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;
        let sqrt_gm_p = (gm / p).sqrt();
        let cos_ta_ecc = ta.cos() + ecc;
        let sin_ta = ta.sin();

        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);

        Ok(Self::cartesian(x, y, z, vx, vy, vz, epoch))
    }

    /// Creates a new Orbit from the provided elements
    pub fn from_elements(elements: &KeplerianElements, epoch: Epoch) -> Result<Self, OrbitError> {
        Self::keplerian(
            elements.sma_km,
            elements.ecc,
            elements.inc_deg,
            elements.raan_deg,
            elements.aop_deg,
            elements.ta_deg,
            epoch,
        )
    }

    /// Creates a circular orbit at the provided altitude above the equatorial radius.
    pub fn circular_altitude(
        altitude_km: f64,
        inc_deg: f64,
        raan_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
    ) -> Result<Self, OrbitError> {
        Self::keplerian(
            EARTH_EQUATORIAL_RADIUS_KM + altitude_km,
            0.0,
            inc_deg,
            raan_deg,
            0.0,
            ta_deg,
            epoch,
        )
    }

    /// Returns the radius vector of this Orbit in [km, km, km]
    pub fn radius(&self) -> Vector3<f64> {
        Vector3::new(self.x_km, self.y_km, self.z_km)
    }

    /// Returns the velocity vector of this Orbit in [km/s, km/s, km/s]
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx_km_s, self.vy_km_s, self.vz_km_s)
    }

    /// Returns this state as a Cartesian Vector6 in [km, km, km, km/s, km/s, km/s]
    pub fn to_cartesian_vec(self) -> Vector6<f64> {
        Vector6::new(
            self.x_km,
            self.y_km,
            self.z_km,
            self.vx_km_s,
            self.vy_km_s,
            self.vz_km_s,
        )
    }

    /// Returns the magnitude of the radius vector in km
    pub fn rmag_km(&self) -> f64 {
        self.radius().norm()
    }

    /// Returns the magnitude of the velocity vector in km/s
    pub fn vmag_km_s(&self) -> f64 {
        self.velocity().norm()
    }

    /// Returns the orbital momentum vector
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius().cross(&self.velocity())
    }

    /// Returns the eccentricity vector (no unit)
    pub fn evec(&self) -> Vector3<f64> {
        let r = self.radius();
        let v = self.velocity();
        ((v.norm_squared() - EARTH_GM_KM3_S2 / r.norm()) * r - (r.dot(&v)) * v) / EARTH_GM_KM3_S2
    }

    /// Returns the specific mechanical energy in km^2/s^2
    pub fn energy_km2_s2(&self) -> f64 {
        self.vmag_km_s().powi(2) / 2.0 - EARTH_GM_KM3_S2 / self.rmag_km()
    }

    /// Returns the semi-major axis in km
    pub fn sma_km(&self) -> f64 {
        -EARTH_GM_KM3_S2 / (2.0 * self.energy_km2_s2())
    }

    /// Returns the eccentricity (no unit)
    pub fn ecc(&self) -> f64 {
        self.evec().norm()
    }

    /// Returns the inclination in degrees
    pub fn inc_deg(&self) -> f64 {
        let h = self.hvec();
        (h[2] / h.norm()).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Returns the right ascension of the ascending node in degrees
    pub fn raan_deg(&self) -> f64 {
        self.to_elements().raan_deg
    }

    /// Returns the argument of periapsis in degrees
    pub fn aop_deg(&self) -> f64 {
        self.to_elements().aop_deg
    }

    /// Returns the true anomaly in degrees between 0 and 360.0
    pub fn ta_deg(&self) -> f64 {
        self.to_elements().ta_deg
    }

    /// Returns the period
    pub fn period(&self) -> Duration {
        2.0 * PI * (self.sma_km().powi(3) / EARTH_GM_KM3_S2).sqrt() * Unit::Second
    }

    /// Returns the mean motion in radians per second
    pub fn mean_motion_rad_s(&self) -> f64 {
        (EARTH_GM_KM3_S2 / self.sma_km().powi(3)).sqrt()
    }

    /// Computes the Keplerian orbital elements of this state (algorithm from GMAT's StateConversionUtil::CartesianToKeplerian).
    pub fn to_elements(&self) -> KeplerianElements {
        let r = self.radius();
        let v = self.velocity();
        let h = self.hvec();
        let hmag = h.norm();
        let n = Vector3::z().cross(&h);
        let nmag = n.norm();
        let evec = self.evec();
        let ecc = evec.norm();
        let retrograde = h[2] < 0.0;

        let circular = ecc < ECC_EPSILON;
        let equatorial = nmag / hmag < EQUATORIAL_EPSILON;

        let raan_deg = if equatorial {
            0.0
        } else {
            between_0_360(n[1].atan2(n[0]).to_degrees())
        };

        let planar_angle = |vec: &Vector3<f64>| {
            let angle = between_0_360(vec[1].atan2(vec[0]).to_degrees());
            if retrograde {
                between_0_360(360.0 - angle)
            } else {
                angle
            }
        };

        let angle_from = |from: &Vector3<f64>, to: &Vector3<f64>, flip: bool| {
            // Well conditioned near 0 and 180 degrees, unlike the arc cosine
            let angle = from.cross(to).norm().atan2(from.dot(to)).to_degrees();
            if flip {
                360.0 - angle
            } else {
                angle
            }
        };

        let (aop_deg, ta_deg) = match (circular, equatorial) {
            (true, true) => (0.0, planar_angle(&r)),
            (true, false) => (0.0, angle_from(&n, &r, r[2] < 0.0)),
            (false, true) => (
                planar_angle(&evec),
                angle_from(&evec, &r, r.dot(&v) < 0.0),
            ),
            (false, false) => (
                angle_from(&n, &evec, evec[2] < 0.0),
                angle_from(&evec, &r, r.dot(&v) < 0.0),
            ),
        };

        KeplerianElements {
            sma_km: self.sma_km(),
            ecc,
            inc_deg: (h[2] / hmag).clamp(-1.0, 1.0).acos().to_degrees(),
            raan_deg,
            aop_deg: between_0_360(aop_deg),
            ta_deg: between_0_360(ta_deg),
        }
    }

    /// Returns the Keplerian elements as a Vector6 in [km, none, degrees, degrees, degrees, degrees]
    pub fn to_keplerian_vec(&self) -> Vector6<f64> {
        let oe = self.to_elements();
        Vector6::new(
            oe.sma_km,
            oe.ecc,
            oe.inc_deg,
            oe.raan_deg,
            oe.aop_deg,
            oe.ta_deg,
        )
    }
}

impl KeplerianElements {
    /// Returns the semi-latus rectum in km
    pub fn semi_parameter_km(&self) -> f64 {
        self.sma_km * (1.0 - self.ecc.powi(2))
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let decimals = f.precision().unwrap_or(6);
        write!(
            f,
            "[Earth ECI] {}\tposition = [{}, {}, {}] km\tvelocity = [{}, {}, {}] km/s",
            self.epoch,
            format!("{:.*}", decimals, self.x_km),
            format!("{:.*}", decimals, self.y_km),
            format!("{:.*}", decimals, self.z_km),
            format!("{:.*}", decimals, self.vx_km_s),
            format!("{:.*}", decimals, self.vy_km_s),
            format!("{:.*}", decimals, self.vz_km_s)
        )
    }
}
