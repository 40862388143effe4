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

use super::{geodetic_to_eci, LineOfSight};
use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// GroundStation defines a ground terminal able to contact the spacecraft above its elevation mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundStation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// in degrees
    pub latitude_deg: f64,
    /// in degrees
    pub longitude_deg: f64,
    /// in km
    #[serde(default)]
    pub height_km: f64,
    /// in degrees
    #[serde(default = "default_elevation_mask")]
    pub elevation_mask_deg: f64,
}

fn default_elevation_mask() -> f64 {
    7.0
}

impl GroundStation {
    /// Initializes a new ground station from its geocentric coordinates, with the default elevation mask of 7 degrees.
    pub fn from_point<S: Into<String>>(id: S, latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            latitude_deg,
            longitude_deg,
            height_km,
            elevation_mask_deg: default_elevation_mask(),
        }
    }

    pub fn with_elevation_mask(mut self, elevation_mask_deg: f64) -> Self {
        self.elevation_mask_deg = elevation_mask_deg;
        self
    }

    /// Inertial position of this station at the provided Julian date
    pub fn position_eci(&self, jd: f64) -> Vector3<f64> {
        geodetic_to_eci(self.latitude_deg, self.longitude_deg, self.height_km, jd)
    }

    /// Elevation in degrees of the provided inertial position as seen from this station.
    pub fn elevation_of(&self, target: &Vector3<f64>, jd: f64) -> f64 {
        let station = self.position_eci(jd);
        let range = target - station;
        let cos_zenith = station.normalize().dot(&range.normalize()).clamp(-1.0, 1.0);
        (FRAC_PI_2 - cos_zenith.acos()).to_degrees()
    }

    /// Returns whether the target is strictly above the elevation mask and not occulted by the Earth.
    pub fn is_visible(&self, target: &Vector3<f64>, jd: f64) -> bool {
        let station = self.position_eci(jd);
        LineOfSight::earth(0.0).is_visible(&station, target)
            && self.elevation_of(target, jd) > self.elevation_mask_deg
    }
}

impl fmt::Display for GroundStation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (lat.: {:.4} deg    long.: {:.4} deg    alt.: {:.3} m)",
            self.name.as_deref().unwrap_or(&self.id),
            self.latitude_deg,
            self.longitude_deg,
            self.height_km * 1e3,
        )
    }
}
