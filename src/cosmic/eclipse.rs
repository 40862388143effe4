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

use super::{sun_position_eci, EARTH_EQUATORIAL_RADIUS_KM};
use crate::linalg::Vector3;
use std::fmt;

/// Positions closer than this to the surface of the occulting sphere are considered on its surface.
const SURFACE_TOLERANCE_KM: f64 = 1e-5;

/// Locates whether a spherical body blocks the line of sight between two positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineOfSight {
    /// Radius of the occulting sphere, centered on the origin of the frame
    pub obstacle_radius_km: f64,
}

impl LineOfSight {
    /// The Earth, optionally augmented by an opaque atmosphere of the provided height.
    pub fn earth(opaque_height_km: f64) -> Self {
        Self {
            obstacle_radius_km: EARTH_EQUATORIAL_RADIUS_KM + opaque_height_km,
        }
    }

    /// Returns true if the segment between both positions does not cross the obstacle.
    ///
    /// Algorithm from Vallado, Fundamentals of Astrodynamics and Applications, 4th ed., section 5.3.
    /// Positions inside the obstacle never have a line of sight.
    pub fn is_visible(&self, first: &Vector3<f64>, second: &Vector3<f64>) -> bool {
        let first_hat = first.normalize();
        let second_hat = second.normalize();
        let cos_theta = first_hat.dot(&second_hat);
        // Opposite sides of the obstacle
        if (cos_theta + 1.0).abs() < 1e-9 {
            return false;
        }
        let theta = cos_theta.min(1.0).acos();

        match (
            self.horizon_angle(first.norm()),
            self.horizon_angle(second.norm()),
        ) {
            (Some(theta1), Some(theta2)) => theta1 + theta2 >= theta,
            _ => false,
        }
    }

    /// Angle between the position and the tangent point of the obstacle, None if inside the obstacle.
    fn horizon_angle(&self, rmag_km: f64) -> Option<f64> {
        if (rmag_km - self.obstacle_radius_km).abs() < SURFACE_TOLERANCE_KM {
            Some(0.0)
        } else if rmag_km < self.obstacle_radius_km {
            None
        } else {
            Some((self.obstacle_radius_km / rmag_km).acos())
        }
    }
}

impl fmt::Display for LineOfSight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "occulting sphere of {} km", self.obstacle_radius_km)
    }
}

/// Determines whether a spacecraft is in the shadow of the Earth, treating the Sun as a point source (no penumbra).
#[derive(Copy, Clone, Debug)]
pub struct EclipseLocator {
    pub los: LineOfSight,
}

impl Default for EclipseLocator {
    fn default() -> Self {
        Self {
            los: LineOfSight::earth(0.0),
        }
    }
}

impl EclipseLocator {
    /// Returns true if the Earth blocks the Sun at this position and Julian date.
    pub fn is_eclipsed(&self, position: &Vector3<f64>, jd: f64) -> bool {
        !self.los.is_visible(position, &sun_position_eci(jd))
    }
}
