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

use crate::cosmic::{Spacecraft, EARTH_EQUATORIAL_RADIUS_KM, EARTH_GM_KM3_S2};

/// Propagation step used when the fleet is empty, in seconds
pub const DEFAULT_TIME_STEP_S: f64 = 60.0;
/// Grid resolution used when the fleet is empty, in degrees
pub const DEFAULT_GRID_RES_DEG: f64 = 1.0;

/// Derives the propagation step and the grid resolution from the geometry of the fleet.
///
/// Both parameters are bounded by the smallest sensor footprint of the fleet, computed on a spherical Earth from
/// the semi-major axis of each spacecraft (the altitude is assumed constant over the orbit).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParameterEstimator {
    /// Tolerance below which the sine of the half extent is considered equal to the horizon ratio
    pub ratio_clamp_tolerance: f64,
}

impl Default for ParameterEstimator {
    fn default() -> Self {
        Self {
            ratio_clamp_tolerance: 1e-7,
        }
    }
}

impl ParameterEstimator {
    pub fn new(ratio_clamp_tolerance: f64) -> Self {
        Self {
            ratio_clamp_tolerance,
        }
    }

    /// Time step in seconds such that `resolution_factor` times the step is the time needed to cross the smallest
    /// along-track field of regard of the fleet.
    pub fn compute_time_step(&self, fleet: &[Spacecraft], resolution_factor: f64) -> f64 {
        fleet
            .iter()
            .map(|sc| {
                let sma_km = sc.orbit.sma_km();
                let extent_deg = sc
                    .instruments
                    .iter()
                    .map(|instrument| instrument.field_of_regard().along_track_extent_deg())
                    .reduce(f64::min)
                    .unwrap_or_else(|| horizon_angle_deg(sma_km));
                let central_angle_deg = self.footprint_central_angle_deg(sma_km, extent_deg);
                let footprint_km = EARTH_EQUATORIAL_RADIUS_KM * central_angle_deg.to_radians();
                let ground_speed_km_s =
                    (EARTH_EQUATORIAL_RADIUS_KM / sma_km) * (EARTH_GM_KM3_S2 / sma_km).sqrt();
                resolution_factor * footprint_km / ground_speed_km_s
            })
            .reduce(f64::min)
            .unwrap_or(DEFAULT_TIME_STEP_S)
    }

    /// Grid resolution in degrees: `resolution_factor` times the smallest Earth central angle spanned by a scene
    /// field of view of the fleet.
    pub fn compute_grid_res(&self, fleet: &[Spacecraft], resolution_factor: f64) -> f64 {
        fleet
            .iter()
            .map(|sc| {
                let sma_km = sc.orbit.sma_km();
                let extent_deg = sc
                    .instruments
                    .iter()
                    .map(|instrument| instrument.scene_field_of_view().min_extent_deg())
                    .reduce(f64::min)
                    .unwrap_or_else(|| horizon_angle_deg(sma_km));
                resolution_factor * self.footprint_central_angle_deg(sma_km, extent_deg)
            })
            .reduce(f64::min)
            .unwrap_or(DEFAULT_GRID_RES_DEG)
    }

    /// Earth central angle in degrees spanned by a nadir-pointing footprint of the provided angular extent.
    fn footprint_central_angle_deg(&self, sma_km: f64, extent_deg: f64) -> f64 {
        let ratio = EARTH_EQUATORIAL_RADIUS_KM / sma_km;
        let extent_deg = extent_deg.min(horizon_angle_deg(sma_km));
        let half_extent_deg = 0.5 * extent_deg;
        let sin_half = half_extent_deg.to_radians().sin();
        let cos_elevation = if (sin_half - ratio).abs() < self.ratio_clamp_tolerance {
            1.0
        } else {
            sin_half / ratio
        };
        let elevation_deg = cos_elevation.acos().to_degrees();
        2.0 * (90.0 - half_extent_deg - elevation_deg)
    }
}

/// Full angle in degrees under which the Earth is seen from the provided orbit radius.
pub fn horizon_angle_deg(sma_km: f64) -> f64 {
    2.0 * (EARTH_EQUATORIAL_RADIUS_KM / sma_km).asin().to_degrees()
}
