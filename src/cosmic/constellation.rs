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

use super::{Instrument, Orbit, OrbitError, Spacecraft};
use crate::io::{epoch_from_str, epoch_to_str};
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};

/// A Walker delta pattern `i: t/p/f` of circular orbits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkerDelta {
    /// Prefix of the generated spacecraft identifiers
    pub id: String,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    /// Total number of spacecraft `t`
    pub num_sats: usize,
    /// Number of equally spaced planes `p`
    pub num_planes: usize,
    /// Relative phasing `f`, between 0 and p - 1
    #[serde(default)]
    pub relative_spacing: usize,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub epoch: Epoch,
    /// Payload copied onto every spacecraft of the constellation
    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

impl WalkerDelta {
    pub fn sats_per_plane(&self) -> usize {
        self.num_sats / self.num_planes.max(1)
    }

    /// Generates the spacecraft of this constellation, plane by plane.
    pub fn spacecraft(&self) -> Result<Vec<Spacecraft>, OrbitError> {
        let per_plane = self.sats_per_plane();
        if per_plane * self.num_planes != self.num_sats {
            warn!(
                "{} spacecraft cannot be spread evenly over {} planes: generating {} spacecraft",
                self.num_sats,
                self.num_planes,
                per_plane * self.num_planes
            );
        }
        let raan_step = 360.0 / self.num_planes as f64;
        let phase_step = 360.0 / per_plane.max(1) as f64;
        let inter_plane_phase = 360.0 * self.relative_spacing as f64 / self.num_sats.max(1) as f64;

        let mut fleet = Vec::with_capacity(per_plane * self.num_planes);
        for plane in 0..self.num_planes {
            for slot in 0..per_plane {
                let orbit = Orbit::circular_altitude(
                    self.altitude_km,
                    self.inclination_deg,
                    raan_step * plane as f64,
                    phase_step * slot as f64 + inter_plane_phase * plane as f64,
                    self.epoch,
                )?;
                let mut sc = Spacecraft::new(format!("{}{plane}{slot}", self.id), orbit);
                sc.instruments = self.instruments.clone();
                fleet.push(sc);
            }
        }
        Ok(fleet)
    }
}
