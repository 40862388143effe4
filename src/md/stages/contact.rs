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

use super::{MismatchedSeriesSnafu, MissingStatesSnafu, StageError};
use crate::cosmic::{GroundStation, LineOfSight};
use crate::io::header::FileHeader;
use crate::io::interval_file::{write_details, write_intervals, OutType};
use crate::io::state_file::StateSeries;
use crate::md::artifact::{
    GroundContactArtifact, InterSatelliteContactArtifact, PropagationArtifact,
};
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// Finds the contact opportunities of the spacecraft with the ground stations and with each other.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContactFinder {
    pub out_type: OutType,
}

fn state_file(propagation: &PropagationArtifact) -> Result<&Path, StageError> {
    propagation
        .state_cart_file
        .as_deref()
        .context(MissingStatesSnafu {
            spacecraft_id: propagation.spacecraft_id.clone(),
        })
}

impl ContactFinder {
    pub fn new(out_type: OutType) -> Self {
        Self { out_type }
    }

    /// Contacts between the spacecraft of the propagation artifact and the ground station.
    pub fn ground_station(
        &self,
        propagation: &PropagationArtifact,
        station: &GroundStation,
        contact_file: &Path,
    ) -> Result<GroundContactArtifact, StageError> {
        let state_cart_file = state_file(propagation)?;
        let series = StateSeries::load(state_cart_file)?;

        let header = FileHeader {
            title: format!(
                "Contacts between Spacecraft with id {} and Ground station with id {}",
                propagation.spacecraft_id, station.id
            ),
            epoch_jd: series.header.epoch_jd,
            step_s: series.header.step_s,
            duration_days: None,
        };

        match self.out_type {
            OutType::Interval => {
                let flags = (0..series.len())
                    .map(|idx| station.is_visible(&series.position(idx), series.jd_at(idx)))
                    .collect::<Vec<_>>();
                write_intervals(contact_file, &header, &flags)?;
            }
            OutType::Detail => {
                let rows = (0..series.len())
                    .map(|idx| {
                        let jd = series.jd_at(idx);
                        let sat = series.position(idx);
                        let range_km = (sat - station.position_eci(jd)).norm();
                        (
                            station.is_visible(&sat, jd),
                            vec![Some(range_km), Some(station.elevation_of(&sat, jd))],
                        )
                    })
                    .collect::<Vec<_>>();
                write_details(
                    contact_file,
                    &header,
                    "access",
                    &["range [km]", "elevation [deg]"],
                    &rows,
                )?;
            }
        }

        Ok(GroundContactArtifact {
            spacecraft_id: propagation.spacecraft_id.clone(),
            ground_station_id: station.id.clone(),
            state_cart_file: state_cart_file.to_path_buf(),
            contact_file: contact_file.to_path_buf(),
            out_type: self.out_type,
            start_epoch: propagation.start_epoch,
            duration_days: propagation.duration_days,
        })
    }

    /// Contacts between two spacecraft, the line of sight being blocked by the Earth and its opaque atmosphere.
    pub fn inter_satellite(
        &self,
        first: &PropagationArtifact,
        second: &PropagationArtifact,
        opaque_atmos_height_km: f64,
        contact_file: &Path,
    ) -> Result<InterSatelliteContactArtifact, StageError> {
        let first_file = state_file(first)?;
        let second_file = state_file(second)?;
        let first_series = StateSeries::load(first_file)?;
        let second_series = StateSeries::load(second_file)?;
        ensure!(
            first_series.len() == second_series.len()
                && first_series.header.epoch_jd == second_series.header.epoch_jd
                && first_series.header.step_s == second_series.header.step_s,
            MismatchedSeriesSnafu {
                first: PathBuf::from(first_file),
                second: PathBuf::from(second_file),
            }
        );

        let los = LineOfSight::earth(opaque_atmos_height_km);
        let header = FileHeader {
            title: format!(
                "Contacts between Spacecraft with id {} and Spacecraft with id {}",
                first.spacecraft_id, second.spacecraft_id
            ),
            epoch_jd: first_series.header.epoch_jd,
            step_s: first_series.header.step_s,
            duration_days: None,
        };

        let geometry = (0..first_series.len()).map(|idx| {
            let (a, b) = (first_series.position(idx), second_series.position(idx));
            (los.is_visible(&a, &b), (a - b).norm())
        });

        match self.out_type {
            OutType::Interval => {
                let flags = geometry.map(|(visible, _)| visible).collect::<Vec<_>>();
                write_intervals(contact_file, &header, &flags)?;
            }
            OutType::Detail => {
                let rows = geometry
                    .map(|(visible, range_km)| (visible, vec![Some(range_km)]))
                    .collect::<Vec<_>>();
                write_details(contact_file, &header, "access", &["range [km]"], &rows)?;
            }
        }

        Ok(InterSatelliteContactArtifact {
            first_spacecraft_id: first.spacecraft_id.clone(),
            second_spacecraft_id: second.spacecraft_id.clone(),
            first_state_cart_file: first_file.to_path_buf(),
            second_state_cart_file: second_file.to_path_buf(),
            contact_file: contact_file.to_path_buf(),
            opaque_atmos_height_km,
            out_type: self.out_type,
            start_epoch: first.start_epoch,
            duration_days: first.duration_days,
        })
    }
}
