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

use super::{middle_of_runs, MissingGridSnafu, StageError};
use crate::cosmic::{
    dcm_inertial_to_nadir, eci_to_lat_lon, gmst_deg, Instrument, InstrumentMode, LineOfSight,
    EARTH_EQUATORIAL_RADIUS_KM,
};
use crate::io::access_file::{AccessFileWriter, AccessRecord};
use crate::io::grid_file::GeoPoint;
use crate::io::header::FileHeader;
use crate::io::state_file::StateSeries;
use crate::linalg::{Matrix3, Vector3};
use crate::md::artifact::{CoverageArtifact, PropagationArtifact};
use crate::md::CoverageMode;
use crate::utils::r3;
use snafu::prelude::*;
use std::path::Path;

/// Grid points of a coverage work item
#[derive(Copy, Clone, Debug)]
pub struct GridPoints<'a> {
    pub id: &'a str,
    pub points: &'a [GeoPoint],
}

/// Computes when the grid points or pointing options of an instrument mode are observed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverageCalculator {
    pub mode: CoverageMode,
    /// Only keep the middle time index of each contiguous access
    pub mid_access_only: bool,
}

/// Position of the satellite and the inertial to sensor rotations at one time step
struct Epochal {
    jd: f64,
    position: Vector3<f64>,
    dcm_to_nadir: Matrix3<f64>,
}

impl CoverageCalculator {
    pub fn new(mode: CoverageMode, mid_access_only: bool) -> Self {
        Self {
            mode,
            mid_access_only,
        }
    }

    /// Computes the accesses of this instrument mode over the states of the propagation artifact and writes them to
    /// the access file.
    pub fn execute(
        &self,
        propagation: &PropagationArtifact,
        instrument: &Instrument,
        inst_mode: &InstrumentMode,
        grid: Option<GridPoints>,
        access_file: &Path,
    ) -> Result<CoverageArtifact, StageError> {
        let state_cart_file = propagation
            .state_cart_file
            .as_deref()
            .context(super::MissingStatesSnafu {
                spacecraft_id: propagation.spacecraft_id.clone(),
            })?;
        if self.mode.uses_grid() {
            ensure!(
                grid.is_some(),
                MissingGridSnafu {
                    what: self.mode.title().to_lowercase(),
                }
            );
        }

        let series = StateSeries::load(state_cart_file)?;
        let epochs = (0..series.len())
            .map(|idx| Epochal {
                jd: series.jd_at(idx),
                position: series.position(idx),
                dcm_to_nadir: dcm_inertial_to_nadir(&series.orbit(idx)),
            })
            .collect::<Vec<_>>();

        let mut records = match (self.mode, grid) {
            (CoverageMode::Grid, Some(grid)) => self.grid_accesses(&epochs, instrument, grid),
            (CoverageMode::PointingOptionsWithGrid, Some(grid)) => {
                self.pointing_options_grid_accesses(&epochs, instrument, inst_mode, grid)
            }
            (CoverageMode::PointingOptions, _) => self.pointing_options_accesses(&epochs, inst_mode),
            _ => Vec::new(),
        };
        records.sort_by_key(|rec| (rec.time_index, rec.pnt_opt_index, rec.gp_index));

        debug!(
            "{} of {} mode {}: {} access(es)",
            self.mode,
            instrument.id,
            inst_mode.id,
            records.len()
        );

        let header = FileHeader {
            title: self.mode.title().to_string(),
            ..series.header.clone()
        };
        let mut wtr = AccessFileWriter::create(access_file, self.mode, &header)?;
        for rec in &records {
            wtr.write_access(rec)?;
        }
        let access_file = wtr.finish()?;

        Ok(CoverageArtifact {
            coverage_mode: self.mode,
            spacecraft_id: propagation.spacecraft_id.clone(),
            instrument_id: instrument.id.clone(),
            mode_id: inst_mode.id.clone(),
            grid_id: grid.map(|g| g.id.to_string()),
            state_cart_file: state_cart_file.to_path_buf(),
            access_file,
            mid_access_only: self.mid_access_only,
            start_epoch: propagation.start_epoch,
            duration_days: propagation.duration_days,
        })
    }

    /// Time indices at which each target is accessed, reduced to the middle of each access if requested.
    fn time_indices(&self, indices: Vec<usize>) -> Vec<usize> {
        if self.mid_access_only {
            middle_of_runs(&indices)
        } else {
            indices
        }
    }

    fn grid_accesses(
        &self,
        epochs: &[Epochal],
        instrument: &Instrument,
        grid: GridPoints,
    ) -> Vec<AccessRecord> {
        let field_of_regard = instrument.field_of_regard();
        let los = LineOfSight::earth(0.0);
        let fixed = earth_fixed_positions(grid.points);

        let mut accessed = vec![Vec::new(); grid.points.len()];
        for (time_index, epochal) in epochs.iter().enumerate() {
            let to_inertial = earth_fixed_to_inertial(epochal.jd);
            for (gp_index, gp_fixed) in fixed.iter().enumerate() {
                let gp = to_inertial * gp_fixed;
                if los.is_visible(&epochal.position, &gp)
                    && field_of_regard.contains(&(epochal.dcm_to_nadir * (gp - epochal.position)))
                {
                    accessed[gp_index].push(time_index);
                }
            }
        }

        accessed
            .into_iter()
            .enumerate()
            .flat_map(|(gp_index, indices)| {
                let point = grid.points[gp_index];
                self.time_indices(indices)
                    .into_iter()
                    .map(move |time_index| AccessRecord {
                        time_index,
                        pnt_opt_index: None,
                        gp_index: Some(gp_index),
                        lat_deg: point.lat_deg,
                        lon_deg: point.lon_deg,
                    })
            })
            .collect()
    }

    fn pointing_options_accesses(
        &self,
        epochs: &[Epochal],
        inst_mode: &InstrumentMode,
    ) -> Vec<AccessRecord> {
        let mut records = Vec::new();
        for (pnt_opt_index, option) in inst_mode.pointing_options.iter().enumerate() {
            let boresight = option.boresight();
            let mut hits = Vec::new();
            for (time_index, epochal) in epochs.iter().enumerate() {
                let direction = epochal.dcm_to_nadir.transpose() * boresight;
                if let Some(target) = earth_intersection(&epochal.position, &direction) {
                    hits.push((time_index, eci_to_lat_lon(&target, epochal.jd)));
                }
            }
            let kept = self.time_indices(hits.iter().map(|(idx, _)| *idx).collect());
            records.extend(
                hits.into_iter()
                    .filter(|(idx, _)| kept.contains(idx))
                    .map(|(time_index, (lat_deg, lon_deg))| AccessRecord {
                        time_index,
                        pnt_opt_index: Some(pnt_opt_index),
                        gp_index: None,
                        lat_deg,
                        lon_deg,
                    }),
            );
        }
        records
    }

    fn pointing_options_grid_accesses(
        &self,
        epochs: &[Epochal],
        instrument: &Instrument,
        inst_mode: &InstrumentMode,
        grid: GridPoints,
    ) -> Vec<AccessRecord> {
        let scene = instrument.scene_field_of_view();
        let los = LineOfSight::earth(0.0);
        let fixed = earth_fixed_positions(grid.points);
        let num_options = inst_mode.pointing_options.len();

        // Indexed by pointing option then grid point
        let mut accessed = vec![Vec::new(); num_options * grid.points.len()];
        for (time_index, epochal) in epochs.iter().enumerate() {
            let to_inertial = earth_fixed_to_inertial(epochal.jd);
            let visible = fixed
                .iter()
                .enumerate()
                .map(|(gp_index, gp_fixed)| (gp_index, to_inertial * gp_fixed))
                .filter(|(_, gp)| los.is_visible(&epochal.position, gp))
                .collect::<Vec<_>>();
            for (pnt_opt_index, option) in inst_mode.pointing_options.iter().enumerate() {
                let to_sensor = option.dcm_from_nadir() * epochal.dcm_to_nadir;
                for (gp_index, gp) in &visible {
                    if scene.contains(&(to_sensor * (gp - epochal.position))) {
                        accessed[pnt_opt_index * grid.points.len() + gp_index].push(time_index);
                    }
                }
            }
        }

        let num_points = grid.points.len();
        accessed
            .into_iter()
            .enumerate()
            .flat_map(|(flat_index, indices)| {
                let (pnt_opt_index, gp_index) = (flat_index / num_points, flat_index % num_points);
                let point = grid.points[gp_index];
                self.time_indices(indices)
                    .into_iter()
                    .map(move |time_index| AccessRecord {
                        time_index,
                        pnt_opt_index: Some(pnt_opt_index),
                        gp_index: Some(gp_index),
                        lat_deg: point.lat_deg,
                        lon_deg: point.lon_deg,
                    })
            })
            .collect()
    }
}

/// Positions of the grid points in the Earth fixed frame, on a spherical Earth.
fn earth_fixed_positions(points: &[GeoPoint]) -> Vec<Vector3<f64>> {
    points
        .iter()
        .map(|p| {
            let (lat, lon) = (p.lat_deg.to_radians(), p.lon_deg.to_radians());
            EARTH_EQUATORIAL_RADIUS_KM
                * Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
        })
        .collect()
}

/// Rotation from the Earth fixed frame to the inertial frame, about the pole only.
fn earth_fixed_to_inertial(jd: f64) -> Matrix3<f64> {
    r3(-gmst_deg(jd).to_radians())
}

/// Closest intersection of the ray from the position along the direction with the surface of the Earth.
pub fn earth_intersection(position: &Vector3<f64>, direction: &Vector3<f64>) -> Option<Vector3<f64>> {
    let dir = direction.normalize();
    let b = position.dot(&dir);
    let c = position.norm_squared() - EARTH_EQUATORIAL_RADIUS_KM.powi(2);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let distance = -b - discriminant.sqrt();
    if distance <= 0.0 {
        return None;
    }
    Some(position + distance * dir)
}
