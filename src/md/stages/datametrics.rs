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

use super::StageError;
use crate::cosmic::{geodetic_to_eci, sun_position_eci, EARTH_EQUATORIAL_RADIUS_KM};
use crate::io::access_file::{AccessFile, AccessFileWriter, DataMetrics};
use crate::io::state_file::StateSeries;
use crate::linalg::Vector3;
use crate::md::artifact::{CoverageArtifact, DataMetricsArtifact};
use crate::utils::angle_between;
use std::path::Path;

/// Computes the observation geometry of each access of a coverage artifact.
#[derive(Copy, Clone, Debug, Default)]
pub struct DataMetricsCalculator;

impl DataMetricsCalculator {
    /// Observation geometry of a target on the ground from the satellite, at the provided Julian date.
    pub fn metrics(&self, sat: &Vector3<f64>, target: &Vector3<f64>, jd: f64) -> DataMetrics {
        let range = target - sat;
        let look_angle = angle_between(&-sat, &range);
        let incidence_angle = (look_angle.sin() * sat.norm() / EARTH_EQUATORIAL_RADIUS_KM)
            .clamp(-1.0, 1.0)
            .asin();
        let solar_zenith_deg = angle_between(target, &(sun_position_eci(jd) - target)).to_degrees();
        DataMetrics {
            range_km: range.norm(),
            look_angle_deg: look_angle.to_degrees(),
            incidence_angle_deg: incidence_angle.to_degrees(),
            solar_zenith_deg: (solar_zenith_deg <= 90.0).then_some(solar_zenith_deg),
        }
    }

    /// Reads the access file and the states of the coverage artifact and writes the data metrics file.
    pub fn execute(
        &self,
        coverage: &CoverageArtifact,
        data_metrics_file: &Path,
    ) -> Result<DataMetricsArtifact, StageError> {
        let access = AccessFile::load(&coverage.access_file)?;
        let series = StateSeries::load(&coverage.state_cart_file)?;

        let header = access
            .header
            .retitled(format!("Datametrics file based on {}", access.mode.title()));
        let mut wtr = AccessFileWriter::create_data_metrics(data_metrics_file, access.mode, &header)?;
        for rec in &access.records {
            if rec.time_index >= series.len() {
                return Err(StageError::MismatchedSeries {
                    first: coverage.access_file.clone(),
                    second: coverage.state_cart_file.clone(),
                });
            }
            let jd = series.jd_at(rec.time_index);
            let target = geodetic_to_eci(rec.lat_deg, rec.lon_deg, 0.0, jd);
            wtr.write_metrics(rec, &self.metrics(&series.position(rec.time_index), &target, jd))?;
        }
        let data_metrics_file = wtr.finish()?;

        debug!(
            "data metrics of {} accesses written to {}",
            access.records.len(),
            data_metrics_file.display()
        );

        Ok(DataMetricsArtifact {
            coverage_mode: coverage.coverage_mode,
            spacecraft_id: coverage.spacecraft_id.clone(),
            instrument_id: coverage.instrument_id.clone(),
            mode_id: coverage.mode_id.clone(),
            grid_id: coverage.grid_id.clone(),
            access_file: coverage.access_file.clone(),
            data_metrics_file,
            start_epoch: coverage.start_epoch,
            duration_days: coverage.duration_days,
        })
    }
}

#[cfg(test)]
mod ut_datametrics {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn nadir_geometry() {
        let sat = Vector3::new(7000.0, 0.0, 0.0);
        let target = Vector3::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0, 0.0);
        let metrics = DataMetricsCalculator.metrics(&sat, &target, 2_459_270.5);
        assert_abs_diff_eq!(metrics.range_km, 7000.0 - EARTH_EQUATORIAL_RADIUS_KM, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.look_angle_deg, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(metrics.incidence_angle_deg, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn off_nadir_incidence() {
        // At the limb of the Earth, the incidence angle is 90 degrees.
        let sat = Vector3::new(7000.0, 0.0, 0.0);
        let limb_angle = (EARTH_EQUATORIAL_RADIUS_KM / 7000.0).acos();
        let target = EARTH_EQUATORIAL_RADIUS_KM * Vector3::new(limb_angle.cos(), limb_angle.sin(), 0.0);
        let metrics = DataMetricsCalculator.metrics(&sat, &target, 2_459_270.5);
        assert_abs_diff_eq!(metrics.incidence_angle_deg, 90.0, epsilon = 1e-3);
        assert!(metrics.look_angle_deg > 0.0 && metrics.look_angle_deg < 90.0);
    }

    #[test]
    fn night_side() {
        let jd = 2_459_270.5;
        let sun_dir = sun_position_eci(jd).normalize();
        let night = -EARTH_EQUATORIAL_RADIUS_KM * sun_dir;
        let day = EARTH_EQUATORIAL_RADIUS_KM * sun_dir;
        let calc = DataMetricsCalculator;
        assert!(calc.metrics(&(night * 1.1), &night, jd).solar_zenith_deg.is_none());
        assert_abs_diff_eq!(
            calc.metrics(&(day * 1.1), &day, jd).solar_zenith_deg.unwrap(),
            0.0,
            epsilon = 1e-3
        );
    }
}
