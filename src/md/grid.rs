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

use crate::io::grid_file::{load_grid_points, write_grid_points, GeoPoint};
use crate::io::FileError;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

fn default_lat_upper() -> f64 {
    90.0
}

fn default_lat_lower() -> f64 {
    -90.0
}

fn default_lon_upper() -> f64 {
    180.0
}

fn default_lon_lower() -> f64 {
    -180.0
}

/// A set of points on the surface of the Earth used by the grid coverage strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Grid {
    /// Points generated within the provided bounds, written to disk by the first stage of the pipeline
    Autogrid {
        id: String,
        #[serde(default = "default_lat_upper")]
        lat_upper_deg: f64,
        #[serde(default = "default_lat_lower")]
        lat_lower_deg: f64,
        #[serde(default = "default_lon_upper")]
        lon_upper_deg: f64,
        #[serde(default = "default_lon_lower")]
        lon_lower_deg: f64,
        /// Computed from the fleet geometry when unset
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grid_res_deg: Option<f64>,
        /// Set once the grid is written
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_path: Option<PathBuf>,
    },
    /// Points read from a CSV file with the `lat [deg]` and `lon [deg]` columns
    Customgrid { id: String, file_path: PathBuf },
}

impl Grid {
    /// An auto grid over the whole Earth
    pub fn global<S: Into<String>>(id: S, grid_res_deg: Option<f64>) -> Self {
        Self::Autogrid {
            id: id.into(),
            lat_upper_deg: default_lat_upper(),
            lat_lower_deg: default_lat_lower(),
            lon_upper_deg: default_lon_upper(),
            lon_lower_deg: default_lon_lower(),
            grid_res_deg,
            file_path: None,
        }
    }

    pub fn custom<S: Into<String>, P: AsRef<Path>>(id: S, file_path: P) -> Self {
        Self::Customgrid {
            id: id.into(),
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Autogrid { id, .. } | Self::Customgrid { id, .. } => id,
        }
    }

    /// File holding the points, None for an auto grid which is not written yet.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::Autogrid { file_path, .. } => file_path.as_deref(),
            Self::Customgrid { file_path, .. } => Some(file_path),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Autogrid { .. })
    }

    /// Loads the points of this grid from its file.
    pub fn points(&self) -> Result<Option<Vec<GeoPoint>>, FileError> {
        self.file_path().map(load_grid_points).transpose()
    }

    /// Generates the points of an auto grid with the provided resolution (or its own one), writes them to the
    /// provided file and records that file. Returns the resolution used and the number of points.
    ///
    /// Custom grids and auto grids which already have a file are left untouched.
    pub fn resolve<P: AsRef<Path>>(
        &mut self,
        default_res_deg: f64,
        path: P,
    ) -> Result<Option<(f64, usize)>, FileError> {
        match self {
            Self::Customgrid { .. } => Ok(None),
            Self::Autogrid {
                file_path: Some(_), ..
            } => Ok(None),
            Self::Autogrid {
                lat_upper_deg,
                lat_lower_deg,
                lon_upper_deg,
                lon_lower_deg,
                grid_res_deg,
                file_path,
                ..
            } => {
                let res_deg = grid_res_deg.unwrap_or(default_res_deg);
                let points = generate_points(
                    (*lat_lower_deg, *lat_upper_deg),
                    (*lon_lower_deg, *lon_upper_deg),
                    res_deg,
                );
                write_grid_points(path.as_ref(), &points)?;
                *file_path = Some(path.as_ref().to_path_buf());
                Ok(Some((res_deg, points.len())))
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Autogrid {
                id,
                lat_upper_deg,
                lat_lower_deg,
                lon_upper_deg,
                lon_lower_deg,
                grid_res_deg,
                ..
            } => {
                write!(
                    f,
                    "auto grid `{id}` over [{lat_lower_deg}, {lat_upper_deg}] x [{lon_lower_deg}, {lon_upper_deg}] deg"
                )?;
                if let Some(res) = grid_res_deg {
                    write!(f, " every {res} deg")?;
                }
                Ok(())
            }
            Self::Customgrid { id, file_path } => {
                write!(f, "custom grid `{id}` from {}", file_path.display())
            }
        }
    }
}

/// Points spaced by approximately `res_deg` on the surface of the sphere, within the provided bounds.
///
/// Latitude bands are spaced by the resolution, and the number of points of each band is scaled by the cosine of
/// its latitude so that neighboring points are about as far apart along the band.
pub fn generate_points(lat_bounds: (f64, f64), lon_bounds: (f64, f64), res_deg: f64) -> Vec<GeoPoint> {
    let (lat_lower, lat_upper) = lat_bounds;
    let (lon_lower, lon_upper) = lon_bounds;
    let mut points = Vec::new();
    if !res_deg.is_finite() || res_deg <= 0.0 || lat_upper < lat_lower || lon_upper < lon_lower {
        return points;
    }

    let num_bands = ((180.0 / res_deg).round() as usize).max(1);
    let band_step = 180.0 / num_bands as f64;
    for band in 0..=num_bands {
        let lat = -90.0 + band as f64 * band_step;
        if lat < lat_lower || lat > lat_upper {
            continue;
        }
        let circumference_deg = 360.0 * lat.to_radians().cos();
        let num_lon = ((circumference_deg / res_deg).round() as usize).max(1);
        let lon_step = 360.0 / num_lon as f64;
        for slot in 0..num_lon {
            let lon = -180.0 + slot as f64 * lon_step;
            if lon >= lon_lower && lon <= lon_upper {
                points.push(GeoPoint::new(lat, lon));
            }
        }
    }
    points
}
