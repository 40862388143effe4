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

use super::header::create_writer;
use super::{CsvSnafu, FileError, MalformedSnafu};
use crate::utils::round_to;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;

/// A grid point, in geocentric degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat [deg]")]
    pub lat_deg: f64,
    #[serde(rename = "lon [deg]")]
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Loads the points of a grid file, which must have the `lat [deg]` and `lon [deg]` columns.
pub fn load_grid_points<P: AsRef<Path>>(path: P) -> Result<Vec<GeoPoint>, FileError> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path).context(CsvSnafu {
        path: path.to_path_buf(),
    })?;
    let points = rdr
        .deserialize()
        .collect::<Result<Vec<GeoPoint>, csv::Error>>()
        .context(CsvSnafu {
            path: path.to_path_buf(),
        })?;
    for point in &points {
        ensure!(
            (-90.0..=90.0).contains(&point.lat_deg) && (-180.0..=360.0).contains(&point.lon_deg),
            MalformedSnafu {
                path: path.to_path_buf(),
                msg: format!("invalid grid point {point:?}"),
            }
        );
    }
    Ok(points)
}

/// Writes the grid points with three decimals.
pub fn write_grid_points<P: AsRef<Path>>(path: P, points: &[GeoPoint]) -> Result<(), FileError> {
    let path = path.as_ref();
    let mut wtr = create_writer(path)?;
    for point in points {
        wtr.serialize(GeoPoint::new(
            round_to(point.lat_deg, 3),
            round_to(point.lon_deg, 3),
        ))
        .context(CsvSnafu {
            path: path.to_path_buf(),
        })?;
    }
    wtr.flush().map_err(|source| FileError::Io {
        action: "flush",
        path: path.to_path_buf(),
        source,
    })
}
