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

use super::header::{create_writer, FileHeader, HeadedReader};
use super::{CsvSnafu, FileError, MalformedSnafu};
use crate::cosmic::Orbit;
use crate::linalg::{Vector3, Vector6};
use csv::Writer;
use snafu::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The two representations of the state files written by the propagation stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateFileKind {
    /// Position and velocity in km and km/s
    Cartesian,
    /// Orbital elements in km, no unit and degrees
    Keplerian,
}

impl StateFileKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Cartesian => {
                "Satellite states are in CARTESIAN_EARTH_CENTERED_INERTIAL (equatorial-plane) frame."
            }
            Self::Keplerian => "Satellite states as KEPLERIAN_EARTH_CENTERED_INERTIAL elements.",
        }
    }

    pub fn columns(&self) -> [&'static str; 7] {
        match self {
            Self::Cartesian => [
                "time index",
                "x [km]",
                "y [km]",
                "z [km]",
                "vx [km/s]",
                "vy [km/s]",
                "vz [km/s]",
            ],
            Self::Keplerian => [
                "time index",
                "sma [km]",
                "ecc",
                "inc [deg]",
                "raan [deg]",
                "aop [deg]",
                "ta [deg]",
            ],
        }
    }

    fn values(&self, state: &Orbit) -> Vector6<f64> {
        match self {
            Self::Cartesian => state.to_cartesian_vec(),
            Self::Keplerian => state.to_keplerian_vec(),
        }
    }
}

/// Writes one row per time step of a state file.
pub struct StateFileWriter {
    kind: StateFileKind,
    path: PathBuf,
    wtr: Writer<File>,
}

impl StateFileWriter {
    /// Creates the file and writes its header and column names.
    pub fn create<P: AsRef<Path>>(
        path: P,
        kind: StateFileKind,
        epoch_jd: f64,
        step_s: f64,
        duration_days: f64,
    ) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let mut wtr = create_writer(&path)?;
        let header = FileHeader {
            title: kind.title().to_string(),
            epoch_jd,
            step_s,
            duration_days: Some(duration_days),
        };
        header
            .write_to(&mut wtr)
            .and_then(|_| wtr.write_record(kind.columns()))
            .context(CsvSnafu { path: path.clone() })?;
        Ok(Self { kind, path, wtr })
    }

    pub fn write_state(&mut self, time_index: usize, state: &Orbit) -> Result<(), FileError> {
        let values = self.kind.values(state);
        let mut record = Vec::with_capacity(7);
        record.push(time_index.to_string());
        record.extend(values.iter().map(|v| v.to_string()));
        self.wtr.write_record(&record).context(CsvSnafu {
            path: self.path.clone(),
        })
    }

    pub fn finish(mut self) -> Result<PathBuf, FileError> {
        self.wtr.flush().map_err(|source| FileError::Io {
            action: "flush",
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }
}

/// A state file loaded in memory.
#[derive(Clone, Debug)]
pub struct StateSeries {
    pub kind: StateFileKind,
    pub header: FileHeader,
    /// One state per time index, in the units of the file
    pub states: Vec<Vector6<f64>>,
}

impl StateSeries {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
        let path = path.as_ref();
        let rdr = HeadedReader::open(path, true)?;
        let kind = if rdr.header.title == StateFileKind::Cartesian.title() {
            StateFileKind::Cartesian
        } else if rdr.header.title == StateFileKind::Keplerian.title() {
            StateFileKind::Keplerian
        } else {
            return MalformedSnafu {
                path: path.to_path_buf(),
                msg: format!("unknown state representation `{}`", rdr.header.title),
            }
            .fail();
        };
        let (header, _, rows) = rdr.numeric_rows()?;
        let mut states = Vec::with_capacity(rows.len());
        for (expected_index, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == 7 && row[0] as usize == expected_index,
                MalformedSnafu {
                    path: path.to_path_buf(),
                    msg: format!("row {expected_index} is not a state at time index {expected_index}"),
                }
            );
            states.push(Vector6::from_column_slice(&row[1..]));
        }
        Ok(Self {
            kind,
            header,
            states,
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Julian date of the provided time index
    pub fn jd_at(&self, time_index: usize) -> f64 {
        self.header.jd_at(time_index)
    }

    /// Position in km at the provided time index, only meaningful for Cartesian files.
    pub fn position(&self, time_index: usize) -> Vector3<f64> {
        self.states[time_index].fixed_rows::<3>(0).into_owned()
    }

    /// Velocity in km/s at the provided time index, only meaningful for Cartesian files.
    pub fn velocity(&self, time_index: usize) -> Vector3<f64> {
        self.states[time_index].fixed_rows::<3>(3).into_owned()
    }

    /// Cartesian orbit at the provided time index, the epoch being derived from the header.
    pub fn orbit(&self, time_index: usize) -> Orbit {
        let epoch = hifitime::Epoch::from_jde_utc(self.jd_at(time_index));
        Orbit::cartesian_vec(&self.states[time_index], epoch)
    }
}
