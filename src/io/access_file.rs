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
use crate::md::CoverageMode;
use crate::utils::round_to;
use csv::Writer;
use snafu::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

const TIME_INDEX: &str = "time index";
const GP_INDEX: &str = "GP index";
const PNT_OPT_INDEX: &str = "pnt-opt index";
const LAT: &str = "lat [deg]";
const LON: &str = "lon [deg]";

/// Columns appended by the data metrics stage to the access columns
pub const DATA_METRICS_COLUMNS: [&str; 4] = [
    "observation range [km]",
    "look angle [deg]",
    "incidence angle [deg]",
    "solar zenith [deg]",
];

/// One row of an access file: at `time_index`, the grid point or pointing option is observed at (lat, lon).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AccessRecord {
    pub time_index: usize,
    pub pnt_opt_index: Option<usize>,
    pub gp_index: Option<usize>,
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// Observation geometry of an access row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DataMetrics {
    pub range_km: f64,
    pub look_angle_deg: f64,
    pub incidence_angle_deg: f64,
    /// None when the observed point is not lit by the Sun
    pub solar_zenith_deg: Option<f64>,
}

/// Column names of the access files of each coverage mode
pub fn access_columns(mode: CoverageMode) -> Vec<&'static str> {
    match mode {
        CoverageMode::Grid => vec![TIME_INDEX, GP_INDEX, LAT, LON],
        CoverageMode::PointingOptions => vec![TIME_INDEX, PNT_OPT_INDEX, LAT, LON],
        CoverageMode::PointingOptionsWithGrid => {
            vec![TIME_INDEX, PNT_OPT_INDEX, GP_INDEX, LAT, LON]
        }
    }
}

fn access_fields(mode: CoverageMode, rec: &AccessRecord) -> Vec<String> {
    let idx = |i: Option<usize>| i.map(|i| i.to_string()).unwrap_or_default();
    let mut fields = vec![rec.time_index.to_string()];
    match mode {
        CoverageMode::Grid => fields.push(idx(rec.gp_index)),
        CoverageMode::PointingOptions => fields.push(idx(rec.pnt_opt_index)),
        CoverageMode::PointingOptionsWithGrid => {
            fields.push(idx(rec.pnt_opt_index));
            fields.push(idx(rec.gp_index));
        }
    }
    fields.push(round_to(rec.lat_deg, 3).to_string());
    fields.push(round_to(rec.lon_deg, 3).to_string());
    fields
}

/// Writes an access file, or a data metrics file when created with [`AccessFileWriter::create_data_metrics`].
pub struct AccessFileWriter {
    mode: CoverageMode,
    path: PathBuf,
    wtr: Writer<File>,
}

impl AccessFileWriter {
    pub fn create<P: AsRef<Path>>(
        path: P,
        mode: CoverageMode,
        header: &FileHeader,
    ) -> Result<Self, FileError> {
        Self::create_with_columns(path.as_ref(), mode, header, access_columns(mode))
    }

    pub fn create_data_metrics<P: AsRef<Path>>(
        path: P,
        mode: CoverageMode,
        header: &FileHeader,
    ) -> Result<Self, FileError> {
        let mut columns = access_columns(mode);
        columns.extend(DATA_METRICS_COLUMNS);
        Self::create_with_columns(path.as_ref(), mode, header, columns)
    }

    fn create_with_columns(
        path: &Path,
        mode: CoverageMode,
        header: &FileHeader,
        columns: Vec<&str>,
    ) -> Result<Self, FileError> {
        let mut wtr = create_writer(path)?;
        header
            .write_to(&mut wtr)
            .and_then(|_| wtr.write_record(&columns))
            .context(CsvSnafu { path })?;
        Ok(Self {
            mode,
            path: path.to_path_buf(),
            wtr,
        })
    }

    pub fn write_access(&mut self, rec: &AccessRecord) -> Result<(), FileError> {
        self.wtr
            .write_record(access_fields(self.mode, rec))
            .context(CsvSnafu {
                path: self.path.clone(),
            })
    }

    pub fn write_metrics(
        &mut self,
        rec: &AccessRecord,
        metrics: &DataMetrics,
    ) -> Result<(), FileError> {
        let mut fields = access_fields(self.mode, rec);
        fields.push(metrics.range_km.to_string());
        fields.push(metrics.look_angle_deg.to_string());
        fields.push(metrics.incidence_angle_deg.to_string());
        fields.push(
            metrics
                .solar_zenith_deg
                .map(|z| z.to_string())
                .unwrap_or_default(),
        );
        self.wtr.write_record(fields).context(CsvSnafu {
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

/// An access file loaded in memory
#[derive(Clone, Debug)]
pub struct AccessFile {
    pub mode: CoverageMode,
    pub header: FileHeader,
    pub records: Vec<AccessRecord>,
}

impl AccessFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
        let path = path.as_ref();
        let rdr = HeadedReader::open(path, true)?;
        let mode = CoverageMode::from_title(&rdr.header.title).context(MalformedSnafu {
            path: path.to_path_buf(),
            msg: format!("unknown coverage type `{}`", rdr.header.title),
        })?;
        let column = |name: &str| {
            rdr.column(name).context(MalformedSnafu {
                path: path.to_path_buf(),
                msg: format!("missing column `{name}`"),
            })
        };
        let time_col = column(TIME_INDEX)?;
        let lat_col = column(LAT)?;
        let lon_col = column(LON)?;
        let gp_col = rdr.column(GP_INDEX);
        let pnt_col = rdr.column(PNT_OPT_INDEX);

        let (header, _, rows) = rdr.numeric_rows()?;
        let records = rows
            .iter()
            .map(|row| AccessRecord {
                time_index: row[time_col] as usize,
                pnt_opt_index: pnt_col.map(|c| row[c] as usize),
                gp_index: gp_col.map(|c| row[c] as usize),
                lat_deg: row[lat_col],
                lon_deg: row[lon_col],
            })
            .collect();

        Ok(Self {
            mode,
            header,
            records,
        })
    }
}
