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
use super::{CsvSnafu, FileError};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::path::Path;

/// Layout of the contact and eclipse files
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutType {
    /// One row per interval, with its start and end time indices
    #[default]
    Interval,
    /// One row per time step
    Detail,
}

/// Converts a flag per time index into the intervals where it is set.
///
/// An interval ends at the first index where the flag is cleared, or at the last index of the series if it is
/// still set at the end. A flag set on the first index starts an interval at index 0.
pub fn intervals_from_flags(flags: &[bool]) -> Vec<(usize, usize)> {
    let Some(&first) = flags.first() else {
        return Vec::new();
    };
    let last_index = flags.len() - 1;

    let mut boundaries = Vec::new();
    let mut state = first;
    for (idx, &flag) in flags.iter().enumerate().skip(1) {
        if flag != state {
            boundaries.push(idx);
            state = flag;
        }
    }

    if first {
        if boundaries.is_empty() {
            boundaries.push(last_index);
        }
        boundaries.insert(0, 0);
    }

    if boundaries.len() % 2 != 0 {
        boundaries.push(last_index);
    }

    boundaries.chunks(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Writes the intervals of the provided flags.
pub fn write_intervals<P: AsRef<Path>>(
    path: P,
    header: &FileHeader,
    flags: &[bool],
) -> Result<(), FileError> {
    let path = path.as_ref();
    let mut wtr = create_writer(path)?;
    header
        .write_to(&mut wtr)
        .and_then(|_| wtr.write_record(["start index", "end index"]))
        .context(CsvSnafu { path })?;
    for (start, end) in intervals_from_flags(flags) {
        wtr.write_record([start.to_string(), end.to_string()])
            .context(CsvSnafu { path })?;
    }
    wtr.flush().map_err(|source| FileError::Io {
        action: "flush",
        path: path.to_path_buf(),
        source,
    })
}

/// Writes one row per time step, with the flag (as T or F) and the extra columns.
pub fn write_details<P: AsRef<Path>>(
    path: P,
    header: &FileHeader,
    flag_column: &str,
    extra_columns: &[&str],
    rows: &[(bool, Vec<Option<f64>>)],
) -> Result<(), FileError> {
    let path = path.as_ref();
    let mut wtr = create_writer(path)?;
    let mut columns = vec!["time index", flag_column];
    columns.extend_from_slice(extra_columns);
    header
        .write_to(&mut wtr)
        .and_then(|_| wtr.write_record(&columns))
        .context(CsvSnafu { path })?;
    for (idx, (flag, extras)) in rows.iter().enumerate() {
        let mut record = vec![idx.to_string(), if *flag { "T" } else { "F" }.to_string()];
        record.extend(
            extras
                .iter()
                .map(|v| v.map(|v| format!("{v:.2}")).unwrap_or_default()),
        );
        wtr.write_record(&record).context(CsvSnafu { path })?;
    }
    wtr.flush().map_err(|source| FileError::Io {
        action: "flush",
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the intervals of an interval file.
pub fn load_intervals<P: AsRef<Path>>(
    path: P,
) -> Result<(FileHeader, Vec<(usize, usize)>), FileError> {
    let rdr = HeadedReader::open(path, false)?;
    let (header, _, rows) = rdr.numeric_rows()?;
    Ok((
        header,
        rows.iter()
            .map(|row| (row[0] as usize, row[1] as usize))
            .collect(),
    ))
}
