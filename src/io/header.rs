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

use super::{CsvSnafu, FileError, IoSnafu, MalformedSnafu};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Writer, WriterBuilder};
use snafu::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const EPOCH_PREFIX: &str = "Epoch [JDUT1] is ";
const STEP_PREFIX: &str = "Step size [s] is ";
const DURATION_PREFIX: &str = "Mission Duration [Days] is ";

/// The lines at the top of every file written by the stages: a title, the start epoch, the step size and,
/// for time series, the mission duration.
#[derive(Clone, Debug, PartialEq)]
pub struct FileHeader {
    pub title: String,
    /// Julian date of the row with time index zero
    pub epoch_jd: f64,
    pub step_s: f64,
    pub duration_days: Option<f64>,
}

impl FileHeader {
    /// Julian date of the provided time index
    pub fn jd_at(&self, time_index: usize) -> f64 {
        self.epoch_jd + (time_index as f64) * self.step_s / 86_400.0
    }

    /// Same header under another title, as used when a file is derived from another one.
    pub fn retitled<S: Into<String>>(&self, title: S) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Writes the header lines, each as a single-field record.
    pub fn write_to<W: Write>(&self, wtr: &mut Writer<W>) -> csv::Result<()> {
        wtr.write_record([&self.title])?;
        wtr.write_record([format!("{EPOCH_PREFIX}{}", self.epoch_jd)])?;
        wtr.write_record([format!("{STEP_PREFIX}{}", self.step_s)])?;
        if let Some(duration) = self.duration_days {
            wtr.write_record([format!("{DURATION_PREFIX}{duration}")])?;
        }
        Ok(())
    }
}

/// A CSV file made of a header, a row of column names, and data rows.
pub struct HeadedReader {
    pub path: PathBuf,
    pub header: FileHeader,
    pub columns: StringRecord,
    records: StringRecordsIntoIter<File>,
}

impl HeadedReader {
    /// Opens the file and parses its header. Set `with_duration` for time series files which include the mission duration.
    pub fn open<P: AsRef<Path>>(path: P, with_duration: bool) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .context(CsvSnafu { path: path.clone() })?;
        let mut records = rdr.into_records();

        let mut next_line = |what: &str| -> Result<StringRecord, FileError> {
            match records.next() {
                Some(rec) => rec.context(CsvSnafu { path: path.clone() }),
                None => MalformedSnafu {
                    path: path.clone(),
                    msg: format!("missing {what}"),
                }
                .fail(),
            }
        };

        let title = next_line("title")?.iter().collect::<Vec<_>>().join(",");
        let epoch_jd = parse_value(&next_line("epoch")?, EPOCH_PREFIX, &path)?;
        let step_s = parse_value(&next_line("step size")?, STEP_PREFIX, &path)?;
        let duration_days = if with_duration {
            Some(parse_value(&next_line("duration")?, DURATION_PREFIX, &path)?)
        } else {
            None
        };
        let columns = next_line("column names")?;

        Ok(Self {
            path,
            header: FileHeader {
                title,
                epoch_jd,
                step_s,
                duration_days,
            },
            columns,
            records,
        })
    }

    /// Index of the named column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Reads all the remaining rows as floating point values.
    pub fn numeric_rows(self) -> Result<(FileHeader, StringRecord, Vec<Vec<f64>>), FileError> {
        let path = self.path;
        let mut rows = Vec::new();
        for rec in self.records {
            let rec = rec.context(CsvSnafu { path: path.clone() })?;
            let row = rec
                .iter()
                .map(|field| {
                    field.trim().parse::<f64>().map_err(|e| FileError::Malformed {
                        path: path.clone(),
                        msg: format!("`{field}` is not a number: {e}"),
                    })
                })
                .collect::<Result<Vec<f64>, FileError>>()?;
            rows.push(row);
        }
        Ok((self.header, self.columns, rows))
    }
}

fn parse_value(record: &StringRecord, prefix: &str, path: &Path) -> Result<f64, FileError> {
    let line = record.get(0).unwrap_or_default();
    let value = line.strip_prefix(prefix).context(MalformedSnafu {
        path: path.to_path_buf(),
        msg: format!("expected a line starting with `{prefix}`, got `{line}`"),
    })?;
    value.trim().parse::<f64>().map_err(|e| FileError::Malformed {
        path: path.to_path_buf(),
        msg: format!("`{value}` is not a number: {e}"),
    })
}

/// Creates the file (and its parent directories) and returns a flexible CSV writer.
pub(crate) fn create_writer(path: &Path) -> Result<Writer<File>, FileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context(IoSnafu {
            action: "create directory",
            path: parent.to_path_buf(),
        })?;
    }
    WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .context(CsvSnafu {
            path: path.to_path_buf(),
        })
}

#[cfg(test)]
mod ut_header {
    use super::*;

    #[test]
    fn header_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.csv");
        let header = FileHeader {
            title: "GRID COVERAGE".to_string(),
            epoch_jd: 2_459_270.5,
            step_s: 60.0,
            duration_days: Some(0.5),
        };
        {
            let mut wtr = create_writer(&path).unwrap();
            header.write_to(&mut wtr).unwrap();
            wtr.write_record(["time index", "value"]).unwrap();
            wtr.write_record(["0", "1.5"]).unwrap();
            wtr.write_record(["1", "-2.5"]).unwrap();
            wtr.flush().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "GRID COVERAGE\nEpoch [JDUT1] is 2459270.5\nStep size [s] is 60\nMission Duration [Days] is 0.5\ntime index,value\n"
        ));

        let rdr = HeadedReader::open(&path, true).unwrap();
        assert_eq!(rdr.header, header);
        assert_eq!(rdr.column("value"), Some(1));
        let (_, _, rows) = rdr.numeric_rows().unwrap();
        assert_eq!(rows, vec![vec![0.0, 1.5], vec![1.0, -2.5]]);
        assert_eq!(header.jd_at(720), 2_459_271.0);
    }

    #[test]
    fn malformed_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "title\nEpoch is nothing\n").unwrap();
        assert!(matches!(
            HeadedReader::open(&path, false),
            Err(FileError::Malformed { .. })
        ));
    }
}
