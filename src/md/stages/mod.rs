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

//! The stages which derive products from the state files: each reads the files of earlier stages, writes its own,
//! and returns the record of what it wrote.

use crate::io::FileError;
use snafu::prelude::*;
use std::path::PathBuf;

/// Grid, pointing options and pointing options with grid coverage
pub mod coverage;
pub use coverage::CoverageCalculator;

/// Observation geometry of the accesses
pub mod datametrics;
pub use datametrics::DataMetricsCalculator;

/// Ground station and inter-satellite contacts
pub mod contact;
pub use contact::ContactFinder;

pub mod eclipse;
pub use eclipse::EclipseFinder;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StageError {
    #[snafu(display("{source}"))]
    StageFile { source: FileError },
    #[snafu(display("{} and {} do not share the same time steps", first.display(), second.display()))]
    MismatchedSeries { first: PathBuf, second: PathBuf },
    #[snafu(display("{what} requires a grid but none was provided"))]
    MissingGrid { what: String },
    #[snafu(display("no Cartesian state file for spacecraft {spacecraft_id}"))]
    MissingStates { spacecraft_id: String },
}

impl From<FileError> for StageError {
    fn from(source: FileError) -> Self {
        Self::StageFile { source }
    }
}

/// Keeps the middle index of each run of consecutive indices of the sorted input.
pub(crate) fn middle_of_runs(indices: &[usize]) -> Vec<usize> {
    let mut middles = Vec::new();
    let mut run_start = 0;
    for pos in 1..=indices.len() {
        if pos == indices.len() || indices[pos] != indices[pos - 1] + 1 {
            if pos > run_start {
                middles.push(indices[(run_start + pos - 1) / 2]);
            }
            run_start = pos;
        }
    }
    middles
}
