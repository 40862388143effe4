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

use crate::io::ConfigError;
use snafu::prelude::*;
use std::path::PathBuf;

/// The records of the files produced by the stages, and the keys used to look them up
pub mod artifact;
pub use artifact::{Artifact, ArtifactKey, ArtifactKind, KeyFilter};

pub mod registry;
pub use registry::ArtifactRegistry;

/// Time step and grid resolution estimation from the fleet geometry
pub mod estimator;
pub use estimator::ParameterEstimator;

pub mod grid;
pub use grid::Grid;

mod settings;
pub use settings::{CoverageMode, Settings};

pub mod stages;

pub mod workitems;

mod mission;
pub use mission::Mission;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MissionError {
    #[snafu(display("could not prepare output directory {}: {source}", path.display()))]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("mission configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("invalid mission: {msg}"))]
    InvalidMission { msg: String },
}
