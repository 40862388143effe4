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

/*! # orbitflow

Mission analysis pipeline for satellite constellations: given a fleet of spacecraft, orbitflow propagates
their orbits and derives coverage, data metrics, ground and inter-satellite contact windows, and eclipse intervals.

Every stage writes plain CSV files and registers an artifact describing them, so that later stages (and
reruns) can locate their inputs. The full state of a mission, including the artifacts it produced, can be
saved to and restored from YAML.
*/

/// Provides the orbital state stepper and the propagation stage which writes state files.
pub mod propagators;

/// Orbits, spacecraft, instruments, ground stations and the geometry shared by all stages.
pub mod cosmic;

/// Utility functions shared by different modules.
pub mod utils;

/// All the input/output needs for this library: configuration files and every CSV format written by the stages.
pub mod io;

/// Mission design: the orchestrator, its artifact registry, parameter estimation and the analysis stages.
pub mod md;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{GroundStation, Instrument, Orbit, Spacecraft};
pub use self::md::{Mission, Settings};
