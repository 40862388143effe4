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

use snafu::prelude::*;
use std::fmt;

// Re-Export
mod j2;
pub use j2::*;
mod options;
pub use options::*;
mod stage;
pub use stage::*;

use crate::cosmic::{Orbit, OrbitError};
use crate::io::FileError;
use crate::time::Epoch;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display("stepper failed to reach {epoch}: {source}"))]
    StepperFailure { epoch: Epoch, source: OrbitError },
    #[snafu(display("when writing the state files: {source}"))]
    StateFile { source: FileError },
    #[snafu(display("invalid propagation setup: {msg}"))]
    InvalidSetup { msg: String },
}

/// A stepper moves an orbit to any epoch, before or after the epoch of that orbit.
///
/// The pipeline only relies on this contract: implementations must be deterministic and may be called from several
/// threads at once.
pub trait Stepper: Send + Sync + fmt::Display {
    /// Returns the state at the requested epoch.
    fn propagate(&self, state: &Orbit, epoch: Epoch) -> Result<Orbit, PropagationError>;
}
