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

use super::{InvalidSetupSnafu, PropagationError, StateFileSnafu, Stepper};
use crate::cosmic::{Spacecraft, SECONDS_PER_DAY};
use crate::io::state_file::{StateFileKind, StateFileWriter};
use crate::md::artifact::PropagationArtifact;
use crate::time::{Epoch, Unit};
use snafu::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant as StdInstant;

/// Propagates a spacecraft over the mission duration at a fixed step and writes its state files.
#[derive(Clone)]
pub struct PropagationStage {
    /// Name written in the propagation artifacts
    pub name: String,
    stepper: Arc<dyn Stepper>,
}

impl PropagationStage {
    pub fn new<S: Into<String>>(name: S, stepper: Arc<dyn Stepper>) -> Self {
        Self {
            name: name.into(),
            stepper,
        }
    }

    /// Number of rows written for this duration and step: one per step, plus the initial state.
    pub fn num_states(duration_days: f64, step_size_s: f64) -> usize {
        (duration_days * SECONDS_PER_DAY / step_size_s).floor() as usize + 1
    }

    /// Moves the spacecraft state to the start epoch, then writes one row per step to each of the provided files.
    ///
    /// Each step is taken from the previous state to the absolute epoch `start_epoch + (i + 1) * step`, so the
    /// row of time index `i` is at `start_epoch + i * step`.
    pub fn execute(
        &self,
        spacecraft: &Spacecraft,
        start_epoch: Epoch,
        step_size_s: f64,
        duration_days: f64,
        cart_path: Option<&Path>,
        kep_path: Option<&Path>,
    ) -> Result<PropagationArtifact, PropagationError> {
        ensure!(
            step_size_s.is_finite() && step_size_s > 0.0,
            InvalidSetupSnafu {
                msg: format!("step size must be strictly positive, got {step_size_s} s"),
            }
        );
        ensure!(
            duration_days.is_finite() && duration_days >= 0.0,
            InvalidSetupSnafu {
                msg: format!("duration must be positive, got {duration_days} days"),
            }
        );

        let tick = StdInstant::now();
        let epoch_jd = start_epoch.to_jde_utc_days();
        let open = |path: Option<&Path>, kind: StateFileKind| {
            path.map(|path| {
                StateFileWriter::create(path, kind, epoch_jd, step_size_s, duration_days)
            })
            .transpose()
            .context(StateFileSnafu)
        };
        let mut cart_wtr = open(cart_path, StateFileKind::Cartesian)?;
        let mut kep_wtr = open(kep_path, StateFileKind::Keplerian)?;

        let num_states = Self::num_states(duration_days, step_size_s);
        debug!(
            "propagating {} with the {} for {num_states} steps of {step_size_s} s",
            spacecraft.id, self.stepper
        );

        let mut state = self.stepper.propagate(&spacecraft.orbit, start_epoch)?;
        for time_index in 0..num_states {
            if let Some(wtr) = cart_wtr.as_mut() {
                wtr.write_state(time_index, &state).context(StateFileSnafu)?;
            }
            if let Some(wtr) = kep_wtr.as_mut() {
                wtr.write_state(time_index, &state).context(StateFileSnafu)?;
            }
            if time_index + 1 < num_states {
                let next_epoch =
                    start_epoch + Unit::Second * (step_size_s * (time_index + 1) as f64);
                state = self.stepper.propagate(&state, next_epoch)?;
            }
        }

        let state_cart_file = cart_wtr
            .map(StateFileWriter::finish)
            .transpose()
            .context(StateFileSnafu)?;
        let state_kep_file = kep_wtr
            .map(StateFileWriter::finish)
            .transpose()
            .context(StateFileSnafu)?;

        debug!(
            "propagated {} in {} ms",
            spacecraft.id,
            tick.elapsed().as_millis()
        );

        Ok(PropagationArtifact {
            propagator: self.name.clone(),
            spacecraft_id: spacecraft.id.clone(),
            state_cart_file,
            state_kep_file,
            start_epoch,
            duration_days,
            step_size_s,
            num_states,
        })
    }
}

impl fmt::Display for PropagationStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.stepper)
    }
}

#[cfg(test)]
mod ut_stage {
    use super::*;
    use crate::cosmic::Orbit;
    use crate::io::state_file::StateSeries;
    use crate::propagators::J2AnalyticalStepper;

    #[test]
    fn row_count() {
        assert_eq!(PropagationStage::num_states(1.0, 60.0), 1441);
        assert_eq!(PropagationStage::num_states(0.0, 60.0), 1);
        assert_eq!(PropagationStage::num_states(0.01, 60.0), 15);
    }

    #[test]
    fn invalid_step() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 2, 25);
        let sc = Spacecraft::new(
            "sat",
            Orbit::circular_altitude(500.0, 45.0, 0.0, 0.0, epoch).unwrap(),
        );
        let stage = PropagationStage::new("J2", Arc::new(J2AnalyticalStepper::default()));
        assert!(matches!(
            stage.execute(&sc, epoch, 0.0, 1.0, None, None),
            Err(PropagationError::InvalidSetup { .. })
        ));
    }

    #[test]
    fn kep_only() {
        let dir = tempfile::tempdir().unwrap();
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 2, 25);
        let sc = Spacecraft::new(
            "sat",
            Orbit::circular_altitude(500.0, 45.0, 0.0, 0.0, epoch).unwrap(),
        );
        let stage = PropagationStage::new("J2", Arc::new(J2AnalyticalStepper::default()));
        let kep_path = dir.path().join("state_keplerian.csv");
        let artifact = stage
            .execute(&sc, epoch, 10.0, 0.01, None, Some(&kep_path))
            .unwrap();
        assert!(artifact.state_cart_file.is_none());
        assert_eq!(artifact.state_kep_file.as_deref(), Some(kep_path.as_path()));
        let series = StateSeries::load(&kep_path).unwrap();
        assert_eq!(series.len(), artifact.num_states);
        assert_eq!(series.len(), 87);
    }
}
