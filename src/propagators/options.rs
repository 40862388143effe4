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

use std::fmt;
use std::sync::Arc;

use super::{J2AnalyticalStepper, Stepper};
use serde_derive::{Deserialize, Serialize};

/// The propagator of a mission, as found in its configuration.
///
/// The step size is computed from the geometry of the fleet when unset.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropagatorConfig {
    #[serde(rename = "J2 ANALYTICAL PROPAGATOR")]
    J2Analytical {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_size_s: Option<f64>,
    },
    #[serde(rename = "TWO BODY PROPAGATOR")]
    TwoBody {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_size_s: Option<f64>,
    },
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self::J2Analytical { step_size_s: None }
    }
}

impl PropagatorConfig {
    /// Name of the propagator, as written in the configuration files and the propagation artifacts
    pub fn name(&self) -> &'static str {
        match self {
            Self::J2Analytical { .. } => "J2 ANALYTICAL PROPAGATOR",
            Self::TwoBody { .. } => "TWO BODY PROPAGATOR",
        }
    }

    /// Step size requested by the user, if any
    pub fn step_size_s(&self) -> Option<f64> {
        match *self {
            Self::J2Analytical { step_size_s } | Self::TwoBody { step_size_s } => step_size_s,
        }
    }

    pub fn with_step_size_s(self, step: f64) -> Self {
        match self {
            Self::J2Analytical { .. } => Self::J2Analytical {
                step_size_s: Some(step),
            },
            Self::TwoBody { .. } => Self::TwoBody {
                step_size_s: Some(step),
            },
        }
    }

    /// Builds the stepper of this propagator
    pub fn stepper(&self) -> Arc<dyn Stepper> {
        match self {
            Self::J2Analytical { .. } => Arc::new(J2AnalyticalStepper::default()),
            Self::TwoBody { .. } => Arc::new(J2AnalyticalStepper::two_body()),
        }
    }
}

impl fmt::Display for PropagatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.step_size_s() {
            Some(step) => write!(f, "{} with a step of {step} s", self.name()),
            None => write!(f, "{} with an automatic step", self.name()),
        }
    }
}

#[cfg(test)]
mod ut_prop_config {
    use super::*;

    #[test]
    fn tagged_yaml() {
        let cfg: PropagatorConfig =
            serde_yaml::from_str("type: J2 ANALYTICAL PROPAGATOR\nstep_size_s: 30.0").unwrap();
        assert_eq!(cfg.step_size_s(), Some(30.0));
        assert_eq!(cfg.name(), "J2 ANALYTICAL PROPAGATOR");

        let auto: PropagatorConfig = serde_yaml::from_str("type: TWO BODY PROPAGATOR").unwrap();
        assert_eq!(auto, PropagatorConfig::TwoBody { step_size_s: None });
        assert_eq!(auto.with_step_size_s(10.0).step_size_s(), Some(10.0));

        assert!(serde_yaml::from_str::<PropagatorConfig>("type: SGP4 PROPAGATOR").is_err());
    }
}
