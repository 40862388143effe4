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

use super::{epoch_from_str, epoch_to_str, ConfigRepr};
use crate::cosmic::{GroundStation, Spacecraft, WalkerDelta};
use crate::md::artifact::Artifact;
use crate::md::grid::Grid;
use crate::md::Settings;
use crate::propagators::PropagatorConfig;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};

pub(crate) fn default_epoch() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2021, 2, 25)
}

pub(crate) fn default_duration_days() -> f64 {
    1.0
}

/// The serializable description of a mission: its fleet, its grids and ground stations, and its settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionSpec {
    /// Start of the mission
    #[serde(
        default = "default_epoch",
        serialize_with = "epoch_to_str",
        deserialize_with = "epoch_from_str"
    )]
    pub epoch: Epoch,
    #[serde(default = "default_duration_days")]
    pub duration_days: f64,
    #[serde(default)]
    pub spacecraft: Vec<Spacecraft>,
    /// Expanded into spacecraft when the mission is built
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constellations: Vec<WalkerDelta>,
    #[serde(default)]
    pub propagator: PropagatorConfig,
    #[serde(default)]
    pub grids: Vec<Grid>,
    #[serde(default)]
    pub ground_stations: Vec<GroundStation>,
    #[serde(default)]
    pub settings: Settings,
}

impl ConfigRepr for MissionSpec {}

impl Default for MissionSpec {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            duration_days: default_duration_days(),
            spacecraft: Vec::new(),
            constellations: Vec::new(),
            propagator: PropagatorConfig::default(),
            grids: Vec::new(),
            ground_stations: Vec::new(),
            settings: Settings::default(),
        }
    }
}

/// The state of a mission after an execution: its specification and the records of every file produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub mission: MissionSpec,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl ConfigRepr for MissionSnapshot {}

#[cfg(test)]
mod ut_mission_spec {
    use super::*;
    use crate::md::CoverageMode;

    const MISSION: &str = r#"
epoch: 2021-02-25T00:00:00 UTC
duration_days: 0.5
spacecraft:
  - id: sat0
    orbit:
      sma_km: 6878.137
      ecc: 0.001
      inc_deg: 45.0
      raan_deg: 35.0
      aop_deg: 145.0
      ta_deg: -25.0
      epoch: 2021-02-25T00:00:00 UTC
    instruments:
      - id: bs1
        field_of_view:
          shape: CIRCULAR
          diameter_deg: 30.0
        modes:
          - id: nadir
            pointing_options:
              - roll_deg: 0.0
              - roll_deg: 15.0
propagator:
  type: J2 ANALYTICAL PROPAGATOR
  step_size_s: 30.0
grids:
  - type: autogrid
    id: g0
    lat_lower_deg: -50.0
    lat_upper_deg: 50.0
    grid_res_deg: 5.0
ground_stations:
  - id: atl
    latitude_deg: 33.75
    longitude_deg: -84.39
settings:
  out_dir: output_data
  coverage_mode: GRID COVERAGE
"#;

    #[test]
    fn load_and_dump() {
        let spec = MissionSpec::loads(MISSION).unwrap();
        assert_eq!(spec.duration_days, 0.5);
        assert_eq!(spec.spacecraft.len(), 1);
        assert_eq!(spec.spacecraft[0].instruments[0].modes[0].pointing_options.len(), 2);
        assert_eq!(spec.propagator.step_size_s(), Some(30.0));
        assert_eq!(spec.grids[0].id(), "g0");
        assert_eq!(spec.ground_stations[0].elevation_mask_deg, 7.0);
        assert_eq!(spec.settings.coverage_mode, Some(CoverageMode::Grid));

        let reloaded = MissionSpec::loads(&spec.dumps().unwrap()).unwrap();
        assert_eq!(reloaded.grids, spec.grids);
        assert_eq!(reloaded.settings, spec.settings);
        assert_eq!(reloaded.propagator, spec.propagator);
        assert_eq!(reloaded.epoch, spec.epoch);
        assert_eq!(reloaded.spacecraft[0].id, "sat0");
    }

    #[test]
    fn defaults() {
        let spec = MissionSpec::loads("spacecraft: []").unwrap();
        assert_eq!(spec, MissionSpec::default());
        assert_eq!(spec.epoch.to_jde_utc_days(), 2_459_270.5);
    }

    #[test]
    fn parse_errors() {
        for bad in [
            "propagator:\n  type: SGP4 PROPAGATOR",
            "settings:\n  coverage_mode: SWATH",
            "grids:\n  - type: helical\n    id: g0",
            "grids:\n  - type: customgrid\n    id: g0",
        ] {
            assert!(MissionSpec::loads(bad).is_err(), "{bad}");
        }
    }
}
