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

//! The fan-out of each stage, enumerated before the stage runs. Work items refer to the spacecraft, payload, grids
//! and ground stations of the mission by their position, which is also used to name the output files.

use super::artifact::ArtifactKey;
use super::grid::Grid;
use super::CoverageMode;
use crate::cosmic::{GroundStation, Spacecraft};
use std::fmt;

/// One (spacecraft, instrument, mode, grid) combination of the coverage and data metrics stages
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoverageWorkItem {
    pub coverage_mode: CoverageMode,
    pub sc_index: usize,
    pub instrument_index: usize,
    pub mode_index: usize,
    pub grid_index: Option<usize>,
}

impl CoverageWorkItem {
    pub fn key(&self, fleet: &[Spacecraft], grids: &[Grid]) -> ArtifactKey {
        let sc = &fleet[self.sc_index];
        let instrument = &sc.instruments[self.instrument_index];
        ArtifactKey::spacecraft(sc.id.clone())
            .with_instrument(instrument.id.clone())
            .with_mode(instrument.modes[self.mode_index].id.clone())
            .with_grid(self.grid_index.map(|g| grids[g].id().to_string()))
            .with_coverage_mode(self.coverage_mode)
    }

    /// File name within the directory of the spacecraft, e.g. `access_instru0_mode1_grid0.csv`
    pub fn file_name(&self, prefix: &str) -> String {
        match self.grid_index {
            Some(grid) => format!(
                "{prefix}_instru{}_mode{}_grid{grid}.csv",
                self.instrument_index, self.mode_index
            ),
            None => format!(
                "{prefix}_instru{}_mode{}.csv",
                self.instrument_index, self.mode_index
            ),
        }
    }
}

impl fmt::Display for CoverageWorkItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sat{} instrument #{} mode #{}",
            self.sc_index, self.instrument_index, self.mode_index
        )?;
        if let Some(grid) = self.grid_index {
            write!(f, " grid #{grid}")?;
        }
        Ok(())
    }
}

/// Enumerates the coverage work items of the fleet, in fleet, payload, mode and grid order.
///
/// Strategies which need a grid are skipped with a warning when the mission has no grid.
pub fn coverage_work_items(
    fleet: &[Spacecraft],
    grids: &[Grid],
    coverage_mode: CoverageMode,
) -> Vec<CoverageWorkItem> {
    let mut items = Vec::new();
    for (sc_index, sc) in fleet.iter().enumerate() {
        for (instrument_index, instrument) in sc.instruments.iter().enumerate() {
            for (mode_index, mode) in instrument.modes.iter().enumerate() {
                if !coverage_mode.uses_grid() {
                    items.push(CoverageWorkItem {
                        coverage_mode,
                        sc_index,
                        instrument_index,
                        mode_index,
                        grid_index: None,
                    });
                } else if grids.is_empty() {
                    warn!(
                        "{coverage_mode} of {} instrument {} mode {} skipped: no grid is defined",
                        sc.id, instrument.id, mode.id
                    );
                } else {
                    items.extend((0..grids.len()).map(|grid_index| CoverageWorkItem {
                        coverage_mode,
                        sc_index,
                        instrument_index,
                        mode_index,
                        grid_index: Some(grid_index),
                    }));
                }
            }
        }
    }
    items
}

/// A (spacecraft, ground station) pair
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GroundContactWorkItem {
    pub sc_index: usize,
    pub station_index: usize,
}

impl GroundContactWorkItem {
    pub fn key(&self, fleet: &[Spacecraft], stations: &[GroundStation]) -> ArtifactKey {
        ArtifactKey::spacecraft(fleet[self.sc_index].id.clone())
            .with_ground_station(stations[self.station_index].id.clone())
    }
}

pub fn ground_contact_work_items(num_sc: usize, num_stations: usize) -> Vec<GroundContactWorkItem> {
    (0..num_sc)
        .flat_map(|sc_index| {
            (0..num_stations).map(move |station_index| GroundContactWorkItem {
                sc_index,
                station_index,
            })
        })
        .collect()
}

/// An unordered pair of spacecraft, `first_index < second_index`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterSatelliteWorkItem {
    pub first_index: usize,
    pub second_index: usize,
}

impl InterSatelliteWorkItem {
    pub fn key(&self, fleet: &[Spacecraft]) -> ArtifactKey {
        ArtifactKey::pair(
            fleet[self.first_index].id.clone(),
            fleet[self.second_index].id.clone(),
        )
    }
}

pub fn inter_satellite_work_items(num_sc: usize) -> Vec<InterSatelliteWorkItem> {
    (0..num_sc)
        .flat_map(|first_index| {
            (first_index + 1..num_sc).map(move |second_index| InterSatelliteWorkItem {
                first_index,
                second_index,
            })
        })
        .collect()
}

#[cfg(test)]
mod ut_workitems {
    use super::*;
    use crate::cosmic::{Instrument, InstrumentMode, Orbit, SphericalGeometry};
    use crate::time::Epoch;

    fn fleet() -> Vec<Spacecraft> {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 2, 25);
        let orbit = Orbit::circular_altitude(600.0, 50.0, 0.0, 0.0, epoch).unwrap();
        let instrument = Instrument::builder()
            .id("cam")
            .field_of_view(SphericalGeometry::Circular { diameter_deg: 20.0 })
            .modes(vec![
                InstrumentMode::default(),
                InstrumentMode {
                    id: "side".to_string(),
                    pointing_options: vec![],
                },
            ])
            .build();
        vec![
            Spacecraft::new("bare", orbit),
            Spacecraft::new("imager", orbit).with_instrument(instrument),
        ]
    }

    #[test]
    fn coverage_fan_out() {
        let fleet = fleet();
        let grids = vec![Grid::global("g0", Some(5.0)), Grid::global("g1", Some(10.0))];

        let items = coverage_work_items(&fleet, &grids, CoverageMode::Grid);
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| item.sc_index == 1));
        assert_eq!(items[3].file_name("access"), "access_instru0_mode1_grid1.csv");
        assert_eq!(
            items[1].key(&fleet, &grids),
            ArtifactKey::spacecraft("imager")
                .with_instrument("cam")
                .with_mode("0")
                .with_grid(Some("g1".to_string()))
                .with_coverage_mode(CoverageMode::Grid)
        );

        let items = coverage_work_items(&fleet, &grids, CoverageMode::PointingOptions);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file_name("datametrics"), "datametrics_instru0_mode0.csv");

        // No grid, nothing to do for the grid strategies
        assert!(coverage_work_items(&fleet, &[], CoverageMode::PointingOptionsWithGrid).is_empty());
    }

    #[test]
    fn pairs() {
        let items = inter_satellite_work_items(4);
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|p| p.first_index < p.second_index));
        assert!(inter_satellite_work_items(1).is_empty());
        assert_eq!(ground_contact_work_items(3, 2).len(), 6);
        assert!(ground_contact_work_items(3, 0).is_empty());
    }
}
