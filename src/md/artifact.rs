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

use super::CoverageMode;
use crate::io::interval_file::OutType;
use crate::io::{epoch_from_str, epoch_to_str};
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The kind of an artifact, one per stage of the pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    GridWrite,
    Propagation,
    Coverage,
    DataMetrics,
    GroundContact,
    InterSatelliteContact,
    Eclipse,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::GridWrite => "grid",
            Self::Propagation => "propagation",
            Self::Coverage => "coverage",
            Self::DataMetrics => "data metrics",
            Self::GroundContact => "ground contact",
            Self::InterSatelliteContact => "inter-satellite contact",
            Self::Eclipse => "eclipse",
        };
        write!(f, "{name}")
    }
}

/// Composite identity of an artifact. Each kind of artifact sets the subset of fields which identifies it.
///
/// The same structure is used as a filter in the registry queries, where unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacecraft_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_mode: Option<CoverageMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacecraft_pair: Option<(String, String)>,
}

/// A partial key: unset fields match any value.
pub type KeyFilter = ArtifactKey;

impl ArtifactKey {
    pub fn spacecraft<S: Into<String>>(spacecraft_id: S) -> Self {
        Self {
            spacecraft_id: Some(spacecraft_id.into()),
            ..Default::default()
        }
    }

    pub fn grid<S: Into<String>>(grid_id: S) -> Self {
        Self {
            grid_id: Some(grid_id.into()),
            ..Default::default()
        }
    }

    pub fn pair<S: Into<String>>(first_id: S, second_id: S) -> Self {
        Self {
            spacecraft_pair: Some((first_id.into(), second_id.into())),
            ..Default::default()
        }
    }

    pub fn with_instrument<S: Into<String>>(mut self, instrument_id: S) -> Self {
        self.instrument_id = Some(instrument_id.into());
        self
    }

    pub fn with_mode<S: Into<String>>(mut self, mode_id: S) -> Self {
        self.mode_id = Some(mode_id.into());
        self
    }

    pub fn with_grid(mut self, grid_id: Option<String>) -> Self {
        self.grid_id = grid_id;
        self
    }

    pub fn with_coverage_mode(mut self, coverage_mode: CoverageMode) -> Self {
        self.coverage_mode = Some(coverage_mode);
        self
    }

    pub fn with_ground_station<S: Into<String>>(mut self, ground_station_id: S) -> Self {
        self.ground_station_id = Some(ground_station_id.into());
        self
    }

    /// Returns whether every field set in the filter has the same value in this key.
    pub fn matches(&self, filter: &KeyFilter) -> bool {
        fn field<T: PartialEq>(value: &Option<T>, wanted: &Option<T>) -> bool {
            wanted.is_none() || value == wanted
        }
        field(&self.spacecraft_id, &filter.spacecraft_id)
            && field(&self.instrument_id, &filter.instrument_id)
            && field(&self.mode_id, &filter.mode_id)
            && field(&self.grid_id, &filter.grid_id)
            && field(&self.coverage_mode, &filter.coverage_mode)
            && field(&self.ground_station_id, &filter.ground_station_id)
            && field(&self.spacecraft_pair, &filter.spacecraft_pair)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(sc) = &self.spacecraft_id {
            parts.push(format!("spacecraft {sc}"));
        }
        if let Some(instrument) = &self.instrument_id {
            parts.push(format!("instrument {instrument}"));
        }
        if let Some(mode) = &self.mode_id {
            parts.push(format!("mode {mode}"));
        }
        if let Some(grid) = &self.grid_id {
            parts.push(format!("grid {grid}"));
        }
        if let Some(coverage) = &self.coverage_mode {
            parts.push(coverage.title().to_lowercase());
        }
        if let Some(station) = &self.ground_station_id {
            parts.push(format!("station {station}"));
        }
        if let Some((first, second)) = &self.spacecraft_pair {
            parts.push(format!("link {first} <-> {second}"));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// An auto grid written to disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridArtifact {
    pub grid_id: String,
    pub grid_file: PathBuf,
    pub resolution_deg: f64,
    pub num_points: usize,
}

/// The state files of one spacecraft
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagationArtifact {
    pub propagator: String,
    pub spacecraft_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_cart_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_kep_file: Option<PathBuf>,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
    pub step_size_s: f64,
    /// Number of rows of each state file
    pub num_states: usize,
}

/// The access file of one (spacecraft, instrument, mode, grid) combination
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageArtifact {
    pub coverage_mode: CoverageMode,
    pub spacecraft_id: String,
    pub instrument_id: String,
    pub mode_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<String>,
    pub state_cart_file: PathBuf,
    pub access_file: PathBuf,
    pub mid_access_only: bool,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
}

/// The observation geometry of each access of a coverage artifact
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataMetricsArtifact {
    pub coverage_mode: CoverageMode,
    pub spacecraft_id: String,
    pub instrument_id: String,
    pub mode_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<String>,
    pub access_file: PathBuf,
    pub data_metrics_file: PathBuf,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
}

/// Contact intervals between a spacecraft and a ground station
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundContactArtifact {
    pub spacecraft_id: String,
    pub ground_station_id: String,
    pub state_cart_file: PathBuf,
    pub contact_file: PathBuf,
    pub out_type: OutType,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
}

/// Contact intervals between two spacecraft
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterSatelliteContactArtifact {
    pub first_spacecraft_id: String,
    pub second_spacecraft_id: String,
    pub first_state_cart_file: PathBuf,
    pub second_state_cart_file: PathBuf,
    pub contact_file: PathBuf,
    pub opaque_atmos_height_km: f64,
    pub out_type: OutType,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
}

/// Eclipse intervals of a spacecraft
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EclipseArtifact {
    pub spacecraft_id: String,
    pub state_cart_file: PathBuf,
    pub eclipse_file: PathBuf,
    pub out_type: OutType,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    pub start_epoch: Epoch,
    pub duration_days: f64,
}

/// A record of a file produced by a stage, as stored in the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Artifact {
    GridWrite(GridArtifact),
    Propagation(PropagationArtifact),
    Coverage(CoverageArtifact),
    DataMetrics(DataMetricsArtifact),
    GroundContact(GroundContactArtifact),
    InterSatelliteContact(InterSatelliteContactArtifact),
    Eclipse(EclipseArtifact),
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::GridWrite(_) => ArtifactKind::GridWrite,
            Self::Propagation(_) => ArtifactKind::Propagation,
            Self::Coverage(_) => ArtifactKind::Coverage,
            Self::DataMetrics(_) => ArtifactKind::DataMetrics,
            Self::GroundContact(_) => ArtifactKind::GroundContact,
            Self::InterSatelliteContact(_) => ArtifactKind::InterSatelliteContact,
            Self::Eclipse(_) => ArtifactKind::Eclipse,
        }
    }

    pub fn key(&self) -> ArtifactKey {
        match self {
            Self::GridWrite(grid) => ArtifactKey::grid(grid.grid_id.clone()),
            Self::Propagation(prop) => ArtifactKey::spacecraft(prop.spacecraft_id.clone()),
            Self::Coverage(cov) => ArtifactKey::spacecraft(cov.spacecraft_id.clone())
                .with_instrument(cov.instrument_id.clone())
                .with_mode(cov.mode_id.clone())
                .with_grid(cov.grid_id.clone())
                .with_coverage_mode(cov.coverage_mode),
            Self::DataMetrics(dm) => ArtifactKey::spacecraft(dm.spacecraft_id.clone())
                .with_instrument(dm.instrument_id.clone())
                .with_mode(dm.mode_id.clone())
                .with_grid(dm.grid_id.clone())
                .with_coverage_mode(dm.coverage_mode),
            Self::GroundContact(gc) => ArtifactKey::spacecraft(gc.spacecraft_id.clone())
                .with_ground_station(gc.ground_station_id.clone()),
            Self::InterSatelliteContact(isl) => ArtifactKey::pair(
                isl.first_spacecraft_id.clone(),
                isl.second_spacecraft_id.clone(),
            ),
            Self::Eclipse(ecl) => ArtifactKey::spacecraft(ecl.spacecraft_id.clone()),
        }
    }

    /// Main output file of this artifact
    pub fn output_file(&self) -> Option<&PathBuf> {
        match self {
            Self::GridWrite(grid) => Some(&grid.grid_file),
            Self::Propagation(prop) => prop.state_cart_file.as_ref().or(prop.state_kep_file.as_ref()),
            Self::Coverage(cov) => Some(&cov.access_file),
            Self::DataMetrics(dm) => Some(&dm.data_metrics_file),
            Self::GroundContact(gc) => Some(&gc.contact_file),
            Self::InterSatelliteContact(isl) => Some(&isl.contact_file),
            Self::Eclipse(ecl) => Some(&ecl.eclipse_file),
        }
    }

    pub fn as_propagation(&self) -> Option<&PropagationArtifact> {
        match self {
            Self::Propagation(prop) => Some(prop),
            _ => None,
        }
    }

    pub fn as_coverage(&self) -> Option<&CoverageArtifact> {
        match self {
            Self::Coverage(cov) => Some(cov),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridArtifact> {
        match self {
            Self::GridWrite(grid) => Some(grid),
            _ => None,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.key())?;
        if let Some(path) = self.output_file() {
            write!(f, " in {}", path.display())?;
        }
        Ok(())
    }
}
