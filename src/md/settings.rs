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

use crate::io::interval_file::OutType;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use typed_builder::TypedBuilder;

/// The coverage strategies. The serialized names are also the first line of the access files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageMode {
    /// Grid points within the field of regard
    #[serde(rename = "GRID COVERAGE")]
    Grid,
    /// Intersection of each pointing direction with the Earth
    #[serde(rename = "POINTING OPTIONS COVERAGE")]
    PointingOptions,
    /// Grid points within the scene field of view around each pointing direction
    #[serde(rename = "POINTING OPTIONS WITH GRID COVERAGE")]
    PointingOptionsWithGrid,
}

impl CoverageMode {
    pub const ALL: [Self; 3] = [
        Self::Grid,
        Self::PointingOptions,
        Self::PointingOptionsWithGrid,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Grid => "GRID COVERAGE",
            Self::PointingOptions => "POINTING OPTIONS COVERAGE",
            Self::PointingOptionsWithGrid => "POINTING OPTIONS WITH GRID COVERAGE",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.title() == title.trim())
    }

    /// Whether the work items of this mode fan out over the grids
    pub fn uses_grid(&self) -> bool {
        !matches!(self, Self::PointingOptions)
    }
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("output_data")
}

fn default_prop_time_res_factor() -> f64 {
    0.25
}

fn default_grid_res_factor() -> f64 {
    0.9
}

fn default_ratio_clamp_tolerance() -> f64 {
    1e-7
}

/// Mission-wide settings of the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Settings {
    /// Directory where every stage writes its files
    #[builder(default = default_out_dir(), setter(into))]
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Coverage strategy, no coverage nor data metrics are computed if unset
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_mode: Option<CoverageMode>,
    /// Fraction of the time to cross the smallest footprint used as the propagation step
    #[builder(default = default_prop_time_res_factor())]
    #[serde(default = "default_prop_time_res_factor")]
    pub prop_time_res_factor: f64,
    /// Fraction of the smallest scene footprint used as the auto grid resolution
    #[builder(default = default_grid_res_factor())]
    #[serde(default = "default_grid_res_factor")]
    pub grid_res_factor: f64,
    /// Height of the atmosphere which blocks inter-satellite links, in km
    #[builder(default)]
    #[serde(default)]
    pub opaque_atmos_height_km: f64,
    /// Only keep the middle time index of each contiguous access
    #[builder(default)]
    #[serde(default)]
    pub mid_access_only: bool,
    /// Tolerance below which the sine of the half extent is considered equal to the horizon ratio
    #[builder(default = default_ratio_clamp_tolerance())]
    #[serde(default = "default_ratio_clamp_tolerance")]
    pub ratio_clamp_tolerance: f64,
    /// Layout of the contact files
    #[builder(default)]
    #[serde(default)]
    pub contact_out_type: OutType,
    /// Layout of the eclipse files
    #[builder(default)]
    #[serde(default)]
    pub eclipse_out_type: OutType,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "output to {}, coverage: {}, time resolution factor {}, grid resolution factor {}",
            self.out_dir.display(),
            self.coverage_mode
                .map(|mode| mode.title())
                .unwrap_or("none"),
            self.prop_time_res_factor,
            self.grid_res_factor
        )
    }
}
