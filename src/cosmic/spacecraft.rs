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

use super::Orbit;
use crate::linalg::{Matrix3, Vector3};
use crate::utils::{r1, r2};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// The angular shape of a sensor footprint, defined around its boresight (the +Z axis of the sensor frame).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "UPPERCASE")]
pub enum SphericalGeometry {
    /// A cone of the provided full angle.
    Circular { diameter_deg: f64 },
    /// A pyramid: `angle_height_deg` is measured along-track, `angle_width_deg` cross-track.
    Rectangular {
        angle_height_deg: f64,
        angle_width_deg: f64,
    },
}

impl SphericalGeometry {
    /// Angular extent of the footprint along the direction of motion, in degrees.
    pub fn along_track_extent_deg(&self) -> f64 {
        match *self {
            Self::Circular { diameter_deg } => diameter_deg,
            Self::Rectangular {
                angle_height_deg, ..
            } => angle_height_deg,
        }
    }

    /// Smallest angular extent of the footprint, in degrees.
    pub fn min_extent_deg(&self) -> f64 {
        match *self {
            Self::Circular { diameter_deg } => diameter_deg,
            Self::Rectangular {
                angle_height_deg,
                angle_width_deg,
            } => angle_height_deg.min(angle_width_deg),
        }
    }

    /// Returns whether the provided direction, expressed in the sensor frame, lies within this geometry.
    pub fn contains(&self, direction: &Vector3<f64>) -> bool {
        if direction[2] <= 0.0 {
            return false;
        }
        match *self {
            Self::Circular { diameter_deg } => {
                let off_axis = (direction[2] / direction.norm()).clamp(-1.0, 1.0).acos();
                off_axis <= 0.5 * diameter_deg.to_radians()
            }
            Self::Rectangular {
                angle_height_deg,
                angle_width_deg,
            } => {
                let along = direction[0].atan2(direction[2]).abs();
                let cross = direction[1].atan2(direction[2]).abs();
                along <= 0.5 * angle_height_deg.to_radians()
                    && cross <= 0.5 * angle_width_deg.to_radians()
            }
        }
    }
}

impl fmt::Display for SphericalGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Circular { diameter_deg } => write!(f, "circular ({diameter_deg} deg)"),
            Self::Rectangular {
                angle_height_deg,
                angle_width_deg,
            } => write!(
                f,
                "rectangular ({angle_height_deg} deg along-track, {angle_width_deg} deg cross-track)"
            ),
        }
    }
}

/// A pointing option is a fixed orientation of the sensor with respect to the nadir-pointing frame,
/// obtained by a roll about the along-track axis followed by a pitch about the new cross-track axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointingOption {
    #[serde(default)]
    pub roll_deg: f64,
    #[serde(default)]
    pub pitch_deg: f64,
}

impl PointingOption {
    pub fn new(roll_deg: f64, pitch_deg: f64) -> Self {
        Self {
            roll_deg,
            pitch_deg,
        }
    }

    /// Rotation from the nadir-pointing frame to the sensor frame.
    pub fn dcm_from_nadir(&self) -> Matrix3<f64> {
        r2(self.pitch_deg.to_radians()) * r1(self.roll_deg.to_radians())
    }

    /// Boresight of the sensor expressed in the nadir-pointing frame.
    pub fn boresight(&self) -> Vector3<f64> {
        self.dcm_from_nadir().transpose() * Vector3::z()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMode {
    pub id: String,
    /// Orientations available to the pointing-options coverage strategies
    #[serde(default = "nadir_only")]
    pub pointing_options: Vec<PointingOption>,
}

impl Default for InstrumentMode {
    fn default() -> Self {
        Self {
            id: "0".to_string(),
            pointing_options: nadir_only(),
        }
    }
}

fn nadir_only() -> Vec<PointingOption> {
    vec![PointingOption::default()]
}

fn default_modes() -> Vec<InstrumentMode> {
    vec![InstrumentMode::default()]
}

/// A sensor carried by a spacecraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Instrument {
    #[builder(setter(into))]
    pub id: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Instantaneous (scene) field of view
    pub field_of_view: SphericalGeometry,
    /// Region into which the sensor can be maneuvered, defaults to the field of view
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_regard: Option<SphericalGeometry>,
    #[builder(default = default_modes())]
    #[serde(default = "default_modes")]
    pub modes: Vec<InstrumentMode>,
}

impl Instrument {
    pub fn field_of_regard(&self) -> SphericalGeometry {
        self.field_of_regard.unwrap_or(self.field_of_view)
    }

    pub fn scene_field_of_view(&self) -> SphericalGeometry {
        self.field_of_view
    }
}

/// A spacecraft of the fleet: its initial orbit and its payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spacecraft {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "crate::io::orbit::either_orbit")]
    pub orbit: Orbit,
    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

impl Spacecraft {
    pub fn new<S: Into<String>>(id: S, orbit: Orbit) -> Self {
        Self {
            id: id.into(),
            name: None,
            orbit,
            instruments: Vec::new(),
        }
    }

    /// Returns a copy of this spacecraft with the provided instrument added.
    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    pub fn has_instruments(&self) -> bool {
        !self.instruments.is_empty()
    }

    /// Position of this instrument in the payload, used to name output files.
    pub fn instrument_index(&self, instrument_id: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.id == instrument_id)
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "spacecraft `{}` with {} instrument(s)\t{}",
            self.id,
            self.instruments.len(),
            self.orbit
        )
    }
}

#[cfg(test)]
mod ut_spacecraft {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn circular_contains() {
        let cone = SphericalGeometry::Circular { diameter_deg: 30.0 };
        let inside = Vector3::new(14.0_f64.to_radians().tan(), 0.0, 1.0);
        let outside = Vector3::new(0.0, 16.0_f64.to_radians().tan(), 1.0);
        assert!(cone.contains(&inside));
        assert!(!cone.contains(&outside));
        assert!(!cone.contains(&Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn rectangular_contains() {
        let rect = SphericalGeometry::Rectangular {
            angle_height_deg: 10.0,
            angle_width_deg: 40.0,
        };
        assert_eq!(rect.along_track_extent_deg(), 10.0);
        assert_eq!(rect.min_extent_deg(), 10.0);
        // 15 deg cross-track is within the 20 deg half width, but not along-track.
        let cross = Vector3::new(0.0, 15.0_f64.to_radians().tan(), 1.0);
        let along = Vector3::new(15.0_f64.to_radians().tan(), 0.0, 1.0);
        assert!(rect.contains(&cross));
        assert!(!rect.contains(&along));
    }

    #[test]
    fn pointing_boresight() {
        assert_abs_diff_eq!(
            PointingOption::default().boresight(),
            Vector3::z(),
            epsilon = 1e-15
        );
        // Rolling tilts the boresight cross-track only.
        let rolled = PointingOption::new(20.0, 0.0).boresight();
        assert_abs_diff_eq!(rolled[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            rolled.angle(&Vector3::z()).to_degrees(),
            20.0,
            epsilon = 1e-12
        );
        // And the boresight is the sensor's +Z axis.
        let opt = PointingOption::new(-12.0, 7.0);
        assert_abs_diff_eq!(
            opt.dcm_from_nadir() * opt.boresight(),
            Vector3::z(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn instrument_defaults() {
        let instrument = Instrument::builder()
            .id("camera")
            .field_of_view(SphericalGeometry::Circular { diameter_deg: 5.0 })
            .build();
        assert_eq!(instrument.modes.len(), 1);
        assert_eq!(instrument.modes[0].pointing_options.len(), 1);
        assert_eq!(
            instrument.field_of_regard(),
            SphericalGeometry::Circular { diameter_deg: 5.0 }
        );
    }
}
