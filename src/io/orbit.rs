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

use crate::cosmic::{Orbit, OrbitError};
use crate::io::{epoch_from_str, epoch_to_str};
use either::Either;
use hifitime::Epoch;
use serde_derive::{Deserialize, Serialize};

/// An orbit as found in a configuration file: either Cartesian or Keplerian.
#[derive(Copy, Clone, Serialize, Deserialize, Debug)]
#[serde(transparent)]
pub struct OrbitSerde {
    #[serde(with = "either::serde_untagged")]
    inner: Either<Orbit, KeplerianOrbit>,
}

#[derive(Copy, Clone, Serialize, Deserialize, Debug)]
pub struct KeplerianOrbit {
    sma_km: f64,
    ecc: f64,
    inc_deg: f64,
    raan_deg: f64,
    aop_deg: f64,
    ta_deg: f64,
    #[serde(serialize_with = "epoch_to_str", deserialize_with = "epoch_from_str")]
    epoch: Epoch,
}

impl TryFrom<KeplerianOrbit> for Orbit {
    type Error = OrbitError;

    fn try_from(kep: KeplerianOrbit) -> Result<Self, Self::Error> {
        Orbit::keplerian(
            kep.sma_km,
            kep.ecc,
            kep.inc_deg,
            kep.raan_deg,
            kep.aop_deg,
            kep.ta_deg,
            kep.epoch,
        )
    }
}

impl From<Orbit> for OrbitSerde {
    fn from(orbit: Orbit) -> Self {
        OrbitSerde {
            inner: Either::Left(orbit),
        }
    }
}

impl TryFrom<OrbitSerde> for Orbit {
    type Error = OrbitError;

    fn try_from(value: OrbitSerde) -> Result<Self, Self::Error> {
        match value.inner {
            Either::Left(orbit) => Ok(orbit),
            Either::Right(kep) => kep.try_into(),
        }
    }
}

/// Serde adapter for fields of type [`Orbit`] which accept both representations on input and write the Cartesian one.
pub(crate) mod either_orbit {
    use super::OrbitSerde;
    use crate::cosmic::Orbit;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(orbit: &Orbit, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        OrbitSerde::from(*orbit).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Orbit, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = OrbitSerde::deserialize(deserializer)?;
        Orbit::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod ut_orbit_serde {
    use crate::cosmic::Spacecraft;
    use approx::assert_abs_diff_eq;

    #[test]
    fn keplerian_and_cartesian_inputs() {
        let kep = r#"
id: sat-kep
orbit:
  sma_km: 7078.137
  ecc: 0.001
  inc_deg: 98.0
  raan_deg: 35.0
  aop_deg: 145.0
  ta_deg: -25.0
  epoch: 2021-02-25T00:00:00 UTC
"#;
        let sc: Spacecraft = serde_yaml::from_str(kep).unwrap();
        assert_eq!(sc.id, "sat-kep");
        assert_abs_diff_eq!(sc.orbit.sma_km(), 7078.137, epsilon = 1e-6);
        assert!(sc.instruments.is_empty());

        // Once written out, the orbit is Cartesian and reads back identically.
        let dumped = serde_yaml::to_string(&sc).unwrap();
        assert!(dumped.contains("x_km"));
        let reloaded: Spacecraft = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(reloaded, sc);
    }

    #[test]
    fn hyperbolic_is_rejected() {
        let kep = r#"
id: escaping
orbit:
  sma_km: -7078.137
  ecc: 1.5
  inc_deg: 0.0
  raan_deg: 0.0
  aop_deg: 0.0
  ta_deg: 0.0
  epoch: 2021-02-25T00:00:00 UTC
"#;
        assert!(serde_yaml::from_str::<Spacecraft>(kep).is_err());
    }
}
