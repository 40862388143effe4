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

mod orbit;
pub use self::orbit::*;

mod spacecraft;
pub use self::spacecraft::*;

mod ground_station;
pub use self::ground_station::*;

mod constellation;
pub use self::constellation::*;

/// Earth rotation, geodetic conversions and the Sun's position.
pub mod rotations;
pub use self::rotations::*;

/// Line of sight and eclipse computations.
pub mod eclipse;
pub use self::eclipse::*;

/// Mean equatorial radius of the Earth in km (WGS-84)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Gravitational parameter of the Earth in km^3/s^2
pub const EARTH_GM_KM3_S2: f64 = 398_600.441_8;

/// Second zonal harmonic of the Earth gravity field (unnormalized)
pub const EARTH_J2: f64 = 1.082_626_68e-3;

/// One astronomical unit in km
pub const AU_KM: f64 = 149_597_870.7;

/// Seconds in a day, used to convert between step sizes and Julian days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OrbitError {
    #[snafu(display("only elliptical orbits are supported, got eccentricity {ecc}"))]
    NotElliptical { ecc: f64 },
    #[snafu(display("semi-major axis must be positive, got {sma_km} km"))]
    InvalidSma { sma_km: f64 },
    #[snafu(display("orbit radius of {rmag_km:.3} km is below the surface of the Earth"))]
    SubSurface { rmag_km: f64 },
}
