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

use super::{Orbit, AU_KM, EARTH_EQUATORIAL_RADIUS_KM};
use crate::linalg::{Matrix3, Vector3};
use crate::utils::{between_0_360, between_pm_180};

/// Julian date of the J2000 reference epoch
const J2000_JD: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Greenwich mean sidereal time in degrees, between 0 and 360.
///
/// Source: Vallado, Fundamentals of Astrodynamics and Applications, 4th ed., eq. 3-47 (UT1 approximated by the provided Julian date).
pub fn gmst_deg(jd: f64) -> f64 {
    let t_ut1 = (jd - J2000_JD) / DAYS_PER_CENTURY;
    let gmst_s = 67_310.548_41
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t_ut1
        + 0.093_104 * t_ut1.powi(2)
        - 6.2e-6 * t_ut1.powi(3);
    // 240 seconds of time per degree
    between_0_360(gmst_s.rem_euclid(86_400.0) / 240.0)
}

/// Position in the inertial frame of a point given by its geocentric coordinates above a spherical Earth.
pub fn geodetic_to_eci(lat_deg: f64, lon_deg: f64, alt_km: f64, jd: f64) -> Vector3<f64> {
    let radius = EARTH_EQUATORIAL_RADIUS_KM + alt_km;
    let lat = lat_deg.to_radians();
    let ra = (lon_deg + gmst_deg(jd)).to_radians();
    radius * Vector3::new(lat.cos() * ra.cos(), lat.cos() * ra.sin(), lat.sin())
}

/// Geocentric latitude and longitude (in degrees, longitude in [-180; 180]) of an inertial position.
pub fn eci_to_lat_lon(position: &Vector3<f64>, jd: f64) -> (f64, f64) {
    let lat = (position[2] / position.norm()).clamp(-1.0, 1.0).asin().to_degrees();
    let ra = position[1].atan2(position[0]).to_degrees();
    (lat, between_pm_180(ra - gmst_deg(jd)))
}

/// Rotation from the inertial frame to the nadir-pointing frame of the provided orbit.
///
/// The nadir frame has its Z axis towards the center of the Earth, its Y axis opposite to the orbital momentum,
/// and its X axis completes the triad (along the velocity for circular orbits).
pub fn dcm_inertial_to_nadir(orbit: &Orbit) -> Matrix3<f64> {
    let z = -orbit.radius().normalize();
    let y = -orbit.hvec().normalize();
    let x = y.cross(&z);
    Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()])
}

/// Low precision position of the Sun in the Earth centered inertial frame, in km.
///
/// Source: Vallado, Fundamentals of Astrodynamics and Applications, 4th ed., algorithm 29 (accurate to about 0.01 deg).
pub fn sun_position_eci(jd: f64) -> Vector3<f64> {
    let t_ut1 = (jd - J2000_JD) / DAYS_PER_CENTURY;
    let mean_lon_deg = 280.460 + 36_000.771 * t_ut1;
    let mean_anomaly = (357.529_109_2 + 35_999.050_34 * t_ut1).to_radians();
    let ecliptic_lon = (mean_lon_deg
        + 1.914_666_471 * mean_anomaly.sin()
        + 0.019_994_643 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let distance_au = 1.000_140_612
        - 0.016_708_617 * mean_anomaly.cos()
        - 0.000_139_589 * (2.0 * mean_anomaly).cos();
    let obliquity = (23.439_291 - 0.013_004_2 * t_ut1).to_radians();
    distance_au
        * AU_KM
        * Vector3::new(
            ecliptic_lon.cos(),
            obliquity.cos() * ecliptic_lon.sin(),
            obliquity.sin() * ecliptic_lon.sin(),
        )
}

#[cfg(test)]
mod ut_rotations {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gmst_vallado_example() {
        // Vallado example 3-5: 1992-08-20 12:14 UT1 gives a GMST of 152.578787886 deg
        let jd = 2_448_855.009_722;
        assert_abs_diff_eq!(gmst_deg(jd), 152.578_787_886, epsilon = 1e-3);
    }

    #[test]
    fn geodetic_round_trip() {
        let jd = 2_459_270.5;
        let pos = geodetic_to_eci(38.5, -77.0, 0.0, jd);
        assert_abs_diff_eq!(pos.norm(), EARTH_EQUATORIAL_RADIUS_KM, epsilon = 1e-9);
        let (lat, lon) = eci_to_lat_lon(&pos, jd);
        assert_abs_diff_eq!(lat, 38.5, epsilon = 1e-9);
        assert_abs_diff_eq!(lon, -77.0, epsilon = 1e-9);
    }

    #[test]
    fn sun_distance() {
        // Early January is near perihelion, early July near aphelion.
        let perihelion = sun_position_eci(2_459_218.5).norm() / AU_KM;
        let aphelion = sun_position_eci(2_459_400.5).norm() / AU_KM;
        assert!((0.982..0.985).contains(&perihelion));
        assert!((1.015..1.018).contains(&aphelion));
        // Near the March equinox, the Sun is close to the equatorial plane on the +X side
        let equinox = sun_position_eci(2_459_293.9).normalize();
        assert!(equinox[0] > 0.99);
        assert!(equinox[2].abs() < 0.01);
    }

    #[test]
    fn nadir_frame() {
        let epoch = crate::time::Epoch::from_gregorian_utc_at_midnight(2021, 2, 25);
        let orbit = Orbit::circular_altitude(700.0, 30.0, 40.0, 10.0, epoch).unwrap();
        let dcm = dcm_inertial_to_nadir(&orbit);
        assert_abs_diff_eq!(dcm * dcm.transpose(), Matrix3::identity(), epsilon = 1e-14);
        let nadir = dcm * (-orbit.radius());
        assert_abs_diff_eq!(nadir.normalize(), Vector3::z(), epsilon = 1e-14);
        // X is along the velocity on a circular orbit
        let vel = dcm * orbit.velocity();
        assert_abs_diff_eq!(vel.normalize(), Vector3::x(), epsilon = 1e-12);
    }
}
