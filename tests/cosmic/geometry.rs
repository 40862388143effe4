extern crate orbitflow;

use approx::assert_abs_diff_eq;
use orbitflow::cosmic::{
    eci_to_lat_lon, geodetic_to_eci, sun_position_eci, EclipseLocator, GroundStation, LineOfSight,
    EARTH_EQUATORIAL_RADIUS_KM,
};
use orbitflow::linalg::Vector3;
use orbitflow::md::stages::coverage::earth_intersection;
use rstest::*;

const JD: f64 = 2_459_270.5;

#[rstest]
#[case(0.0, 0.0)]
#[case(33.75, -84.39)]
#[case(-45.0, 170.0)]
fn station_sees_zenith_not_antipode(#[case] lat_deg: f64, #[case] lon_deg: f64) {
    let station = GroundStation::from_point("gs", lat_deg, lon_deg, 0.0).with_elevation_mask(10.0);
    let zenith = geodetic_to_eci(lat_deg, lon_deg, 500.0, JD);
    assert_abs_diff_eq!(station.elevation_of(&zenith, JD), 90.0, epsilon = 1e-4);
    assert!(station.is_visible(&zenith, JD));

    let antipode = -zenith;
    assert!(station.elevation_of(&antipode, JD) < 0.0);
    assert!(!station.is_visible(&antipode, JD));
}

#[test]
fn geodetic_round_trip() {
    let pos = geodetic_to_eci(12.5, -75.0, 0.0, JD);
    assert_abs_diff_eq!(pos.norm(), EARTH_EQUATORIAL_RADIUS_KM, epsilon = 1e-6);
    let (lat_deg, lon_deg) = eci_to_lat_lon(&pos, JD);
    assert_abs_diff_eq!(lat_deg, 12.5, epsilon = 1e-9);
    assert_abs_diff_eq!(lon_deg, -75.0, epsilon = 1e-9);
}

#[test]
fn eclipse_is_behind_earth() {
    let locator = EclipseLocator::default();
    let sun_hat = sun_position_eci(JD).normalize();
    assert!(!locator.is_eclipsed(&(7000.0 * sun_hat), JD));
    assert!(locator.is_eclipsed(&(-7000.0 * sun_hat), JD));
    // Far enough and sideways, the Earth no longer blocks the Sun
    let side = sun_hat.cross(&Vector3::z()).normalize();
    assert!(!locator.is_eclipsed(&(42_164.0 * side), JD));
}

#[test]
fn opaque_atmosphere_blocks_grazing_links() {
    // Both satellites at 7000 km, separated so that the link grazes the Earth at about 6500 km
    let half_angle = (6500.0_f64 / 7000.0).acos();
    let first = 7000.0 * Vector3::new(half_angle.cos(), half_angle.sin(), 0.0);
    let second = 7000.0 * Vector3::new(half_angle.cos(), -half_angle.sin(), 0.0);
    assert!(LineOfSight::earth(0.0).is_visible(&first, &second));
    assert!(LineOfSight::earth(100.0).is_visible(&first, &second));
    assert!(!LineOfSight::earth(200.0).is_visible(&first, &second));
}

#[test]
fn boresight_intersection() {
    let sat = Vector3::new(7000.0, 0.0, 0.0);
    let nadir = earth_intersection(&sat, &Vector3::new(-1.0, 0.0, 0.0)).unwrap();
    assert_abs_diff_eq!(nadir, Vector3::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0, 0.0), epsilon = 1e-9);
    assert!(earth_intersection(&sat, &Vector3::new(1.0, 0.0, 0.0)).is_none());
    assert!(earth_intersection(&sat, &Vector3::new(0.0, 1.0, 0.0)).is_none());
}
