extern crate orbitflow;

use crate::{leo, test_epoch};
use approx::assert_abs_diff_eq;
use orbitflow::propagators::PropagatorConfig;
use orbitflow::time::Unit;
use orbitflow::utils::between_pm_180;
use rstest::*;

#[rstest]
#[case(30.0, -1.0)]
#[case(90.0, 0.0)]
#[case(98.0, 1.0)]
fn nodal_regression_sign(#[case] inc_deg: f64, #[case] sign: f64) {
    let stepper = PropagatorConfig::default().stepper();
    let orbit = leo(700.0, inc_deg);
    let later = stepper.propagate(&orbit, test_epoch() + 1.0 * Unit::Day).unwrap();
    let drift_deg = between_pm_180(later.raan_deg() - orbit.raan_deg());
    if sign == 0.0 {
        assert_abs_diff_eq!(drift_deg, 0.0, epsilon = 1e-6);
    } else {
        assert_eq!(drift_deg.signum(), sign, "drift of {drift_deg} deg");
    }
    // Shape and inclination are constant
    assert_abs_diff_eq!(later.sma_km(), orbit.sma_km(), epsilon = 1e-6);
    assert_abs_diff_eq!(later.inc_deg(), inc_deg, epsilon = 1e-6);
}

#[test]
fn two_body_keeps_the_plane() {
    let cfg: PropagatorConfig = serde_yaml::from_str("type: TWO BODY PROPAGATOR").unwrap();
    let stepper = cfg.stepper();
    let orbit = leo(700.0, 51.6);
    let later = stepper.propagate(&orbit, test_epoch() + 2.0 * Unit::Day).unwrap();
    assert_abs_diff_eq!(
        between_pm_180(later.raan_deg() - orbit.raan_deg()),
        0.0,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(later.hvec().normalize(), orbit.hvec().normalize(), epsilon = 1e-9);
}

#[test]
fn backward_and_forward() {
    let stepper = PropagatorConfig::default().stepper();
    let orbit = leo(550.0, 53.0);
    let before = stepper
        .propagate(&orbit, test_epoch() - 6.0 * Unit::Hour)
        .unwrap();
    let back = stepper.propagate(&before, test_epoch()).unwrap();
    assert_abs_diff_eq!(back.radius(), orbit.radius(), epsilon = 1e-3);
    assert_abs_diff_eq!(back.velocity(), orbit.velocity(), epsilon = 1e-6);
}
