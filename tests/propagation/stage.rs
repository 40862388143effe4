extern crate orbitflow;

use crate::{leo, test_epoch};
use approx::assert_abs_diff_eq;
use orbitflow::cosmic::{Orbit, OrbitError};
use orbitflow::io::state_file::StateSeries;
use orbitflow::propagators::{J2AnalyticalStepper, PropagationError, PropagationStage, Stepper};
use orbitflow::time::{Epoch, Unit};
use orbitflow::Spacecraft;
use rstest::*;
use std::fmt;
use std::fs;
use std::sync::Arc;

/// Fails as soon as it is asked to go past the provided epoch
struct FailingStepper {
    inner: J2AnalyticalStepper,
    fail_after: Epoch,
}

impl fmt::Display for FailingStepper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failing stepper")
    }
}

impl Stepper for FailingStepper {
    fn propagate(&self, state: &Orbit, epoch: Epoch) -> Result<Orbit, PropagationError> {
        if epoch > self.fail_after {
            Err(PropagationError::StepperFailure {
                epoch,
                source: OrbitError::SubSurface { rmag_km: 0.0 },
            })
        } else {
            self.inner.propagate(state, epoch)
        }
    }
}

#[fixture]
fn stage() -> PropagationStage {
    PropagationStage::new("J2 ANALYTICAL PROPAGATOR", Arc::new(J2AnalyticalStepper::default()))
}

#[rstest]
fn one_day_every_minute(stage: PropagationStage) {
    let dir = tempfile::tempdir().unwrap();
    let cart = dir.path().join("state_cartesian.csv");
    let kep = dir.path().join("state_keplerian.csv");
    let sc = Spacecraft::new("sat0", leo(600.0, 97.8));

    let artifact = stage
        .execute(&sc, test_epoch(), 60.0, 1.0, Some(&cart), Some(&kep))
        .unwrap();
    assert_eq!(artifact.num_states, 1441);

    let cart_series = StateSeries::load(&cart).unwrap();
    let kep_series = StateSeries::load(&kep).unwrap();
    assert_eq!(cart_series.len(), 1441);
    assert_eq!(kep_series.len(), 1441);

    let start_jd = test_epoch().to_jde_utc_days();
    assert_abs_diff_eq!(cart_series.header.epoch_jd, start_jd, epsilon = 1e-9);

    // Row i is the state at start + i steps, compared with a direct propagation to that epoch
    let stepper = J2AnalyticalStepper::default();
    for idx in [0, 1, 720, 1440] {
        let expected = stepper
            .propagate(&sc.orbit, test_epoch() + (60.0 * idx as f64) * Unit::Second)
            .unwrap();
        assert_abs_diff_eq!(cart_series.position(idx), expected.radius(), epsilon = 1e-2);
    }

    // Both files describe the same state at each time index
    for idx in [0, 1, 359, 720, 1440] {
        let kep = kep_series.states[idx];
        let from_kep = Orbit::keplerian(kep[0], kep[1], kep[2], kep[3], kep[4], kep[5], test_epoch())
            .unwrap();
        assert_abs_diff_eq!(from_kep.radius(), cart_series.position(idx), epsilon = 1e-5);
        assert_abs_diff_eq!(from_kep.velocity(), cart_series.velocity(idx), epsilon = 1e-8);
    }

    let header = fs::read_to_string(&cart).unwrap();
    let lines = header.lines().take(5).collect::<Vec<_>>();
    assert!(lines[1].contains("Epoch [JDUT1] is"));
    assert!(lines[2].contains("Step size [s] is 60"));
    assert!(lines[3].contains("Mission Duration [Days] is 1"));
    assert!(lines[4].starts_with("time index"));
}

#[rstest]
fn aligned_to_start_epoch(stage: PropagationStage) {
    let dir = tempfile::tempdir().unwrap();
    let cart = dir.path().join("state_cartesian.csv");
    // Orbit defined three hours after the start of the propagation
    let later = test_epoch() + 3.0 * Unit::Hour;
    let orbit = Orbit::circular_altitude(700.0, 30.0, 10.0, 20.0, later).unwrap();
    let sc = Spacecraft::new("sat0", orbit);

    stage
        .execute(&sc, test_epoch(), 30.0, 0.25, Some(&cart), None)
        .unwrap();
    let series = StateSeries::load(&cart).unwrap();
    assert_eq!(series.len(), 721);
    // Three hours is row 360
    assert_abs_diff_eq!(series.position(360), orbit.radius(), epsilon = 1e-2);
}

#[test]
fn stepper_failure_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let stage = PropagationStage::new(
        "failing",
        Arc::new(FailingStepper {
            inner: J2AnalyticalStepper::default(),
            fail_after: test_epoch() + 1.0 * Unit::Hour,
        }),
    );
    let sc = Spacecraft::new("sat0", leo(500.0, 45.0));
    let outcome = stage.execute(
        &sc,
        test_epoch(),
        60.0,
        1.0,
        Some(&dir.path().join("state_cartesian.csv")),
        None,
    );
    assert!(matches!(
        outcome,
        Err(PropagationError::StepperFailure { .. })
    ));
}

#[test]
fn sub_surface_orbit_fails() {
    let stage = PropagationStage::new("J2", Arc::new(J2AnalyticalStepper::default()));
    let orbit = Orbit::circular_altitude(-100.0, 45.0, 0.0, 0.0, test_epoch()).unwrap();
    let sc = Spacecraft::new("mole", orbit);
    assert!(stage
        .execute(&sc, test_epoch(), 60.0, 0.1, None, None)
        .is_err());
}
