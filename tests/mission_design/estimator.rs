extern crate orbitflow;

use crate::{leo, test_epoch};
use approx::assert_abs_diff_eq;
use orbitflow::cosmic::{Instrument, SphericalGeometry};
use orbitflow::md::{ArtifactKind, Grid, ParameterEstimator, Settings};
use orbitflow::{Mission, Spacecraft};
use rstest::*;

fn camera(diameter_deg: f64) -> Instrument {
    Instrument::builder()
        .id("cam")
        .field_of_view(SphericalGeometry::Circular { diameter_deg })
        .build()
}

#[rstest]
fn lower_orbits_need_smaller_steps(#[values(0.1, 0.25, 1.0)] factor: f64) {
    let estimator = ParameterEstimator::default();
    let low = Spacecraft::new("low", leo(400.0, 51.6));
    let high = Spacecraft::new("high", leo(1200.0, 51.6));
    let low_step = estimator.compute_time_step(&[low.clone()], factor);
    let high_step = estimator.compute_time_step(&[high.clone()], factor);
    assert!(low_step < high_step);
    assert_eq!(estimator.compute_time_step(&[high, low], factor), low_step);
}

#[test]
fn mission_uses_estimated_step_and_resolution() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = Mission::new(test_epoch(), 0.02);
    mission
        .add_spacecraft(Spacecraft::new("sat0", leo(700.0, 98.0)).with_instrument(camera(40.0)))
        .unwrap();
    mission.add_grid(Grid::global("world", None)).unwrap();
    let settings = Settings::builder().out_dir(out.path()).build();
    mission.update_settings(settings.clone());

    let estimator = ParameterEstimator::new(settings.ratio_clamp_tolerance);
    let expected_step = estimator.compute_time_step(mission.spacecraft(), settings.prop_time_res_factor);
    let expected_res = estimator.compute_grid_res(mission.spacecraft(), settings.grid_res_factor);
    assert_eq!(mission.resolve_step_size(), expected_step);

    let produced = mission.execute().unwrap();
    let grid = produced
        .iter()
        .find_map(|artifact| artifact.as_grid())
        .unwrap();
    assert_abs_diff_eq!(grid.resolution_deg, expected_res, epsilon = 1e-12);
    assert!(grid.grid_file.exists());

    let propagation = produced
        .iter()
        .find(|artifact| artifact.kind() == ArtifactKind::Propagation)
        .and_then(|artifact| artifact.as_propagation())
        .unwrap();
    assert_eq!(propagation.step_size_s, expected_step);
}
