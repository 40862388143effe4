extern crate orbitflow;

use crate::{leo, test_epoch};
use orbitflow::cosmic::{
    GroundStation, Instrument, InstrumentMode, Orbit, OrbitError, PointingOption, SphericalGeometry,
};
use orbitflow::io::access_file::AccessFile;
use orbitflow::io::interval_file::load_intervals;
use orbitflow::md::{Artifact, ArtifactKey, ArtifactKind, CoverageMode, Grid, Settings};
use orbitflow::propagators::{PropagationError, PropagatorConfig, Stepper};
use orbitflow::time::Epoch;
use orbitflow::{Mission, Spacecraft};
use rstest::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

fn count(artifacts: &[Artifact], kind: ArtifactKind) -> usize {
    artifacts.iter().filter(|a| a.kind() == kind).count()
}

fn imager() -> Instrument {
    Instrument::builder()
        .id("imager")
        .field_of_view(SphericalGeometry::Circular { diameter_deg: 30.0 })
        .field_of_regard(SphericalGeometry::Rectangular {
            angle_height_deg: 30.0,
            angle_width_deg: 60.0,
        })
        .modes(vec![InstrumentMode {
            id: "strip".to_string(),
            pointing_options: vec![PointingOption::new(0.0, 0.0), PointingOption::new(15.0, 0.0)],
        }])
        .build()
}

/// Two imaging spacecraft, a coarse auto grid and one ground station
fn mission(out_dir: &Path, coverage_mode: Option<CoverageMode>) -> Mission {
    let mut mission = Mission::new(test_epoch(), 0.05);
    mission.update_propagator(PropagatorConfig::default().with_step_size_s(60.0));
    mission
        .add_spacecraft(Spacecraft::new("sat0", leo(600.0, 97.8)).with_instrument(imager()))
        .unwrap();
    mission
        .add_spacecraft(
            Spacecraft::new(
                "sat1",
                Orbit::circular_altitude(600.0, 97.8, 0.0, 30.0, test_epoch()).unwrap(),
            )
            .with_instrument(imager()),
        )
        .unwrap();
    mission.add_grid(Grid::global("coarse", Some(10.0))).unwrap();
    mission
        .add_ground_station(GroundStation::from_point("svalbard", 78.23, 15.39, 0.5))
        .unwrap();
    let settings = match coverage_mode {
        Some(mode) => Settings::builder()
            .out_dir(out_dir)
            .coverage_mode(mode)
            .build(),
        None => Settings::builder().out_dir(out_dir).build(),
    };
    mission.update_settings(settings);
    mission
}

#[test]
fn single_spacecraft_end_to_end() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = Mission::new(test_epoch(), 1.0);
    mission
        .add_spacecraft(Spacecraft::new("lonely", leo(500.0, 45.0)))
        .unwrap();
    mission.update_settings(Settings::builder().out_dir(out.path()).build());

    let produced = mission.execute().unwrap();
    assert_eq!(produced.len(), 2);
    assert_eq!(count(&produced, ArtifactKind::Propagation), 1);
    assert_eq!(count(&produced, ArtifactKind::Eclipse), 1);

    let sat_dir = out.path().join("sat0");
    assert!(sat_dir.join("state_cartesian.csv").exists());
    assert!(sat_dir.join("state_keplerian.csv").exists());
    let (header, intervals) = load_intervals(sat_dir.join("eclipses.csv")).unwrap();
    assert!(header.title.contains("lonely"));
    // A low orbit goes through the shadow of the Earth about 15 times a day
    assert!((14..=17).contains(&intervals.len()), "{} eclipses", intervals.len());
}

#[rstest]
#[case(CoverageMode::Grid)]
#[case(CoverageMode::PointingOptions)]
#[case(CoverageMode::PointingOptionsWithGrid)]
fn full_pipeline(#[case] coverage_mode: CoverageMode) {
    let out = tempfile::tempdir().unwrap();
    let mut mission = mission(out.path(), Some(coverage_mode));

    let produced = mission.execute().unwrap();
    assert_eq!(count(&produced, ArtifactKind::GridWrite), 1);
    assert_eq!(count(&produced, ArtifactKind::Propagation), 2);
    assert_eq!(count(&produced, ArtifactKind::Coverage), 2);
    assert_eq!(count(&produced, ArtifactKind::DataMetrics), 2);
    assert_eq!(count(&produced, ArtifactKind::GroundContact), 2);
    assert_eq!(count(&produced, ArtifactKind::InterSatelliteContact), 1);
    assert_eq!(count(&produced, ArtifactKind::Eclipse), 2);
    assert_eq!(mission.registry().len(), produced.len());

    let suffix = if coverage_mode.uses_grid() { "_grid0" } else { "" };
    let access_path = out
        .path()
        .join("sat1")
        .join(format!("access_instru0_mode0{suffix}.csv"));
    let access = AccessFile::load(&access_path).unwrap();
    assert_eq!(access.mode, coverage_mode);
    if coverage_mode == CoverageMode::PointingOptions {
        // Both options always see the Earth
        assert_eq!(access.records.len(), 2 * 73);
    }
    assert!(out
        .path()
        .join("sat1")
        .join(format!("datametrics_instru0_mode0{suffix}.csv"))
        .exists());
    assert!(out.path().join("sat0").join("gndStn0_contacts.csv").exists());
    assert!(out.path().join("comm").join("sat0_to_sat1.csv").exists());

    // Lookup by key
    let key = ArtifactKey::spacecraft("sat1")
        .with_instrument("imager")
        .with_mode("strip")
        .with_grid(coverage_mode.uses_grid().then(|| "coarse".to_string()))
        .with_coverage_mode(coverage_mode);
    let coverage = mission
        .registry()
        .find_one(ArtifactKind::Coverage, &key)
        .and_then(Artifact::as_coverage)
        .unwrap();
    assert_eq!(coverage.access_file, access_path);
}

#[test]
fn grid_strategy_without_grid_is_skipped() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = Mission::new(test_epoch(), 0.02);
    mission
        .add_spacecraft(Spacecraft::new("sat0", leo(600.0, 97.8)).with_instrument(imager()))
        .unwrap();
    mission.update_settings(
        Settings::builder()
            .out_dir(out.path())
            .coverage_mode(CoverageMode::Grid)
            .build(),
    );
    let produced = mission.execute().unwrap();
    assert_eq!(count(&produced, ArtifactKind::Coverage), 0);
    assert_eq!(count(&produced, ArtifactKind::DataMetrics), 0);
    assert_eq!(count(&produced, ArtifactKind::Propagation), 1);
}

/// Records of the registry whose file is missing from the disk
fn missing_files(mission: &Mission) -> Vec<String> {
    mission
        .registry()
        .iter()
        .filter(|artifact| artifact.output_file().is_some_and(|file| !file.exists()))
        .map(|artifact| artifact.to_string())
        .collect()
}

#[test]
fn rerun_is_idempotent() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = mission(out.path(), Some(CoverageMode::Grid));

    let first = mission.execute().unwrap();
    assert_eq!(count(&first, ArtifactKind::GridWrite), 1);
    let grid_file = mission.grids()[0].file_path().unwrap().to_path_buf();
    let registry = mission.registry().clone();

    // The grid is resolved once, everything else is produced again
    let second = mission.execute().unwrap();
    assert_eq!(count(&second, ArtifactKind::GridWrite), 0);
    assert_eq!(first[1..], second[..]);
    assert_eq!(mission.registry(), &registry);
    assert_eq!(mission.grids()[0].file_path(), Some(grid_file.as_path()));
    assert!(missing_files(&mission).is_empty());

    mission.clear();
    assert!(mission.registry().is_empty());
}

#[test]
fn rerun_in_another_directory() {
    let first_out = tempfile::tempdir().unwrap();
    let second_out = tempfile::tempdir().unwrap();
    let mut mission = mission(first_out.path(), Some(CoverageMode::PointingOptions));
    mission.execute().unwrap();

    let mut settings = mission.settings().clone();
    settings.out_dir = second_out.path().to_path_buf();
    mission.update_settings(settings);
    let produced = mission.execute().unwrap();
    assert_eq!(count(&produced, ArtifactKind::Propagation), 2);

    for kind in [
        ArtifactKind::Propagation,
        ArtifactKind::Coverage,
        ArtifactKind::DataMetrics,
        ArtifactKind::GroundContact,
        ArtifactKind::InterSatelliteContact,
        ArtifactKind::Eclipse,
    ] {
        let records = mission
            .registry()
            .iter()
            .filter(|artifact| artifact.kind() == kind)
            .collect::<Vec<_>>();
        assert_eq!(records.len(), count(&produced, kind), "{kind}");
        assert!(records
            .iter()
            .all(|artifact| artifact.output_file().unwrap().starts_with(second_out.path())));
    }

    let propagation = mission
        .registry()
        .find_one(ArtifactKind::Propagation, &ArtifactKey::spacecraft("sat0"))
        .and_then(Artifact::as_propagation)
        .unwrap();
    assert_eq!(
        propagation.state_cart_file.as_deref(),
        Some(second_out.path().join("sat0").join("state_cartesian.csv").as_path())
    );
}

#[test]
fn coverage_mode_switch_leaves_no_stale_record() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = mission(out.path(), Some(CoverageMode::Grid));
    mission.execute().unwrap();
    assert_eq!(mission.registry().count(ArtifactKind::Coverage), 2);

    let mut settings = mission.settings().clone();
    settings.coverage_mode = Some(CoverageMode::PointingOptions);
    mission.update_settings(settings);
    mission.execute().unwrap();
    assert!(missing_files(&mission).is_empty(), "{:?}", missing_files(&mission));
    assert_eq!(mission.registry().count(ArtifactKind::Coverage), 2);
    assert_eq!(mission.registry().count(ArtifactKind::DataMetrics), 2);
    assert!(mission
        .registry()
        .iter()
        .filter_map(|artifact| artifact.key().coverage_mode)
        .all(|mode| mode == CoverageMode::PointingOptions));

    // Without a coverage mode, the access files of the previous run are gone with the spacecraft directories
    let mut settings = mission.settings().clone();
    settings.coverage_mode = None;
    mission.update_settings(settings);
    mission.execute().unwrap();
    assert!(missing_files(&mission).is_empty(), "{:?}", missing_files(&mission));
    assert_eq!(mission.registry().count(ArtifactKind::Coverage), 0);
    assert_eq!(mission.registry().count(ArtifactKind::DataMetrics), 0);
    assert_eq!(mission.registry().count(ArtifactKind::Eclipse), 2);
}

#[test]
fn failed_propagation_cascades() {
    let out = tempfile::tempdir().unwrap();
    let mut mission = mission(out.path(), Some(CoverageMode::PointingOptions));
    // Below the surface of the Earth
    mission
        .add_spacecraft(
            Spacecraft::new(
                "mole",
                Orbit::circular_altitude(-200.0, 45.0, 0.0, 0.0, test_epoch()).unwrap(),
            )
            .with_instrument(imager()),
        )
        .unwrap();

    let produced = mission.execute().unwrap();
    assert_eq!(count(&produced, ArtifactKind::Propagation), 2);
    assert_eq!(count(&produced, ArtifactKind::Coverage), 2);
    assert_eq!(count(&produced, ArtifactKind::DataMetrics), 2);
    assert_eq!(count(&produced, ArtifactKind::GroundContact), 2);
    // Only the pair of healthy spacecraft
    assert_eq!(count(&produced, ArtifactKind::InterSatelliteContact), 1);
    assert_eq!(count(&produced, ArtifactKind::Eclipse), 2);
    assert!(produced
        .iter()
        .all(|artifact| !artifact.key().to_string().contains("mole")));
}

/// Refuses to propagate anything
struct BrokenStepper;

impl fmt::Display for BrokenStepper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "broken stepper")
    }
}

impl Stepper for BrokenStepper {
    fn propagate(&self, state: &Orbit, epoch: Epoch) -> Result<Orbit, PropagationError> {
        Err(PropagationError::StepperFailure {
            epoch,
            source: OrbitError::SubSurface {
                rmag_km: state.rmag_km(),
            },
        })
    }
}

#[test]
fn broken_stepper_only_leaves_grids() {
    let out = tempfile::tempdir().unwrap();
    let mut mission =
        mission(out.path(), Some(CoverageMode::Grid)).with_stepper(Arc::new(BrokenStepper));
    let produced = mission.execute().unwrap();
    assert_eq!(produced.len(), 1);
    assert_eq!(produced[0].kind(), ArtifactKind::GridWrite);
    assert_eq!(mission.registry().len(), 1);
}
