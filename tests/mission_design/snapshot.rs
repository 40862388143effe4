extern crate orbitflow;

use orbitflow::io::mission::{MissionSnapshot, MissionSpec};
use orbitflow::io::{ConfigRepr, Configurable};
use orbitflow::md::{ArtifactKind, CoverageMode};
use orbitflow::propagators::PropagatorConfig;
use orbitflow::Mission;
use std::fs;

const MISSION: &str = r#"
epoch: 2021-02-25T00:00:00 UTC
duration_days: 0.05
spacecraft:
  - id: sat0
    orbit:
      sma_km: 6978.137
      ecc: 0.001
      inc_deg: 97.8
      raan_deg: 20.0
      aop_deg: 0.0
      ta_deg: 0.0
      epoch: 2021-02-25T00:00:00 UTC
    instruments:
      - id: cam
        field_of_view:
          shape: CIRCULAR
          diameter_deg: 20.0
propagator:
  type: TWO BODY PROPAGATOR
  step_size_s: 60.0
grids:
  - type: autogrid
    id: band
    lat_lower_deg: -60.0
    lat_upper_deg: 60.0
    grid_res_deg: 10.0
ground_stations:
  - id: atl
    latitude_deg: 33.75
    longitude_deg: -84.39
settings:
  coverage_mode: POINTING OPTIONS COVERAGE
  contact_out_type: DETAIL
"#;

#[test]
fn load_execute_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_path = dir.path().join("mission.yaml");
    let out_dir = dir.path().join("out");
    fs::write(
        &yaml_path,
        MISSION.replace("settings:\n", &format!("settings:\n  out_dir: {}\n", out_dir.display())),
    )
    .unwrap();

    let mut mission = Mission::load(&yaml_path).unwrap();
    assert_eq!(
        mission.propagator(),
        &PropagatorConfig::TwoBody {
            step_size_s: Some(60.0)
        }
    );
    assert_eq!(mission.settings().coverage_mode, Some(CoverageMode::PointingOptions));
    assert_eq!(mission.settings().out_dir, out_dir);

    let produced = mission.execute().unwrap();
    assert_eq!(produced.len(), mission.registry().len());
    assert_eq!(mission.registry().count(ArtifactKind::Coverage), 1);

    // Snapshot to disk and back
    let snapshot_path = dir.path().join("snapshot.yaml");
    mission.to_snapshot().unwrap().dump(&snapshot_path).unwrap();
    let snapshot = MissionSnapshot::load(&snapshot_path).unwrap();
    assert_eq!(snapshot.artifacts.len(), produced.len());

    let restored = Mission::from_snapshot(snapshot.clone()).unwrap();
    assert_eq!(restored.registry(), mission.registry());
    assert_eq!(restored.to_config().unwrap(), snapshot.mission);

    // The written auto grid is recorded in the snapshot
    assert!(snapshot.mission.grids[0].file_path().is_some());
}

#[test]
fn invalid_missions_are_rejected() {
    let bad_duration = MISSION.replace("duration_days: 0.05", "duration_days: -1.0");
    let spec = MissionSpec::loads(&bad_duration).unwrap();
    assert!(Mission::from_config(spec).is_err());

    let bad_mode = MISSION.replace("POINTING OPTIONS COVERAGE", "SWATH COVERAGE");
    assert!(MissionSpec::loads(&bad_mode).is_err());

    assert!(Mission::load("/definitely/not/here.yaml").is_err());
}
