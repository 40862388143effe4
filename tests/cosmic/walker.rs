extern crate orbitflow;

use approx::assert_abs_diff_eq;
use orbitflow::cosmic::EARTH_EQUATORIAL_RADIUS_KM;
use orbitflow::io::mission::MissionSpec;
use orbitflow::io::{ConfigRepr, Configurable};
use orbitflow::Mission;

const CONSTELLATION: &str = r#"
epoch: 2021-02-25T00:00:00 UTC
duration_days: 0.25
spacecraft:
  - id: lone
    orbit:
      sma_km: 7078.137
      ecc: 0.0
      inc_deg: 98.0
      raan_deg: 0.0
      aop_deg: 0.0
      ta_deg: 0.0
      epoch: 2021-02-25T00:00:00 UTC
constellations:
  - id: walk
    altitude_km: 1200.0
    inclination_deg: 53.0
    num_sats: 6
    num_planes: 2
    relative_spacing: 1
    epoch: 2021-02-25T00:00:00 UTC
"#;

#[test]
fn constellation_expanded_into_fleet() {
    let spec = MissionSpec::loads(CONSTELLATION).unwrap();
    assert_eq!(spec.constellations.len(), 1);

    let mission = Mission::from_config(spec).unwrap();
    let orbits = mission.spacecraft_orbits();
    assert_eq!(orbits.len(), 7);
    assert_eq!(orbits[0].0, "lone");
    for (_, orbit) in &orbits[1..] {
        assert_abs_diff_eq!(orbit.sma_km(), EARTH_EQUATORIAL_RADIUS_KM + 1200.0, epsilon = 1e-6);
        assert_abs_diff_eq!(orbit.inc_deg(), 53.0, epsilon = 1e-9);
    }

    // Once expanded, the constellation is part of the fleet
    let spec = mission.to_config().unwrap();
    assert!(spec.constellations.is_empty());
    assert_eq!(spec.spacecraft.len(), 7);
}

#[test]
fn duplicated_ids_are_rejected() {
    let yaml = CONSTELLATION.replace("id: lone", "id: walk00");
    let spec = MissionSpec::loads(&yaml).unwrap();
    assert!(Mission::from_config(spec).is_err());
}
