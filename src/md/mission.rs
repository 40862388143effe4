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

use super::artifact::{Artifact, ArtifactKey, ArtifactKind, GridArtifact, PropagationArtifact};
use super::grid::Grid;
use super::registry::ArtifactRegistry;
use super::stages::coverage::GridPoints;
use super::stages::{ContactFinder, CoverageCalculator, DataMetricsCalculator, EclipseFinder};
use super::workitems::{
    coverage_work_items, ground_contact_work_items, inter_satellite_work_items,
};
use super::{
    ConfigSnafu, CoverageMode, InvalidMissionSnafu, MissionError, OutputDirSnafu, ParameterEstimator,
    Settings,
};
use crate::cosmic::{GroundStation, Instrument, Orbit, Spacecraft};
use crate::io::grid_file::GeoPoint;
use crate::io::mission::{MissionSnapshot, MissionSpec};
use crate::io::{ConfigError, Configurable, FileError};
use crate::propagators::{PropagationError, PropagationStage, PropagatorConfig, Stepper};
use crate::time::Epoch;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use snafu::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A mission: a fleet of spacecraft, the grids and ground stations of interest, and the records of every file the
/// analysis stages produced for it.
///
/// Executing the mission runs every stage in order. Each stage only replaces its own records, so a mission may be
/// edited and executed again.
#[derive(Clone)]
pub struct Mission {
    epoch: Epoch,
    duration_days: f64,
    propagator: PropagatorConfig,
    stepper: Arc<dyn Stepper>,
    spacecraft: Vec<Spacecraft>,
    grids: Vec<Grid>,
    ground_stations: Vec<GroundStation>,
    settings: Settings,
    registry: ArtifactRegistry,
    show_progress: bool,
}

fn ensure_unique<'a, I: IntoIterator<Item = &'a str>>(what: &str, ids: I) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("{what} id `{id}` is used more than once"));
        }
    }
    Ok(())
}

// Just the template for the progress bar
fn progress_bar(label: &str, len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:60.cyan/blue} {pos:>5}/{len:5} {msg}")
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(label.to_string());
    pb
}

impl Mission {
    /// An empty mission starting at this epoch, with the default propagator and settings.
    pub fn new(epoch: Epoch, duration_days: f64) -> Self {
        let propagator = PropagatorConfig::default();
        Self {
            epoch,
            duration_days,
            stepper: propagator.stepper(),
            propagator,
            spacecraft: Vec::new(),
            grids: Vec::new(),
            ground_stations: Vec::new(),
            settings: Settings::default(),
            registry: ArtifactRegistry::new(),
            show_progress: false,
        }
    }

    /// Replaces the stepper built from the propagator configuration, e.g. with a higher fidelity one.
    pub fn with_stepper(mut self, stepper: Arc<dyn Stepper>) -> Self {
        self.stepper = stepper;
        self
    }

    /// Shows a progress bar for the parallel stages
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn duration_days(&self) -> f64 {
        self.duration_days
    }

    pub fn propagator(&self) -> &PropagatorConfig {
        &self.propagator
    }

    pub fn spacecraft(&self) -> &[Spacecraft] {
        &self.spacecraft
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn ground_stations(&self) -> &[GroundStation] {
        &self.ground_stations
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The records of every file produced so far
    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// The initial orbit of each spacecraft, in fleet order
    pub fn spacecraft_orbits(&self) -> Vec<(&str, Orbit)> {
        self.spacecraft
            .iter()
            .map(|sc| (sc.id.as_str(), sc.orbit))
            .collect()
    }

    pub fn add_spacecraft(&mut self, spacecraft: Spacecraft) -> Result<(), MissionError> {
        ensure!(
            self.spacecraft.iter().all(|sc| sc.id != spacecraft.id),
            InvalidMissionSnafu {
                msg: format!("spacecraft `{}` already exists", spacecraft.id)
            }
        );
        self.spacecraft.push(spacecraft);
        Ok(())
    }

    pub fn add_instrument_to_spacecraft(
        &mut self,
        spacecraft_id: &str,
        instrument: Instrument,
    ) -> Result<(), MissionError> {
        let sc = self
            .spacecraft
            .iter_mut()
            .find(|sc| sc.id == spacecraft_id)
            .context(InvalidMissionSnafu {
                msg: format!("no spacecraft `{spacecraft_id}`"),
            })?;
        ensure!(
            sc.instrument_index(&instrument.id).is_none(),
            InvalidMissionSnafu {
                msg: format!(
                    "spacecraft `{spacecraft_id}` already carries instrument `{}`",
                    instrument.id
                )
            }
        );
        sc.instruments.push(instrument);
        Ok(())
    }

    pub fn add_ground_station(&mut self, station: GroundStation) -> Result<(), MissionError> {
        ensure!(
            self.ground_stations.iter().all(|gs| gs.id != station.id),
            InvalidMissionSnafu {
                msg: format!("ground station `{}` already exists", station.id)
            }
        );
        self.ground_stations.push(station);
        Ok(())
    }

    pub fn add_grid(&mut self, grid: Grid) -> Result<(), MissionError> {
        ensure!(
            self.grids.iter().all(|g| g.id() != grid.id()),
            InvalidMissionSnafu {
                msg: format!("grid `{}` already exists", grid.id())
            }
        );
        self.grids.push(grid);
        Ok(())
    }

    pub fn update_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
    }

    pub fn update_duration(&mut self, duration_days: f64) -> Result<(), MissionError> {
        ensure!(
            duration_days.is_finite() && duration_days > 0.0,
            InvalidMissionSnafu {
                msg: format!("mission duration must be strictly positive, got {duration_days} days")
            }
        );
        self.duration_days = duration_days;
        Ok(())
    }

    /// Switches to another propagator, resetting any custom stepper.
    pub fn update_propagator(&mut self, propagator: PropagatorConfig) {
        self.stepper = propagator.stepper();
        self.propagator = propagator;
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Removes the fleet, the grids, the ground stations and every record, and restores the default settings.
    pub fn clear(&mut self) {
        self.spacecraft.clear();
        self.grids.clear();
        self.ground_stations.clear();
        self.registry.clear();
        self.settings = Settings::default();
    }

    /// The specification of this mission and the records of the files produced so far.
    pub fn to_snapshot(&self) -> Result<MissionSnapshot, ConfigError> {
        Ok(MissionSnapshot {
            mission: self.to_config()?,
            artifacts: self.registry.iter().cloned().collect(),
        })
    }

    /// Restores a mission and its records from a snapshot.
    pub fn from_snapshot(snapshot: MissionSnapshot) -> Result<Self, ConfigError> {
        let mut mission = Self::from_config(snapshot.mission)?;
        mission.registry.insert(snapshot.artifacts);
        Ok(mission)
    }

    fn estimator(&self) -> ParameterEstimator {
        ParameterEstimator::new(self.settings.ratio_clamp_tolerance)
    }

    /// The step of the propagation: the one of the propagator configuration if set, else estimated from the fleet.
    pub fn resolve_step_size(&self) -> f64 {
        let computed = self
            .estimator()
            .compute_time_step(&self.spacecraft, self.settings.prop_time_res_factor);
        match self.propagator.step_size_s() {
            Some(step) => {
                if step > computed {
                    warn!(
                        "user step size of {step} s is larger than the {computed:.3} s recommended for this fleet"
                    );
                }
                step
            }
            None => computed,
        }
    }

    fn sat_dir(&self, sc_index: usize) -> PathBuf {
        self.settings.out_dir.join(format!("sat{sc_index}"))
    }

    fn propagation_of(&self, sc: &Spacecraft) -> Option<&PropagationArtifact> {
        self.registry
            .find_one(
                ArtifactKind::Propagation,
                &ArtifactKey::spacecraft(sc.id.clone()),
            )
            .and_then(Artifact::as_propagation)
    }

    fn run_parallel<T, R, F>(&self, label: &str, items: &[T], op: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if self.show_progress {
            items
                .par_iter()
                .progress_with(progress_bar(label, items.len()))
                .map(op)
                .collect()
        } else {
            items.par_iter().map(op).collect()
        }
    }

    /// Runs every stage of the analysis, and returns the records of the files produced by this run, in stage order.
    ///
    /// Failures of a work item are logged and cascade to the work items which depend on it, but never abort the run.
    /// Only a failure to create the output directory is returned.
    pub fn execute(&mut self) -> Result<Vec<Artifact>, MissionError> {
        let out_dir = self.settings.out_dir.clone();
        fs::create_dir_all(&out_dir).context(OutputDirSnafu {
            path: out_dir.clone(),
        })?;
        info!(
            "executing mission of {} spacecraft over {} days from {}, output in {}",
            self.spacecraft.len(),
            self.duration_days,
            self.epoch,
            out_dir.display()
        );

        let mut produced = self.write_grids();
        produced.extend(self.propagate());
        match self.settings.coverage_mode {
            Some(coverage_mode) => {
                produced.extend(self.compute_coverage(coverage_mode));
                produced.extend(self.compute_data_metrics(coverage_mode));
            }
            None => info!("no coverage mode set, coverage and data metrics skipped"),
        }
        produced.extend(self.find_ground_contacts());
        produced.extend(self.find_inter_satellite_contacts());
        produced.extend(self.find_eclipses());

        info!("mission executed: {} artifact(s) produced", produced.len());
        Ok(produced)
    }

    fn write_grids(&mut self) -> Vec<Artifact> {
        let default_res_deg = self
            .estimator()
            .compute_grid_res(&self.spacecraft, self.settings.grid_res_factor);
        let out_dir = self.settings.out_dir.clone();

        let mut scope = Vec::new();
        let mut records = Vec::new();
        for (idx, grid) in self.grids.iter_mut().enumerate() {
            // Custom grids and auto grids written by a previous run
            if !grid.is_auto() || grid.file_path().is_some() {
                continue;
            }
            scope.push(ArtifactKey::grid(grid.id()));
            let grid_file = out_dir.join(format!("grid{idx}.csv"));
            match grid.resolve(default_res_deg, &grid_file) {
                Ok(Some((resolution_deg, num_points))) => {
                    debug!("{grid}: {num_points} points written to {}", grid_file.display());
                    records.push(Artifact::GridWrite(GridArtifact {
                        grid_id: grid.id().to_string(),
                        grid_file,
                        resolution_deg,
                        num_points,
                    }));
                }
                Ok(None) => {}
                Err(e) => warn!("{grid} could not be written: {e}"),
            }
        }

        info!("{} unresolved auto grid(s) written", records.len());
        self.registry
            .supersede(ArtifactKind::GridWrite, scope, records.clone());
        records
    }

    fn propagate(&mut self) -> Vec<Artifact> {
        let step_size_s = self.resolve_step_size();
        let stage = PropagationStage::new(self.propagator.name(), self.stepper.clone());
        info!(
            "propagating {} spacecraft with {stage} every {step_size_s} s",
            self.spacecraft.len()
        );

        let indices = (0..self.spacecraft.len()).collect::<Vec<_>>();
        let records = self
            .run_parallel("propagation", &indices, |&idx| {
                let sc = &self.spacecraft[idx];
                let sat_dir = self.sat_dir(idx);
                let outcome = recreate_dir(&sat_dir).and_then(|_| {
                    stage.execute(
                        sc,
                        self.epoch,
                        step_size_s,
                        self.duration_days,
                        Some(&sat_dir.join("state_cartesian.csv")),
                        Some(&sat_dir.join("state_keplerian.csv")),
                    )
                });
                match outcome {
                    Ok(artifact) => Some(Artifact::Propagation(artifact)),
                    Err(e) => {
                        warn!("propagation of {} failed: {e}", sc.id);
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        // The spacecraft directories were recreated, along with the files of every later stage in them
        let ids = self
            .spacecraft
            .iter()
            .map(|sc| sc.id.as_str())
            .collect::<HashSet<_>>();
        let sat_dirs = indices
            .iter()
            .map(|&idx| self.sat_dir(idx))
            .collect::<Vec<_>>();
        let mut dropped = 0;
        for kind in [
            ArtifactKind::Coverage,
            ArtifactKind::DataMetrics,
            ArtifactKind::GroundContact,
            ArtifactKind::Eclipse,
        ] {
            dropped += self.registry.delete_matching(kind, |record| {
                record
                    .key()
                    .spacecraft_id
                    .as_deref()
                    .is_some_and(|id| ids.contains(id))
                    || record
                        .output_file()
                        .is_some_and(|file| sat_dirs.iter().any(|dir| file.starts_with(dir)))
            });
        }
        if dropped > 0 {
            debug!("{dropped} record(s) of the re-propagated spacecraft dropped");
        }

        let scope = self
            .spacecraft
            .iter()
            .map(|sc| ArtifactKey::spacecraft(sc.id.clone()))
            .collect::<Vec<_>>();
        info!(
            "{} of {} spacecraft propagated",
            records.len(),
            self.spacecraft.len()
        );
        self.registry
            .supersede(ArtifactKind::Propagation, scope, records.clone());
        records
    }

    fn compute_coverage(&mut self, coverage_mode: CoverageMode) -> Vec<Artifact> {
        let items = coverage_work_items(&self.spacecraft, &self.grids, coverage_mode);
        let grid_points = if coverage_mode.uses_grid() {
            self.load_grid_points()
        } else {
            vec![None; self.grids.len()]
        };
        let calculator = CoverageCalculator::new(coverage_mode, self.settings.mid_access_only);
        info!("{coverage_mode}: {} work item(s)", items.len());

        let records = self
            .run_parallel("coverage", &items, |item| {
                let sc = &self.spacecraft[item.sc_index];
                let Some(propagation) = self.propagation_of(sc) else {
                    warn!("{coverage_mode} of {item} skipped: {} was not propagated", sc.id);
                    return None;
                };
                let grid = match item.grid_index {
                    Some(g) => match &grid_points[g] {
                        Some(points) => Some(GridPoints {
                            id: self.grids[g].id(),
                            points,
                        }),
                        None => {
                            warn!("{coverage_mode} of {item} skipped: no points for grid `{}`", self.grids[g].id());
                            return None;
                        }
                    },
                    None => None,
                };
                let instrument = &sc.instruments[item.instrument_index];
                let access_file = self.sat_dir(item.sc_index).join(item.file_name("access"));
                match calculator.execute(
                    propagation,
                    instrument,
                    &instrument.modes[item.mode_index],
                    grid,
                    &access_file,
                ) {
                    Ok(artifact) => Some(Artifact::Coverage(artifact)),
                    Err(e) => {
                        warn!("{coverage_mode} of {item} failed: {e}");
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let scope = items
            .iter()
            .map(|item| item.key(&self.spacecraft, &self.grids))
            .collect::<Vec<_>>();
        self.registry
            .supersede(ArtifactKind::Coverage, scope, records.clone());
        records
    }

    fn load_grid_points(&self) -> Vec<Option<Vec<GeoPoint>>> {
        self.grids
            .iter()
            .map(|grid| match grid.points() {
                Ok(Some(points)) => Some(points),
                Ok(None) => {
                    warn!("{grid} has not been written");
                    None
                }
                Err(e) => {
                    warn!("{grid} could not be read: {e}");
                    None
                }
            })
            .collect()
    }

    fn compute_data_metrics(&mut self, coverage_mode: CoverageMode) -> Vec<Artifact> {
        let items = coverage_work_items(&self.spacecraft, &self.grids, coverage_mode);
        let calculator = DataMetricsCalculator;

        let records = self
            .run_parallel("data metrics", &items, |item| {
                let key = item.key(&self.spacecraft, &self.grids);
                let Some(coverage) = self
                    .registry
                    .find_one(ArtifactKind::Coverage, &key)
                    .and_then(Artifact::as_coverage)
                else {
                    warn!("data metrics of {item} skipped: no {coverage_mode} artifact");
                    return None;
                };
                let data_metrics_file = self
                    .sat_dir(item.sc_index)
                    .join(item.file_name("datametrics"));
                match calculator.execute(coverage, &data_metrics_file) {
                    Ok(artifact) => Some(Artifact::DataMetrics(artifact)),
                    Err(e) => {
                        warn!("data metrics of {item} failed: {e}");
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let scope = items
            .iter()
            .map(|item| item.key(&self.spacecraft, &self.grids))
            .collect::<Vec<_>>();
        info!("data metrics of {} access file(s) computed", records.len());
        self.registry
            .supersede(ArtifactKind::DataMetrics, scope, records.clone());
        records
    }

    fn find_ground_contacts(&mut self) -> Vec<Artifact> {
        let items = ground_contact_work_items(self.spacecraft.len(), self.ground_stations.len());
        let finder = ContactFinder::new(self.settings.contact_out_type);

        let records = self
            .run_parallel("ground contacts", &items, |item| {
                let sc = &self.spacecraft[item.sc_index];
                let station = &self.ground_stations[item.station_index];
                let Some(propagation) = self.propagation_of(sc) else {
                    warn!("contacts of {} with {} skipped: no states", sc.id, station.id);
                    return None;
                };
                let contact_file = self
                    .sat_dir(item.sc_index)
                    .join(format!("gndStn{}_contacts.csv", item.station_index));
                match finder.ground_station(propagation, station, &contact_file) {
                    Ok(artifact) => Some(Artifact::GroundContact(artifact)),
                    Err(e) => {
                        warn!("contacts of {} with {} failed: {e}", sc.id, station.id);
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let scope = items
            .iter()
            .map(|item| item.key(&self.spacecraft, &self.ground_stations))
            .collect::<Vec<_>>();
        info!("{} ground station contact file(s) written", records.len());
        self.registry
            .supersede(ArtifactKind::GroundContact, scope, records.clone());
        records
    }

    fn find_inter_satellite_contacts(&mut self) -> Vec<Artifact> {
        let items = inter_satellite_work_items(self.spacecraft.len());
        let comm_dir = self.settings.out_dir.join("comm");
        if !items.is_empty() {
            if let Err(e) = fs::create_dir_all(&comm_dir) {
                warn!("inter-satellite contacts skipped: cannot create {}: {e}", comm_dir.display());
                return Vec::new();
            }
        }
        let finder = ContactFinder::new(self.settings.contact_out_type);
        let opaque_atmos_height_km = self.settings.opaque_atmos_height_km;

        let records = self
            .run_parallel("inter-satellite contacts", &items, |item| {
                let first = &self.spacecraft[item.first_index];
                let second = &self.spacecraft[item.second_index];
                let (Some(first_prop), Some(second_prop)) =
                    (self.propagation_of(first), self.propagation_of(second))
                else {
                    warn!("contacts of {} with {} skipped: no states", first.id, second.id);
                    return None;
                };
                let contact_file = comm_dir.join(format!(
                    "sat{}_to_sat{}.csv",
                    item.first_index, item.second_index
                ));
                match finder.inter_satellite(first_prop, second_prop, opaque_atmos_height_km, &contact_file) {
                    Ok(artifact) => Some(Artifact::InterSatelliteContact(artifact)),
                    Err(e) => {
                        warn!("contacts of {} with {} failed: {e}", first.id, second.id);
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let scope = items
            .iter()
            .map(|item| item.key(&self.spacecraft))
            .collect::<Vec<_>>();
        info!("{} inter-satellite contact file(s) written", records.len());
        self.registry
            .supersede(ArtifactKind::InterSatelliteContact, scope, records.clone());
        records
    }

    fn find_eclipses(&mut self) -> Vec<Artifact> {
        let finder = EclipseFinder::new(self.settings.eclipse_out_type);
        let indices = (0..self.spacecraft.len()).collect::<Vec<_>>();

        let records = self
            .run_parallel("eclipses", &indices, |&idx| {
                let sc = &self.spacecraft[idx];
                let Some(propagation) = self.propagation_of(sc) else {
                    warn!("eclipses of {} skipped: no states", sc.id);
                    return None;
                };
                match finder.execute(propagation, &self.sat_dir(idx).join("eclipses.csv")) {
                    Ok(artifact) => Some(Artifact::Eclipse(artifact)),
                    Err(e) => {
                        warn!("eclipses of {} failed: {e}", sc.id);
                        None
                    }
                }
            })
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let scope = self
            .spacecraft
            .iter()
            .map(|sc| ArtifactKey::spacecraft(sc.id.clone()))
            .collect::<Vec<_>>();
        info!("eclipses of {} spacecraft found", records.len());
        self.registry
            .supersede(ArtifactKind::Eclipse, scope, records.clone());
        records
    }
}

/// Removes the directory of a spacecraft and its content, and creates it again, empty.
fn recreate_dir(dir: &Path) -> Result<(), PropagationError> {
    let io_error = |action: &'static str| {
        move |source| PropagationError::StateFile {
            source: FileError::Io {
                action,
                path: dir.to_path_buf(),
                source,
            },
        }
    };
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(io_error("remove"))?;
    }
    fs::create_dir_all(dir).map_err(io_error("create"))
}

impl Configurable for Mission {
    type IntermediateRepr = MissionSpec;

    fn from_config(cfg: MissionSpec) -> Result<Self, ConfigError> {
        let invalid = |msg: String| ConfigError::InvalidConfig { msg };
        if !cfg.duration_days.is_finite() || cfg.duration_days <= 0.0 {
            return Err(invalid(format!(
                "mission duration must be strictly positive, got {} days",
                cfg.duration_days
            )));
        }

        let mut spacecraft = cfg.spacecraft;
        for constellation in &cfg.constellations {
            let members = constellation
                .spacecraft()
                .map_err(|e| invalid(format!("constellation `{}`: {e}", constellation.id)))?;
            info!(
                "constellation `{}` expanded into {} spacecraft",
                constellation.id,
                members.len()
            );
            spacecraft.extend(members);
        }

        ensure_unique("spacecraft", spacecraft.iter().map(|sc| sc.id.as_str())).map_err(invalid)?;
        for sc in &spacecraft {
            ensure_unique("instrument", sc.instruments.iter().map(|i| i.id.as_str())).map_err(invalid)?;
        }
        ensure_unique("grid", cfg.grids.iter().map(|g| g.id())).map_err(invalid)?;
        ensure_unique("ground station", cfg.ground_stations.iter().map(|gs| gs.id.as_str()))
            .map_err(invalid)?;

        let mut mission = Self::new(cfg.epoch, cfg.duration_days);
        mission.update_propagator(cfg.propagator);
        mission.spacecraft = spacecraft;
        mission.grids = cfg.grids;
        mission.ground_stations = cfg.ground_stations;
        mission.settings = cfg.settings;
        Ok(mission)
    }

    fn to_config(&self) -> Result<MissionSpec, ConfigError> {
        Ok(MissionSpec {
            epoch: self.epoch,
            duration_days: self.duration_days,
            spacecraft: self.spacecraft.clone(),
            constellations: Vec::new(),
            propagator: self.propagator.clone(),
            grids: self.grids.clone(),
            ground_stations: self.ground_stations.clone(),
            settings: self.settings.clone(),
        })
    }
}

impl Mission {
    /// Loads the mission specification from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MissionError> {
        Self::from_yaml(path).context(ConfigSnafu)
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Mission from {} over {} days with the {}",
            self.epoch, self.duration_days, self.stepper
        )?;
        for sc in &self.spacecraft {
            writeln!(f, "  {sc}")?;
        }
        for grid in &self.grids {
            writeln!(f, "  {grid}")?;
        }
        for station in &self.ground_stations {
            writeln!(f, "  {station}")?;
        }
        write!(f, "  {}", self.settings)
    }
}
