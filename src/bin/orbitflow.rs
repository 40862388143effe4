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

extern crate clap;
extern crate log;
extern crate orbitflow;
extern crate pretty_env_logger;

use clap::Parser;
use log::{error, info};
use orbitflow::io::ConfigRepr;
use orbitflow::md::{ArtifactKind, Mission, MissionError};
use std::env::{set_var, var};
use std::path::PathBuf;

const LOG_VAR: &str = "ORBITFLOW_LOG";

#[derive(Parser)]
#[command(
    name = "orbitflow",
    about = "Propagates a fleet of spacecraft and computes its coverage, contacts and eclipses",
    version
)]
struct Cli {
    /// Mission specification (YAML)
    mission: PathBuf,

    /// Output directory, overrides the one of the mission settings
    #[arg(long)]
    out: Option<PathBuf>,

    /// Where to write the snapshot of the mission and the artifacts it produced
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Hide the progress bars
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<(), MissionError> {
    let cli = Cli::parse();

    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }

    if pretty_env_logger::try_init_custom_env(LOG_VAR).is_err() {
        println!("could not init logger");
    }

    let mut mission = Mission::load(&cli.mission)
        .inspect_err(|e| error!("{e}"))?
        .with_progress(!cli.quiet);
    if let Some(out_dir) = cli.out {
        let mut settings = mission.settings().clone();
        settings.out_dir = out_dir;
        mission.update_settings(settings);
    }
    info!("Loaded mission `{}`\n{mission}", cli.mission.display());

    let produced = mission.execute()?;
    for kind in [
        ArtifactKind::GridWrite,
        ArtifactKind::Propagation,
        ArtifactKind::Coverage,
        ArtifactKind::DataMetrics,
        ArtifactKind::GroundContact,
        ArtifactKind::InterSatelliteContact,
        ArtifactKind::Eclipse,
    ] {
        let count = produced.iter().filter(|a| a.kind() == kind).count();
        if count > 0 {
            info!("{count} {kind} artifact(s)");
        }
    }

    if let Some(path) = cli.snapshot {
        mission
            .to_snapshot()
            .and_then(|snapshot| snapshot.dump(&path))
            .map_err(|source| MissionError::Config { source })?;
        info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
