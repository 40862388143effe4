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

use super::{MissingStatesSnafu, StageError};
use crate::cosmic::EclipseLocator;
use crate::io::header::FileHeader;
use crate::io::interval_file::{write_details, write_intervals, OutType};
use crate::io::state_file::StateSeries;
use crate::md::artifact::{EclipseArtifact, PropagationArtifact};
use snafu::prelude::*;
use std::path::Path;

/// Finds when a spacecraft is in the shadow of the Earth.
#[derive(Copy, Clone, Debug, Default)]
pub struct EclipseFinder {
    pub locator: EclipseLocator,
    pub out_type: OutType,
}

impl EclipseFinder {
    pub fn new(out_type: OutType) -> Self {
        Self {
            locator: EclipseLocator::default(),
            out_type,
        }
    }

    pub fn execute(
        &self,
        propagation: &PropagationArtifact,
        eclipse_file: &Path,
    ) -> Result<EclipseArtifact, StageError> {
        let state_cart_file =
            propagation
                .state_cart_file
                .as_deref()
                .context(MissingStatesSnafu {
                    spacecraft_id: propagation.spacecraft_id.clone(),
                })?;
        let series = StateSeries::load(state_cart_file)?;

        let flags = (0..series.len())
            .map(|idx| {
                self.locator
                    .is_eclipsed(&series.position(idx), series.jd_at(idx))
            })
            .collect::<Vec<_>>();

        let header = FileHeader {
            title: format!(
                "Eclipse times for Spacecraft with id {}",
                propagation.spacecraft_id
            ),
            epoch_jd: series.header.epoch_jd,
            step_s: series.header.step_s,
            duration_days: None,
        };
        match self.out_type {
            OutType::Interval => write_intervals(eclipse_file, &header, &flags)?,
            OutType::Detail => {
                let rows = flags.iter().map(|&f| (f, Vec::new())).collect::<Vec<_>>();
                write_details(eclipse_file, &header, "eclipse", &[], &rows)?;
            }
        }

        debug!(
            "{} is eclipsed {} time(s) out of {}",
            propagation.spacecraft_id,
            flags.iter().filter(|&&f| f).count(),
            flags.len()
        );

        Ok(EclipseArtifact {
            spacecraft_id: propagation.spacecraft_id.clone(),
            state_cart_file: state_cart_file.to_path_buf(),
            eclipse_file: eclipse_file.to_path_buf(),
            out_type: self.out_type,
            start_epoch: propagation.start_epoch,
            duration_days: propagation.duration_days,
        })
    }
}
