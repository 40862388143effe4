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

use super::artifact::{Artifact, ArtifactKey, ArtifactKind, KeyFilter};
use serde_derive::{Deserialize, Serialize};
use std::collections::HashSet;

/// The records of every artifact produced by the pipeline, in insertion order.
///
/// There is never more than one record of a given kind with a given key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRegistry {
    records: Vec<Artifact>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the records.
    ///
    /// # Panics
    /// If a record of the same kind and key is already registered (or is provided twice).
    pub fn insert<I: IntoIterator<Item = Artifact>>(&mut self, records: I) {
        for record in records {
            let (kind, key) = (record.kind(), record.key());
            assert!(
                !self.contains(kind, &key),
                "{kind} artifact {key} is already registered"
            );
            self.records.push(record);
        }
    }

    /// Removes every record of this kind for which the predicate holds, returns the number of records removed.
    pub fn delete_matching<F>(&mut self, kind: ArtifactKind, predicate: F) -> usize
    where
        F: Fn(&Artifact) -> bool,
    {
        let before = self.records.len();
        self.records
            .retain(|record| record.kind() != kind || !predicate(record));
        before - self.records.len()
    }

    /// Replaces the records of a stage: every record of this kind whose key is in the scope or is the key of one
    /// of the new records is removed, and the new records are appended.
    pub fn supersede<I>(&mut self, kind: ArtifactKind, scope: I, records: Vec<Artifact>)
    where
        I: IntoIterator<Item = ArtifactKey>,
    {
        let mut keys: HashSet<ArtifactKey> = scope.into_iter().collect();
        keys.extend(records.iter().map(Artifact::key));
        let removed = self.delete_matching(kind, |record| keys.contains(&record.key()));
        debug!(
            "superseding {removed} {kind} artifact(s) with {} new one(s)",
            records.len()
        );
        self.insert(records);
    }

    /// Returns the first record of this kind which matches the filter.
    pub fn find_one(&self, kind: ArtifactKind, filter: &KeyFilter) -> Option<&Artifact> {
        self.records
            .iter()
            .find(|record| record.kind() == kind && record.key().matches(filter))
    }

    pub fn contains(&self, kind: ArtifactKind, key: &ArtifactKey) -> bool {
        self.records
            .iter()
            .any(|record| record.kind() == kind && &record.key() == key)
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.records.iter().filter(|r| r.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
