use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Collision, LhrError, Result};

/// A selected snapshot paired with the path it restores to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub resource: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

/// Resolved files whose destination paths are pairwise distinct.
///
/// Only [`validate`] builds one, so holding a `ResolvedSet` means the
/// collision check has passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    files: Vec<ResolvedFile>,
}

impl ResolvedSet {
    pub fn files(&self) -> &[ResolvedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Check every destination is unique, reporting all collisions at once
pub fn validate(files: Vec<ResolvedFile>) -> Result<ResolvedSet> {
    let mut by_destination: HashMap<&PathBuf, Vec<usize>> = HashMap::new();
    for (index, file) in files.iter().enumerate() {
        by_destination
            .entry(&file.destination_path)
            .or_default()
            .push(index);
    }

    let mut collisions: Vec<Collision> = by_destination
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(destination, indices)| Collision {
            destination: destination.clone(),
            sources: indices
                .iter()
                .map(|&i| (files[i].resource.clone(), files[i].source_path.clone()))
                .collect(),
        })
        .collect();

    if collisions.is_empty() {
        Ok(ResolvedSet { files })
    } else {
        collisions.sort_by(|a, b| a.destination.cmp(&b.destination));
        Err(LhrError::Validation { collisions })
    }
}
