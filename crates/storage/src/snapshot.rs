// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic, self-describing snapshot files: `cluster_status.json` for the
//! status history, `cluster_jobs.json` for the job set. Each carries a
//! schema version so a file from an older, incompatible layout can be
//! recognized and skipped rather than misread.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use fc_core::{Job, NodeStatus};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

const SCHEMA_VERSION: u32 = 1;
const STATUS_FILE: &str = "cluster_status.json";
const JOBS_FILE: &str = "cluster_jobs.json";

#[derive(Serialize, Deserialize)]
struct StatusSnapshot {
    version: u32,
    history: HashMap<Ipv4Addr, Vec<NodeStatus>>,
}

#[derive(Serialize, Deserialize)]
struct JobsSnapshot {
    version: u32,
    jobs: Vec<Job>,
}

/// Write both snapshot files under `prefix`, each via write-to-temp then
/// rename so a reader never observes a partially written file.
pub fn save(
    prefix: &Path,
    history: &HashMap<Ipv4Addr, Vec<NodeStatus>>,
    jobs: &HashSet<Job>,
) -> Result<(), StorageError> {
    std::fs::create_dir_all(prefix).map_err(|source| StorageError::Write {
        path: prefix.to_path_buf(),
        source,
    })?;

    let status_snapshot = StatusSnapshot { version: SCHEMA_VERSION, history: history.clone() };
    let jobs_snapshot =
        JobsSnapshot { version: SCHEMA_VERSION, jobs: jobs.iter().cloned().collect() };

    write_atomic(&prefix.join(STATUS_FILE), &status_snapshot)?;
    write_atomic(&prefix.join(JOBS_FILE), &jobs_snapshot)?;
    Ok(())
}

/// Load both snapshot files under `prefix`. A missing directory or missing
/// file is treated as "nothing persisted yet" rather than an error; a file
/// whose schema version does not match is ignored with a warning, same as
/// a missing file.
pub fn load(
    prefix: &Path,
) -> Result<(HashMap<Ipv4Addr, Vec<NodeStatus>>, HashSet<Job>), StorageError> {
    let history = read_optional::<StatusSnapshot>(&prefix.join(STATUS_FILE))
        .map(|s| s.history)
        .unwrap_or_default();
    let jobs = read_optional::<JobsSnapshot>(&prefix.join(JOBS_FILE))
        .map(|s| s.jobs.into_iter().collect())
        .unwrap_or_default();
    Ok((history, jobs))
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let tmp_path = tmp_path_for(path);
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(&tmp_path, &bytes).map_err(|source| StorageError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn read_optional<T>(path: &Path) -> Option<T>
where
    T: for<'de> Deserialize<'de> + HasVersion,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "snapshot read failed, continuing without persistence");
            return None;
        }
    };
    match serde_json::from_slice::<T>(&bytes) {
        Ok(value) if value.version() == SCHEMA_VERSION => Some(value),
        Ok(value) => {
            tracing::warn!(
                path = %path.display(),
                found_version = value.version(),
                expected_version = SCHEMA_VERSION,
                "snapshot schema version mismatch, ignoring"
            );
            None
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "snapshot decode failed, ignoring");
            None
        }
    }
}

trait HasVersion {
    fn version(&self) -> u32;
}

impl HasVersion for StatusSnapshot {
    fn version(&self) -> u32 {
        self.version
    }
}

impl HasVersion for JobsSnapshot {
    fn version(&self) -> u32 {
        self.version
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
