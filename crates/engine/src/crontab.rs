// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Syncing owned jobs into the local system crontab via marker comments, so
//! `crontab -l` for a job's user reflects what this node currently owns.
//! Each managed line carries a trailing `# fleetcron:<hash>` comment derived
//! only from `(pattern, command)`, the same tuple the store uses for job
//! equality, so the marker survives result-field updates untouched.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::process::Stdio;

use fc_core::{CronField, CronPattern, Job};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::EngineError;

const DEFAULT_USER: &str = "root";
const MARKER_PREFIX: &str = "fleetcron:";

fn marker(job: &Job) -> String {
    let mut hasher = DefaultHasher::new();
    job.pattern.hash(&mut hasher);
    job.command.hash(&mut hasher);
    format!("{MARKER_PREFIX}{:016x}", hasher.finish())
}

fn render_field(field: &CronField, wildcard: &str) -> String {
    match field {
        CronField::Any => wildcard.to_string(),
        CronField::Values(values) => values.iter().map(u32::to_string).collect::<Vec<_>>().join(","),
    }
}

fn render_pattern(pattern: &CronPattern) -> String {
    if pattern.reboot {
        return "@reboot".to_string();
    }
    format!(
        "{} {} {} {} {}",
        render_field(&pattern.minute, "*"),
        render_field(&pattern.hour, "*"),
        render_field(&pattern.day_of_month, "*"),
        render_field(&pattern.month, "*"),
        render_field(&pattern.day_of_week, "*"),
    )
}

fn render_line(job: &Job) -> String {
    format!("{} {} # {}", render_pattern(&job.pattern), job.command, marker(job))
}

fn crontab_error(user: &str, source: std::io::Error) -> EngineError {
    EngineError::Crontab { user: user.to_string(), source }
}

async fn read_crontab(user: &str) -> Result<String, EngineError> {
    let output = Command::new("crontab")
        .arg("-l")
        .arg("-u")
        .arg(user)
        .output()
        .await
        .map_err(|source| crontab_error(user, source))?;
    // A user with no crontab yet exits non-zero; treated as an empty one.
    if !output.status.success() {
        return Ok(String::new());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn write_crontab(user: &str, contents: &str) -> Result<(), EngineError> {
    let mut child = Command::new("crontab")
        .arg("-u")
        .arg(user)
        .arg("-")
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| crontab_error(user, source))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| crontab_error(user, std::io::Error::other("crontab child has no stdin")))?;
    stdin.write_all(contents.as_bytes()).await.map_err(|source| crontab_error(user, source))?;
    drop(stdin);

    let status = child.wait().await.map_err(|source| crontab_error(user, source))?;
    if !status.success() {
        return Err(crontab_error(user, std::io::Error::other("crontab write exited non-zero")));
    }
    Ok(())
}

fn append_line(existing: String, line: &str) -> String {
    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(line);
    updated.push('\n');
    updated
}

fn drop_matching_lines(existing: &str, needle: &str) -> String {
    let kept: Vec<&str> = existing.lines().filter(|line| !line.contains(needle)).collect();
    if kept.is_empty() { String::new() } else { format!("{}\n", kept.join("\n")) }
}

/// Append `job`'s line if a line carrying its marker isn't already present.
pub async fn append(job: &Job) -> Result<(), EngineError> {
    let user = job.user.as_deref().unwrap_or(DEFAULT_USER);
    let existing = read_crontab(user).await?;
    let marker = marker(job);
    if existing.lines().any(|line| line.contains(&marker)) {
        return Ok(());
    }
    write_crontab(user, &append_line(existing, &render_line(job))).await
}

/// Remove `job`'s line, matched by its marker comment.
pub async fn remove(job: &Job) -> Result<(), EngineError> {
    let user = job.user.as_deref().unwrap_or(DEFAULT_USER);
    let existing = read_crontab(user).await?;
    let marker = marker(job);
    write_crontab(user, &drop_matching_lines(&existing, &marker)).await
}

/// Remove every fleetcron-managed line for `user` (used on a `Rebalance`).
pub async fn purge_all(user: &str) -> Result<(), EngineError> {
    let existing = read_crontab(user).await?;
    write_crontab(user, &drop_matching_lines(&existing, MARKER_PREFIX)).await
}

/// Does `user`'s real crontab carry a marker for every job in `jobs`, with
/// no stray managed lines left over? Backs the `/cron_in_sync` web route.
pub async fn in_sync(user: &str, jobs: &[Job]) -> Result<bool, EngineError> {
    let existing = read_crontab(user).await?;
    let present: Vec<&str> = existing.lines().filter(|line| line.contains(MARKER_PREFIX)).collect();
    if present.len() != jobs.len() {
        return Ok(false);
    }
    Ok(jobs.iter().all(|job| {
        let marker = marker(job);
        present.iter().any(|line| line.contains(&marker))
    }))
}

#[cfg(test)]
#[path = "crontab_tests.rs"]
mod tests;
