// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translating the `command, minute, hour, dom, month, dow` form fields
//! (plus `disabled`/`payload` where applicable) into domain types.

use fc_core::{CronPattern, Job};
use serde::Deserialize;

use crate::error::WebError;

#[derive(Debug, Deserialize)]
pub struct JobForm {
    pub command: String,
    #[serde(default = "default_wildcard")]
    pub minute: String,
    #[serde(default = "default_wildcard")]
    pub hour: String,
    #[serde(default = "default_wildcard")]
    pub dom: String,
    #[serde(default = "default_wildcard")]
    pub month: String,
    #[serde(default = "default_wildcard")]
    pub dow: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

fn default_wildcard() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PidForm {
    pub command: String,
    #[serde(default = "default_wildcard")]
    pub minute: String,
    #[serde(default = "default_wildcard")]
    pub hour: String,
    #[serde(default = "default_wildcard")]
    pub dom: String,
    #[serde(default = "default_wildcard")]
    pub month: String,
    #[serde(default = "default_wildcard")]
    pub dow: String,
    #[serde(default)]
    pub pid: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ImportForm {
    pub payload: String,
}

pub fn build_pattern(minute: &str, hour: &str, dom: &str, month: &str, dow: &str) -> Result<CronPattern, WebError> {
    if minute.trim().is_empty() || hour.trim().is_empty() || dom.trim().is_empty() {
        return Err(WebError::BadRequest("cron fields must not be empty".to_string()));
    }
    if minute.trim_start().starts_with('@') {
        return CronPattern::parse(minute.trim()).map_err(|e| WebError::BadRequest(e.to_string()));
    }
    let spec = format!("{minute} {hour} {dom} {month} {dow}");
    CronPattern::parse(&spec).map_err(|e| WebError::BadRequest(e.to_string()))
}

impl JobForm {
    pub fn into_job(self) -> Result<Job, WebError> {
        if self.command.trim().is_empty() {
            return Err(WebError::BadRequest("command must not be empty".to_string()));
        }
        let pattern = build_pattern(&self.minute, &self.hour, &self.dom, &self.month, &self.dow)?;
        let mut job = Job::new(pattern, self.command);
        job.user = self.user;
        job.enabled = !self.disabled;
        Ok(job)
    }
}

impl PidForm {
    pub fn into_lookup(self) -> Result<(CronPattern, String, Option<u32>), WebError> {
        if self.command.trim().is_empty() {
            return Err(WebError::BadRequest("command must not be empty".to_string()));
        }
        let pattern = build_pattern(&self.minute, &self.hour, &self.dom, &self.month, &self.dow)?;
        Ok((pattern, self.command, self.pid))
    }
}
