// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five-field cron expression model: parsing, `@` aliases, and the
//! `matches(now)` predicate used by the executor's tick loop.
//!
//! This is a from-scratch reimplementation rather than a binding to a
//! parsing crate: the cron pattern model is core to this system, not an
//! external collaborator to delegate to.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One field of a five-field cron pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CronField {
    /// `*` — matches any value.
    Any,
    /// Explicit set of matching values, expanded from `,` `-` `/` syntax.
    /// Always sorted and deduplicated so two fields parsed from equivalent
    /// but differently-written input compare equal.
    Values(Vec<u32>),
}

impl CronField {
    fn matches(&self, value: u32) -> bool {
        match self {
            CronField::Any => true,
            CronField::Values(values) => values.contains(&value),
        }
    }

    fn from_values(mut values: Vec<u32>) -> Self {
        values.sort_unstable();
        values.dedup();
        CronField::Values(values)
    }
}

/// A five-field cron pattern, plus the `@reboot` flag (which never matches
/// a wall-clock minute — the executor runs it once at node startup instead,
/// per-tick by the executor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CronPattern {
    pub minute: CronField,
    pub hour: CronField,
    pub day_of_month: CronField,
    pub month: CronField,
    pub day_of_week: CronField,
    pub reboot: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronParseError {
    #[error("expected 5 whitespace-separated fields or an @alias, got: {0:?}")]
    WrongFieldCount(String),
    #[error("unknown @alias: {0}")]
    UnknownAlias(String),
    #[error("invalid field {field:?} in {kind}: {source}")]
    InvalidField { kind: &'static str, field: String, source: ParseIntErrorWrap },
    #[error("value {value} out of range [{min}, {max}] for {kind}")]
    OutOfRange { kind: &'static str, value: u32, min: u32, max: u32 },
}

/// Wrapper so `std::num::ParseIntError` can sit inside a `PartialEq` error enum.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseIntErrorWrap(pub String);

impl std::fmt::Display for ParseIntErrorWrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4), ("may", 5), ("jun", 6),
    ("jul", 7), ("aug", 8), ("sep", 9), ("oct", 10), ("nov", 11), ("dec", 12),
];

const DOW_NAMES: &[(&str, u32)] = &[
    ("sun", 0), ("mon", 1), ("tue", 2), ("wed", 3), ("thu", 4), ("fri", 5), ("sat", 6),
];

fn resolve_name(token: &str, names: &[(&str, u32)]) -> Option<u32> {
    let lower = token.to_ascii_lowercase();
    names.iter().find(|(name, _)| *name == lower).map(|(_, v)| *v)
}

fn parse_number(token: &str, kind: &'static str, names: &[(&str, u32)]) -> Result<u32, CronParseError> {
    if let Some(v) = resolve_name(token, names) {
        return Ok(v);
    }
    token
        .parse::<u32>()
        .map_err(|e| CronParseError::InvalidField {
            kind,
            field: token.to_string(),
            source: ParseIntErrorWrap(e.to_string()),
        })
}

fn parse_field(
    raw: &str,
    kind: &'static str,
    min: u32,
    max: u32,
    names: &[(&str, u32)],
) -> Result<CronField, CronParseError> {
    if raw == "*" {
        return Ok(CronField::Any);
    }

    let mut values = Vec::new();
    for part in raw.split(',') {
        let (range_part, step) = match part.split_once('/') {
            Some((r, s)) => (r, Some(s.parse::<u32>().map_err(|e| CronParseError::InvalidField {
                kind,
                field: s.to_string(),
                source: ParseIntErrorWrap(e.to_string()),
            })?)),
            None => (part, None),
        };

        let (lo, hi) = if range_part == "*" {
            (min, max)
        } else if let Some((a, b)) = range_part.split_once('-') {
            (parse_number(a, kind, names)?, parse_number(b, kind, names)?)
        } else {
            let v = parse_number(range_part, kind, names)?;
            (v, v)
        };

        if lo < min || hi > max || lo > hi {
            return Err(CronParseError::OutOfRange { kind, value: lo, min, max });
        }

        let step = step.unwrap_or(1).max(1);
        let mut v = lo;
        while v <= hi {
            values.push(v);
            v += step;
        }
    }

    Ok(CronField::from_values(values))
}

impl CronPattern {
    /// Parse a five-field pattern (`"*/5 * * * *"`) or an `@alias`
    /// (`@reboot`, `@yearly`/`@annually`, `@monthly`, `@weekly`, `@daily`/
    /// `@midnight`, `@hourly`).
    pub fn parse(spec: &str) -> Result<Self, CronParseError> {
        let spec = spec.trim();
        if let Some(alias) = spec.strip_prefix('@') {
            return Self::parse_alias(alias);
        }

        let fields: Vec<&str> = spec.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(CronParseError::WrongFieldCount(spec.to_string()));
        }

        Ok(CronPattern {
            minute: parse_field(fields[0], "minute", 0, 59, &[])?,
            hour: parse_field(fields[1], "hour", 0, 23, &[])?,
            day_of_month: parse_field(fields[2], "day_of_month", 1, 31, &[])?,
            month: parse_field(fields[3], "month", 1, 12, MONTH_NAMES)?,
            day_of_week: parse_field(fields[4], "day_of_week", 0, 6, DOW_NAMES)?,
            reboot: false,
        })
    }

    fn parse_alias(alias: &str) -> Result<Self, CronParseError> {
        let any = || CronField::Any;
        let one = |v: u32| CronField::Values(vec![v]);
        match alias.to_ascii_lowercase().as_str() {
            "reboot" => Ok(CronPattern {
                minute: any(),
                hour: any(),
                day_of_month: any(),
                month: any(),
                day_of_week: any(),
                reboot: true,
            }),
            "yearly" | "annually" => Ok(CronPattern {
                minute: one(0),
                hour: one(0),
                day_of_month: one(1),
                month: one(1),
                day_of_week: any(),
                reboot: false,
            }),
            "monthly" => Ok(CronPattern {
                minute: one(0),
                hour: one(0),
                day_of_month: one(1),
                month: any(),
                day_of_week: any(),
                reboot: false,
            }),
            "weekly" => Ok(CronPattern {
                minute: one(0),
                hour: one(0),
                day_of_month: any(),
                month: any(),
                day_of_week: one(0),
                reboot: false,
            }),
            "daily" | "midnight" => Ok(CronPattern {
                minute: one(0),
                hour: one(0),
                day_of_month: any(),
                month: any(),
                day_of_week: any(),
                reboot: false,
            }),
            "hourly" => Ok(CronPattern {
                minute: one(0),
                hour: any(),
                day_of_month: any(),
                month: any(),
                day_of_week: any(),
                reboot: false,
            }),
            other => Err(CronParseError::UnknownAlias(format!("@{other}"))),
        }
    }

    /// Does this pattern match the given instant, truncated to minute
    /// precision? `@reboot` never matches here — it is handled once at
    /// startup by the executor.
    pub fn matches(&self, now: DateTime<Utc>) -> bool {
        if self.reboot {
            return false;
        }
        let dow = now.weekday().num_days_from_sunday();
        self.minute.matches(now.minute())
            && self.hour.matches(now.hour())
            && self.day_of_month.matches(now.day())
            && self.month.matches(now.month())
            && self.day_of_week.matches(dow)
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
