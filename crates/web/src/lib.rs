// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fc-web: the HTTP surface over the cluster store — JSON views plus
//! form-driven job mutation, translating every write into a broadcastable
//! [`fc_wire::Message`].

pub mod error;
pub mod forms;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use error::WebError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/list_nodes", get(routes::list_nodes))
        .route("/list_jobs", get(routes::list_jobs))
        .route("/status", get(routes::status))
        .route("/jobs", get(routes::jobs))
        .route("/cron_in_sync", get(routes::cron_in_sync))
        .route("/export", get(routes::export))
        .route("/add_job", post(routes::add_job))
        .route("/remove_job", post(routes::remove_job))
        .route("/run_job", post(routes::run_job))
        .route("/kill_job", post(routes::kill_job))
        .route("/toggle_job", post(routes::toggle_job))
        .route("/get_job_log", post(routes::get_job_log))
        .route("/import", post(routes::import))
        .with_state(state)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
