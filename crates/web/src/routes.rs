// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers translating form submissions into broadcastable messages
//! and JSON/HTML views of the local store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, Json};
use fc_core::{Job, NodeStatus};
use fc_wire::Message;
use serde::Serialize;

use crate::error::WebError;
use crate::forms::{ImportForm, JobForm, PidForm};
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock();
    let node_count = store.cluster_state().count();
    let job_count = store.job_count();
    Html(format!(
        "<html><body><h1>fleetcron</h1><p>{node_count} node(s), {job_count} job(s)</p></body></html>"
    ))
}

pub async fn list_nodes(State(state): State<AppState>) -> Json<Vec<NodeStatus>> {
    let store = state.store.lock();
    Json(store.cluster_state().cloned().collect())
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    let store = state.store.lock();
    Json(store.jobs().cloned().collect())
}

#[derive(Serialize)]
pub struct StatusView {
    self_ip: std::net::Ipv4Addr,
    node_count: usize,
    job_count: usize,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusView> {
    let store = state.store.lock();
    Json(StatusView {
        self_ip: state.self_ip,
        node_count: store.cluster_state().count(),
        job_count: store.job_count(),
    })
}

#[derive(Serialize)]
pub struct JobsByNode {
    ip: std::net::Ipv4Addr,
    jobs: Vec<Job>,
}

pub async fn jobs(State(state): State<AppState>) -> Json<Vec<JobsByNode>> {
    let store = state.store.lock();
    let mut by_node: std::collections::HashMap<std::net::Ipv4Addr, Vec<Job>> = std::collections::HashMap::new();
    for job in store.jobs() {
        if let Some(ip) = job.assigned_to {
            by_node.entry(ip).or_default().push(job.clone());
        }
    }
    Json(by_node.into_iter().map(|(ip, jobs)| JobsByNode { ip, jobs }).collect())
}

#[derive(Serialize)]
pub struct CronInSync {
    in_sync: bool,
}

pub async fn cron_in_sync(State(state): State<AppState>) -> Result<Json<CronInSync>, WebError> {
    let owned: Vec<Job> = {
        let store = state.store.lock();
        store.jobs().filter(|j| j.assigned_to == Some(state.self_ip)).cloned().collect()
    };
    let in_sync = fc_engine::crontab::in_sync(&state.crontab_user(), &owned).await?;
    Ok(Json(CronInSync { in_sync }))
}

pub async fn export(State(state): State<AppState>) -> Json<Vec<Job>> {
    let store = state.store.lock();
    Json(store.jobs().cloned().collect())
}

pub async fn add_job(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<StatusCode, WebError> {
    let job = form.into_job()?;
    {
        let mut store = state.store.lock();
        if store.jobs().any(|existing| *existing == job) {
            return Err(WebError::Conflict);
        }
        store.add_or_update_job(job.clone());
    }
    state.broadcast(&Message::Job(job)).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_job(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<StatusCode, WebError> {
    let job = form.into_job()?;
    let existing = {
        let mut store = state.store.lock();
        let found = store.jobs().find(|j| **j == job).cloned();
        if found.is_some() {
            store.remove_job(&job);
        }
        found
    };
    let Some(mut existing) = existing else { return Err(WebError::NotFound) };
    existing.remove = true;
    state.broadcast(&Message::Job(existing)).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn find_job(state: &AppState, pattern: &fc_core::CronPattern, command: &str) -> Option<Job> {
    let probe = Job::new(pattern.clone(), command);
    state.store.lock().jobs().find(|j| **j == probe).cloned()
}

pub async fn run_job(
    State(state): State<AppState>,
    Form(form): Form<PidForm>,
) -> Result<StatusCode, WebError> {
    let (pattern, command, _pid) = form.into_lookup()?;
    let job = find_job(&state, &pattern, &command).await.ok_or(WebError::NotFound)?;
    state.broadcast(&Message::Run { job }).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn kill_job(
    State(state): State<AppState>,
    Form(form): Form<PidForm>,
) -> Result<StatusCode, WebError> {
    let (pattern, command, pid) = form.into_lookup()?;
    let job = find_job(&state, &pattern, &command).await.ok_or(WebError::NotFound)?;
    let pid = pid.or(job.pid);
    state.broadcast(&Message::Kill { job, pid }).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn toggle_job(
    State(state): State<AppState>,
    Form(form): Form<PidForm>,
) -> Result<StatusCode, WebError> {
    let (pattern, command, _pid) = form.into_lookup()?;
    let job = find_job(&state, &pattern, &command).await.ok_or(WebError::NotFound)?;
    state.broadcast(&Message::Toggle { job }).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn get_job_log(
    State(state): State<AppState>,
    Form(form): Form<PidForm>,
) -> Result<Json<Vec<String>>, WebError> {
    let (pattern, command, _pid) = form.into_lookup()?;
    let job = find_job(&state, &pattern, &command).await.ok_or(WebError::NotFound)?;
    Ok(Json(job.log))
}

pub async fn import(
    State(state): State<AppState>,
    Form(form): Form<ImportForm>,
) -> Result<StatusCode, WebError> {
    let jobs: Vec<Job> =
        serde_json::from_str(&form.payload).map_err(|e| WebError::BadRequest(e.to_string()))?;
    for job in jobs {
        state.store.lock().add_or_update_job(job.clone());
        state.broadcast(&Message::Job(job)).await?;
    }
    Ok(StatusCode::ACCEPTED)
}
