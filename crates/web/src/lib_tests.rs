// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use fc_storage::ClusterStore;
use fc_transport::UdpTransport;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::forms::{JobForm, PidForm};
use crate::routes;
use crate::state::AppState;

const SELF_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

async fn new_state() -> AppState {
    let store = Arc::new(parking_lot::Mutex::new(ClusterStore::new(None)));
    let transport = Arc::new(UdpTransport::bind(0).await.unwrap());
    AppState::new(store, transport, None, None, SELF_IP)
}

fn job_form(command: &str) -> JobForm {
    JobForm {
        command: command.to_string(),
        minute: "*".to_string(),
        hour: "*".to_string(),
        dom: "*".to_string(),
        month: "*".to_string(),
        dow: "*".to_string(),
        user: None,
        disabled: false,
    }
}

fn pid_form(command: &str) -> PidForm {
    PidForm {
        command: command.to_string(),
        minute: "*".to_string(),
        hour: "*".to_string(),
        dom: "*".to_string(),
        month: "*".to_string(),
        dow: "*".to_string(),
        pid: None,
    }
}

#[tokio::test]
async fn add_job_creates_and_rejects_a_duplicate() {
    let state = new_state().await;
    let status = routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(state.store.lock().job_count(), 1);

    let err = routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap_err();
    assert!(matches!(err, crate::error::WebError::Conflict));
}

#[tokio::test]
async fn add_job_rejects_an_empty_command() {
    let state = new_state().await;
    let err = routes::add_job(State(state), Form(job_form(""))).await.unwrap_err();
    assert!(matches!(err, crate::error::WebError::BadRequest(_)));
}

#[tokio::test]
async fn remove_job_on_an_unknown_job_is_a_conflict() {
    let state = new_state().await;
    let err = routes::remove_job(State(state), Form(job_form("echo hi"))).await.unwrap_err();
    assert!(matches!(err, crate::error::WebError::NotFound));
}

#[tokio::test]
async fn remove_job_removes_an_existing_job_and_accepts() {
    let state = new_state().await;
    routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();

    let status = routes::remove_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(state.store.lock().job_count(), 0);
}

#[tokio::test]
async fn run_job_on_an_unknown_job_is_a_conflict() {
    let state = new_state().await;
    let err = routes::run_job(State(state), Form(pid_form("echo hi"))).await.unwrap_err();
    assert!(matches!(err, crate::error::WebError::NotFound));
}

#[tokio::test]
async fn run_job_on_a_known_job_accepts() {
    let state = new_state().await;
    routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();

    let status = routes::run_job(State(state.clone()), Form(pid_form("echo hi"))).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn toggle_job_on_a_known_job_accepts() {
    let state = new_state().await;
    routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();

    let status = routes::toggle_job(State(state.clone()), Form(pid_form("echo hi"))).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn list_jobs_reflects_additions() {
    let state = new_state().await;
    routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();

    let axum::Json(jobs) = routes::list_jobs(State(state)).await;
    assert_eq!(jobs.len(), 1);
}

#[tokio::test]
async fn export_round_trips_through_import() {
    let state = new_state().await;
    routes::add_job(State(state.clone()), Form(job_form("echo hi"))).await.unwrap();

    let axum::Json(exported) = routes::export(State(state.clone())).await;
    let payload = serde_json::to_string(&exported).unwrap();

    let other = new_state().await;
    let status = routes::import(
        State(other.clone()),
        Form(crate::forms::ImportForm { payload }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(other.store.lock().job_count(), 1);
}
