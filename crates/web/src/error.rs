// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("missing or unparseable field: {0}")]
    BadRequest(String),

    #[error("job not found")]
    NotFound,

    #[error("job already exists")]
    Conflict,

    #[error(transparent)]
    Engine(#[from] fc_engine::EngineError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::BadRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::NotFound | WebError::Conflict => StatusCode::CONFLICT,
            WebError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
