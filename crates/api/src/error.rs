use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use ui::views::{ChartError, SelectionError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("session_id must not be empty")]
    MissingSession,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Selection(_) | Self::MissingSession => StatusCode::BAD_REQUEST,
            Self::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
