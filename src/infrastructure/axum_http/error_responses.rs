use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::application::usecases::plan_cache::PlanFetchError;

pub const PLANS_UNAVAILABLE_MESSAGE: &str = "Failed to fetch plans";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("plans unavailable: {0}")]
    PlansUnavailable(#[from] PlanFetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Don't leak store details to the client.
            AppError::PlansUnavailable(err) => (err.status_code(), PLANS_UNAVAILABLE_MESSAGE),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}
