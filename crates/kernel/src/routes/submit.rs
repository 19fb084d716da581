//! Forwarder endpoints.
//!
//! Both accept the `{formType, data}` envelope. The store route hands it to
//! the store provider, the notify route to the notification provider.
//! Plain `OPTIONS` requests answer 200 with an empty body.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use intake_forms::model::Submission;
use intake_forms::relay::{NOTIFY_FUNCTION_PATH, STORE_FUNCTION_PATH};

use crate::error::{AppError, AppResult, SuccessBody};
use crate::forwarder::Forwarder;
use crate::state::AppState;

/// Create the forwarder router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(STORE_FUNCTION_PATH, post(submit_form).options(preflight))
        .route(NOTIFY_FUNCTION_PATH, post(send_email).options(preflight))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn submit_form(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> AppResult<Json<SuccessBody>> {
    forward(state.store(), "store provider", payload).await?;
    Ok(SuccessBody::new("Form submitted successfully"))
}

async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> AppResult<Json<SuccessBody>> {
    forward(state.notify(), "notification provider", payload).await?;
    Ok(SuccessBody::new("Email sent successfully"))
}

async fn forward(
    forwarder: Option<&Forwarder>,
    route: &'static str,
    payload: Result<Json<Submission>, JsonRejection>,
) -> AppResult<()> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected envelope");
        AppError::BadRequest(rejection.body_text())
    })?;

    let forwarder = forwarder.ok_or(AppError::NotConfigured(route))?;
    forwarder.forward(&submission).await?;
    Ok(())
}
