//! Exclusion list endpoints

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Json,
    Form,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{handle_form_rejection, ApiError, ErrorResponse, Result};
use crate::services::ExclusionList;

/// Form body for add/remove
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExcludeForm {
    /// Comma-separated reporter logins
    pub exclude: Option<String>,
}

fn batch(form: std::result::Result<Form<ExcludeForm>, FormRejection>) -> Result<String> {
    let Form(form) = form.map_err(handle_form_rejection)?;
    form.exclude.ok_or_else(|| ApiError::missing_field("exclude"))
}

/// List excluded reporters
/// GET /listener/excludes
#[utoipa::path(
    get,
    path = "/listener/excludes",
    tag = "listener",
    responses(
        (status = 200, description = "Current exclusion list", body = Vec<String>)
    )
)]
pub async fn list_excludes(State(exclusions): State<ExclusionList>) -> Json<Vec<String>> {
    Json(exclusions.list().await)
}

/// Add reporters to the exclusion list
/// POST /listener/excludes
#[utoipa::path(
    post,
    path = "/listener/excludes",
    tag = "listener",
    request_body(content = ExcludeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Updated exclusion list", body = Vec<String>),
        (status = 400, description = "Missing or malformed form", body = ErrorResponse)
    )
)]
pub async fn add_excludes(
    State(exclusions): State<ExclusionList>,
    form: std::result::Result<Form<ExcludeForm>, FormRejection>,
) -> Result<Json<Vec<String>>> {
    let batch = batch(form)?;
    let current = exclusions.add(&batch).await;

    info!("Exclusion list updated (+{:?}), {} entries", batch, current.len());
    Ok(Json(current))
}

/// Remove reporters from the exclusion list
/// DELETE /listener/excludes
#[utoipa::path(
    delete,
    path = "/listener/excludes",
    tag = "listener",
    request_body(content = ExcludeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reporters removed"),
        (status = 400, description = "Missing or malformed form", body = ErrorResponse)
    )
)]
pub async fn remove_excludes(
    State(exclusions): State<ExclusionList>,
    form: std::result::Result<Form<ExcludeForm>, FormRejection>,
) -> Result<StatusCode> {
    let batch = batch(form)?;
    let current = exclusions.remove(&batch).await;

    info!("Exclusion list updated (-{:?}), {} entries", batch, current.len());
    Ok(StatusCode::OK)
}
