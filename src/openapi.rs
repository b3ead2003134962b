//! OpenAPI document for the listener API

use utoipa::OpenApi;

use crate::error::{ErrorCode, ErrorDetail, ErrorResponse};
use crate::handlers::{excludes, health, notify};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Issue Notifier",
        description = "Emails maintainers when a non-member opens a GitHub issue"
    ),
    paths(
        health::health_check,
        notify::notify,
        excludes::list_excludes,
        excludes::add_excludes,
        excludes::remove_excludes,
    ),
    components(schemas(
        health::HealthStatus,
        excludes::ExcludeForm,
        ErrorResponse,
        ErrorDetail,
        ErrorCode,
    )),
    tags(
        (name = "listener", description = "GitHub webhook and exclusion list"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
