//! Application form endpoints: submit, list, detail.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::ApplicationRecord;
use crate::submission::submit_application;

#[derive(Deserialize)]
pub struct SubmitApplicationRequest {
    pub record: ApplicationRecord,
    /// Base64 data URL from the signature pad, if signed.
    #[serde(default)]
    pub holder_signature: Option<String>,
    #[serde(default)]
    pub office_signature: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub pdf_url: String,
}

/// `POST /api/applications` — run the full submission flow.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let conn = ctx.connect()?;
    let outcome = submit_application(
        &conn,
        &ctx.blobs,
        &payload.record,
        payload.holder_signature.as_deref(),
        payload.office_signature.as_deref(),
    )?;

    Ok(Json(SubmitResponse {
        id: outcome.id,
        pdf_url: outcome.pdf_url,
    }))
}

/// `GET /api/applications` — all captured applications, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<ApplicationRecord>>, ApiError> {
    let conn = ctx.connect()?;
    Ok(Json(db::list_applications(&conn)?))
}

/// `GET /api/applications/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationRecord>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid ID format".into()))?;
    let conn = ctx.connect()?;
    db::get_application(&conn, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Application {id} not found")))
}
