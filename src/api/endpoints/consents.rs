//! Consent form endpoints: submit, list, detail.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::applications::SubmitResponse;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::ConsentRecord;
use crate::submission::submit_consent;

#[derive(Deserialize)]
pub struct SubmitConsentRequest {
    pub record: ConsentRecord,
    #[serde(default)]
    pub holder_signature: Option<String>,
    #[serde(default)]
    pub admin_signature: Option<String>,
}

/// `POST /api/consents` — run the full submission flow. Unconfirmed
/// consent is rejected with 400 before anything is stored.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(payload): Json<SubmitConsentRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let conn = ctx.connect()?;
    let outcome = submit_consent(
        &conn,
        &ctx.blobs,
        &payload.record,
        payload.holder_signature.as_deref(),
        payload.admin_signature.as_deref(),
    )?;

    Ok(Json(SubmitResponse {
        id: outcome.id,
        pdf_url: outcome.pdf_url,
    }))
}

/// `GET /api/consents` — all captured consents, newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<ConsentRecord>>, ApiError> {
    let conn = ctx.connect()?;
    Ok(Json(db::list_consents(&conn)?))
}

/// `GET /api/consents/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ConsentRecord>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid ID format".into()))?;
    let conn = ctx.connect()?;
    db::get_consent(&conn, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Consent {id} not found")))
}
