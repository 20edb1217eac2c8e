use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use hsg_domain::IntakeDraft;

use crate::dto::{IntakeOptionsResponse, SubmitIntakeResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn intake_options_handler() -> Json<IntakeOptionsResponse> {
    Json(IntakeOptionsResponse::catalog())
}

pub async fn submit_intake_handler(
    State(state): State<AppState>,
    payload: Result<Json<IntakeDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitIntakeResponse>)> {
    let Json(draft) = payload.map_err(|_| ApiError::bad_request("Invalid JSON body."))?;

    let receipt = state.intake_service.submit(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitIntakeResponse::from(receipt)),
    ))
}
