use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use hsg_domain::{CasePatch, CaseStatusFilter};
use serde_json::Value;

use super::parse_case_id;
use crate::dto::{CaseListResponse, CaseResponse, CaseStatusQuery, SingleCaseResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_cases_handler(
    State(state): State<AppState>,
    Query(query): Query<CaseStatusQuery>,
) -> ApiResult<Json<CaseListResponse>> {
    let filter = CaseStatusFilter::from_query(query.status.as_deref())?;
    let cases = state.case_service.list_cases(filter).await?;

    Ok(Json(CaseListResponse {
        ok: true,
        cases: cases.into_iter().map(CaseResponse::from).collect(),
    }))
}

pub async fn get_case_handler(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<SingleCaseResponse>> {
    let case = state
        .case_service
        .get_case(parse_case_id(&case_id)?)
        .await?;

    Ok(Json(SingleCaseResponse {
        ok: true,
        case: CaseResponse::from(case),
    }))
}

pub async fn update_case_handler(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SingleCaseResponse>> {
    let case_id = parse_case_id(&case_id)?;
    let Ok(Json(Value::Object(body))) = payload else {
        return Err(ApiError::bad_request("Invalid JSON body."));
    };

    let patch = CasePatch::from_json(&body)?;
    let case = state.case_service.update_case(case_id, patch).await?;

    Ok(Json(SingleCaseResponse {
        ok: true,
        case: CaseResponse::from(case),
    }))
}
