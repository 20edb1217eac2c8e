use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use hsg_application::UploadDocumentInput;
use hsg_core::AppError;
use hsg_infrastructure::content_type_for_key;

use super::{parse_case_id, parse_document_id};
use crate::dto::{
    DeleteDocumentQuery, DocumentListResponse, DocumentResponse, DownloadQuery, OkResponse,
    UploadDocumentResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

pub async fn upload_document_handler(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadDocumentResponse>)> {
    let case_id = parse_case_id(&case_id)?;
    let mut multipart = multipart.map_err(|_| ApiError::bad_request("Invalid form data."))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid form data."))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Invalid form data."))?;

        upload = Some(UploadDocumentInput {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let Some(upload) = upload else {
        return Err(ApiError::bad_request(
            "No file provided. Use field name 'file'.",
        ));
    };

    let document = state.document_service.upload(case_id, upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponse {
            ok: true,
            document: DocumentResponse::from(document),
        }),
    ))
}

pub async fn list_documents_handler(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<DocumentListResponse>> {
    let documents = state
        .document_service
        .list(parse_case_id(&case_id)?)
        .await?;

    Ok(Json(DocumentListResponse {
        ok: true,
        documents: documents.into_iter().map(DocumentResponse::from).collect(),
    }))
}

pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Query(query): Query<DeleteDocumentQuery>,
) -> ApiResult<Json<OkResponse>> {
    let case_id = parse_case_id(&case_id)?;
    let Some(doc_id) = query.doc_id.filter(|value| !value.trim().is_empty()) else {
        return Err(ApiError::bad_request("Missing docId query parameter."));
    };

    state
        .document_service
        .delete(case_id, parse_document_id(&doc_id)?)
        .await?;

    Ok(Json(OkResponse::new()))
}

pub async fn download_document_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let invalid_link = || AppError::Unauthorized("Invalid or expired download link.".to_owned());

    let Ok(Query(DownloadQuery {
        expires: Some(expires),
        signature: Some(signature),
    })) = query
    else {
        return Err(invalid_link().into());
    };

    let now = state.clock.now();
    if !state
        .document_storage
        .verify_signature(&key, expires, &signature, now)
    {
        return Err(invalid_link().into());
    }

    let bytes = state
        .document_storage
        .read_object(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found.".to_owned()))?;

    Ok(([(header::CONTENT_TYPE, content_type_for_key(&key))], bytes))
}
