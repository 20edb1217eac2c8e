use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use hsg_core::AppError;
use hsg_domain::MAX_UPLOAD_SIZE;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

/// Request body ceiling for uploads; leaves room for multipart framing so
/// oversized files reach the size check instead of failing to parse.
const UPLOAD_BODY_LIMIT: usize = (MAX_UPLOAD_SIZE as usize) * 2;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let intake_routes = Router::new()
        .route("/api/intake", post(handlers::intake::submit_intake_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit_intake,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/cases", get(handlers::cases::list_cases_handler))
        .route(
            "/api/admin/cases/{case_id}",
            get(handlers::cases::get_case_handler).patch(handlers::cases::update_case_handler),
        )
        .route(
            "/api/cases/{case_id}/upload",
            post(handlers::documents::upload_document_handler)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/cases/{case_id}/documents",
            get(handlers::documents::list_documents_handler)
                .delete(handlers::documents::delete_document_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin_token,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/intake/options",
            get(handlers::intake::intake_options_handler),
        )
        .route(
            "/api/documents/download/{*key}",
            get(handlers::documents::download_document_handler),
        )
        .merge(intake_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
