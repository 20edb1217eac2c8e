use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api_config::PersistenceBackend;
use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let persistence = check_persistence(&state).await;

    let ready = persistence.status == "ok";
    let (http_status, status) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            persistence,
        }),
    )
}

async fn check_persistence(state: &AppState) -> HealthDependencyStatus {
    let backend = state.persistence_backend.as_str();

    let Some(pool) = state.postgres_pool.as_ref() else {
        return match state.persistence_backend {
            PersistenceBackend::Memory => HealthDependencyStatus {
                backend,
                status: "ok",
                detail: None,
            },
            PersistenceBackend::Postgres => HealthDependencyStatus {
                backend,
                status: "error",
                detail: Some("postgres pool is not configured".to_owned()),
            },
        };
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthDependencyStatus {
            backend,
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            backend,
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
