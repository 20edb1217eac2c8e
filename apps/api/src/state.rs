use std::sync::Arc;

use hsg_application::{
    CaseService, Clock, DocumentService, IntakeService, RateLimitRule, RateLimitService,
};
use hsg_infrastructure::LocalDocumentStorage;
use ipnet::IpNet;
use sqlx::PgPool;

use crate::api_config::PersistenceBackend;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub intake_service: IntakeService,
    pub case_service: CaseService,
    pub document_service: DocumentService,
    pub rate_limit_service: RateLimitService,
    pub intake_rate_rule: RateLimitRule,
    pub document_storage: LocalDocumentStorage,
    pub clock: Arc<dyn Clock>,
    pub admin_token_digest: [u8; 32],
    pub trusted_proxies: Arc<Vec<IpNet>>,
    pub persistence_backend: PersistenceBackend,
    pub postgres_pool: Option<PgPool>,
}
