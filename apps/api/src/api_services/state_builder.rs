use std::sync::Arc;

use hsg_application::{
    CaseDocumentRepository, CaseNumberLookup, CaseNumberService, CaseRepository, CaseService,
    Clock, DocumentService, IntakeNotifier, IntakeRepository, IntakeService, OsRandomSource,
    RateLimitRule, RateLimitService, SystemClock,
};
use hsg_core::AppError;
use hsg_infrastructure::{
    ConsoleIntakeNotifier, InMemoryCaseRepository, InMemoryRateLimitStore, LocalDocumentStorage,
    PostgresCaseRepository,
};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::warn;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Case persistence behind every case-related port.
struct CasePorts {
    intakes: Arc<dyn IntakeRepository>,
    cases: Arc<dyn CaseRepository>,
    lookup: Arc<dyn CaseNumberLookup>,
    documents: Arc<dyn CaseDocumentRepository>,
}

impl CasePorts {
    fn postgres(pool: PgPool) -> Self {
        let repository = Arc::new(PostgresCaseRepository::new(pool));
        Self {
            intakes: repository.clone(),
            cases: repository.clone(),
            lookup: repository.clone(),
            documents: repository,
        }
    }

    fn memory() -> Self {
        let repository = Arc::new(InMemoryCaseRepository::new());
        Self {
            intakes: repository.clone(),
            cases: repository.clone(),
            lookup: repository.clone(),
            documents: repository,
        }
    }
}

pub fn build_app_state(config: &ApiConfig, pool: Option<PgPool>) -> Result<AppState, AppError> {
    let ports = match pool.clone() {
        Some(pool) => CasePorts::postgres(pool),
        None => {
            warn!("using in-memory persistence; data is lost on restart");
            CasePorts::memory()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let log_case_numbers = !config.is_production();

    let case_numbers = CaseNumberService::new(ports.lookup, Arc::new(OsRandomSource), clock.clone())
        .with_lookup_timeout(config.case_number_lookup_timeout);
    let notifier: Arc<dyn IntakeNotifier> = Arc::new(ConsoleIntakeNotifier::new(log_case_numbers));

    let intake_service = IntakeService::new(
        ports.intakes,
        ports.cases.clone(),
        case_numbers,
        notifier,
        clock.clone(),
    )
    .with_case_number_logging(log_case_numbers);

    let document_storage = LocalDocumentStorage::new(
        config.document_storage_dir.as_str(),
        config.public_api_url.as_str(),
        config.document_url_secret.as_str(),
    )?;
    let document_service = DocumentService::new(
        ports.cases.clone(),
        ports.documents,
        Arc::new(document_storage.clone()),
        clock.clone(),
    );

    let intake_rate_rule = RateLimitRule::new(
        "intake",
        config.intake_rate_limit,
        config.intake_rate_window_ms,
    )?;
    let rate_limit_service =
        RateLimitService::new(Arc::new(InMemoryRateLimitStore::new()), clock.clone());

    Ok(AppState {
        intake_service,
        case_service: CaseService::new(ports.cases, clock.clone()),
        document_service,
        rate_limit_service,
        intake_rate_rule,
        document_storage,
        clock,
        admin_token_digest: Sha256::digest(config.admin_token.as_bytes()).into(),
        trusted_proxies: Arc::new(config.trusted_proxies.clone()),
        persistence_backend: config.persistence_backend,
        postgres_pool: pool,
    })
}
