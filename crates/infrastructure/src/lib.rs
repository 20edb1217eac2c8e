//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_intake_notifier;
mod in_memory_case_repository;
mod in_memory_rate_limit_store;
mod local_document_storage;
mod postgres_case_repository;

pub use console_intake_notifier::ConsoleIntakeNotifier;
pub use in_memory_case_repository::InMemoryCaseRepository;
pub use in_memory_rate_limit_store::{GC_INTERVAL_SECONDS, InMemoryRateLimitStore};
pub use local_document_storage::{
    LocalDocumentStorage, MIN_URL_SECRET_LENGTH, content_type_for_key,
};
pub use postgres_case_repository::PostgresCaseRepository;
