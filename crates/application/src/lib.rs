//! Application services and ports.

#![forbid(unsafe_code)]

mod case_number_service;
mod case_ports;
mod case_service;
mod clock;
mod document_service;
mod intake_service;
mod rate_limit_service;

#[cfg(test)]
mod test_support;

pub use case_number_service::{
    CASE_NUMBER_MAX_ATTEMPTS, CaseNumberLookup, CaseNumberService, DEFAULT_LOOKUP_TIMEOUT,
    OsRandomSource, RandomSource, encode_base36, sequence_in_range,
};
pub use case_ports::{
    CaseDocumentRepository, CaseRepository, DocumentStorage, IntakeNotification, IntakeNotifier,
    IntakeRepository, NewFilingCase,
};
pub use case_service::CaseService;
pub use clock::{Clock, ManualClock, SystemClock};
pub use document_service::{
    DocumentService, DocumentWithUrl, SIGNED_URL_TTL_SECONDS, UploadDocumentInput,
};
pub use intake_service::{IntakeReceipt, IntakeService, OpenedCase};
pub use rate_limit_service::{
    AttemptInfo, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_MS, RATE_LIMITED_MESSAGE,
    RateLimitDecision, RateLimitRule, RateLimitService, RateLimitStore,
};
