//! Case number generation.
//!
//! Case numbers are drawn as `HSG-{year}-{1000..=9999}` and checked against
//! persisted cases before being handed out. After ten collisions the service
//! falls back to an uppercase base-36 millisecond timestamp suffix. The check
//! is advisory: the unique constraint on stored case numbers is what actually
//! prevents duplicates when two requests race between check and insert.

mod ports;
mod random;
mod service;

#[cfg(test)]
mod tests;

pub use ports::{CaseNumberLookup, RandomSource};
pub use random::{OsRandomSource, sequence_in_range};
pub use service::{
    CASE_NUMBER_MAX_ATTEMPTS, CaseNumberService, DEFAULT_LOOKUP_TIMEOUT, encode_base36,
};
