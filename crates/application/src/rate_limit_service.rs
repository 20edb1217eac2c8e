//! Rate limiting ports and application service.
//!
//! Fixed-window counting: the first request for a key opens a window of
//! `window` length, every request inside it increments the counter, and the
//! counter starts over once the window has passed. Denied requests still
//! count but never move the window end.

mod config;
mod ports;
mod service;


pub use config::{DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_MS, RateLimitRule};
pub use ports::{AttemptInfo, RateLimitStore};
pub use service::{RATE_LIMITED_MESSAGE, RateLimitDecision, RateLimitService};
