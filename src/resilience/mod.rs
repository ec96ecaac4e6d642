//! Caller-side resilience helpers.
//!
//! The API clients never time out or retry on their own; callers that
//! need bounded latency wrap calls with `timeouts::with_deadline`.

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
