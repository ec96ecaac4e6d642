//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transport / api / signer produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (`message_id`, `status`, `request_id`) instead of
//!   interpolated strings
//! - Every outbound request carries an `x-request-id` that also appears in logs
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
