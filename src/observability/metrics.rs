//! Client metrics.
//!
//! # Metrics
//! - `buidl_client_requests_total` (counter): outbound requests by method, status
//! - `buidl_client_challenges_total` (counter): challenge fetches by message id, outcome
//! - `buidl_client_mutations_total` (counter): signed writes by message id, outcome
//!
//! Status `0` means the request never produced an HTTP response.

use metrics::counter;

/// Record one outbound HTTP request.
pub fn record_request(method: &str, status: u16) {
    counter!(
        "buidl_client_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the outcome of a challenge fetch.
pub fn record_challenge(message_id: &'static str, outcome: &'static str) {
    counter!(
        "buidl_client_challenges_total",
        "message_id" => message_id,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the outcome of a signed mutation.
pub fn record_mutation(message_id: &'static str, outcome: &'static str) {
    counter!(
        "buidl_client_mutations_total",
        "message_id" => message_id,
        "outcome" => outcome
    )
    .increment(1);
}
