//! Challenge-then-submit protocol for privileged writes.
//!
//! # Flow (per call pair)
//! ```text
//! Idle
//!   → request_challenge       GET /sign-message?messageId=..&address=..
//!   → ChallengeReceived       (message signed by an external signer)
//!   → submit_signed_mutation  DELETE|PATCH|POST with `address` header
//!   → Succeeded | Failed(ChallengeUnavailable | InsufficientRole | MutationFailed)
//! ```
//!
//! The client holds no state between calls, performs no local signature
//! checks and never retries. Concurrent calls are fully independent.

use reqwest::Method;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{ChallengeRequest, ChallengeResponse, MessageId, MutationRequest, SignedMutation};
use crate::observability::metrics;
use crate::signer::MessageSigner;
use crate::transport::{ApiRequest, HttpTransport};

/// Default header carrying the caller's address.
pub const DEFAULT_ADDRESS_HEADER: &str = "address";

fn unauthorized_message(message_id: MessageId) -> &'static str {
    match message_id {
        MessageId::BuildDelete | MessageId::BuildFeature => {
            "User doesn't have builder role or higher"
        }
        MessageId::BuilderCreate => "User doesn't have admin role",
        MessageId::BuilderUpdateSocials => "Access denied",
    }
}

fn failure_message(message_id: MessageId) -> &'static str {
    match message_id {
        MessageId::BuildDelete => "Couldn't delete the build",
        MessageId::BuildFeature => "Couldn't save the build submission on the server",
        MessageId::BuilderCreate => "Couldn't create the builder",
        MessageId::BuilderUpdateSocials => "Couldn't save the socials",
    }
}

/// Client for the four signed write operations.
#[derive(Debug, Clone)]
pub struct SignedWriteClient<T> {
    transport: T,
    address_header: String,
}

impl<T: HttpTransport> SignedWriteClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            address_header: DEFAULT_ADDRESS_HEADER.to_string(),
        }
    }

    /// Override the header name used for the caller address.
    pub fn with_address_header(mut self, name: impl Into<String>) -> Self {
        self.address_header = name.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a fresh challenge. Every call is one request; nothing is cached.
    pub async fn request_challenge(&self, request: &ChallengeRequest) -> ApiResult<ChallengeResponse> {
        let message_id = request.message_id();
        let mut api_request = ApiRequest::get(["sign-message"]);
        api_request.query = request.to_query();

        let result = match self.transport.send(api_request).await {
            Ok(resp) => ChallengeResponse::from_body(&resp.body),
            Err(e) => Err(e),
        };

        match result {
            Ok(challenge) => {
                metrics::record_challenge(message_id.as_str(), "ok");
                tracing::debug!(%message_id, "Challenge received");
                Ok(challenge)
            }
            Err(e) => {
                metrics::record_challenge(message_id.as_str(), "unavailable");
                tracing::error!(%message_id, error = %e, "Failed to get signature message");
                Err(ApiError::ChallengeUnavailable {
                    message_id,
                    source: e,
                })
            }
        }
    }

    /// Submit a signed write. The response body, if any, is ignored.
    pub async fn submit_signed_mutation(&self, mutation: &SignedMutation) -> ApiResult<()> {
        let message_id = mutation.message_id();
        let (method, path): (Method, Vec<String>) = mutation.request.endpoint();

        let api_request = ApiRequest::new(method, path)
            .header(self.address_header.clone(), mutation.caller_address.clone())
            .json(mutation.request.body(&mutation.signature));

        match self.transport.send(api_request).await {
            Ok(_) => {
                metrics::record_mutation(message_id.as_str(), "ok");
                tracing::info!(%message_id, caller = %mutation.caller_address, "Signed mutation accepted");
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                metrics::record_mutation(message_id.as_str(), "insufficient_role");
                tracing::warn!(%message_id, caller = %mutation.caller_address, "Signed mutation rejected: insufficient role");
                Err(ApiError::InsufficientRole {
                    message_id,
                    status: 401,
                    message: unauthorized_message(message_id).to_string(),
                })
            }
            Err(e) => {
                metrics::record_mutation(message_id.as_str(), "failed");
                tracing::error!(%message_id, error = %e, "Signed mutation failed");
                Err(ApiError::MutationFailed {
                    message_id,
                    message: failure_message(message_id).to_string(),
                    source: e,
                })
            }
        }
    }

    /// Run the full protocol with `signer` acting as both subject and caller.
    pub async fn sign_and_submit<S>(&self, signer: &S, request: MutationRequest) -> ApiResult<()>
    where
        S: MessageSigner + ?Sized,
    {
        let message_id = request.message_id();
        let address = signer.address();

        tracing::debug!(%message_id, %address, "Requesting challenge");
        let challenge = self
            .request_challenge(&ChallengeRequest::new(address.clone(), request.challenge_params()))
            .await?;

        let message = challenge.into_message();
        let signature = signer
            .sign_message(&message)
            .await
            .map_err(|e| {
                tracing::error!(%message_id, error = %e, "Signer failed");
                ApiError::SigningFailed {
                    message_id,
                    source: e,
                }
            })?;

        tracing::debug!(%message_id, "Submitting signed mutation");
        self.submit_signed_mutation(&SignedMutation::new(address, signature, request))
            .await
    }
}
