//! Error taxonomy for API operations.

use thiserror::Error;

use crate::api::types::MessageId;
use crate::signer::SignerError;
use crate::transport::TransportError;

/// Errors surfaced to callers of the API clients.
///
/// The `Display` text is meant for end users; the transport cause is kept
/// as `source()` for diagnostics.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The challenge could not be fetched or parsed.
    #[error("Couldn't get the signature message")]
    ChallengeUnavailable {
        message_id: MessageId,
        #[source]
        source: TransportError,
    },

    /// The backend rejected the signer's role (HTTP 401).
    #[error("{message}")]
    InsufficientRole {
        message_id: MessageId,
        status: u16,
        message: String,
    },

    /// Any other failure submitting a signed write.
    #[error("{message}")]
    MutationFailed {
        message_id: MessageId,
        message: String,
        #[source]
        source: TransportError,
    },

    /// A read that does not degrade to an empty result failed.
    #[error("{message}")]
    FetchFailed {
        message: String,
        #[source]
        source: TransportError,
    },

    /// The signer could not sign the challenge.
    #[error("Couldn't sign the {message_id} message")]
    SigningFailed {
        message_id: MessageId,
        #[source]
        source: SignerError,
    },
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status behind this error, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InsufficientRole { status, .. } => Some(*status),
            ApiError::ChallengeUnavailable { source, .. }
            | ApiError::MutationFailed { source, .. }
            | ApiError::FetchFailed { source, .. } => source.status(),
            ApiError::SigningFailed { .. } => None,
        }
    }

    pub fn is_insufficient_role(&self) -> bool {
        matches!(self, ApiError::InsufficientRole { .. })
    }

    /// Operation the error belongs to, for signed-write errors.
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            ApiError::ChallengeUnavailable { message_id, .. }
            | ApiError::InsufficientRole { message_id, .. }
            | ApiError::MutationFailed { message_id, .. }
            | ApiError::SigningFailed { message_id, .. } => Some(*message_id),
            ApiError::FetchFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_challenge_unavailable_display_hides_cause() {
        let err = ApiError::ChallengeUnavailable {
            message_id: MessageId::BuildDelete,
            source: TransportError::Status {
                status: 500,
                body: "stack trace".into(),
            },
        };
        assert_eq!(err.to_string(), "Couldn't get the signature message");
        assert_eq!(err.status(), Some(500));
        assert!(err.source().unwrap().to_string().contains("stack trace"));
    }

    #[test]
    fn test_insufficient_role_status() {
        let err = ApiError::InsufficientRole {
            message_id: MessageId::BuildFeature,
            status: 401,
            message: "User doesn't have builder role or higher".into(),
        };
        assert!(err.is_insufficient_role());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message_id(), Some(MessageId::BuildFeature));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_signing_failed_display() {
        let err = ApiError::SigningFailed {
            message_id: MessageId::BuilderCreate,
            source: SignerError::Signing("device unplugged".into()),
        };
        assert_eq!(err.to_string(), "Couldn't sign the builderCreate message");
        assert_eq!(err.status(), None);
    }
}
