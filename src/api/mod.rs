//! Gallery API clients.
//!
//! # Data Flow
//! ```text
//! caller
//!     → SignedWriteClient (challenge → external signer → signed mutation)
//!     → ReadClient (events, builds, drafts)
//!     → HttpTransport (one request per operation)
//! ```
//!
//! # Error Classification
//! - challenge phase failure → `ApiError::ChallengeUnavailable`
//! - 401 on a signed write → `ApiError::InsufficientRole { status: 401 }`
//! - any other signed-write failure → `ApiError::MutationFailed`

pub mod error;
pub mod github;
pub mod read;
pub mod signed_write;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use github::github_readme_url_from_branch_url;
pub use read::ReadClient;
pub use signed_write::SignedWriteClient;
pub use types::{
    Build, BuilderRole, ChallengeParams, ChallengeRequest, ChallengeResponse, Event, MessageId,
    MutationRequest, SignedMutation, SocialLinks,
};
