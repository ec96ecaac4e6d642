//! Client library for a build-gallery REST API.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller / CLI
//!        │
//!        ├──▶ api::ReadClient ──────────────┐
//!        │                                  │
//!        └──▶ api::SignedWriteClient ───────┤
//!                 │      ▲                  ▼
//!                 │      │          transport::HttpTransport
//!                 ▼      │          (ReqwestTransport in production)
//!          signer::MessageSigner            │
//!          (external; Wallet for CLI)       ▼
//!                                        backend
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing + metrics),
//! `resilience` (caller-side deadlines; the clients themselves never retry).

pub mod api;
pub mod config;
pub mod observability;
pub mod resilience;
pub mod signer;
pub mod transport;

pub use api::{ApiError, ReadClient, SignedWriteClient};
pub use config::ClientConfig;
pub use signer::{MessageSigner, Wallet};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
