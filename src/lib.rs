//! # Syntek
//!
//! **Credentialed async client for the Syntek memory gateway.**
//!
//! The client resolves an access key, attaches authentication to every
//! request, keeps a cached view of whether the key is entitled to the
//! service, and exposes the gateway's memory operations as async methods.
//!
//! ## Features
//!
//! - **Layered credentials**: explicit options, then `SYNTEK_*` environment
//!   variables, then the local vault file
//! - **Cached entitlement**: a positive check is trusted for 30 minutes
//! - **Fail-open**: an unreachable gateway never revokes a cached entitlement
//! - **Heartbeat**: a background task refreshes entitlement every 30 minutes
//! - **Uniform errors**: non-2xx responses surface the gateway's `error` message
//!
//! ## Quickstart
//!
//! ```no_run
//! use syntek::{ClientOptions, RecallOptions, SyntekClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), syntek::SyntekError> {
//!     let client = SyntekClient::new(ClientOptions::new().api_key("sk-..."))?;
//!
//!     let hits = client.recall("what did we decide?", RecallOptions::default()).await?;
//!     println!("{}", hits);
//!
//!     client.end_session().await?;
//!     client.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Entitlement
//!
//! Entitlement is advisory. Every operation except `subscribe` checks it,
//! but the request is sent either way; the gateway enforces access.

#![warn(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod json;

// Credential layer
pub mod credentials;

// Build fingerprint
pub mod fingerprint;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Entitlement layer
pub mod entitlement;

// Manager (main public API)
pub mod manager;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::{ClientConfig, ClientOptions, ConfigDefaults, EntitlementPolicy};
pub use credentials::resolver::CredentialResolver;
pub use entitlement::state::EntitlementState;
pub use errors::SyntekError;
pub use json::JsonObject;
pub use manager::SyntekClient;
pub use protocol::models::{Message, RecallOptions, RecallQuery, StoreOptions};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
