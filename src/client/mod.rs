//! Request core: authenticated envelopes and the gateway HTTP client.

pub mod http;
pub mod request;
