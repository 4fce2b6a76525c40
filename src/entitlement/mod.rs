//! Entitlement tracking: cached state, the ensure-valid gate, and the
//! background heartbeat that keeps it fresh.

pub mod cache;
pub mod heartbeat;
pub mod state;
