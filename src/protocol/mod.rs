//! Gateway wire protocol: endpoint paths and request body shaping.

pub mod endpoints;
pub mod models;
