//! Data models for scan results, registry documents, and configuration.

pub mod config;
pub mod scan;
pub mod vehicle;
