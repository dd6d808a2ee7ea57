//! Vehicle identifier extraction: rules, policy, and pipeline.

pub mod pipeline;
pub mod policy;
pub mod rules;

pub use pipeline::ScanPipeline;
pub use policy::{ScanPolicy, Stage};
