//! One resume analysis, end to end: session gate, upstream submit, quota
//! recovery, normalization and the background record write.

pub mod handlers;
pub mod service;

pub use service::run_analysis;
