//! Reconciliation of system transactions against bank statements
//!
//! Records are bucketed by calendar date and signed amount, then the engine
//! walks the requested range one day at a time, pairing buckets and reporting
//! whatever is left over on either side.

pub mod bucket;
pub mod engine;
pub mod report;
pub mod service;

pub use bucket::*;
pub use engine::*;
pub use report::*;
pub use service::*;
