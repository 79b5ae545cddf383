//! Record ingestion from CSV files and memory

pub mod csv_source;
pub mod memory_source;

pub use csv_source::*;
pub use memory_source::*;
