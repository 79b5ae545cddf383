//! In-memory record source for testing and embedding

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory source keyed by location, for tests and callers that already
/// hold their records
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    system: Arc<RwLock<HashMap<String, Vec<SystemRecord>>>>,
    banks: Arc<RwLock<HashMap<String, Vec<BankRecord>>>>,
}

impl MemorySource {
    /// Create an empty memory source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store system records under `location`, replacing any previous set
    pub fn put_system(&self, location: impl Into<String>, records: Vec<SystemRecord>) {
        self.system
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), records);
    }

    /// Store bank records under `location`, replacing any previous set
    pub fn put_bank(&self, location: impl Into<String>, records: Vec<BankRecord>) {
        self.banks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), records);
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.system
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.banks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn not_found(location: &str) -> ReconcileError {
    ReconcileError::Io {
        path: location.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no records stored at this location"),
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn load_system_records(&self, location: &str) -> ReconcileResult<Vec<SystemRecord>> {
        self.system
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
            .ok_or_else(|| not_found(location))
    }

    async fn load_bank_records(&self, location: &str) -> ReconcileResult<Vec<BankRecord>> {
        self.banks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
            .ok_or_else(|| not_found(location))
    }
}
