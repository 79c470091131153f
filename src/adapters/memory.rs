use crate::domain::model::{Record, Table};
use crate::domain::ports::RecordFetcher;
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Fetcher backed by a fixed set of records. Keeps a log of every lookup so
/// callers can assert on fetch order and count.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    records: HashMap<(Table, String), Record>,
    log: Mutex<Vec<(Table, String)>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, table: Table, id: &str, record: Record) -> Self {
        self.records.insert((table, id.to_string()), record);
        self
    }

    /// Lookups performed so far, in call order.
    pub async fn fetch_log(&self) -> Vec<(Table, String)> {
        self.log.lock().await.clone()
    }
}

#[async_trait]
impl RecordFetcher for InMemoryFetcher {
    async fn fetch(&self, table: Table, id: &str) -> Result<Record> {
        self.log.lock().await.push((table, id.to_string()));

        self.records
            .get(&(table, id.to_string()))
            .cloned()
            .ok_or_else(|| ServiceError::RecordNotFound {
                table,
                id: id.to_string(),
            })
    }
}
