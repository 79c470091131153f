use crate::domain::model::{Record, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the remote tables, one record per call.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self, table: Table, id: &str) -> Result<Record>;

    async fn fetch_invoice(&self, id: &str) -> Result<Record> {
        self.fetch(Table::Invoice, id).await
    }

    async fn fetch_client(&self, id: &str) -> Result<Record> {
        self.fetch(Table::Clients, id).await
    }

    async fn fetch_invoice_item(&self, id: &str) -> Result<Record> {
        self.fetch(Table::InvoiceItem, id).await
    }
}
