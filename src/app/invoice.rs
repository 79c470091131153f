use crate::core::pipeline::{FieldPipeline, Transform};
use crate::domain::model::{Field, Record, Table};
use crate::domain::ports::RecordFetcher;
use crate::utils::error::Result;
use std::sync::Arc;

/// Line item: `Amount` formatted as currency.
pub fn invoice_item_pipeline() -> FieldPipeline {
    FieldPipeline::new().field(Field::Amount, vec![Transform::FormatCurrency])
}

/// Invoice: total formatted, client and line items replaced by their records.
pub fn invoice_pipeline() -> FieldPipeline {
    FieldPipeline::new()
        .field(Field::TotalAmount, vec![Transform::FormatCurrency])
        .field(Field::Client, vec![Transform::ResolveOne(Table::Clients)])
        .field(
            Field::InvoiceItem,
            vec![Transform::ResolveMany {
                table: Table::InvoiceItem,
                pipeline: invoice_item_pipeline(),
            }],
        )
}

/// Builds the denormalized invoice document from the remote tables.
pub struct InvoiceAssembler {
    fetcher: Arc<dyn RecordFetcher>,
    invoice_pipeline: FieldPipeline,
}

impl InvoiceAssembler {
    pub fn new(fetcher: Arc<dyn RecordFetcher>) -> Self {
        Self {
            fetcher,
            invoice_pipeline: invoice_pipeline(),
        }
    }

    pub async fn invoice(&self, id: &str) -> Result<Record> {
        tracing::debug!("Assembling invoice {}", id);
        let record = self.fetcher.fetch_invoice(id).await?;
        let invoice = self
            .invoice_pipeline
            .apply(record, self.fetcher.as_ref())
            .await?;
        tracing::debug!("Invoice {} assembled", id);
        Ok(invoice)
    }
}
