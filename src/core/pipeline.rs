use crate::core::currency::{amount_from_value, format_currency, value_kind};
use crate::domain::model::{Field, Record, Table};
use crate::domain::ports::RecordFetcher;
use crate::utils::error::{Result, ServiceError};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One step of a field's transform chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Number (or falsy) to a currency string.
    FormatCurrency,
    /// First id of a linked-record list to the fetched record. Any further
    /// ids are dropped.
    ResolveOne(Table),
    /// Linked-record list to the list of fetched records, each run through
    /// `pipeline`.
    ResolveMany { table: Table, pipeline: FieldPipeline },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChain {
    pub field: Field,
    pub transforms: Vec<Transform>,
}

/// Ordered set of per-field transform chains applied to a record's `fields`.
///
/// Each chain reads the current value of its field, folds it through the
/// transforms left to right and writes the result back. Fields no chain
/// names are left as they are. The first failing transform aborts the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPipeline {
    chains: Vec<FieldChain>,
}

impl FieldPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field, transforms: Vec<Transform>) -> Self {
        self.chains.push(FieldChain { field, transforms });
        self
    }

    pub fn apply<'a, F>(
        &'a self,
        mut record: Record,
        fetcher: &'a F,
    ) -> BoxFuture<'a, Result<Record>>
    where
        F: RecordFetcher + ?Sized,
    {
        Box::pin(async move {
            for chain in &self.chains {
                let mut value = record.get(chain.field).cloned();
                for transform in &chain.transforms {
                    value = Some(transform.apply(chain.field, value, fetcher).await?);
                }
                if let Some(value) = value {
                    record.set(chain.field, value);
                }
            }
            Ok(record)
        })
    }
}

impl Transform {
    pub async fn apply<F>(&self, field: Field, value: Option<Value>, fetcher: &F) -> Result<Value>
    where
        F: RecordFetcher + ?Sized,
    {
        match self {
            Transform::FormatCurrency => {
                let amount = amount_from_value(field, value.as_ref())?;
                format_currency(amount).map(Value::String).ok_or_else(|| {
                    ServiceError::InvalidFieldValueError {
                        field,
                        reason: format!("{} is out of range for an amount", amount),
                    }
                })
            }
            Transform::ResolveOne(table) => resolve_one(field, *table, value, fetcher).await,
            Transform::ResolveMany { table, pipeline } => {
                resolve_many(field, *table, pipeline, value, fetcher).await
            }
        }
    }
}

async fn resolve_one<F>(
    field: Field,
    table: Table,
    value: Option<Value>,
    fetcher: &F,
) -> Result<Value>
where
    F: RecordFetcher + ?Sized,
{
    let first = match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(ids)) => {
            if ids.len() > 1 {
                tracing::debug!(
                    "'{}' links {} records, keeping only the first",
                    field,
                    ids.len()
                );
            }
            ids.into_iter().next()
        }
        Some(id @ Value::String(_)) => Some(id),
        Some(other) => {
            return Err(ServiceError::InvalidFieldValueError {
                field,
                reason: format!("expected a list of record ids, got {}", value_kind(&other)),
            })
        }
    };

    let id = record_id(field, first.ok_or(ServiceError::MissingFieldError { field })?)?;
    let record = fetcher.fetch(table, &id).await?;
    record.into_value()
}

async fn resolve_many<F>(
    field: Field,
    table: Table,
    pipeline: &FieldPipeline,
    value: Option<Value>,
    fetcher: &F,
) -> Result<Value>
where
    F: RecordFetcher + ?Sized,
{
    let ids = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(ids)) => ids,
        Some(other) => {
            return Err(ServiceError::InvalidFieldValueError {
                field,
                reason: format!("expected a list of record ids, got {}", value_kind(&other)),
            })
        }
    };

    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        let id = record_id(field, id)?;
        let record = fetcher.fetch(table, &id).await?;
        let record = pipeline.apply(record, fetcher).await?;
        resolved.push(record.into_value()?);
    }

    Ok(Value::Array(resolved))
}

fn record_id(field: Field, value: Value) -> Result<String> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::String(_) => Err(ServiceError::InvalidFieldValueError {
            field,
            reason: "empty record id".to_string(),
        }),
        other => Err(ServiceError::InvalidFieldValueError {
            field,
            reason: format!("record id must be a string, got {}", value_kind(&other)),
        }),
    }
}
