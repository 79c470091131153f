use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A row as returned by the records API: a `fields` mapping plus whatever
/// top-level metadata (`id`, `createdTime`, ...) came with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Map<String, Value>,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            meta: Map::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.meta.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.fields.get(field.as_str())
    }

    pub fn set(&mut self, field: Field, value: Value) {
        self.fields.insert(field.as_str().to_string(), value);
    }

    pub fn into_value(self) -> crate::utils::error::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Tables the service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Invoice,
    Clients,
    InvoiceItem,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Invoice => "Invoice",
            Table::Clients => "Clients",
            Table::InvoiceItem => "Invoice Item",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields the pipelines read or rewrite. Everything else passes through
/// untouched and is never named in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TotalAmount,
    Client,
    InvoiceItem,
    Amount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TotalAmount => "Total Amount",
            Field::Client => "Client",
            Field::InvoiceItem => "Invoice Item",
            Field::Amount => "Amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_metadata() {
        let raw = json!({
            "id": "rec1",
            "createdTime": "2020-01-01T00:00:00.000Z",
            "fields": {"Total Amount": 10}
        });

        let record: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.id(), Some("rec1"));
        assert_eq!(record.get(Field::TotalAmount), Some(&json!(10)));
        assert_eq!(record.into_value().unwrap(), raw);
    }

    #[test]
    fn test_record_without_fields_is_rejected() {
        let raw = json!({"id": "rec1"});
        assert!(serde_json::from_value::<Record>(raw).is_err());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::InvoiceItem.to_string(), "Invoice Item");
        assert_eq!(Table::Clients.as_str(), "Clients");
    }
}
