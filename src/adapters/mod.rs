// Adapters layer: concrete implementations for external systems (records API, HTTP surface).

pub mod airtable;
pub mod http;
pub mod memory;
