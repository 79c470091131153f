pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    airtable::AirtableClient,
    http::{build_router, AppState},
    memory::InMemoryFetcher,
};
pub use app::invoice::InvoiceAssembler;
pub use config::service_config::{AirtableConfig, ServerConfig, ServiceConfig};
pub use crate::core::pipeline::{FieldChain, FieldPipeline, Transform};
pub use domain::{
    model::{Field, Record, Table},
    ports::RecordFetcher,
};
pub use utils::error::{Result, ServiceError};
