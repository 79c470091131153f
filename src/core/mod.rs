pub mod currency;
pub mod pipeline;

pub use crate::domain::model::{Field, Record, Table};
pub use crate::domain::ports::RecordFetcher;
pub use crate::utils::error::Result;
