use crate::domain::model::{Field, Table};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound { table: Table, id: String },

    #[error("Upstream returned status {status} for {url}: {body}")]
    UpstreamStatusError {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Malformed record: {message}")]
    MalformedRecordError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing field '{field}'")]
    MissingFieldError { field: Field },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValueError { field: Field, reason: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Data,
    Request,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::TransportError(_)
            | ServiceError::RecordNotFound {
                table: Table::Invoice,
                ..
            }
            | ServiceError::UpstreamStatusError { .. } => ErrorCategory::Upstream,
            ServiceError::RecordNotFound { .. }
            | ServiceError::MalformedRecordError { .. }
            | ServiceError::SerializationError(_)
            | ServiceError::MissingFieldError { .. }
            | ServiceError::InvalidFieldValueError { .. } => ErrorCategory::Data,
            ServiceError::BadRequest { .. } => ErrorCategory::Request,
            ServiceError::IoError(_)
            | ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::RecordNotFound {
                table: Table::Invoice,
                ..
            }
            | ServiceError::BadRequest { .. } => ErrorSeverity::Low,
            ServiceError::TransportError(_) | ServiceError::UpstreamStatusError { .. } => {
                ErrorSeverity::Medium
            }
            ServiceError::RecordNotFound { .. }
            | ServiceError::MalformedRecordError { .. }
            | ServiceError::SerializationError(_)
            | ServiceError::MissingFieldError { .. }
            | ServiceError::InvalidFieldValueError { .. } => ErrorSeverity::High,
            ServiceError::IoError(_)
            | ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::TransportError(_) => "upstream_unreachable",
            ServiceError::RecordNotFound {
                table: Table::Invoice,
                ..
            } => "record_not_found",
            // A link in a fetched record points at a record that is gone.
            ServiceError::RecordNotFound { .. } => "linked_record_not_found",
            ServiceError::UpstreamStatusError { .. } => "upstream_status",
            ServiceError::MalformedRecordError { .. } | ServiceError::SerializationError(_) => {
                "malformed_record"
            }
            ServiceError::MissingFieldError { .. } => "missing_field",
            ServiceError::InvalidFieldValueError { .. } => "invalid_field_value",
            ServiceError::BadRequest { .. } => "bad_request",
            ServiceError::IoError(_)
            | ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => "configuration",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::TransportError(_) => "Could not reach the records API".to_string(),
            ServiceError::RecordNotFound {
                table: Table::Invoice,
                id,
            } => format!("No {} record with id '{}'", Table::Invoice, id),
            ServiceError::RecordNotFound { table, id } => {
                format!("The invoice links a {} record '{}' that does not exist", table, id)
            }
            ServiceError::UpstreamStatusError { status, .. } => {
                format!("The records API answered with status {}", status)
            }
            ServiceError::MalformedRecordError { .. } | ServiceError::SerializationError(_) => {
                "The records API returned data in an unexpected shape".to_string()
            }
            ServiceError::MissingFieldError { field } => {
                format!("The record has no '{}' value", field)
            }
            ServiceError::InvalidFieldValueError { field, .. } => {
                format!("The '{}' value could not be processed", field)
            }
            ServiceError::BadRequest { message } => message.clone(),
            ServiceError::IoError(e) => format!("File access failed: {}", e),
            ServiceError::ConfigError { message } => message.clone(),
            ServiceError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            ServiceError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Upstream => {
                "Check network access, the API key and that the record id exists"
            }
            ErrorCategory::Data => "Check the record's fields in the base",
            ErrorCategory::Request => "Pass a valid invoice_id",
            ErrorCategory::Configuration => {
                "Set AIRTABLE_KEY and AIRTABLE_APP or fix the configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
