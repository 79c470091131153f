use crate::app::invoice::InvoiceAssembler;
use crate::domain::model::Table;
use crate::utils::error::{ErrorSeverity, ServiceError};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    assembler: Arc<InvoiceAssembler>,
}

impl AppState {
    pub fn new(assembler: InvoiceAssembler) -> Self {
        Self {
            assembler: Arc::new(assembler),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    pub invoice_id: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/get-invoice", get(get_invoice_by_query))
        .route("/invoices/{invoice_id}", get(get_invoice_by_path))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_invoice_by_query(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Response, ServiceError> {
    let invoice_id = query.invoice_id.ok_or_else(|| ServiceError::BadRequest {
        message: "missing invoice_id parameter".to_string(),
    })?;
    render_invoice(&state, &invoice_id).await
}

async fn get_invoice_by_path(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Response, ServiceError> {
    render_invoice(&state, &invoice_id).await
}

async fn render_invoice(state: &AppState, invoice_id: &str) -> Result<Response, ServiceError> {
    let started = Instant::now();
    let invoice = state.assembler.invoice(invoice_id).await?;
    let body = serde_json::to_string_pretty(&invoice)?;

    tracing::info!(
        invoice_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Invoice served"
    );
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub fn error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::RecordNotFound {
            table: Table::Invoice,
            ..
        } => StatusCode::NOT_FOUND,
        ServiceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        ServiceError::RecordNotFound { .. }
        | ServiceError::TransportError(_)
        | ServiceError::UpstreamStatusError { .. }
        | ServiceError::MalformedRecordError { .. }
        | ServiceError::SerializationError(_)
        | ServiceError::MissingFieldError { .. }
        | ServiceError::InvalidFieldValueError { .. } => StatusCode::BAD_GATEWAY,
        ServiceError::IoError(_)
        | ServiceError::ConfigError { .. }
        | ServiceError::MissingConfigError { .. }
        | ServiceError::InvalidConfigValueError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if self.severity() <= ErrorSeverity::Low {
            tracing::warn!("Request failed: {} (Category: {:?})", self, self.category());
        } else {
            tracing::error!(
                "Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_friendly_message(),
            }
        }));
        (status, body).into_response()
    }
}
