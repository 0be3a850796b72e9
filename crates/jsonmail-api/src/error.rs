//! # API Error Types
//!
//! Maps classified failures from `jsonmail-core` to JSON:API error
//! documents. The response status comes from the failure's
//! [`StatusClass`](jsonmail_core::StatusClass); the body is
//! `{"errors": [...]}` rendered through the configured strategy.
//! Never exposes internal failure details unless configured to.

use std::sync::{Arc, OnceLock};

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use jsonmail_core::{
    BadRequestError, ClassifiedError, ErrorObject, ErrorObjectList, JsonError, JsonStrategy,
    RepositoryAccessError, RepositoryFailure, ResourceNotFoundError, ServiceError,
    UnexpectedResolveError, ValidationError,
};

use crate::strategy::JsonApiStrategy;

/// Media type of JSON:API documents.
pub const JSONAPI_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Top-level JSON:API error document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDocument {
    /// One entry per independent problem, each with `code` and `title` and
    /// optionally `detail` and `source`.
    #[schema(value_type = Vec<Object>)]
    pub errors: Vec<Value>,
}

/// Turns classified failures into error documents and responses.
#[derive(Clone)]
pub struct ErrorRenderer {
    strategy: Arc<dyn JsonStrategy>,
    expose_internal_details: bool,
}

impl std::fmt::Debug for ErrorRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorRenderer")
            .field("strategy", &"[dyn JsonStrategy]")
            .field("expose_internal_details", &self.expose_internal_details)
            .finish()
    }
}

impl Default for ErrorRenderer {
    fn default() -> Self {
        Self::new(Arc::new(JsonApiStrategy::default()))
    }
}

impl ErrorRenderer {
    pub fn new(strategy: Arc<dyn JsonStrategy>) -> Self {
        Self {
            strategy,
            expose_internal_details: false,
        }
    }

    /// Include failure messages in 500-class bodies.
    pub fn expose_internal_details(self, expose: bool) -> Self {
        Self {
            expose_internal_details: expose,
            ..self
        }
    }

    /// Build the error document for `err`.
    ///
    /// An attached error list is rendered as-is. A failure without one gets
    /// a single error object derived from its status class, with the
    /// failure message as `detail` unless the failure is internal and
    /// details are hidden.
    pub fn document(&self, err: &dyn ClassifiedError) -> Result<ErrorDocument, JsonError> {
        let strategy = Some(self.strategy.as_ref());
        let attached = err.errors();
        let errors = if attached.is_empty() {
            self.synthesize(err).to_json(strategy)?
        } else {
            attached.to_json(strategy)?
        };
        Ok(ErrorDocument { errors })
    }

    fn synthesize(&self, err: &dyn ClassifiedError) -> ErrorObjectList {
        let status = err.status();
        let error = ErrorObject::new(status.code(), status.reason());
        let error = if status.is_server_error() && !self.expose_internal_details {
            error
        } else {
            error.with_detail(err.message())
        };
        ErrorObjectList::single(error)
    }

    /// Render `err` as a complete HTTP response.
    pub fn render(&self, err: &ServiceError) -> Response {
        log_failure(err);
        let status = http_status(err);
        match self.document(err) {
            Ok(document) => (status, [(CONTENT_TYPE, JSONAPI_CONTENT_TYPE)], Json(document)).into_response(),
            Err(render_err) => {
                tracing::error!(error = %render_err, kind = err.kind(), "failed to render error document");
                let fallback = ErrorDocument {
                    errors: vec![serde_json::json!({
                        "code": jsonmail_core::StatusClass::InternalServerError.code(),
                        "title": jsonmail_core::StatusClass::InternalServerError.reason(),
                    })],
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(CONTENT_TYPE, JSONAPI_CONTENT_TYPE)],
                    Json(fallback),
                )
                    .into_response()
            }
        }
    }
}

static RENDERER: OnceLock<ErrorRenderer> = OnceLock::new();

/// Install the process-wide renderer used by [`AppError`]'s `IntoResponse`.
///
/// Returns the renderer back if one is already installed.
pub fn install_renderer(renderer: ErrorRenderer) -> Result<(), ErrorRenderer> {
    RENDERER.set(renderer)
}

/// The installed renderer, or the default one.
pub fn renderer() -> &'static ErrorRenderer {
    RENDERER.get_or_init(ErrorRenderer::default)
}

/// HTTP status for a classified failure.
pub fn http_status(err: &dyn ClassifiedError) -> StatusCode {
    StatusCode::from_u16(err.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_failure(err: &ServiceError) {
    match err {
        ServiceError::RepositoryAccess(e) => {
            tracing::warn!(kind = err.kind(), repository = e.repository(), error = %err, "repository failure");
        }
        _ if err.status().is_server_error() => {
            tracing::error!(kind = err.kind(), error = %err, "internal server error");
        }
        _ => {
            tracing::debug!(
                kind = err.kind(),
                status = err.status().as_u16(),
                codes = ?err.errors().codes(),
                "client error"
            );
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(#[from] ServiceError);

impl AppError {
    pub fn service_error(&self) -> &ServiceError {
        &self.0
    }

    pub fn into_inner(self) -> ServiceError {
        self.0
    }
}

impl From<ResourceNotFoundError> for AppError {
    fn from(err: ResourceNotFoundError) -> Self {
        Self(err.into())
    }
}

impl From<RepositoryAccessError> for AppError {
    fn from(err: RepositoryAccessError) -> Self {
        Self(err.into())
    }
}

impl From<UnexpectedResolveError> for AppError {
    fn from(err: UnexpectedResolveError) -> Self {
        Self(err.into())
    }
}

impl From<BadRequestError> for AppError {
    fn from(err: BadRequestError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        renderer().render(&self.0)
    }
}
