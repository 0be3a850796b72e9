//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use jsonmail_core::{BadRequestError, ErrorObject, ErrorObjectList, ValidationError};

use crate::error::AppError;

/// Error code for request bodies that could not be parsed.
pub const MALFORMED_BODY_CODE: &str = "MALFORMED_REQUEST_BODY";

/// Trait for request types that can check business rules beyond what serde
/// deserialization checks.
pub trait Validate {
    /// Every failed rule, in evaluation order. Empty means valid.
    fn validate(&self) -> ErrorObjectList;
}

/// Extract a JSON body, mapping deserialization errors to a
/// [`BadRequestError`] carrying one `MALFORMED_REQUEST_BODY` error.
///
/// Handlers should use:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(v)| v).map_err(|rejection| {
        let error = ErrorObject::new(MALFORMED_BODY_CODE, "Malformed request body")
            .with_detail(rejection.body_text());
        BadRequestError::with_errors(
            "request body could not be parsed",
            ErrorObjectList::single(error),
        )
        .into()
    })
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
///
/// All failed rules are attached to one [`ValidationError`].
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    let errors = value.validate();
    if !errors.is_empty() {
        let message = format!("{} validation rule(s) failed", errors.len());
        return Err(ValidationError::with_errors(message, errors).into());
    }
    Ok(value)
}
