//! # Failure Flow Tests
//!
//! Exercises the path a request takes when it fails: external rules
//! accumulate error objects, a classified failure is raised with the full
//! list attached, it propagates through `?` as a `ServiceError`, and the
//! boundary reads its status and renders its errors.

use jsonmail_core::{
    ClassifiedError, ErrorObject, ErrorObjectList, ResourceNotFoundError, ServiceError,
    StatusClass, ValidationError,
};
use serde_json::json;

/// Stand-in for an external rule set over a mail account form.
fn check_account(name: &str, inbox_port: u32) -> ErrorObjectList {
    let mut errors = ErrorObjectList::new();
    if name.is_empty() {
        errors.push(
            ErrorObject::new("REQUIRED", "Name is required").with_source("/data/attributes/name"),
        );
    }
    if inbox_port > 65_535 {
        errors.push(
            ErrorObject::new("OUT_OF_RANGE", "Port out of range")
                .with_detail(format!("{inbox_port} exceeds 65535"))
                .with_source("/data/attributes/inbox_port"),
        );
    }
    errors
}

fn create_account(name: &str, inbox_port: u32) -> Result<String, ServiceError> {
    let errors = check_account(name, inbox_port);
    if !errors.is_empty() {
        let mut failure = ValidationError::new("mail account rejected");
        failure
            .set_errors(errors)
            .map_err(|e| jsonmail_core::UnexpectedResolveError::new(e.to_string()))?;
        return Err(failure.into());
    }
    Ok(name.to_string())
}

fn load_account(id: &str) -> Result<String, ServiceError> {
    Err(ResourceNotFoundError::new(format!("mail account {id}")).into())
}

#[test]
fn valid_input_passes() {
    assert_eq!(create_account("dev", 993).unwrap(), "dev");
}

#[test]
fn every_failed_rule_reaches_the_boundary() {
    let err = create_account("", 70_000).unwrap_err();
    assert_eq!(err.status(), StatusClass::BadRequest);
    assert_eq!(err.status().as_u16(), 400);

    let body = err.errors().to_json(None).unwrap();
    assert_eq!(
        body,
        vec![
            json!({
                "code": "REQUIRED",
                "title": "Name is required",
                "source": "/data/attributes/name",
            }),
            json!({
                "code": "OUT_OF_RANGE",
                "title": "Port out of range",
                "detail": "70000 exceeds 65535",
                "source": "/data/attributes/inbox_port",
            }),
        ]
    );
}

#[test]
fn not_found_carries_no_errors() {
    let err = load_account("7").unwrap_err();
    assert_eq!(err.status(), StatusClass::NotFound);
    assert!(err.errors().is_empty());
    assert_eq!(err.errors().to_json(None).unwrap(), Vec::<serde_json::Value>::new());
    assert_eq!(err.to_string(), "resource not found: mail account 7");
}

#[test]
fn classification_stable_across_instances() {
    let statuses: Vec<StatusClass> = (0..5)
        .map(|i| {
            if i % 2 == 0 {
                create_account("", 1).unwrap_err().status()
            } else {
                ValidationError::new("bare").status()
            }
        })
        .collect();
    assert!(statuses.iter().all(|s| *s == StatusClass::BadRequest));
}
