//! # jsonmail-api — HTTP Boundary for the jsonmail JSON:API Service
//!
//! Translates classified failures from `jsonmail-core` into JSON:API error
//! responses and supplies the concrete serialization strategies the core
//! renders through. Route handlers live in the host service; this crate
//! gives them:
//!
//! - [`AppError`] — `?`-friendly error type implementing `IntoResponse`.
//! - [`ErrorRenderer`] — status selection and `{"errors": [...]}` bodies.
//! - [`strategy`] — `JsonApiStrategy` and `FlatJsonStrategy`.
//! - [`extractors`] — JSON body extraction with `Validate` rules.
//! - [`config`] — environment-driven [`ApiConfig`].
//! - [`telemetry`] — `tracing-subscriber` installation.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsonmail-core` internally.
//! - No routing; handlers and routers belong to the host.
//! - All failures map to structured responses via `AppError`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod strategy;
pub mod telemetry;

pub use config::ApiConfig;
pub use error::{AppError, ErrorDocument, ErrorRenderer};
