//! Typed client for the VictoriaMetrics Cloud management API
//!
//! Builds authenticated requests against the cloud API, validates the shape
//! of mutating requests before they are sent, and decodes JSON responses
//! into the types of [`model`].
//!
//! - [`api`] - Client, builder and request dispatch
//! - [`model`] - Request and response types
//! - [`validation`] - Identifier and deployment parameter checks
//! - [`error`] - Error taxonomy

pub mod api;
pub mod error;
pub mod model;
pub mod validation;

pub use api::client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use api::http::{decode_json, decode_text, discard, RequestBody, ACCESS_TOKEN_HEADER};
pub use error::{Error, Result};
