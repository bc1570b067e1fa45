//! Request DTOs for the tracked cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::{Conversion, Scalar};

/// Request body for the STORE operation (POST /store)
///
/// # Fields
/// - `value`: string, integer, float or array of bytes
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub value: Scalar,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    /// How to read the stored bytes (`raw`, `text`, `int`, `float`)
    #[serde(default, rename = "as")]
    pub conversion: Conversion,
}

/// Query string for GET /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some("URL must start with http:// or https://".to_string());
        }
        None
    }
}
