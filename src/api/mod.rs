//! API Module
//!
//! HTTP handlers and routing for the tracked cache REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a value under a generated key
//! - `GET /get/:key` - Read a value
//! - `GET /replay/:operation` - Call history of an instrumented operation
//! - `GET /page` - Fetch a page through the expiring cache
//! - `GET /stats` - Keyspace statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
