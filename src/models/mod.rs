//! Request and Response models for the tracked cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GetQuery, PageQuery, StoreRequest};
pub use responses::{
    ErrorResponse, GetResponse, HealthResponse, HistoryEntry, PageResponse, ReplayResponse,
    StatsResponse, StoreResponse,
};
