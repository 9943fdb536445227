//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! All data operations share the `/api/data` resource; the HTTP method picks
//! the operation and `x-httpcache-*` headers carry its parameters.
//!
//! # Endpoints
//! - `GET /api/data` - List entries or get one entry
//! - `HEAD /api/data` - Check existence
//! - `POST /api/data` - Set an entry
//! - `PUT /api/data` - Update expiry
//! - `DELETE /api/data` - Delete by key or prefix
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
