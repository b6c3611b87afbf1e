//! API Module
//!
//! Thin HTTP surface over the resource state manager.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics and loaded scope count
//! - `GET /projects` - Project list
//! - `GET /projects/:project/:kind` - Project-level listing
//! - `GET /projects/:project/:kind/:parent` - Child listing under a parent
//! - `DELETE /projects/:project` - Forget everything loaded for a project
//! - `DELETE /state` - Forget everything
//! - `POST /preload` - Load all project-level kinds for every project

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
