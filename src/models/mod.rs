//! Domain records and HTTP DTOs
//!
//! `resource` and `scope` carry the engine's data model; `requests` and
//! `responses` are the bodies and query strings of the HTTP surface.

pub mod requests;
pub mod resource;
pub mod responses;
pub mod scope;

pub use requests::{ChildQuery, RefreshQuery};
pub use resource::{Resource, ResourceKind, ScopeLevel};
pub use responses::{
    ErrorResponse, HealthResponse, InvalidateResponse, ResourcesResponse, StatsResponse,
};
pub use scope::Scope;
