//! Response DTOs for the browser API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Resource, ResourceKind, Scope};

/// Response body for a listing (GET /projects, GET /projects/:project/:kind/...)
#[derive(Debug, Clone, Serialize)]
pub struct ResourcesResponse {
    pub kind: ResourceKind,
    /// Scope key the listing belongs to
    pub scope: String,
    pub count: usize,
    pub items: Vec<Resource>,
}

impl ResourcesResponse {
    pub fn new(kind: ResourceKind, scope: &Scope, items: Vec<Resource>) -> Self {
        Self {
            kind,
            scope: scope.to_string(),
            count: items.len(),
            items,
        }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// Loaded scopes left after invalidation
    pub loaded_scopes: usize,
}

impl InvalidateResponse {
    pub fn project(project_id: &str, loaded_scopes: usize) -> Self {
        Self {
            message: format!("Project '{}' invalidated", project_id),
            loaded_scopes,
        }
    }

    pub fn all() -> Self {
        Self {
            message: "All state invalidated".to_string(),
            loaded_scopes: 0,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of entries dropped because they expired
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Current number of entries in cache
    pub entries: usize,
    pub size_bytes: usize,
    pub max_size_bytes: usize,
    /// Scopes currently loaded in state
    pub loaded_scopes: usize,
}

impl StatsResponse {
    pub fn new(
        stats: CacheStats,
        entries: usize,
        size_bytes: usize,
        max_size_bytes: usize,
        loaded_scopes: usize,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
            entries,
            size_bytes,
            max_size_bytes,
            loaded_scopes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for rejected requests
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_response_counts_items() {
        let items = vec![
            Resource::new(ResourceKind::Bucket, "p1", "logs"),
            Resource::new(ResourceKind::Bucket, "p1", "assets"),
        ];
        let resp = ResourcesResponse::new(ResourceKind::Bucket, &Scope::project("p1"), items);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["kind"], "bucket");
        assert_eq!(json["scope"], "p1");
        assert_eq!(json["count"], 2);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            expirations: 1,
        };
        let resp = StatsResponse::new(stats, 10, 2048, 4096, 3);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 1);
        assert_eq!(resp.loaded_scopes, 3);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(CacheStats::default(), 0, 0, 1024, 0);
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_invalidate_response_message() {
        let resp = InvalidateResponse::project("p1", 4);
        assert!(resp.message.contains("p1"));
        assert_eq!(resp.loaded_scopes, 4);
    }
}
