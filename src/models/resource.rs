//! Resource records and the kinds they come in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Scope Level ==
/// Shape of the scope key a resource kind is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    /// Not tied to any project (the project list itself)
    Global,
    /// One collection per project
    Project,
    /// One collection per parent resource inside a project
    Child,
}

// == Resource Kind ==
/// Every resource category the browser knows how to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    DnsZone,
    DnsRecord,
    CloudSql,
    InstanceGroup,
    Instance,
    GkeCluster,
    GkeNode,
    Secret,
    ServiceAccount,
    RoleBinding,
    Network,
    Bucket,
    CloudRunService,
}

impl ResourceKind {
    /// Kinds listed directly under a project; these are what an eager load fans out over.
    pub const PROJECT_LEVEL: [ResourceKind; 9] = [
        ResourceKind::DnsZone,
        ResourceKind::CloudSql,
        ResourceKind::InstanceGroup,
        ResourceKind::GkeCluster,
        ResourceKind::Secret,
        ResourceKind::ServiceAccount,
        ResourceKind::Network,
        ResourceKind::Bucket,
        ResourceKind::CloudRunService,
    ];

    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::Project,
        ResourceKind::DnsZone,
        ResourceKind::DnsRecord,
        ResourceKind::CloudSql,
        ResourceKind::InstanceGroup,
        ResourceKind::Instance,
        ResourceKind::GkeCluster,
        ResourceKind::GkeNode,
        ResourceKind::Secret,
        ResourceKind::ServiceAccount,
        ResourceKind::RoleBinding,
        ResourceKind::Network,
        ResourceKind::Bucket,
        ResourceKind::CloudRunService,
    ];

    /// Returns the scope shape this kind is keyed by.
    pub fn scope_level(self) -> ScopeLevel {
        match self {
            ResourceKind::Project => ScopeLevel::Global,
            ResourceKind::DnsRecord
            | ResourceKind::Instance
            | ResourceKind::GkeNode
            | ResourceKind::RoleBinding => ScopeLevel::Child,
            _ => ScopeLevel::Project,
        }
    }

    /// Stable identifier used in cache keys and URLs.
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::DnsZone => "dns_zone",
            ResourceKind::DnsRecord => "dns_record",
            ResourceKind::CloudSql => "cloud_sql",
            ResourceKind::InstanceGroup => "instance_group",
            ResourceKind::Instance => "instance",
            ResourceKind::GkeCluster => "gke_cluster",
            ResourceKind::GkeNode => "gke_node",
            ResourceKind::Secret => "secret",
            ResourceKind::ServiceAccount => "service_account",
            ResourceKind::RoleBinding => "role_binding",
            ResourceKind::Network => "network",
            ResourceKind::Bucket => "bucket",
            ResourceKind::CloudRunService => "cloud_run_service",
        }
    }

    /// Plural label for log lines and progress messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::DnsZone => "DNS zones",
            ResourceKind::DnsRecord => "DNS records",
            ResourceKind::CloudSql => "Cloud SQL instances",
            ResourceKind::InstanceGroup => "instance groups",
            ResourceKind::Instance => "instances",
            ResourceKind::GkeCluster => "GKE clusters",
            ResourceKind::GkeNode => "GKE nodes",
            ResourceKind::Secret => "secrets",
            ResourceKind::ServiceAccount => "service accounts",
            ResourceKind::RoleBinding => "IAM role bindings",
            ResourceKind::Network => "networks",
            ResourceKind::Bucket => "storage buckets",
            ResourceKind::CloudRunService => "Cloud Run services",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("unknown resource kind: {}", s))
    }
}

// == Resource ==
/// One browsable cloud resource, as produced by a fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    /// Owning project (for projects, the project itself)
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Zone or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Parent resource name for child kinds (zone, group, cluster, account)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(kind: ResourceKind, project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            project_id: project_id.into(),
            name: name.into(),
            display_name: None,
            location: None,
            parent: None,
            status: None,
            labels: BTreeMap::new(),
            created_at: None,
        }
    }

    /// Creates a project record.
    pub fn project(project_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let mut project = Self::new(ResourceKind::Project, project_id.clone(), project_id);
        project.display_name = Some(display_name.into());
        project
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Name to show in the tree; falls back to the resource name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip_through_from_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.slug().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("vm".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_project_level_kinds_have_project_scope() {
        for kind in ResourceKind::PROJECT_LEVEL {
            assert_eq!(kind.scope_level(), ScopeLevel::Project);
        }
        assert_eq!(ResourceKind::Project.scope_level(), ScopeLevel::Global);
        assert_eq!(ResourceKind::GkeNode.scope_level(), ScopeLevel::Child);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&ResourceKind::CloudRunService).unwrap();
        assert_eq!(json, "\"cloud_run_service\"");
    }

    #[test]
    fn test_project_display_name() {
        let project = Resource::project("prod-123", "Production");
        assert_eq!(project.kind, ResourceKind::Project);
        assert_eq!(project.project_id, "prod-123");
        assert_eq!(project.display_name(), "Production");

        let bucket = Resource::new(ResourceKind::Bucket, "prod-123", "assets");
        assert_eq!(bucket.display_name(), "assets");
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let resource: Resource = serde_json::from_str(
            r#"{"kind":"secret","project_id":"p1","name":"db-password"}"#,
        )
        .unwrap();
        assert_eq!(resource.kind, ResourceKind::Secret);
        assert!(resource.labels.is_empty());
        assert!(resource.location.is_none());
    }
}
