//! Scope keys identifying one materialized collection.

use std::fmt;

use super::resource::ScopeLevel;

// == Scope ==
/// Where a collection lives: nowhere in particular, a project, or a parent
/// resource inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Project(String),
    Child {
        project_id: String,
        /// Parent resource name (zone, instance group, cluster, account email)
        parent: String,
        /// Zone or region of the parent, when the listing needs it
        location: Option<String>,
    },
}

impl Scope {
    pub fn project(project_id: impl Into<String>) -> Self {
        Scope::Project(project_id.into())
    }

    pub fn child(project_id: impl Into<String>, parent: impl Into<String>) -> Self {
        Scope::Child {
            project_id: project_id.into(),
            parent: parent.into(),
            location: None,
        }
    }

    pub fn child_in(
        project_id: impl Into<String>,
        parent: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Scope::Child {
            project_id: project_id.into(),
            parent: parent.into(),
            location: Some(location.into()),
        }
    }

    /// Leading project component, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Project(project_id) | Scope::Child { project_id, .. } => Some(project_id),
        }
    }

    pub fn level(&self) -> ScopeLevel {
        match self {
            Scope::Global => ScopeLevel::Global,
            Scope::Project(_) => ScopeLevel::Project,
            Scope::Child { .. } => ScopeLevel::Child,
        }
    }

    /// Returns true if this scope lives under `project_id`.
    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project_id() == Some(project_id)
    }

    /// Unambiguous key text. Every field is length-prefixed, so parents
    /// holding `/` or `@` never alias another scope.
    pub fn cache_key(&self) -> String {
        match self {
            Scope::Global => "g".to_string(),
            Scope::Project(project_id) => format!("p:{}:{}", project_id.len(), project_id),
            Scope::Child {
                project_id,
                parent,
                location,
            } => {
                let location = match location {
                    Some(location) => format!("{}:{}", location.len(), location),
                    None => "-".to_string(),
                };
                format!(
                    "c:{}:{}|{}:{}|{}",
                    project_id.len(),
                    project_id,
                    parent.len(),
                    parent,
                    location
                )
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Project(project_id) => f.write_str(project_id),
            Scope::Child {
                project_id,
                parent,
                location: Some(location),
            } => write!(f, "{}/{}@{}", project_id, parent, location),
            Scope::Child {
                project_id, parent, ..
            } => write!(f, "{}/{}", project_id, parent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id() {
        assert_eq!(Scope::Global.project_id(), None);
        assert_eq!(Scope::project("p1").project_id(), Some("p1"));
        assert_eq!(Scope::child("p1", "zone-a").project_id(), Some("p1"));
    }

    #[test]
    fn test_belongs_to_matches_whole_project_id() {
        let scope = Scope::child("p1", "cluster");
        assert!(scope.belongs_to("p1"));
        assert!(!scope.belongs_to("p10"));
        assert!(!Scope::project("p10").belongs_to("p1"));
        assert!(!Scope::Global.belongs_to("p1"));
    }

    #[test]
    fn test_cache_key_separates_lookalike_scopes() {
        let email_parent = Scope::child("infra", "deployer@infra.iam");
        let located = Scope::child_in("infra", "deployer", "infra.iam");
        assert_eq!(email_parent.to_string(), located.to_string());
        assert_ne!(email_parent.cache_key(), located.cache_key());

        assert_ne!(
            Scope::child("p/a", "b").cache_key(),
            Scope::child("p", "a/b").cache_key()
        );
        assert_eq!(Scope::child("p1", "c1").cache_key(), "c:2:p1|2:c1|-");
        assert_eq!(Scope::project("p1").cache_key(), "p:2:p1");
        assert_eq!(Scope::Global.cache_key(), "g");
    }

    #[test]
    fn test_display() {
        assert_eq!(Scope::Global.to_string(), "global");
        assert_eq!(Scope::project("p1").to_string(), "p1");
        assert_eq!(Scope::child("p1", "grp").to_string(), "p1/grp");
        assert_eq!(
            Scope::child_in("p1", "grp", "us-central1-a").to_string(),
            "p1/grp@us-central1-a"
        );
    }
}
