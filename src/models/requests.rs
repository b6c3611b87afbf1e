//! Query string DTOs for the browser API

use serde::Deserialize;

/// Query for listing a project-level kind (`?refresh=true`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshQuery {
    /// Bypass state and cache
    #[serde(default)]
    pub refresh: bool,
}

/// Query for listing a child kind under a parent resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildQuery {
    /// Zone or region of the parent, when the parent name alone is ambiguous
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

impl ChildQuery {
    /// Returns the location, treating an empty value as absent.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|loc| !loc.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_defaults_to_false() {
        let query: RefreshQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.refresh);
    }

    #[test]
    fn test_child_query_with_location() {
        let json = r#"{"location": "europe-west1-b", "refresh": true}"#;
        let query: ChildQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.location(), Some("europe-west1-b"));
        assert!(query.refresh);
    }

    #[test]
    fn test_child_query_empty_location() {
        let query = ChildQuery {
            location: Some(String::new()),
            refresh: false,
        };
        assert!(query.location().is_none());
    }
}
