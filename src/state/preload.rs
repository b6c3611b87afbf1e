//! Startup preload of every project-level kind for a list of projects.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Resource, ResourceKind, Scope};
use crate::state::ResourceState;

/// Progress callback: `(done, total, message)`.
pub type ProgressFn<'a> = dyn FnMut(usize, usize, &str) + Send + 'a;

/// One kind that failed to load for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreloadFailure {
    pub project_id: String,
    pub kind: ResourceKind,
    pub error: String,
}

/// Outcome of [`ResourceState::load_all_resources`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreloadSummary {
    /// Projects processed
    pub projects: usize,
    /// (project, kind) pairs now loaded
    pub loaded: usize,
    pub failed: Vec<PreloadFailure>,
}

impl PreloadSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ResourceState {
    // == Preload ==
    /// Loads every project-level kind that has a fetcher, for each project.
    ///
    /// Kinds of one project load concurrently; projects go one after another.
    /// A failing kind is logged and recorded but never stops the rest.
    /// `on_progress` fires once per project, after it finishes, with a strictly
    /// increasing count that ends at `projects.len()`.
    pub async fn load_all_resources(
        &self,
        projects: &[Resource],
        mut on_progress: Option<&mut ProgressFn<'_>>,
    ) -> PreloadSummary {
        let total = projects.len();
        let kinds: Vec<ResourceKind> = ResourceKind::PROJECT_LEVEL
            .into_iter()
            .filter(|kind| self.fetchers().contains(*kind))
            .collect();
        let mut summary = PreloadSummary {
            projects: total,
            ..PreloadSummary::default()
        };

        info!("Preloading {} kinds for {} projects", kinds.len(), total);

        for (index, project) in projects.iter().enumerate() {
            let scope = Scope::project(project.project_id.clone());
            let loads = kinds.iter().map(|&kind| {
                let scope = &scope;
                async move { (kind, self.load(kind, scope, false).await) }
            });
            let results = join_all(loads).await;

            for (kind, result) in results {
                match result {
                    Ok(_) => summary.loaded += 1,
                    Err(err) => {
                        warn!("Failed to preload {} for {}: {}", kind, scope, err);
                        summary.failed.push(PreloadFailure {
                            project_id: project.project_id.clone(),
                            kind,
                            error: err.to_string(),
                        });
                    }
                }
            }

            if let Some(report) = on_progress.as_deref_mut() {
                let message = format!("Loaded {}", project.display_name());
                report(index + 1, total, &message);
            }

            tokio::task::yield_now().await;
        }

        info!(
            "Preload finished: {} loaded, {} failed",
            summary.loaded,
            summary.failed.len()
        );
        summary
    }
}
