//! Shared application state.

use std::sync::Arc;

use crate::auth::{AuthConfig, CredentialStore, TokenService};
use crate::metrics::HttpMetrics;
use crate::services::{
    ArtifactCatalog, ArtifactService, CiPipelines, MonitorFeed, MonitorService, PipelineService,
};

/// Everything handlers and middleware share, cheap to clone.
///
/// Backend collaborators are trait objects so tests can swap them for
/// canned or failing implementations through the `with_*` builders.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub ci: Arc<dyn PipelineService>,
    pub artifacts: Arc<dyn ArtifactService>,
    pub monitor: Arc<dyn MonitorService>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    /// Build state from auth configuration with the bundled fixture
    /// backends. `env:` secret references are resolved here so the
    /// token service only ever sees key material.
    pub fn new(mut auth: AuthConfig) -> Self {
        if let Ok(resolved) = auth.resolve_secret_key() {
            auth.secret_key = resolved;
        }

        Self {
            credentials: Arc::new(CredentialStore::from_entries(&auth.users)),
            tokens: Arc::new(TokenService::new(&auth)),
            ci: Arc::new(CiPipelines::new()),
            artifacts: Arc::new(ArtifactCatalog::new()),
            monitor: Arc::new(MonitorFeed::new()),
            metrics: Arc::new(HttpMetrics::new()),
        }
    }

    pub fn with_pipelines(mut self, ci: Arc<dyn PipelineService>) -> Self {
        self.ci = ci;
        self
    }

    pub fn with_artifacts(mut self, artifacts: Arc<dyn ArtifactService>) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_monitor(mut self, monitor: Arc<dyn MonitorService>) -> Self {
        self.monitor = monitor;
        self
    }
}
