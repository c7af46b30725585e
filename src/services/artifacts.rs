//! Fixture artifact registry backend.

use anyhow::Result;
use async_trait::async_trait;

use super::{Artifact, ArtifactService};

/// Serves a canned view of the internal registry.
#[derive(Debug, Default)]
pub struct ArtifactCatalog;

impl ArtifactCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactService for ArtifactCatalog {
    async fn artifacts(&self) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact {
            name: "ops-portal:1.0.0".to_string(),
            registry: "internal".to_string(),
        }])
    }
}
