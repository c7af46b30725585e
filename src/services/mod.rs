//! Backend collaborators behind the portal.
//!
//! Handlers talk to CI, the artifact registry and monitoring through
//! these traits only, so tests can swap in failing or canned
//! implementations. The bundled implementations serve fixture data;
//! wiring in real backends means implementing a trait, not touching
//! handlers.

pub mod artifacts;
pub mod ci;
pub mod monitor;

pub use artifacts::ArtifactCatalog;
pub use ci::CiPipelines;
pub use monitor::MonitorFeed;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// One CI pipeline and its most recent run state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStatus {
    pub name: String,
    pub last: String,
}

/// One published build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub registry: String,
}

/// Point-in-time health summary from monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    pub uptime: String,
    pub errors_last_hour: u64,
    pub deps: Vec<String>,
}

/// CI pipeline queries and deployment triggers.
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Current state of every known pipeline.
    async fn pipelines(&self) -> Result<Vec<PipelineStatus>>;

    /// Kick off a deployment run against `environment`, returning the
    /// new run's identifier.
    async fn trigger(&self, environment: &str) -> Result<String>;
}

/// Artifact registry queries.
#[async_trait]
pub trait ArtifactService: Send + Sync {
    async fn artifacts(&self) -> Result<Vec<Artifact>>;
}

/// Monitoring queries.
#[async_trait]
pub trait MonitorService: Send + Sync {
    async fn snapshot(&self) -> Result<MonitorSnapshot>;
}
