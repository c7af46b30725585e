//! Fixture CI backend.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use super::{PipelineService, PipelineStatus};

/// Serves canned pipeline state and mints sequential run identifiers.
///
/// The run counter is shared across environments, so identifiers stay
/// unique for the lifetime of the process.
#[derive(Debug, Default)]
pub struct CiPipelines {
    run_counter: AtomicU64,
}

impl CiPipelines {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PipelineService for CiPipelines {
    async fn pipelines(&self) -> Result<Vec<PipelineStatus>> {
        Ok(vec![
            PipelineStatus {
                name: "build".to_string(),
                last: "success".to_string(),
            },
            PipelineStatus {
                name: "deploy".to_string(),
                last: "running".to_string(),
            },
        ])
    }

    async fn trigger(&self, environment: &str) -> Result<String> {
        let seq = self.run_counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("run-{environment}-{seq:03}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pipelines_fixture() {
        let ci = CiPipelines::new();
        let pipelines = ci.pipelines().await.unwrap();

        assert_eq!(pipelines.len(), 2);
        assert_eq!(pipelines[0].name, "build");
        assert_eq!(pipelines[0].last, "success");
        assert_eq!(pipelines[1].name, "deploy");
        assert_eq!(pipelines[1].last, "running");
    }

    #[tokio::test]
    async fn test_trigger_counts_across_environments() {
        let ci = CiPipelines::new();

        assert_eq!(ci.trigger("prod").await.unwrap(), "run-prod-001");
        assert_eq!(ci.trigger("prod").await.unwrap(), "run-prod-002");
        assert_eq!(ci.trigger("staging").await.unwrap(), "run-staging-003");
    }
}
