//! Fixture monitoring backend.

use anyhow::Result;
use async_trait::async_trait;

use super::{MonitorService, MonitorSnapshot};

/// Serves a canned health snapshot.
#[derive(Debug, Default)]
pub struct MonitorFeed;

impl MonitorFeed {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MonitorService for MonitorFeed {
    async fn snapshot(&self) -> Result<MonitorSnapshot> {
        Ok(MonitorSnapshot {
            uptime: "72h".to_string(),
            errors_last_hour: 0,
            deps: vec![
                "db".to_string(),
                "cache".to_string(),
                "queue".to_string(),
            ],
        })
    }
}
