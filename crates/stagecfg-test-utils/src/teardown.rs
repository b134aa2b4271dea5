//! Teardown hooks for exercising stage removal.

use async_trait::async_trait;
use stagecfg_core::{Error, Region, ResourceTeardown, Result, Stage};
use std::sync::Mutex;

/// Records every region and stage it is asked to tear down.
#[derive(Debug, Default)]
pub struct RecordingTeardown {
    calls: Mutex<Vec<String>>,
}

impl RecordingTeardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls so far, as `stage/region` for regions and `stage` for stages.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry);
        }
    }
}

#[async_trait]
impl ResourceTeardown for RecordingTeardown {
    async fn teardown_region(&self, stage: &str, region: &Region) -> Result<()> {
        self.record(format!("{stage}/{}", region.name()));
        Ok(())
    }

    async fn teardown_stage(&self, stage: &Stage) -> Result<()> {
        self.record(stage.name().to_string());
        Ok(())
    }
}

/// Fails when asked to tear down the named region.
#[derive(Debug, Clone)]
pub struct FailingTeardown {
    region: String,
}

impl FailingTeardown {
    pub fn on_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

#[async_trait]
impl ResourceTeardown for FailingTeardown {
    async fn teardown_region(&self, stage: &str, region: &Region) -> Result<()> {
        if region.name() == self.region {
            return Err(Error::Teardown {
                stage: stage.to_string(),
                message: format!("provider refused to delete stack in {}", region.name()),
            });
        }
        Ok(())
    }
}
