use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{AcquisitionStrategy, Attempt, StrategyKind};
use crate::description::ResolvedDescription;
use crate::transport::Transport;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads the description from a running service
pub struct RemoteFetch {
    transport: Arc<dyn Transport>,
    url: String,
    timeout: Duration,
}

impl RemoteFetch {
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AcquisitionStrategy for RemoteFetch {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Remote
    }

    fn attempt(&self) -> Result<Attempt> {
        debug!(url = %self.url, timeout = ?self.timeout, "Fetching remote description");

        let response = self
            .transport
            .get(&self.url, Some("application/json"), self.timeout)?;

        if !response.is_success() {
            anyhow::bail!(
                "remote description returned HTTP {} from {}",
                response.status,
                self.url
            );
        }

        let document: serde_json::Value = serde_json::from_str(&response.body)
            .with_context(|| format!("remote description at {} is not JSON", self.url))?;
        let resolved = ResolvedDescription::from_value(document)?;

        Ok(Attempt {
            resolved,
            detail: self.url.clone(),
        })
    }
}
