use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RetryPolicy;
use crate::error::FetchError;

#[async_trait]
pub trait SolvedCountSource: Send + Sync {
    async fn solved_count(&self, handle: &str) -> Result<u32, FetchError>;
}

#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn SolvedCountSource>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(source: Arc<dyn SolvedCountSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        Self {
            source: self.source.clone(),
            policy,
        }
    }

    pub async fn fetch(&self, handle: &str) -> Option<u32> {
        let handle = handle.trim();
        if handle.is_empty() {
            return None;
        }

        let attempts = self.policy.max_retries.max(1);
        for attempt in 1..=attempts {
            match self.source.solved_count(handle).await {
                Ok(count) => {
                    tracing::debug!(handle = %handle, attempt, count, "Fetched solved count");
                    return Some(count);
                }
                Err(e) => {
                    tracing::warn!(
                        handle = %handle,
                        attempt,
                        max_retries = attempts,
                        error = %e,
                        "Solved count lookup failed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        tracing::warn!(handle = %handle, "Giving up on solved count lookup");
        None
    }
}
