use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://leetcode.com/graphql";
pub const MAX_WORKERS: usize = 32;

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub workers: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub verify_delay: Duration,
    pub request_timeout: Duration,
    pub deadline: Option<Duration>,
    pub endpoint: String,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            verify_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            deadline: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl EnrichConfig {
    pub fn worker_count(&self) -> usize {
        self.workers.clamp(1, MAX_WORKERS)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.max(1),
            delay: self.retry_delay,
        }
    }

    pub fn verify_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.max(1),
            delay: self.verify_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        EnrichConfig::default().retry_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lookup_budget() {
        let config = EnrichConfig::default();
        assert_eq!(config.retry_policy().max_retries, 3);
        assert_eq!(config.retry_policy().delay, Duration::from_secs(2));
        assert_eq!(config.verify_policy().delay, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn worker_count_is_clamped() {
        let mut config = EnrichConfig::default();
        config.workers = 0;
        assert_eq!(config.worker_count(), 1);
        config.workers = 500;
        assert_eq!(config.worker_count(), MAX_WORKERS);
    }
}
