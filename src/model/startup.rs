//! Startup Loading
//!
//! At process start the artifact may still be provisioning (e.g. a separate training step
//! has not finished). `load_with_retry` polls the engine a bounded number of times and then
//! lets the server continue in degraded mode.

use super::engine::RecommendationEngine;

use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between two consecutive attempts.
    pub interval: Duration,
    /// Total number of attempts. `0` still makes one attempt.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 5,
        }
    }
}

/// Tries to load the model until it succeeds or the policy is exhausted.
///
/// Returns whether the model ended up loaded; exhaustion is logged, never an error.
pub async fn load_with_retry(engine: Arc<RecommendationEngine>, policy: RetryPolicy) -> bool {
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..=attempts {
        let worker = engine.clone();
        match tokio::task::spawn_blocking(move || worker.load()).await {
            Ok(true) => {
                tracing::info!("Model loaded on attempt {}/{}", attempt, attempts);
                return true;
            }
            Ok(false) => {
                tracing::warn!(
                    "Model load attempt {}/{} failed: {}",
                    attempt,
                    attempts,
                    engine
                        .last_error()
                        .unwrap_or_else(|| "unknown error".to_string())
                );
            }
            Err(e) => {
                tracing::error!("Model load task panicked: {}", e);
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    tracing::warn!(
        "Model not loaded after {} attempts; serving without recommendations",
        attempts
    );
    false
}
