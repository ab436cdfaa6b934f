use crate::state::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that periodically evicts expired sessions, so the
/// registry stays bounded without any caller driving cleanup.
pub fn spawn_eviction_sweeper(registry: Arc<SessionRegistry>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let evicted = registry.evict_expired().await;
            if evicted > 0 {
                tracing::info!(evicted, "Eviction sweep removed sessions");
            }
        }
    });
}
