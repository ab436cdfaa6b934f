mod bank;
mod bot;
mod session;

pub use bank::QuestionBank;
pub use bot::SimulatedPlayer;
pub use session::GameSession;

use crate::clock::{Clock, TokioClock};
use crate::error::{GameError, GameResult};
use crate::types::{QuestionView, SessionConfig, SessionId, SessionStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// When sessions become eligible for eviction.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    /// Sessions with no mutation for this long are evicted
    pub idle_ttl: Duration,
    /// Finished sessions linger this long for final status reads
    pub finished_ttl: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(60 * 60),
            finished_ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Owns every live session. Constructor-injected wherever it is needed, so
/// tests can run independent registries side by side.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<GameSession>>>,
    bank: QuestionBank,
    config: SessionConfig,
    eviction: EvictionPolicy,
    clock: Arc<dyn Clock>,
}

impl SessionRegistry {
    pub fn new(bank: QuestionBank, config: SessionConfig) -> Self {
        Self::with_clock(bank, config, Arc::new(TokioClock))
    }

    pub fn with_clock(bank: QuestionBank, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            bank,
            config,
            eviction: EvictionPolicy::default(),
            clock,
        }
    }

    pub fn with_eviction_policy(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Create and start a session for the given humans plus the configured
    /// number of simulated opponents. The session is only stored once it has
    /// started successfully.
    pub async fn create(
        &self,
        session_id: SessionId,
        human_names: Vec<String>,
    ) -> GameResult<SessionStatus> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return Err(GameError::Conflict(session_id));
        }

        let session = GameSession::new(
            session_id.clone(),
            human_names,
            self.config.clone(),
            Arc::clone(&self.clock),
        );
        session.start(&self.bank).await?;

        let status = session.status().await;
        sessions.insert(session_id, session);
        Ok(status)
    }

    pub async fn get(&self, session_id: &str) -> GameResult<Arc<GameSession>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(session_id.to_string()))
    }

    pub async fn submit_answer(
        &self,
        session_id: &str,
        participant: &str,
        answer: &str,
    ) -> GameResult<SessionStatus> {
        let session = self.get(session_id).await?;
        session.submit_answer(participant, answer).await
    }

    pub async fn status(&self, session_id: &str) -> GameResult<SessionStatus> {
        Ok(self.get(session_id).await?.status().await)
    }

    pub async fn current_question(&self, session_id: &str) -> GameResult<QuestionView> {
        Ok(self.get(session_id).await?.current_question().await)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions past their TTL, cancelling their timers.
    /// Returns how many were evicted.
    pub async fn evict_expired(&self) -> usize {
        let sessions = self.sessions.read().await;
        let mut candidates = Vec::new();
        for (id, session) in sessions.iter() {
            if session
                .is_expired(self.eviction.idle_ttl, self.eviction.finished_ttl)
                .await
            {
                candidates.push(id.clone());
            }
        }
        drop(sessions);

        if candidates.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let mut evicted = 0;
        for id in candidates {
            // Re-check under the write lock: the session may have seen
            // activity between the scan and now.
            let still_expired = match sessions.get(&id) {
                Some(session) => {
                    session
                        .is_expired(self.eviction.idle_ttl, self.eviction.finished_ttl)
                        .await
                }
                None => false,
            };
            if still_expired {
                if let Some(session) = sessions.remove(&id) {
                    session.shutdown().await;
                    evicted += 1;
                    tracing::info!(session = %id, "Evicted expired session");
                }
            }
        }
        evicted
    }
}
