use super::bank::QuestionBank;
use super::bot::SimulatedPlayer;
use crate::clock::Clock;
use crate::error::{GameError, GameResult};
use crate::types::{Phase, Question, QuestionView, SessionConfig, SessionId, SessionStatus};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// One quiz round: a fixed question queue, one or more humans, and a set of
/// simulated opponents answering on cancellable timers.
///
/// All mutable state sits behind a single mutex, so per-session operations
/// are serialized; timer tasks hold `Weak` references and cannot outlive
/// eviction.
pub struct GameSession {
    id: SessionId,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    humans: Vec<String>,
    bots: Vec<SimulatedPlayer>,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    phase: Phase,
    questions: Vec<Question>,
    current_index: usize,
    scoreboard: HashMap<String, u32>,
    /// participant -> answer for the current question, first write wins
    pending: HashMap<String, String>,
    deadline: Option<DateTime<Utc>>,
    timers: Vec<JoinHandle<()>>,
    rng: StdRng,
    last_activity: Instant,
    finished_at: Option<Instant>,
}

impl GameSession {
    pub fn new(
        id: SessionId,
        human_names: Vec<String>,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let bots: Vec<SimulatedPlayer> = (1..=config.bot_count)
            .map(|i| SimulatedPlayer::new(format!("AI-{i}"), rng.random_range(1..=5)))
            .collect();

        let mut scoreboard = HashMap::new();
        for name in human_names.iter().chain(bots.iter().map(|b| &b.name)) {
            scoreboard.insert(name.clone(), 0);
        }

        Arc::new(Self {
            id,
            config,
            clock,
            humans: human_names,
            bots,
            inner: Mutex::new(SessionInner {
                phase: Phase::Waiting,
                questions: Vec::new(),
                current_index: 0,
                scoreboard,
                pending: HashMap::new(),
                deadline: None,
                timers: Vec::new(),
                rng,
                last_activity: Instant::now(),
                finished_at: None,
            }),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Draw the question sample and open question 0.
    ///
    /// Fails with `Configuration` when the usable pool is empty; the caller
    /// must not keep the session around in that case.
    pub async fn start(self: &Arc<Self>, bank: &QuestionBank) -> GameResult<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.phase != Phase::Waiting {
            return Err(GameError::InvalidState { phase: inner.phase });
        }

        let questions = bank.sample(self.config.question_count, &mut inner.rng);
        if questions.is_empty() {
            return Err(GameError::Configuration);
        }

        tracing::info!(
            session = %self.id,
            questions = questions.len(),
            bots = self.bots.len(),
            "Starting session"
        );
        inner.questions = questions;
        inner.current_index = 0;
        self.open_question(inner);
        inner.last_activity = Instant::now();
        Ok(())
    }

    /// Record a participant's answer to the live question.
    ///
    /// Grading happens immediately by exact text equality; when everyone has
    /// answered, the session moves to Grading and the pacing timer takes it
    /// to the next question.
    pub async fn submit_answer(
        self: &Arc<Self>,
        participant: &str,
        answer: &str,
    ) -> GameResult<SessionStatus> {
        if !self.is_participant(participant) {
            return Err(GameError::UnknownParticipant(participant.to_string()));
        }

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        self.record_answer(inner, participant, answer.to_string())?;
        inner.last_activity = Instant::now();
        Ok(self.snapshot(inner))
    }

    /// Pure read of the session snapshot.
    pub async fn status(&self) -> SessionStatus {
        let guard = self.inner.lock().await;
        self.snapshot(&guard)
    }

    /// The live question and its informational deadline.
    pub async fn current_question(&self) -> QuestionView {
        let guard = self.inner.lock().await;
        QuestionView {
            question: guard.questions.get(guard.current_index).cloned(),
            deadline: guard.deadline.map(|d| d.to_rfc3339()),
        }
    }

    /// Cancel all outstanding timers. Used on eviction; a finished session
    /// has already cancelled its own.
    pub async fn shutdown(&self) {
        let mut guard = self.inner.lock().await;
        cancel_timers(&mut guard);
    }

    /// Eviction check: finished longer than `finished_ttl` ago, or no
    /// mutation for `idle_ttl`.
    pub async fn is_expired(&self, idle_ttl: Duration, finished_ttl: Duration) -> bool {
        let guard = self.inner.lock().await;
        match guard.finished_at {
            Some(done) => done.elapsed() >= finished_ttl,
            None => guard.last_activity.elapsed() >= idle_ttl,
        }
    }

    fn is_participant(&self, name: &str) -> bool {
        self.humans.iter().any(|h| h == name) || self.bots.iter().any(|b| b.name == name)
    }

    fn participant_names(&self) -> Vec<String> {
        self.humans
            .iter()
            .cloned()
            .chain(self.bots.iter().map(|b| b.name.clone()))
            .collect()
    }

    /// Timer-driven simulated answer. Stale fires (the session advanced or
    /// finished while the timer slept) are rejected and discarded upstream.
    async fn submit_simulated(self: &Arc<Self>, bot_index: usize, armed_index: usize) -> GameResult<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.phase != Phase::AwaitingAnswers || inner.current_index != armed_index {
            return Err(GameError::InvalidState { phase: inner.phase });
        }
        let Some(bot) = self.bots.get(bot_index) else {
            return Ok(());
        };

        let answer = bot.answer(&inner.questions[armed_index], &mut inner.rng);
        let name = bot.name.clone();
        self.record_answer(inner, &name, answer)?;
        inner.last_activity = Instant::now();
        Ok(())
    }

    fn record_answer(
        self: &Arc<Self>,
        inner: &mut SessionInner,
        participant: &str,
        answer: String,
    ) -> GameResult<()> {
        if inner.phase != Phase::AwaitingAnswers {
            return Err(GameError::InvalidState { phase: inner.phase });
        }
        if inner.pending.contains_key(participant) {
            return Err(GameError::AlreadyAnswered(participant.to_string()));
        }

        let question = &inner.questions[inner.current_index];
        let correct = answer == question.correct_answer;
        inner.pending.insert(participant.to_string(), answer);
        if correct {
            *inner.scoreboard.entry(participant.to_string()).or_insert(0) += 1;
        }

        if inner.pending.len() == self.humans.len() + self.bots.len() {
            inner.phase = Phase::Grading;
            self.arm_pacing_timer(inner);
        }
        Ok(())
    }

    /// Transition to the question at `current_index`: fresh deadline, fresh
    /// opponent timers, answers open.
    fn open_question(self: &Arc<Self>, inner: &mut SessionInner) {
        inner.phase = Phase::AwaitingAnswers;
        inner.pending.clear();
        inner.deadline = Some(
            self.clock.now() + chrono::Duration::seconds(self.config.answer_window_secs as i64),
        );
        self.arm_bot_timers(inner);
    }

    fn arm_bot_timers(self: &Arc<Self>, inner: &mut SessionInner) {
        inner.timers.retain(|t| !t.is_finished());

        let armed_index = inner.current_index;
        for bot_index in 0..self.bots.len() {
            let delay = Duration::from_millis(inner.rng.random_range(0..=self.config.bot_delay_max_ms));
            let weak = Arc::downgrade(self);
            let clock = Arc::clone(&self.clock);
            inner.timers.push(tokio::spawn(async move {
                clock.sleep(delay).await;
                let Some(session) = weak.upgrade() else { return };
                if let Err(err) = session.submit_simulated(bot_index, armed_index).await {
                    tracing::debug!(
                        session = %session.id,
                        bot = bot_index,
                        question = armed_index,
                        %err,
                        "Discarding simulated answer"
                    );
                }
            }));
        }
    }

    fn arm_pacing_timer(self: &Arc<Self>, inner: &mut SessionInner) {
        let from_index = inner.current_index;
        let delay = Duration::from_millis(self.config.pacing_delay_ms);
        let weak = Arc::downgrade(self);
        let clock = Arc::clone(&self.clock);
        inner.timers.push(tokio::spawn(async move {
            clock.sleep(delay).await;
            if let Some(session) = weak.upgrade() {
                session.advance(from_index).await;
            }
        }));
    }

    /// Timer-driven advancement out of Grading: next question, or Finished
    /// once the queue is exhausted.
    async fn advance(self: &Arc<Self>, from_index: usize) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.phase != Phase::Grading || inner.current_index != from_index {
            tracing::debug!(session = %self.id, question = from_index, "Stale advance ignored");
            return;
        }

        inner.current_index += 1;
        inner.pending.clear();
        inner.last_activity = Instant::now();

        if inner.current_index == inner.questions.len() {
            inner.phase = Phase::Finished;
            inner.deadline = None;
            inner.finished_at = Some(Instant::now());
            cancel_timers(inner);
            tracing::info!(session = %self.id, "Session finished");
        } else {
            self.open_question(inner);
        }
    }

    fn snapshot(&self, inner: &SessionInner) -> SessionStatus {
        let total = inner.questions.len();
        let mut answered: Vec<String> = inner.pending.keys().cloned().collect();
        answered.sort();

        SessionStatus {
            session_id: self.id.clone(),
            phase: inner.phase,
            current_question: inner.questions.get(inner.current_index).cloned(),
            scoreboard: inner.scoreboard.clone(),
            answered,
            participants: self.participant_names(),
            simulated_players: self.bots.iter().map(|b| b.name.clone()).collect(),
            total_questions: total,
            current_question_number: (inner.current_index + 1).min(total),
            progress: if total == 0 {
                0.0
            } else {
                inner.current_index as f64 / total as f64
            },
        }
    }
}

fn cancel_timers(inner: &mut SessionInner) {
    for timer in inner.timers.drain(..) {
        timer.abort();
    }
}
