//! Runs a `QuizSession` in real time.
//!
//! The engine is a plain state machine; this module owns its clock. A
//! countdown task ticks once per second and a feedback-pause task advances a
//! resolved question. Both carry the question token they were spawned for,
//! so anything left over from an earlier question is ignored by the engine.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use huduga_core::model::SessionId;
use huduga_core::quiz::{
    Advance, AnswerFeedback, QuestionToken, QuizMode, QuizSession, SessionOutcome, SessionResult,
    SessionSnapshot, SessionStatus, TickResult, Wallet,
};
use storage::ProfileStore;

use crate::audio::{AudioEffectPlayer, SoundEvent};
use crate::error::QuizServiceError;

const TICK: Duration = Duration::from_secs(1);

/// Receives the terminal outcome of a session. Called at most once.
pub trait OutcomeHandler: Send + Sync {
    fn on_completed(&self, result: SessionResult);
    fn on_game_over(&self, result: SessionResult);
}

/// Ignores outcomes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopOutcomeHandler;

impl OutcomeHandler for NoopOutcomeHandler {
    fn on_completed(&self, _result: SessionResult) {}
    fn on_game_over(&self, _result: SessionResult) {}
}

struct Cell {
    session: QuizSession,
    wallet: Wallet,
    question_shown: Instant,
    handler: Option<Arc<dyn OutcomeHandler>>,
    countdown: Option<JoinHandle<()>>,
    pause: Option<JoinHandle<()>>,
}

impl Cell {
    fn abort_timers(&mut self) {
        if let Some(task) = self.countdown.take() {
            task.abort();
        }
        if let Some(task) = self.pause.take() {
            task.abort();
        }
    }
}

struct Inner {
    id: SessionId,
    mode: QuizMode,
    feedback_pause: Duration,
    cell: Mutex<Cell>,
    profile: ProfileStore,
    audio: Arc<dyn AudioEffectPlayer>,
    snapshots: watch::Sender<SessionSnapshot>,
}

/// Pending terminal notification, delivered once the session lock is released.
struct Notify(Arc<dyn OutcomeHandler>, SessionOutcome);

impl Notify {
    fn deliver(self) {
        let Notify(handler, outcome) = self;
        match outcome {
            SessionOutcome::Completed(result) => handler.on_completed(result),
            SessionOutcome::GameOver(result) => handler.on_game_over(result),
        }
    }
}

/// Handle to the session being played. Clones share the same session.
#[derive(Clone)]
pub struct LiveSession {
    inner: Arc<Inner>,
}

impl LiveSession {
    /// Present the first question and start its countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the coin balance cannot be read.
    pub async fn start(
        session: QuizSession,
        profile: ProfileStore,
        audio: Arc<dyn AudioEffectPlayer>,
        handler: Arc<dyn OutcomeHandler>,
    ) -> Result<Self, QuizServiceError> {
        let wallet = Wallet::new(profile.coin_balance().await?);
        let token = session.token();
        let (snapshots, _) = watch::channel(session.snapshot());
        let inner = Arc::new(Inner {
            id: session.id(),
            mode: session.mode(),
            feedback_pause: session.rules().feedback_pause,
            cell: Mutex::new(Cell {
                session,
                wallet,
                question_shown: Instant::now(),
                handler: Some(handler),
                countdown: None,
                pause: None,
            }),
            profile,
            audio,
            snapshots,
        });

        inner.cell.lock().await.countdown = Some(spawn_countdown(&inner, token));
        tracing::info!(session = %inner.id, mode = %inner.mode, "session started");
        Ok(Self { inner })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.inner.mode
    }

    /// The latest published state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Every change to the session, starting from the current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Rejected` for refused answers and
    /// `QuizServiceError::Storage` if earned coins cannot be saved. The answer
    /// still counts in that case; the coins stay queued for the next write.
    pub async fn submit_answer(&self, index: usize) -> Result<AnswerFeedback, QuizServiceError> {
        let inner = &self.inner;
        let mut cell = inner.cell.lock().await;
        let elapsed = cell.question_shown.elapsed();
        let cell = &mut *cell;
        let feedback = cell
            .session
            .submit_answer(index, elapsed, &mut cell.wallet)?;
        tracing::debug!(
            session = %inner.id,
            index,
            correct = feedback.is_correct(),
            points = feedback.points,
            ?elapsed,
            "answer submitted"
        );

        inner.audio.play(if feedback.is_correct() {
            SoundEvent::Correct
        } else {
            SoundEvent::Wrong
        });
        inner.resolve(cell, feedback.token);
        let flushed = inner.flush_wallet(cell).await;
        inner.publish(cell);
        flushed?;
        Ok(feedback)
    }

    /// Hide two wrong options; returns their indices.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Rejected` if refused by the engine.
    pub async fn activate_fifty_fifty(&self) -> Result<[usize; 2], QuizServiceError> {
        let inner = &self.inner;
        let mut cell = inner.cell.lock().await;
        let cell = &mut *cell;
        inner.flush_wallet(cell).await?;
        let hidden = cell.session.activate_fifty_fifty(&mut cell.wallet)?;
        tracing::debug!(session = %inner.id, ?hidden, "fifty-fifty used");
        let flushed = inner.flush_wallet(cell).await;
        inner.publish(cell);
        flushed?;
        Ok(hidden)
    }

    /// Buy back a life; returns the new life count.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Rejected` if refused by the engine.
    pub async fn activate_extra_life(&self) -> Result<u8, QuizServiceError> {
        let inner = &self.inner;
        let mut cell = inner.cell.lock().await;
        let cell = &mut *cell;
        inner.flush_wallet(cell).await?;
        let lives = cell.session.activate_extra_life(&mut cell.wallet)?;
        tracing::debug!(session = %inner.id, lives, "extra life bought");
        let flushed = inner.flush_wallet(cell).await;
        inner.publish(cell);
        flushed?;
        Ok(lives)
    }

    /// Skip the current question without a feedback pause.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Rejected` if refused by the engine.
    pub async fn activate_skip(&self) -> Result<Advance, QuizServiceError> {
        let inner = &self.inner;
        let (advance, notify, flushed) = {
            let mut cell = inner.cell.lock().await;
            let cell = &mut *cell;
            inner.flush_wallet(cell).await?;
            let advance = cell.session.activate_skip(&mut cell.wallet)?;
            tracing::debug!(session = %inner.id, "question skipped");
            let flushed = inner.flush_wallet(cell).await;
            let notify = inner.on_advance(cell, advance);
            inner.publish(cell);
            (advance, notify, flushed)
        };
        if let Some(notify) = notify {
            notify.deliver();
        }
        flushed?;
        Ok(advance)
    }

    /// Stop the session without an outcome. Timers are cancelled and the
    /// outcome handler is never called.
    pub async fn abandon(&self) {
        let inner = &self.inner;
        let mut cell = inner.cell.lock().await;
        if !cell.session.is_running() {
            return;
        }
        cell.session.abandon();
        cell.abort_timers();
        cell.handler = None;
        inner.publish(&cell);
        tracing::info!(session = %inner.id, "session abandoned");
    }

    /// The terminal outcome, once there is one.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.inner.snapshots.borrow().status {
            SessionStatus::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl Inner {
    fn publish(&self, cell: &Cell) {
        self.snapshots.send_replace(cell.session.snapshot());
    }

    /// Stop the countdown and schedule the move to the next question.
    fn resolve(self: &Arc<Self>, cell: &mut Cell, token: QuestionToken) {
        if let Some(task) = cell.countdown.take() {
            task.abort();
        }
        cell.pause = Some(spawn_pause(self, token, self.feedback_pause));
    }

    /// Write pending coin movements oldest first, then re-read the balance.
    ///
    /// The profile is the source of truth for the balance, so this also runs
    /// before anything that spends. An entry leaves the ledger only once it has
    /// been written; on failure the rest stay queued and the cached balance
    /// keeps counting them.
    async fn flush_wallet(&self, cell: &mut Cell) -> Result<(), QuizServiceError> {
        while let Some(entry) = cell.wallet.pending().first().copied() {
            let amount = u32::try_from(entry.amount.unsigned_abs()).unwrap_or(u32::MAX);
            if entry.amount >= 0 {
                self.profile.credit(amount).await?;
            } else if !self.profile.debit(amount).await? {
                tracing::warn!(
                    session = %self.id,
                    amount,
                    reason = ?entry.reason,
                    "stored balance could not cover a spend"
                );
            }
            cell.wallet.settle_oldest();
        }
        let balance = self.profile.coin_balance().await?;
        cell.wallet.resync(balance);
        Ok(())
    }

    fn on_advance(self: &Arc<Self>, cell: &mut Cell, advance: Advance) -> Option<Notify> {
        cell.abort_timers();
        match advance {
            Advance::Next(token) => {
                cell.question_shown = Instant::now();
                cell.countdown = Some(spawn_countdown(self, token));
                None
            }
            Advance::Finished(outcome) => {
                let result = outcome.result();
                tracing::info!(
                    session = %self.id,
                    completed = outcome.is_completed(),
                    score = result.score,
                    correct = result.correct_count,
                    questions = result.questions,
                    "session finished"
                );
                self.audio.play(if outcome.is_completed() {
                    SoundEvent::LevelComplete
                } else {
                    SoundEvent::GameOver
                });
                cell.handler
                    .take()
                    .map(|handler| Notify(handler, outcome))
            }
        }
    }

    /// Returns false once the countdown for `token` should stop.
    async fn tick(self: &Arc<Self>, token: QuestionToken) -> bool {
        let mut cell = self.cell.lock().await;
        match cell.session.tick(token) {
            TickResult::Stale => false,
            TickResult::Counting { seconds_left } => {
                tracing::trace!(session = %self.id, seconds_left, "tick");
                self.publish(&cell);
                true
            }
            TickResult::TimedOut(feedback) => {
                tracing::debug!(
                    session = %self.id,
                    lives = feedback.lives_remaining,
                    "question timed out"
                );
                self.audio.play(SoundEvent::Wrong);
                // This task is the countdown; dropping its own handle is enough.
                cell.countdown = None;
                cell.pause = Some(spawn_pause(self, feedback.token, self.feedback_pause));
                self.publish(&cell);
                false
            }
        }
    }

    async fn advance(self: &Arc<Self>, token: QuestionToken) {
        let notify = {
            let mut cell = self.cell.lock().await;
            let advance = match cell.session.advance(token) {
                Ok(advance) => advance,
                Err(rejected) => {
                    tracing::debug!(session = %self.id, %rejected, "ignoring stale advance");
                    return;
                }
            };
            // This task is the pause; keep it from aborting itself.
            cell.pause = None;
            if let Err(err) = self.flush_wallet(&mut cell).await {
                tracing::warn!(session = %self.id, %err, "coins still unsaved");
            }
            let notify = self.on_advance(&mut cell, advance);
            self.publish(&cell);
            notify
        };
        if let Some(notify) = notify {
            notify.deliver();
        }
    }
}

fn spawn_countdown(inner: &Arc<Inner>, token: QuestionToken) -> JoinHandle<()> {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.tick(token).await {
                return;
            }
        }
    })
}

fn spawn_pause(inner: &Arc<Inner>, token: QuestionToken, pause: Duration) -> JoinHandle<()> {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    tokio::spawn(async move {
        tokio::time::sleep(pause).await;
        if let Some(inner) = weak.upgrade() {
            inner.advance(token).await;
        }
    })
}
