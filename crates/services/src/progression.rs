use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use huduga_core::Clock;
use huduga_core::model::{Level, SessionId};
use huduga_core::quiz::{QuizMode, Rules, SessionOutcome};
use storage::ProfileStore;

use crate::error::ProgressionError;

/// What a finished session did to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionReport {
    pub outcome: SessionOutcome,
    /// Bonus coins paid on top of what was earned during play.
    pub coins_credited: u32,
    /// Net coins from the session, bonuses included.
    pub coins_earned: i64,
    pub accuracy_percent: u32,
    /// Whether the unlock threshold was met.
    pub passed: bool,
    pub unlocked: Option<Level>,
    pub new_best: bool,
    pub best_score: u32,
    pub coin_balance: u32,
}

impl ProgressionReport {
    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.outcome.result().mode
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.outcome.result().score
    }
}

/// Profile changes an interrupted attempt already made, kept so that a retry
/// reports them even though they no longer look new.
#[derive(Debug, Clone, Copy, Default)]
struct Progress {
    unlocked: Option<Level>,
    new_best: bool,
}

#[derive(Debug, Clone, Copy)]
enum Claim {
    Applying,
    Applied,
    Interrupted(Progress),
}

/// Applies terminal session outcomes to the persisted profile.
///
/// Coins won or spent during play are already in the store by the time an
/// outcome arrives; this only adds the end-of-session bonuses.
pub struct ProgressionService {
    profile: ProfileStore,
    rules: Rules,
    clock: Clock,
    claims: Mutex<HashMap<SessionId, Claim>>,
}

impl ProgressionService {
    #[must_use]
    pub fn new(profile: ProfileStore, rules: Rules, clock: Clock) -> Self {
        Self {
            profile,
            rules,
            clock,
            claims: Mutex::new(HashMap::new()),
        }
    }

    /// Record `outcome` in the profile.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::AlreadyApplied` if this session was already
    /// applied, or `ProgressionError::Storage` on persistence failures. A
    /// storage failure leaves the session eligible for another attempt, and
    /// that attempt still reports an unlock or new best the failed one made.
    pub async fn apply(
        &self,
        outcome: &SessionOutcome,
    ) -> Result<ProgressionReport, ProgressionError> {
        let session_id = outcome.result().session_id;
        let Some(mut progress) = self.claim(session_id) else {
            return Err(ProgressionError::AlreadyApplied(session_id));
        };

        let report = self.apply_claimed(outcome, &mut progress).await;
        let claim = if report.is_ok() {
            Claim::Applied
        } else {
            Claim::Interrupted(progress)
        };
        self.lock_claims().insert(session_id, claim);
        report
    }

    /// Stop tracking a session whose outcome will not be offered again.
    /// Sessions still being applied are kept.
    pub fn forget(&self, session_id: SessionId) {
        let mut claims = self.lock_claims();
        if let Some(Claim::Applied | Claim::Interrupted(_)) = claims.get(&session_id) {
            claims.remove(&session_id);
        }
    }

    /// Sessions applied, or partly applied, and not yet forgotten.
    #[must_use]
    pub fn tracked_sessions(&self) -> usize {
        self.lock_claims().len()
    }

    async fn apply_claimed(
        &self,
        outcome: &SessionOutcome,
        progress: &mut Progress,
    ) -> Result<ProgressionReport, ProgressionError> {
        let result = outcome.result();
        let passed = self.rules.passes_unlock(result.correct_count, result.questions);
        let mut coins_credited = 0;

        if let SessionOutcome::Completed(_) = outcome {
            coins_credited += self.rules.completion_bonus;
            match result.mode {
                QuizMode::Level(level) => {
                    if let Some(next) = level.next().filter(|_| passed) {
                        if self.profile.unlock_level(next).await? {
                            progress.unlocked = Some(next);
                        }
                    }
                }
                QuizMode::DailyChallenge => {
                    coins_credited += self.rules.daily_bonus;
                    self.profile
                        .record_daily_challenge_played(self.clock.today())
                        .await?;
                }
            }
        }

        if self.profile.record_score(result.score).await? {
            progress.new_best = true;
        }
        let best_score = self.profile.best_score().await?;
        let coin_balance = if coins_credited > 0 {
            self.profile.credit(coins_credited).await?
        } else {
            self.profile.coin_balance().await?
        };

        let report = ProgressionReport {
            outcome: *outcome,
            coins_credited,
            coins_earned: result.coins_delta + i64::from(coins_credited),
            accuracy_percent: Rules::accuracy_percent(result.correct_count, result.questions),
            passed,
            unlocked: progress.unlocked,
            new_best: progress.new_best,
            best_score,
            coin_balance,
        };
        tracing::info!(
            session = %result.session_id,
            mode = %result.mode,
            completed = outcome.is_completed(),
            score = result.score,
            correct = result.correct_count,
            questions = result.questions,
            coins_credited,
            unlocked = ?report.unlocked,
            new_best = report.new_best,
            "session outcome applied"
        );
        Ok(report)
    }

    /// Mark `session_id` as being applied, picking up where an interrupted
    /// attempt stopped. `None` if it is applied or in flight.
    fn claim(&self, session_id: SessionId) -> Option<Progress> {
        let mut claims = self.lock_claims();
        let progress = match claims.get(&session_id) {
            None => Progress::default(),
            Some(Claim::Interrupted(progress)) => *progress,
            Some(Claim::Applying | Claim::Applied) => return None,
        };
        claims.insert(session_id, Claim::Applying);
        Some(progress)
    }

    fn lock_claims(&self) -> MutexGuard<'_, HashMap<SessionId, Claim>> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
