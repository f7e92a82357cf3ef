use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use huduga_core::Clock;
use huduga_core::model::{Level, QuestionBank};
use huduga_core::quiz::{QuizMode, QuizSession, Rules};
use storage::ProfileStore;

use crate::audio::AudioEffectPlayer;
use crate::error::QuizServiceError;
use crate::live_session::{LiveSession, OutcomeHandler};

/// Starts sessions after checking that the player may play them.
pub struct QuizService {
    bank: Arc<QuestionBank>,
    profile: ProfileStore,
    rules: Rules,
    clock: Clock,
    audio: Arc<dyn AudioEffectPlayer>,
    seeds: Mutex<StdRng>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        bank: Arc<QuestionBank>,
        profile: ProfileStore,
        rules: Rules,
        clock: Clock,
        audio: Arc<dyn AudioEffectPlayer>,
    ) -> Self {
        Self {
            bank,
            profile,
            rules,
            clock,
            audio,
            seeds: Mutex::new(StdRng::seed_from_u64(rand::random())),
        }
    }

    /// Make question order reproducible.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seeds: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Start a run through `level`.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::LevelLocked` if the level is not unlocked yet.
    pub async fn start_level(
        &self,
        level: Level,
        handler: Arc<dyn OutcomeHandler>,
    ) -> Result<LiveSession, QuizServiceError> {
        if !self.profile.unlocked_levels().await?.contains(level) {
            return Err(QuizServiceError::LevelLocked(level));
        }
        self.start(QuizMode::Level(level), handler).await
    }

    /// Start today's daily challenge and mark it as played.
    ///
    /// The date is recorded up front so quitting half-way does not grant a
    /// second attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::DailyUnavailable` if it was already played today.
    pub async fn start_daily(
        &self,
        handler: Arc<dyn OutcomeHandler>,
    ) -> Result<LiveSession, QuizServiceError> {
        let today = self.clock.today();
        if !self.daily_available().await? {
            return Err(QuizServiceError::DailyUnavailable);
        }
        self.profile.record_daily_challenge_played(today).await?;
        self.start(QuizMode::DailyChallenge, handler).await
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the profile cannot be read.
    pub async fn daily_available(&self) -> Result<bool, QuizServiceError> {
        let last = self.profile.daily_challenge_last_played().await?;
        Ok(last != Some(self.clock.today()))
    }

    async fn start(
        &self,
        mode: QuizMode,
        handler: Arc<dyn OutcomeHandler>,
    ) -> Result<LiveSession, QuizServiceError> {
        let rng = {
            let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
            StdRng::seed_from_u64(seeds.random())
        };
        let session = QuizSession::start(mode, &self.bank, self.rules.clone(), rng)?;
        LiveSession::start(session, self.profile.clone(), Arc::clone(&self.audio), handler).await
    }
}
