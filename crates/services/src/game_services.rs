use std::sync::Arc;

use huduga_core::Clock;
use huduga_core::model::{Profile, QuestionBank};
use huduga_core::quiz::Rules;
use storage::bank::builtin_bank;
use storage::{ProfileStore, Storage};

use crate::audio::{AudioEffectPlayer, SilentPlayer, SoundToggle};
use crate::error::GameServicesError;
use crate::flow::ScreenFlow;
use crate::progression::ProgressionService;
use crate::quiz_service::QuizService;
use crate::shop::ShopService;

/// Knobs for assembling `GameServices`.
#[derive(Clone)]
pub struct GameConfig {
    pub clock: Clock,
    pub rules: Rules,
    /// Fixes question order when set.
    pub seed: Option<u64>,
    pub audio: Arc<dyn AudioEffectPlayer>,
    /// Start muted regardless of the saved preference.
    pub mute: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clock: Clock::default(),
            rules: Rules::default(),
            seed: None,
            audio: Arc::new(SilentPlayer),
            mute: false,
        }
    }
}

/// Assembles the game-facing services over one storage backend.
#[derive(Clone)]
pub struct GameServices {
    profile: ProfileStore,
    bank: Arc<QuestionBank>,
    quiz: Arc<QuizService>,
    progression: Arc<ProgressionService>,
    shop: Arc<ShopService>,
    sound: Arc<SoundToggle>,
    flow: ScreenFlow,
}

impl GameServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `GameServicesError` if storage initialization fails or the
    /// bundled questions cannot be loaded.
    pub async fn new_sqlite(db_url: &str, config: GameConfig) -> Result<Self, GameServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(&storage, config).await
    }

    /// Build services over `storage` using the bundled question bank.
    ///
    /// # Errors
    ///
    /// Returns `GameServicesError` if the profile cannot be read or the
    /// bundled questions cannot be loaded.
    pub async fn with_storage(
        storage: &Storage,
        config: GameConfig,
    ) -> Result<Self, GameServicesError> {
        Self::with_bank(storage, Arc::new(builtin_bank()?), config).await
    }

    /// # Errors
    ///
    /// Returns `GameServicesError::Storage` if the sound preference cannot be read.
    pub async fn with_bank(
        storage: &Storage,
        bank: Arc<QuestionBank>,
        config: GameConfig,
    ) -> Result<Self, GameServicesError> {
        let profile = storage.profile();
        let sound_on = !config.mute && profile.sound_enabled().await?;
        let sound = Arc::new(SoundToggle::new(config.audio, sound_on));

        let mut quiz = QuizService::new(
            Arc::clone(&bank),
            profile.clone(),
            config.rules.clone(),
            config.clock,
            Arc::clone(&sound) as Arc<dyn AudioEffectPlayer>,
        );
        if let Some(seed) = config.seed {
            quiz = quiz.with_seed(seed);
        }
        let quiz = Arc::new(quiz);
        let progression = Arc::new(ProgressionService::new(
            profile.clone(),
            config.rules,
            config.clock,
        ));
        let shop = Arc::new(ShopService::new(profile.clone()));
        let flow = ScreenFlow::new(Arc::clone(&quiz), Arc::clone(&progression));

        tracing::info!(questions = bank.len(), sound_on, "game services ready");
        Ok(Self {
            profile,
            bank,
            quiz,
            progression,
            shop,
            sound,
            flow,
        })
    }

    #[must_use]
    pub fn profile(&self) -> ProfileStore {
        self.profile.clone()
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn progression(&self) -> Arc<ProgressionService> {
        Arc::clone(&self.progression)
    }

    #[must_use]
    pub fn shop(&self) -> Arc<ShopService> {
        Arc::clone(&self.shop)
    }

    #[must_use]
    pub fn flow(&self) -> ScreenFlow {
        self.flow.clone()
    }

    /// Effects player that honours the sound preference.
    #[must_use]
    pub fn audio(&self) -> Arc<dyn AudioEffectPlayer> {
        Arc::clone(&self.sound) as Arc<dyn AudioEffectPlayer>
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.sound.is_enabled()
    }

    /// Switch sound on or off and remember the choice.
    ///
    /// # Errors
    ///
    /// Returns `GameServicesError::Storage` if the preference cannot be saved.
    pub async fn set_sound_enabled(&self, enabled: bool) -> Result<(), GameServicesError> {
        self.profile.set_sound_enabled(enabled).await?;
        self.sound.set_enabled(enabled);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GameServicesError::Storage` if the profile cannot be read.
    pub async fn load_profile(&self) -> Result<Profile, GameServicesError> {
        Ok(self.profile.load_profile().await?)
    }
}
