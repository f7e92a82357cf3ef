use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedReceiver;

use services::audio::{AudioEffectPlayer, RenderedSound, SoundEvent};
use services::{GameServices, QuizService, ScreenFlow, ShopService};
use storage::ProfileStore;

pub trait UiApp: Send + Sync {
    fn services(&self) -> GameServices;

    /// Rendered effects waiting for the webview to play them. Handed out once.
    fn take_sound_output(&self) -> Option<UnboundedReceiver<RenderedSound>>;
}

#[derive(Clone)]
pub struct AppContext {
    services: GameServices,
    sound_output: Arc<Mutex<Option<UnboundedReceiver<RenderedSound>>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            sound_output: Arc::new(Mutex::new(app.take_sound_output())),
        }
    }

    #[must_use]
    pub fn services(&self) -> &GameServices {
        &self.services
    }

    #[must_use]
    pub fn flow(&self) -> ScreenFlow {
        self.services.flow()
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    #[must_use]
    pub fn shop(&self) -> Arc<ShopService> {
        self.services.shop()
    }

    #[must_use]
    pub fn profile(&self) -> ProfileStore {
        self.services.profile()
    }

    /// Button feedback.
    pub fn click(&self) {
        self.services.audio().play(SoundEvent::Click);
    }

    #[must_use]
    pub fn take_sound_output(&self) -> Option<UnboundedReceiver<RenderedSound>> {
        self.sound_output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
