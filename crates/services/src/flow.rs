//! Which screen is showing, and what moves the player between screens.

use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, watch};

use huduga_core::model::Level;
use huduga_core::quiz::{QuizMode, SessionOutcome, SessionResult};

use crate::error::{FlowError, ProgressionError};
use crate::live_session::{LiveSession, OutcomeHandler};
use crate::progression::{ProgressionReport, ProgressionService};
use crate::quiz_service::QuizService;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Home,
    LevelSelect,
    Quiz(QuizMode),
    LevelComplete(ProgressionReport),
    GameOver(ProgressionReport),
    DailyChallenge,
    Shop,
}

impl Screen {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::Home => "home",
            Screen::LevelSelect => "level select",
            Screen::Quiz(_) => "quiz",
            Screen::LevelComplete(_) => "level complete",
            Screen::GameOver(_) => "game over",
            Screen::DailyChallenge => "daily challenge",
            Screen::Shop => "shop",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    SplashDone,
    Play,
    SelectLevel(Level),
    OpenDailyChallenge,
    StartDaily,
    OpenShop,
    Home,
    PlayAgain,
    SessionFinished(SessionOutcome),
}

impl NavEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::SplashDone => "finish the splash",
            NavEvent::Play => "play",
            NavEvent::SelectLevel(_) => "select a level",
            NavEvent::OpenDailyChallenge => "open the daily challenge",
            NavEvent::StartDaily => "start the daily challenge",
            NavEvent::OpenShop => "open the shop",
            NavEvent::Home => "go home",
            NavEvent::PlayAgain => "play again",
            NavEvent::SessionFinished(_) => "finish a session",
        }
    }
}

struct FlowState {
    screen: Screen,
    session: Option<LiveSession>,
}

struct Shared {
    quiz: Arc<QuizService>,
    progression: Arc<ProgressionService>,
    state: Mutex<FlowState>,
    screens: watch::Sender<Screen>,
}

/// Screen state machine. Clones drive the same flow.
///
/// Sessions started from here report their outcome back as
/// `NavEvent::SessionFinished`, so the result screen appears without the UI
/// having to watch for it.
#[derive(Clone)]
pub struct ScreenFlow {
    shared: Arc<Shared>,
}

impl ScreenFlow {
    #[must_use]
    pub fn new(quiz: Arc<QuizService>, progression: Arc<ProgressionService>) -> Self {
        let (screens, _) = watch::channel(Screen::Splash);
        Self {
            shared: Arc::new(Shared {
                quiz,
                progression,
                state: Mutex::new(FlowState {
                    screen: Screen::Splash,
                    session: None,
                }),
                screens,
            }),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.shared.screens.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.shared.screens.subscribe()
    }

    /// The session behind the quiz screen, if one is running.
    pub async fn active_session(&self) -> Option<LiveSession> {
        self.shared.state.lock().await.session.clone()
    }

    /// Apply `event` and return the screen it leads to.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidTransition` when `event` makes no sense on
    /// the current screen, and `FlowError::Quiz` when a session cannot start
    /// (locked level, daily challenge already played). The screen is left
    /// unchanged on error.
    pub async fn dispatch(&self, event: NavEvent) -> Result<Screen, FlowError> {
        let mut state = self.shared.state.lock().await;
        let next = match self.transition(&mut state, event).await {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(screen = state.screen.name(), event = event.name(), %err, "navigation refused");
                return Err(err);
            }
        };
        tracing::info!(from = state.screen.name(), to = next.name(), "screen changed");
        state.screen = next.clone();
        self.shared.screens.send_replace(next.clone());
        Ok(next)
    }

    async fn transition(
        &self,
        state: &mut FlowState,
        event: NavEvent,
    ) -> Result<Screen, FlowError> {
        let next = match (&state.screen, event) {
            (Screen::Splash, NavEvent::SplashDone) => Screen::Home,
            (_, NavEvent::Home) => {
                if let Some(session) = state.session.clone() {
                    self.leave_session(&session).await?;
                    state.session = None;
                }
                Screen::Home
            }
            (
                Screen::Home | Screen::LevelComplete(_) | Screen::GameOver(_),
                NavEvent::Play,
            )
            | (Screen::LevelComplete(_) | Screen::GameOver(_), NavEvent::PlayAgain) => {
                Screen::LevelSelect
            }
            (Screen::LevelSelect, NavEvent::SelectLevel(level)) => {
                let session = self
                    .shared
                    .quiz
                    .start_level(level, self.outcome_handler())
                    .await?;
                state.session = Some(session);
                Screen::Quiz(QuizMode::Level(level))
            }
            (Screen::Home, NavEvent::OpenDailyChallenge) => Screen::DailyChallenge,
            (Screen::DailyChallenge, NavEvent::StartDaily) => {
                let session = self.shared.quiz.start_daily(self.outcome_handler()).await?;
                state.session = Some(session);
                Screen::Quiz(QuizMode::DailyChallenge)
            }
            (Screen::Home, NavEvent::OpenShop) => Screen::Shop,
            (Screen::Quiz(_), NavEvent::SessionFinished(outcome))
                if state
                    .session
                    .as_ref()
                    .is_some_and(|s| s.id() == outcome.result().session_id) =>
            {
                let report = self.shared.progression.apply(&outcome).await?;
                // The session leaves the flow here, so nothing offers this outcome again.
                state.session = None;
                self.shared.progression.forget(outcome.result().session_id);
                if outcome.is_completed() {
                    Screen::LevelComplete(report)
                } else {
                    Screen::GameOver(report)
                }
            }
            (screen, event) => {
                return Err(FlowError::InvalidTransition {
                    screen: screen.name(),
                    event: event.name(),
                });
            }
        };
        Ok(next)
    }

    /// Abandon a running session, or settle one whose outcome is still on
    /// its way to `SessionFinished`.
    async fn leave_session(&self, session: &LiveSession) -> Result<(), FlowError> {
        let Some(outcome) = session.outcome() else {
            session.abandon().await;
            return Ok(());
        };
        match self.shared.progression.apply(&outcome).await {
            Ok(_) | Err(ProgressionError::AlreadyApplied(_)) => {
                self.shared.progression.forget(session.id());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn outcome_handler(&self) -> Arc<dyn OutcomeHandler> {
        Arc::new(FlowOutcomeHandler {
            flow: Arc::downgrade(&self.shared),
        })
    }
}

/// Feeds a session's outcome back into the flow that started it.
struct FlowOutcomeHandler {
    flow: Weak<Shared>,
}

impl FlowOutcomeHandler {
    fn forward(&self, outcome: SessionOutcome) {
        let Some(shared) = self.flow.upgrade() else {
            return;
        };
        let flow = ScreenFlow { shared };
        tokio::spawn(async move {
            // Failures are logged by `dispatch`.
            let _ = flow.dispatch(NavEvent::SessionFinished(outcome)).await;
        });
    }
}

impl OutcomeHandler for FlowOutcomeHandler {
    fn on_completed(&self, result: SessionResult) {
        self.forward(SessionOutcome::Completed(result));
    }

    fn on_game_over(&self, result: SessionResult) {
        self.forward(SessionOutcome::GameOver(result));
    }
}
