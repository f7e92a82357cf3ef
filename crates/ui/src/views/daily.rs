use dioxus::prelude::*;

use huduga_core::quiz::{QuizMode, Rules};
use services::NavEvent;

use crate::context::AppContext;
use crate::views::chrome::{ErrorNote, TopBar, navigate};
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn DailyChallengeView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let terms = DailyTerms::from_rules(quiz.rules());
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let quiz = quiz.clone();
        async move { quiz.daily_available().await.map_err(|_| ViewError::Unknown) }
    });
    let state = view_state_from_resource(resource);

    let go = use_callback(move |event: NavEvent| {
        ctx.click();
        navigate(ctx.flow(), event, error);
    });

    rsx! {
        div { class: "screen daily",
            TopBar {}
            div { class: "daily-emblem", "🏅" }
            h1 { class: "screen-title", "ದೈನಂದಿನ ಸವಾಲು" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Ready(available) => rsx! {
                    DailyPanel { available, terms, on_navigate: go }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error-note", "{err.message()}" }
                },
            }
            ErrorNote { error }
        }
    }
}

/// The numbers quoted in the daily challenge rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyTerms {
    pub questions: usize,
    pub coins_per_correct: u32,
    pub bonus: u32,
}

impl DailyTerms {
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            questions: rules.daily_question_count,
            coins_per_correct: rules.coins_per_correct(QuizMode::DailyChallenge),
            bonus: rules.daily_bonus,
        }
    }
}

#[component]
pub fn DailyPanel(available: bool, terms: DailyTerms, on_navigate: Callback<NavEvent>) -> Element {
    rsx! {
        if available {
            div { class: "card-dark daily-rules",
                ul {
                    li { "📝 {terms.questions} ಮಿಶ್ರ ಪ್ರಶ್ನೆಗಳು" }
                    li { "🪙 ಪ್ರತಿ ಸರಿ ಉತ್ತರಕ್ಕೆ {terms.coins_per_correct} ನಾಣ್ಯ" }
                    li { "🎁 ಪೂರ್ಣಗೊಳಿಸಿದರೆ +{terms.bonus} ಬೋನಸ್" }
                    li { "📅 ದಿನಕ್ಕೆ ಒಮ್ಮೆ ಮಾತ್ರ" }
                }
            }
            button {
                class: "gold-btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavEvent::StartDaily),
                "ಸವಾಲು ಪ್ರಾರಂಭಿಸಿ"
            }
        } else {
            div { class: "card-dark daily-done",
                div { class: "daily-hourglass", "⏳" }
                p {
                    "ಇಂದಿನ ಸವಾಲು ಮುಗಿದಿದೆ!"
                    br {}
                    "ನಾಳೆ ಮತ್ತೆ ಬನ್ನಿ"
                }
                p { class: "muted", "ಪ್ರತಿ ದಿನ ಹೊಸ {terms.questions} ಪ್ರಶ್ನೆಗಳು" }
            }
        }
        button {
            class: "ghost-btn",
            r#type: "button",
            onclick: move |_| on_navigate.call(NavEvent::Home),
            "← ಮನೆ"
        }
    }
}
