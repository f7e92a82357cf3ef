use dioxus::prelude::*;

use huduga_core::model::Level;
use huduga_core::quiz::{QuizMode, Rules};
use services::NavEvent;

use crate::context::AppContext;
use crate::views::chrome::{ErrorNote, TopBar, navigate};
use crate::views::ViewError;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let profile = ctx.profile();
    let terms = HowToPlayTerms::from_rules(ctx.quiz().rules());
    let error = use_signal(|| None::<ViewError>);
    let mut show_rules = use_signal(|| false);

    let best = use_resource(move || {
        let profile = profile.clone();
        async move { profile.best_score().await.unwrap_or_default() }
    });

    let click_ctx = ctx.clone();
    let go = use_callback(move |event: NavEvent| {
        click_ctx.click();
        navigate(click_ctx.flow(), event, error);
    });
    let toggle_rules = use_callback(move |open: bool| {
        ctx.click();
        show_rules.set(open);
    });

    rsx! {
        div { class: "screen home",
            TopBar {}
            HomePanel {
                best_score: best().unwrap_or_default(),
                on_navigate: go,
                on_show_rules: move |()| toggle_rules.call(true),
            }
            ErrorNote { error }
            if show_rules() {
                HowToPlay { terms, on_close: move |()| toggle_rules.call(false) }
            }
        }
    }
}

#[component]
pub fn HomePanel(
    best_score: u32,
    on_navigate: Callback<NavEvent>,
    on_show_rules: Callback<()>,
) -> Element {
    rsx! {
        div { class: "title-block",
            div { class: "game-title",
                "ಸಿನಿಮಾ"
                br {}
                "ಹುಡುಗ"
            }
            div { class: "game-subtitle", "ಕನ್ನಡ ಸಿನಿಮಾ ಪ್ರಶ್ನೋತ್ತರ" }
        }
        div { class: "film-reel", aria_hidden: "true",
            for slot in 0..5 {
                div { key: "{slot}", class: "film-hole" }
            }
        }
        if best_score > 0 {
            div { class: "best-card",
                div { class: "best-caption", "ಅತ್ಯುತ್ತಮ ಅಂಕ" }
                div { class: "best-value", "🏆 {best_score}" }
            }
        }
        div { class: "home-actions",
            button {
                class: "gold-btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavEvent::Play),
                "🎬 ಈಗ ಆಟ ಆಡಿರಿ"
            }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavEvent::OpenDailyChallenge),
                "🏅 ದೈನಂದಿನ ಸವಾಲು"
            }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavEvent::OpenShop),
                "🛒 ಅಂಗಡಿ"
            }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_show_rules.call(()),
                "📖 ಹೇಗೆ ಆಡಬೇಕು"
            }
        }
    }
}

/// The numbers quoted in the how-to-play rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HowToPlayTerms {
    pub points_per_correct: u32,
    pub speed_bonus_points: u32,
    pub speed_bonus_secs: u64,
    pub lives: u8,
    pub question_secs: u32,
    pub unlock_percent: u32,
    pub coins_per_correct: u32,
}

impl HowToPlayTerms {
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            points_per_correct: rules.points_per_correct,
            speed_bonus_points: rules.speed_bonus_points,
            speed_bonus_secs: rules.speed_bonus_window.as_secs(),
            lives: rules.max_lives,
            question_secs: rules.question_time_secs,
            unlock_percent: rules.unlock_percent,
            coins_per_correct: rules.coins_per_correct(QuizMode::Level(Level::Recent)),
        }
    }
}

/// Rules overlay shown over the home screen. Clicking outside the card or
/// pressing Escape closes it.
#[component]
pub fn HowToPlay(terms: HowToPlayTerms, on_close: Callback<()>) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            role: "dialog",
            aria_label: "ಹೇಗೆ ಆಡಬೇಕು",
            tabindex: "-1",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt: KeyboardEvent| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            div {
                class: "card-dark how-to-play",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                h2 { class: "modal-title", "ಹೇಗೆ ಆಡಬೇಕು" }
                ul {
                    li { "🎯 ಕನ್ನಡ ಸಿನಿಮಾದ ಬಗ್ಗೆ 4 ಆಯ್ಕೆಗಳ ಪ್ರಶ್ನೆಗಳಿಗೆ ಉತ್ತರಿಸಿ." }
                    li {
                        "✅ "
                        strong { "+{terms.points_per_correct} ಅಂಕ" }
                        " ಸರಿಯಾದ ಉತ್ತರಕ್ಕೆ."
                    }
                    li {
                        "⚡ "
                        strong { "+{terms.speed_bonus_points} ವೇಗದ ಬೋನಸ್" }
                        " {terms.speed_bonus_secs} ಸೆಕೆಂಡ್ ಒಳಗೆ ಉತ್ತರಿಸಿದರೆ."
                    }
                    li {
                        "❤️ ನಿಮಗೆ "
                        strong { "{terms.lives} ಅವಕಾಶಗಳಿವೆ" }
                        ". ತಪ್ಪು ಉತ್ತರ ಅಥವಾ ಸಮಯ ಮೀರಿದರೆ 1 ಅವಕಾಶ ಕಳೆದುಕೊಳ್ಳುವಿರಿ."
                    }
                    li {
                        "⏱️ "
                        strong { "{terms.question_secs} ಸೆಕೆಂಡ್" }
                        " ಪ್ರತಿ ಪ್ರಶ್ನೆಗೆ."
                    }
                    li {
                        "🔓 "
                        strong { "{terms.unlock_percent}%+" }
                        " ಸರಿ ಉತ್ತರ ನೀಡಿ ಮುಂದಿನ ಹಂತ ತೆರೆಯಿರಿ."
                    }
                    li {
                        "🪙 ಸರಿ ಉತ್ತರಕ್ಕೆ "
                        strong { "+{terms.coins_per_correct} ನಾಣ್ಯ" }
                        ", ಸ್ಟ್ರೀಕ್‌ಗೆ ಬೋನಸ್."
                    }
                }
                button {
                    class: "gold-btn",
                    r#type: "button",
                    onclick: move |_| on_close.call(()),
                    "ಅರ್ಥವಾಯಿತು!"
                }
            }
        }
    }
}
