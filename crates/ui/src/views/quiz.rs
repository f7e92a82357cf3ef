use dioxus::prelude::*;

use huduga_core::quiz::{PowerUp, QuizMode, SessionSnapshot};
use services::{LiveSession, NavEvent};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::chrome::{CoinBadge, CoinRefresh, ErrorNote, navigate};
use crate::vm::{OptionVm, PowerUpVm, QuizVm};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuizAction {
    Answer(usize),
    PowerUp(PowerUp),
}

#[component]
pub fn QuizView(mode: QuizMode) -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<CoinRefresh>();
    let rules = ctx.quiz().rules().clone();
    let error = use_signal(|| None::<ViewError>);
    let mut session = use_signal(|| None::<LiveSession>);
    let mut snapshot = use_signal(|| None::<SessionSnapshot>);
    let mut coins = use_signal(|| 0_u32);

    let flow = ctx.flow();
    let profile = ctx.profile();
    use_future(move || {
        let flow = flow.clone();
        let profile = profile.clone();
        async move {
            let Some(live) = flow.active_session().await else {
                tracing::warn!(?mode, "quiz screen without a running session");
                return;
            };
            session.set(Some(live.clone()));
            let mut updates = live.subscribe();
            loop {
                let next = updates.borrow_and_update().clone();
                if let Ok(balance) = profile.coin_balance().await {
                    coins.set(balance);
                }
                snapshot.set(Some(next));
                refresh.bump();
                if updates.changed().await.is_err() {
                    return;
                }
            }
        }
    });

    let act = use_callback(move |action: QuizAction| {
        let Some(live) = session() else {
            return;
        };
        let mut error = error;
        spawn(async move {
            let result = match action {
                QuizAction::Answer(index) => live.submit_answer(index).await.map(drop),
                QuizAction::PowerUp(PowerUp::FiftyFifty) => {
                    live.activate_fifty_fifty().await.map(drop)
                }
                QuizAction::PowerUp(PowerUp::ExtraLife) => {
                    live.activate_extra_life().await.map(drop)
                }
                QuizAction::PowerUp(PowerUp::Skip) => live.activate_skip().await.map(drop),
            };
            match result {
                Ok(()) => error.set(None),
                Err(err) => {
                    tracing::debug!(?action, %err, "quiz action refused");
                    if let Some(shown) = ViewError::from_quiz(&err) {
                        error.set(Some(shown));
                    }
                }
            }
        });
    });

    let quit_ctx = ctx.clone();
    let on_quit = use_callback(move |()| {
        quit_ctx.click();
        navigate(quit_ctx.flow(), NavEvent::Home, error);
    });

    let Some(current) = snapshot() else {
        return rsx! {
            div { class: "screen quiz",
                p { class: "muted", "Loading..." }
            }
        };
    };
    let vm = QuizVm::from_snapshot(&current, &rules, coins());

    rsx! {
        div { class: "screen quiz",
            QuizPanel {
                vm,
                coins: coins(),
                on_answer: move |index| act.call(QuizAction::Answer(index)),
                on_power_up: move |power_up| {
                    ctx.click();
                    act.call(QuizAction::PowerUp(power_up));
                },
                on_quit,
            }
            ErrorNote { error }
        }
    }
}

/// Everything on the quiz screen, driven purely by `vm`.
#[component]
pub fn QuizPanel(
    vm: QuizVm,
    coins: u32,
    on_answer: Callback<usize>,
    on_power_up: Callback<PowerUp>,
    on_quit: Callback<()>,
) -> Element {
    let timer_class = if vm.timer_urgent {
        "timer-fill timer-urgent"
    } else {
        "timer-fill"
    };
    let timer_style = format!("width: {}%", vm.timer_percent);

    rsx! {
        div { class: "quiz-header",
            button {
                class: "quit-btn",
                r#type: "button",
                aria_label: "Quit",
                onclick: move |_| on_quit.call(()),
                "✕"
            }
            div { class: "quiz-title", "{vm.title}" }
            CoinBadge { coins }
        }
        div { class: "quiz-status",
            span { class: "progress", "{vm.progress_label}" }
            span { class: "hearts",
                for (slot, alive) in vm.hearts.iter().copied().enumerate() {
                    span {
                        key: "{slot}",
                        class: heart_class(alive),
                        if alive { "❤️" } else { "🖤" }
                    }
                }
            }
            span { class: "score", "⭐ {vm.score}" }
        }
        div { class: "timer",
            div { class: timer_class, style: timer_style }
            span { class: "timer-label", "{vm.seconds_left}s" }
        }
        if let Some(banner) = vm.streak_banner.clone() {
            div { class: "streak-banner", "{banner}" }
        }
        div { class: "question-card", "{vm.question_text}" }
        div { class: "options",
            for option in vm.options.clone() {
                OptionButton { key: "{option.index}", option, on_answer }
            }
        }
        if let Some(feedback) = vm.feedback {
            div { class: "feedback", "{feedback}" }
        }
        div { class: "power-ups",
            for power_up in vm.power_ups.clone() {
                PowerUpButton { key: "{power_up.icon}", power_up, on_power_up }
            }
        }
    }
}

fn heart_class(alive: bool) -> &'static str {
    if alive { "heart" } else { "heart heart-lost" }
}

#[component]
fn OptionButton(option: OptionVm, on_answer: Callback<usize>) -> Element {
    let index = option.index;
    let letter = ["A", "B", "C", "D"].get(index).copied().unwrap_or("?");
    rsx! {
        button {
            class: option.class(),
            r#type: "button",
            disabled: !option.is_clickable(),
            onclick: move |_| on_answer.call(index),
            span { class: "option-letter", "{letter}" }
            span { class: "option-label", "{option.label}" }
        }
    }
}

#[component]
fn PowerUpButton(power_up: PowerUpVm, on_power_up: Callback<PowerUp>) -> Element {
    let kind = power_up.power_up;
    rsx! {
        button {
            class: "power-up",
            r#type: "button",
            disabled: !power_up.enabled,
            onclick: move |_| on_power_up.call(kind),
            span { class: "power-up-icon", "{power_up.icon}" }
            span { class: "power-up-cost", "{power_up.cost} 🪙" }
        }
    }
}
