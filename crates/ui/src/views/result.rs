use dioxus::document::eval;
use dioxus::prelude::*;

use services::{NavEvent, ProgressionReport};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::chrome::{ErrorNote, TopBar, navigate};
use crate::vm::ResultVm;

/// Level complete and game over share one screen; `ResultVm` picks the wording.
#[component]
pub fn ResultView(report: ProgressionReport) -> Element {
    let ctx = use_context::<AppContext>();
    let error = use_signal(|| None::<ViewError>);
    let mut copied = use_signal(|| false);
    let vm = ResultVm::from_report(&report);
    let can_play_again = !report.mode().is_daily();

    let go = use_callback(move |event: NavEvent| {
        ctx.click();
        navigate(ctx.flow(), event, error);
    });

    let share_text = vm.share_text.clone();
    let on_share = use_callback(move |()| {
        let text = share_text.clone();
        spawn(async move {
            let script = format!("navigator.clipboard.writeText({text:?}); return true;");
            match eval(&script).await {
                Ok(_) => copied.set(true),
                Err(err) => tracing::warn!(?err, "could not copy share text"),
            }
        });
    });

    rsx! {
        div { class: "screen result",
            TopBar {}
            ResultPanel {
                vm,
                can_play_again,
                copied: copied(),
                on_navigate: go,
                on_share,
            }
            ErrorNote { error }
        }
    }
}

#[component]
pub fn ResultPanel(
    vm: ResultVm,
    can_play_again: bool,
    copied: bool,
    on_navigate: Callback<NavEvent>,
    on_share: Callback<()>,
) -> Element {
    let best_class = if vm.new_best {
        "best-line best-line-new"
    } else {
        "best-line"
    };
    rsx! {
        div { class: "result-emblem", "{vm.emblem}" }
        h1 { class: "result-heading", "{vm.heading}" }
        p { class: "result-subtitle", "{vm.subtitle}" }
        div { class: "card-dark result-card",
            ResultRow { label: "ಅಂಕ", value: vm.score.to_string() }
            ResultRow { label: "ಸರಿ ಉತ್ತರಗಳು", value: vm.correct_label.clone() }
            ResultRow { label: "ನಿಖರತೆ", value: vm.accuracy_label.clone() }
            ResultRow { label: "ನಾಣ್ಯಗಳು", value: vm.coins_label.clone() }
        }
        if let Some(message) = vm.unlocked_message.clone() {
            div { class: "unlock-banner", "{message}" }
        }
        div { class: best_class,
            "{vm.best_label}"
        }
        div { class: "result-actions",
            if can_play_again {
                button {
                    class: "gold-btn",
                    r#type: "button",
                    onclick: move |_| on_navigate.call(NavEvent::PlayAgain),
                    "ಮತ್ತೆ ಆಡಿರಿ"
                }
            }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_share.call(()),
                if copied { "✓ ನಕಲಿಸಲಾಗಿದೆ" } else { "📤 ಹಂಚಿಕೊಳ್ಳಿ" }
            }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_navigate.call(NavEvent::Home),
                "← ಮನೆ"
            }
        }
    }
}

#[component]
fn ResultRow(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "result-row",
            span { class: "result-label", "{label}" }
            span { class: "result-value", "{value}" }
        }
    }
}
