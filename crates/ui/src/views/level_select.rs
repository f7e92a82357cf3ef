use dioxus::prelude::*;

use huduga_core::model::Level;
use services::NavEvent;

use crate::context::AppContext;
use crate::views::chrome::{ErrorNote, TopBar, navigate};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LevelCardVm, map_level_cards};

#[component]
pub fn LevelSelectView() -> Element {
    let ctx = use_context::<AppContext>();
    let profile = ctx.profile();
    let bank = ctx.services().bank();
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let profile = profile.clone();
        let bank = bank.clone();
        async move {
            let unlocked = profile
                .unlocked_levels()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(map_level_cards(&bank, &unlocked))
        }
    });
    let state = view_state_from_resource(resource);

    let nav_ctx = ctx.clone();
    let on_select = use_callback(move |level: Level| {
        nav_ctx.click();
        navigate(nav_ctx.flow(), NavEvent::SelectLevel(level), error);
    });
    let on_back = use_callback(move |()| {
        ctx.click();
        navigate(ctx.flow(), NavEvent::Home, error);
    });

    rsx! {
        div { class: "screen level-select",
            TopBar {}
            h1 { class: "screen-title", "ಹಂತ ಆಯ್ಕೆಮಾಡಿ" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    LevelList { cards, on_select }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error-note", "{err.message()}" }
                },
            }
            ErrorNote { error }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_back.call(()),
                "← ಮನೆ"
            }
        }
    }
}

#[component]
pub fn LevelList(cards: Vec<LevelCardVm>, on_select: Callback<Level>) -> Element {
    rsx! {
        div { class: "level-list",
            for card in cards {
                LevelCard { key: "{card.level}", card, on_select }
            }
        }
    }
}

#[component]
fn LevelCard(card: LevelCardVm, on_select: Callback<Level>) -> Element {
    let level = card.level;
    let class = if card.locked {
        "level-card level-card-locked"
    } else {
        "level-card"
    };
    rsx! {
        button {
            class,
            r#type: "button",
            disabled: card.locked,
            onclick: move |_| on_select.call(level),
            div { class: "level-number", "{card.label}" }
            div { class: "level-name", "{card.name}" }
            if card.locked {
                div { class: "level-meta", "🔒" }
            } else {
                div { class: "level-meta", "{card.question_count} ಪ್ರಶ್ನೆಗಳು" }
            }
        }
    }
}
