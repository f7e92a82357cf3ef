use dioxus::prelude::*;

use services::audio::SoundEvent;
use services::{NavEvent, ScreenFlow};

use crate::context::AppContext;
use crate::views::ViewError;

/// Bumped whenever something may have moved the coin balance.
#[derive(Clone, Copy)]
pub struct CoinRefresh(Signal<u64>);

impl CoinRefresh {
    #[must_use]
    pub fn new(tick: Signal<u64>) -> Self {
        Self(tick)
    }

    /// Subscribes the calling scope to balance changes.
    #[must_use]
    pub fn watch(self) -> u64 {
        (self.0)()
    }

    pub fn bump(mut self) {
        *self.0.write() += 1;
    }
}

/// Dispatch `event` in the background, surfacing a refusal in `error`.
pub fn navigate(flow: ScreenFlow, event: NavEvent, mut error: Signal<Option<ViewError>>) {
    spawn(async move {
        match flow.dispatch(event).await {
            Ok(_) => error.set(None),
            Err(err) => error.set(Some(ViewError::from_flow(&err))),
        }
    });
}

#[component]
pub fn TopBar() -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<CoinRefresh>();
    let profile = ctx.profile();
    let services = ctx.services().clone();
    let sound_on = use_signal(|| services.sound_enabled());

    let coins = use_resource(move || {
        let profile = profile.clone();
        let _tick = refresh.watch();
        async move { profile.coin_balance().await.unwrap_or_default() }
    });

    let toggle = use_callback(move |()| {
        let services = services.clone();
        let mut sound_on = sound_on;
        let enabled = !sound_on();
        services.audio().play(SoundEvent::Click);
        spawn(async move {
            match services.set_sound_enabled(enabled).await {
                Ok(()) => sound_on.set(enabled),
                Err(err) => tracing::warn!(%err, "could not save sound preference"),
            }
        });
    });

    rsx! {
        div { class: "top-bar",
            SoundToggle { enabled: sound_on(), on_toggle: toggle }
            CoinBadge { coins: coins().unwrap_or_default() }
        }
    }
}

#[component]
pub fn SoundToggle(enabled: bool, on_toggle: Callback<()>) -> Element {
    let (icon, label) = if enabled {
        ("🔊", "Mute sound")
    } else {
        ("🔇", "Unmute sound")
    };
    rsx! {
        button {
            class: "sound-toggle",
            r#type: "button",
            aria_label: label,
            onclick: move |_| on_toggle.call(()),
            "{icon}"
        }
    }
}

#[component]
pub fn CoinBadge(coins: u32) -> Element {
    rsx! {
        div { class: "coin-badge", "🪙 {coins}" }
    }
}

#[component]
pub fn ErrorNote(error: Signal<Option<ViewError>>) -> Element {
    match error() {
        Some(err) => rsx! {
            p { class: "error-note", "{err.message()}" }
        },
        None => rsx! {},
    }
}
