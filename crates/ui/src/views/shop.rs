use dioxus::prelude::*;

use services::{NavEvent, Reward};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::views::chrome::{CoinRefresh, ErrorNote, TopBar, navigate};

#[component]
pub fn ShopView() -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<CoinRefresh>();
    let error = use_signal(|| None::<ViewError>);
    let mut last_claim = use_signal(|| None::<u32>);

    let claim_ctx = ctx.clone();
    let on_claim = use_callback(move |reward: Reward| {
        claim_ctx.click();
        let shop = claim_ctx.shop();
        let mut error = error;
        spawn(async move {
            match shop.claim(reward).await {
                Ok(_) => {
                    last_claim.set(Some(reward.coins()));
                    refresh.bump();
                }
                Err(err) => {
                    tracing::warn!(%err, ?reward, "reward claim failed");
                    error.set(Some(ViewError::Unknown));
                }
            }
        });
    });
    let on_home = use_callback(move |()| {
        ctx.click();
        navigate(ctx.flow(), NavEvent::Home, error);
    });

    rsx! {
        div { class: "screen shop",
            TopBar {}
            h1 { class: "screen-title", "🛒 ಅಂಗಡಿ" }
            ShopPanel { last_claim: last_claim(), on_claim }
            ErrorNote { error }
            button {
                class: "ghost-btn",
                r#type: "button",
                onclick: move |_| on_home.call(()),
                "← ಮನೆ"
            }
        }
    }
}

#[component]
pub fn ShopPanel(last_claim: Option<u32>, on_claim: Callback<Reward>) -> Element {
    rsx! {
        div { class: "shop-cards",
            for reward in Reward::ALL {
                RewardCard { key: "{reward.coins()}", reward, on_claim }
            }
        }
        if let Some(amount) = last_claim {
            p { class: "claim-note", "+{amount} 🪙 ಸೇರಿಸಲಾಗಿದೆ!" }
        }
    }
}

#[component]
fn RewardCard(reward: Reward, on_claim: Callback<Reward>) -> Element {
    let coins = reward.coins();
    let blurb = match reward {
        Reward::Small => "ಜಾಹೀರಾತು ನೋಡಿ ನಾಣ್ಯ ಗಳಿಸಿ",
        Reward::Large => "ದೊಡ್ಡ ಜಾಹೀರಾತು – ಹೆಚ್ಚು ನಾಣ್ಯ!",
    };
    rsx! {
        div { class: "card-dark reward-card",
            div { class: "reward-title", "{coins} 🪙 ಗಳಿಸಿ" }
            div { class: "reward-blurb", "{blurb}" }
            button {
                class: "gold-btn",
                r#type: "button",
                onclick: move |_| on_claim.call(reward),
                "ಜಾಹೀರಾತು ನೋಡಿ → +{coins} 🪙"
            }
        }
    }
}
