use dioxus::prelude::*;

use services::Screen;

use crate::context::AppContext;
use crate::sound::pump_sounds;
use crate::views::{
    CoinRefresh, DailyChallengeView, HomeView, LevelSelectView, QuizView, ResultView, ShopView,
    SplashView,
};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let flow = ctx.flow();
    let mut screen = use_signal(|| flow.screen());
    let tick = use_signal(|| 0_u64);
    use_context_provider(|| CoinRefresh::new(tick));

    use_future(move || {
        let flow = flow.clone();
        async move {
            let mut changes = flow.subscribe();
            loop {
                let next = changes.borrow_and_update().clone();
                tracing::debug!(screen = next.name(), "showing screen");
                screen.set(next);
                if changes.changed().await.is_err() {
                    return;
                }
            }
        }
    });

    use_future(move || {
        let output = ctx.take_sound_output();
        async move {
            if let Some(sounds) = output {
                pump_sounds(sounds).await;
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "ಸಿನಿಮಾ ಹುಡುಗ" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "ಏನೋ ತಪ್ಪಾಗಿದೆ" }
                        pre { "{errors:?}" }
                    }
                },
                ScreenSwitch { screen: screen() }
            }
        }
    }
}

#[component]
fn ScreenSwitch(screen: Screen) -> Element {
    match screen {
        Screen::Splash => rsx! { SplashView {} },
        Screen::Home => rsx! { HomeView {} },
        Screen::LevelSelect => rsx! { LevelSelectView {} },
        Screen::Quiz(mode) => rsx! { QuizView { mode } },
        Screen::LevelComplete(report) | Screen::GameOver(report) => rsx! { ResultView { report } },
        Screen::DailyChallenge => rsx! { DailyChallengeView {} },
        Screen::Shop => rsx! { ShopView {} },
    }
}
