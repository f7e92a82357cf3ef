use std::time::Duration;

use dioxus::prelude::*;

use services::NavEvent;

use crate::context::AppContext;

/// How long the title card stays up before the home screen.
pub const SPLASH_DURATION: Duration = Duration::from_millis(3300);

#[component]
pub fn SplashView() -> Element {
    let ctx = use_context::<AppContext>();
    let flow = ctx.flow();

    use_future(move || {
        let flow = flow.clone();
        async move {
            tokio::time::sleep(SPLASH_DURATION).await;
            if let Err(err) = flow.dispatch(NavEvent::SplashDone).await {
                tracing::debug!(%err, "splash already dismissed");
            }
        }
    });

    rsx! {
        div { class: "screen splash", aria_hidden: "true",
            div { class: "splash-spotlight" }
            div { class: "splash-logo", "🎬" }
            div { class: "splash-title", "ಸಿನಿಮಾ ಹುಡುಗ" }
            div { class: "splash-subtitle", "ಕನ್ನಡ ಸಿನಿಮಾ ಪ್ರಶ್ನೋತ್ತರ" }
        }
    }
}
