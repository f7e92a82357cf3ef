use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

use huduga_core::time::fixed_clock;
use services::audio::RenderedSound;
use services::{GameConfig, GameServices};
use storage::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{CoinRefresh, DailyChallengeView, HomeView, LevelSelectView, ShopView};

struct TestApp {
    services: GameServices,
}

impl UiApp for TestApp {
    fn services(&self) -> GameServices {
        self.services.clone()
    }

    fn take_sound_output(&self) -> Option<UnboundedReceiver<RenderedSound>> {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    LevelSelect,
    DailyChallenge,
    Shop,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let tick = use_signal(|| 0_u64);
    use_context_provider(|| CoinRefresh::new(tick));
    match props.view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::LevelSelect => rsx! { LevelSelectView {} },
        ViewKind::DailyChallenge => rsx! { DailyChallengeView {} },
        ViewKind::Shop => rsx! { ShopView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: GameServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    let config = GameConfig {
        clock: fixed_clock(),
        seed: Some(7),
        ..GameConfig::default()
    };
    let services = GameServices::with_storage(storage, config)
        .await
        .expect("game services");
    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, view });
    ViewHarness { dom, services }
}
