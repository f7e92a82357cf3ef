use dioxus::prelude::*;

use huduga_core::model::{Level, Question, QuestionId, SessionId};
use huduga_core::quiz::{
    QuestionPhase, QuizMode, Rules, SessionOutcome, SessionResult, SessionSnapshot, SessionStatus,
};
use huduga_core::time::fixed_clock;
use services::ProgressionReport;
use storage::Storage;

use super::chrome::ErrorNote;
use super::test_harness::{ViewKind, drive_dom, setup_view_harness};
use crate::views::{
    DailyPanel, DailyTerms, HowToPlay, HowToPlayTerms, QuizPanel, ResultPanel, ShopPanel,
    ViewError,
};
use crate::vm::{QuizVm, ResultVm};

fn render_static(dom: &mut VirtualDom) -> String {
    dom.rebuild_in_place();
    drive_dom(dom);
    dioxus_ssr::render(dom)
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_shows_best_score_and_menu() {
    let storage = Storage::in_memory();
    storage.profile().record_score(85).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Home, &storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("🏆 85"), "missing best score in {html}");
    assert!(html.contains("ಈಗ ಆಟ ಆಡಿರಿ"), "missing play button in {html}");
    assert!(html.contains("ದೈನಂದಿನ ಸವಾಲು"), "missing daily button in {html}");
    assert!(html.contains("📖 ಹೇಗೆ ಆಡಬೇಕು"), "missing rules button in {html}");
    assert!(html.contains("🪙 100"), "missing coin badge in {html}");
    assert!(!html.contains("modal-backdrop"), "rules open before asked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_hides_best_card_for_new_player() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Home, &storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(!html.contains("🏆"), "unexpected best card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn level_select_smoke_locks_unreached_levels() {
    let storage = Storage::in_memory();
    storage.profile().unlock_level(Level::Actors).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::LevelSelect, &storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("15 ಪ್ರಶ್ನೆಗಳು"), "missing level 1 count in {html}");
    assert!(html.contains("ನಟರು"), "missing level 2 in {html}");
    assert_eq!(html.matches("level-card-locked").count(), 2, "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn daily_view_smoke_reports_todays_play() {
    let storage = Storage::in_memory();
    storage
        .profile()
        .record_daily_challenge_played(fixed_clock().today())
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::DailyChallenge, &storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("ಇಂದಿನ ಸವಾಲು ಮುಗಿದಿದೆ!"), "missing done note in {html}");
    assert!(!html.contains("ಸವಾಲು ಪ್ರಾರಂಭಿಸಿ"), "start offered twice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shop_view_smoke_lists_rewards() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Shop, &storage).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("+50 🪙"), "missing small reward in {html}");
    assert!(html.contains("+100 🪙"), "missing large reward in {html}");
}

fn snapshot(phase: QuestionPhase, hidden: Vec<usize>, selected: Option<usize>) -> SessionSnapshot {
    let question = Question::new(
        QuestionId::new(11),
        "ಕಾಂತಾರ ಚಿತ್ರದ ನಿರ್ದೇಶಕರು ಯಾರು?",
        [
            "ರಿಷಬ್ ಶೆಟ್ಟಿ".into(),
            "ರಕ್ಷಿತ್ ಶೆಟ್ಟಿ".into(),
            "ರಾಜ್ ಬಿ ಶೆಟ್ಟಿ".into(),
            "ಪ್ರಶಾಂತ್ ನೀಲ್".into(),
        ],
        0,
        Level::Recent,
    )
    .unwrap();
    SessionSnapshot {
        session_id: SessionId::generate(),
        mode: QuizMode::Level(Level::Recent),
        index: 4,
        total: 15,
        question,
        hidden_options: hidden,
        selected_option: selected,
        phase,
        seconds_left: 4,
        score: 60,
        lives: 1,
        max_lives: 3,
        streak: 3,
        correct_count: 4,
        coins_delta: 60,
        fifty_fifty_used: false,
        status: SessionStatus::Running,
    }
}

#[derive(Props, Clone, PartialEq)]
struct QuizPanelHarnessProps {
    vm: QuizVm,
}

#[component]
fn QuizPanelHarness(props: QuizPanelHarnessProps) -> Element {
    rsx! {
        QuizPanel {
            vm: props.vm,
            coins: 40,
            on_answer: |_| {},
            on_power_up: |_| {},
            on_quit: |_| {},
        }
    }
}

#[test]
fn quiz_panel_renders_question_timer_and_hidden_options() {
    let vm = QuizVm::from_snapshot(
        &snapshot(QuestionPhase::AwaitingAnswer, vec![2, 3], None),
        &Rules::default(),
        40,
    );
    let mut dom = VirtualDom::new_with_props(QuizPanelHarness, QuizPanelHarnessProps { vm });
    let html = render_static(&mut dom);

    assert!(html.contains("ಕಾಂತಾರ ಚಿತ್ರದ ನಿರ್ದೇಶಕರು ಯಾರು?"), "{html}");
    assert!(html.contains("5 / 15"), "{html}");
    assert!(html.contains("timer-urgent"), "{html}");
    assert_eq!(html.matches("option-hidden").count(), 2, "{html}");
    assert_eq!(html.matches("heart-lost").count(), 2, "{html}");
    assert!(html.contains("Streak x3"), "{html}");
}

#[test]
fn quiz_panel_marks_wrong_pick_and_correct_answer() {
    let vm = QuizVm::from_snapshot(
        &snapshot(QuestionPhase::AnsweredWrong, Vec::new(), Some(1)),
        &Rules::default(),
        40,
    );
    let mut dom = VirtualDom::new_with_props(QuizPanelHarness, QuizPanelHarnessProps { vm });
    let html = render_static(&mut dom);

    assert_eq!(html.matches("option-correct").count(), 1, "{html}");
    assert_eq!(html.matches("option-wrong").count(), 1, "{html}");
    assert!(html.contains("ತಪ್ಪು ಉತ್ತರ"), "{html}");
}

#[derive(Props, Clone, PartialEq)]
struct ResultPanelHarnessProps {
    vm: ResultVm,
    can_play_again: bool,
}

#[component]
fn ResultPanelHarness(props: ResultPanelHarnessProps) -> Element {
    rsx! {
        ResultPanel {
            vm: props.vm,
            can_play_again: props.can_play_again,
            copied: false,
            on_navigate: |_| {},
            on_share: |_| {},
        }
    }
}

fn report(mode: QuizMode, completed: bool) -> ProgressionReport {
    let result = SessionResult {
        session_id: SessionId::generate(),
        mode,
        score: 140,
        correct_count: 9,
        questions: 10,
        coins_delta: 180,
    };
    ProgressionReport {
        outcome: if completed {
            SessionOutcome::Completed(result)
        } else {
            SessionOutcome::GameOver(result)
        },
        coins_credited: 150,
        coins_earned: 330,
        accuracy_percent: 90,
        passed: true,
        unlocked: None,
        new_best: false,
        best_score: 200,
        coin_balance: 430,
    }
}

#[test]
fn result_panel_offers_replay_for_levels_only() {
    let level = report(QuizMode::Level(Level::Directors), true);
    let mut dom = VirtualDom::new_with_props(
        ResultPanelHarness,
        ResultPanelHarnessProps {
            vm: ResultVm::from_report(&level),
            can_play_again: true,
        },
    );
    let html = render_static(&mut dom);
    assert!(html.contains("ಮತ್ತೆ ಆಡಿರಿ"), "{html}");
    assert!(html.contains("+330 🪙"), "{html}");
    assert!(html.contains("9/10"), "{html}");

    let daily = report(QuizMode::DailyChallenge, true);
    let mut dom = VirtualDom::new_with_props(
        ResultPanelHarness,
        ResultPanelHarnessProps {
            vm: ResultVm::from_report(&daily),
            can_play_again: false,
        },
    );
    let html = render_static(&mut dom);
    assert!(html.contains("ಸವಾಲು ಪೂರ್ಣ!"), "{html}");
    assert!(!html.contains("ಮತ್ತೆ ಆಡಿರಿ"), "{html}");
}

#[component]
fn DailyPanelHarness() -> Element {
    let terms = DailyTerms::from_rules(&Rules::default());
    rsx! {
        DailyPanel { available: true, terms, on_navigate: |_| {} }
    }
}

#[test]
fn daily_panel_quotes_rule_numbers() {
    let mut dom = VirtualDom::new(DailyPanelHarness);
    let html = render_static(&mut dom);
    assert!(html.contains("10 ಮಿಶ್ರ ಪ್ರಶ್ನೆಗಳು"), "{html}");
    assert!(html.contains("20 ನಾಣ್ಯ"), "{html}");
    assert!(html.contains("+100 ಬೋನಸ್"), "{html}");
}

#[component]
fn ShopPanelHarness() -> Element {
    rsx! {
        ShopPanel { last_claim: Some(100), on_claim: |_| {} }
    }
}

#[test]
fn shop_panel_confirms_last_claim() {
    let mut dom = VirtualDom::new(ShopPanelHarness);
    let html = render_static(&mut dom);
    assert!(html.contains("+100 🪙 ಸೇರಿಸಲಾಗಿದೆ!"), "{html}");
}

#[component]
fn HowToPlayHarness() -> Element {
    let terms = HowToPlayTerms::from_rules(&Rules::default());
    rsx! {
        HowToPlay { terms, on_close: |_| {} }
    }
}

#[test]
fn how_to_play_lists_the_scoring_rules() {
    let mut dom = VirtualDom::new(HowToPlayHarness);
    let html = render_static(&mut dom);
    assert!(html.contains("modal-backdrop"), "{html}");
    assert!(html.contains("+10 ಅಂಕ"), "{html}");
    assert!(html.contains("+5 ವೇಗದ ಬೋನಸ್"), "{html}");
    assert!(html.contains("5 ಸೆಕೆಂಡ್ ಒಳಗೆ"), "{html}");
    assert!(html.contains("3 ಅವಕಾಶಗಳಿವೆ"), "{html}");
    assert!(html.contains("15 ಸೆಕೆಂಡ್"), "{html}");
    assert!(html.contains("70%+"), "{html}");
    assert!(html.contains("+10 ನಾಣ್ಯ"), "{html}");
    assert!(html.contains("ಅರ್ಥವಾಯಿತು!"), "{html}");
}

#[component]
fn ShortOfCoinsHarness() -> Element {
    let error = use_signal(|| Some(ViewError::InsufficientCoins { needed: 40 }));
    rsx! {
        ErrorNote { error }
    }
}

#[test]
fn refused_power_up_explains_the_price() {
    let mut dom = VirtualDom::new(ShortOfCoinsHarness);
    let html = render_static(&mut dom);
    assert!(html.contains("ಸಾಕಷ್ಟು ನಾಣ್ಯಗಳಿಲ್ಲ! (40 🪙 ಬೇಕು)"), "{html}");
}
