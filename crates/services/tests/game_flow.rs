use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use huduga_core::Clock;
use huduga_core::model::Level;
use huduga_core::quiz::{QuizMode, SessionStatus};
use huduga_core::time::{fixed_clock, fixed_now};
use services::audio::{AudioEffectPlayer, RecordingPlayer, SoundEvent};
use services::{FlowError, GameConfig, GameServices, LiveSession, NavEvent, QuizServiceError, Screen};
use storage::Storage;

async fn services_with(storage: &Storage, clock: Clock, audio: &RecordingPlayer) -> GameServices {
    let config = GameConfig {
        clock,
        seed: Some(2024),
        audio: Arc::new(audio.clone()),
        ..GameConfig::default()
    };
    GameServices::with_storage(storage, config).await.unwrap()
}

async fn answer_everything_correctly(session: &LiveSession) {
    let mut rx = session.subscribe();
    loop {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.status != SessionStatus::Running {
            return;
        }
        let feedback = session
            .submit_answer(snapshot.question.correct_option())
            .await
            .unwrap();
        assert!(feedback.is_correct());
        rx.wait_for(|s| s.index != snapshot.index || s.status != SessionStatus::Running)
            .await
            .unwrap();
    }
}

async fn wait_for_result(services: &GameServices) -> Screen {
    let mut screens = services.flow().subscribe();
    screens
        .wait_for(|s| matches!(s, Screen::LevelComplete(_) | Screen::GameOver(_)))
        .await
        .unwrap()
        .clone()
}

#[tokio::test(start_paused = true)]
async fn perfect_first_level_unlocks_the_second() {
    let storage = Storage::in_memory();
    let audio = RecordingPlayer::new();
    let services = services_with(&storage, fixed_clock(), &audio).await;
    let flow = services.flow();

    assert_eq!(flow.screen(), Screen::Splash);
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    flow.dispatch(NavEvent::Play).await.unwrap();
    let screen = flow
        .dispatch(NavEvent::SelectLevel(Level::Recent))
        .await
        .unwrap();
    assert_eq!(screen, Screen::Quiz(QuizMode::Level(Level::Recent)));

    let session = flow.active_session().await.unwrap();
    assert_eq!(session.snapshot().total, 15);
    answer_everything_correctly(&session).await;

    let Screen::LevelComplete(report) = wait_for_result(&services).await else {
        panic!("expected the level complete screen");
    };
    assert_eq!(report.score(), 15 * 15);
    assert_eq!(report.accuracy_percent, 100);
    assert_eq!(report.unlocked, Some(Level::Actors));
    assert!(report.new_best);
    // 150 per answer, 150 in streak bonuses, 50 for finishing.
    assert_eq!(report.coins_earned, 350);
    assert_eq!(report.coin_balance, 450);

    let profile = services.load_profile().await.unwrap();
    assert_eq!(profile.best_score, 225);
    assert_eq!(profile.coin_balance, 450);
    assert!(profile.unlocked_levels.contains(Level::Actors));
    assert_eq!(audio.events().last(), Some(&SoundEvent::LevelComplete));
    assert!(flow.active_session().await.is_none());
    assert_eq!(services.progression().tracked_sessions(), 0);

    assert_eq!(flow.dispatch(NavEvent::PlayAgain).await.unwrap(), Screen::LevelSelect);
    let screen = flow
        .dispatch(NavEvent::SelectLevel(Level::Actors))
        .await
        .unwrap();
    assert_eq!(screen, Screen::Quiz(QuizMode::Level(Level::Actors)));
}

#[tokio::test(start_paused = true)]
async fn locked_levels_are_refused() {
    let audio = RecordingPlayer::new();
    let services = services_with(&Storage::in_memory(), fixed_clock(), &audio).await;
    let flow = services.flow();
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    flow.dispatch(NavEvent::Play).await.unwrap();

    let err = flow
        .dispatch(NavEvent::SelectLevel(Level::Directors))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Quiz(QuizServiceError::LevelLocked(Level::Directors))
    ));
    assert_eq!(flow.screen(), Screen::LevelSelect);
}

#[tokio::test(start_paused = true)]
async fn daily_challenge_is_playable_once_per_day() {
    let storage = Storage::in_memory();
    let audio = RecordingPlayer::new();
    let services = services_with(&storage, fixed_clock(), &audio).await;
    let flow = services.flow();
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    flow.dispatch(NavEvent::OpenDailyChallenge).await.unwrap();
    assert!(services.quiz().daily_available().await.unwrap());

    let screen = flow.dispatch(NavEvent::StartDaily).await.unwrap();
    assert_eq!(screen, Screen::Quiz(QuizMode::DailyChallenge));
    let session = flow.active_session().await.unwrap();
    assert_eq!(session.snapshot().total, 10);

    // Quitting does not hand out a second attempt.
    flow.dispatch(NavEvent::Home).await.unwrap();
    assert_eq!(session.snapshot().status, SessionStatus::Abandoned);
    flow.dispatch(NavEvent::OpenDailyChallenge).await.unwrap();
    let err = flow.dispatch(NavEvent::StartDaily).await.unwrap_err();
    assert!(matches!(err, FlowError::Quiz(QuizServiceError::DailyUnavailable)));
    assert_eq!(flow.screen(), Screen::DailyChallenge);

    let mut tomorrow = fixed_clock();
    tomorrow.advance(ChronoDuration::days(1));
    let next_day = services_with(&storage, tomorrow, &audio).await;
    assert!(next_day.quiz().daily_available().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn completed_daily_pays_both_bonuses() {
    let storage = Storage::in_memory();
    let audio = RecordingPlayer::new();
    let services = services_with(&storage, fixed_clock(), &audio).await;
    let flow = services.flow();
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    flow.dispatch(NavEvent::OpenDailyChallenge).await.unwrap();
    flow.dispatch(NavEvent::StartDaily).await.unwrap();

    let session = flow.active_session().await.unwrap();
    answer_everything_correctly(&session).await;

    let Screen::LevelComplete(report) = wait_for_result(&services).await else {
        panic!("expected the level complete screen");
    };
    assert_eq!(report.mode(), QuizMode::DailyChallenge);
    assert_eq!(report.coins_credited, 150);
    // 10 x 20 per answer, then streak bonuses at 3, 5, 6 and 9.
    assert_eq!(report.outcome.result().coins_delta, 310);
    assert_eq!(report.coin_balance, 100 + 310 + 150);
    assert_eq!(
        services.load_profile().await.unwrap().daily_challenge_last_played,
        Some(fixed_now().date_naive())
    );
}

#[tokio::test(start_paused = true)]
async fn running_out_of_time_shows_game_over() {
    let audio = RecordingPlayer::new();
    let services = services_with(&Storage::in_memory(), fixed_clock(), &audio).await;
    let flow = services.flow();
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    flow.dispatch(NavEvent::Play).await.unwrap();
    flow.dispatch(NavEvent::SelectLevel(Level::Recent))
        .await
        .unwrap();

    let Screen::GameOver(report) = wait_for_result(&services).await else {
        panic!("expected the game over screen");
    };
    assert_eq!(report.outcome.result().questions, 3);
    assert_eq!(report.coins_credited, 0);
    assert!(!report.passed);
    assert_eq!(flow.dispatch(NavEvent::Home).await.unwrap(), Screen::Home);
    assert_eq!(services.progression().tracked_sessions(), 0);
}

#[tokio::test]
async fn nonsense_navigation_is_refused() {
    let audio = RecordingPlayer::new();
    let services = services_with(&Storage::in_memory(), fixed_clock(), &audio).await;
    let flow = services.flow();

    let err = flow.dispatch(NavEvent::Play).await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::InvalidTransition {
            screen: "splash",
            ..
        }
    ));
    flow.dispatch(NavEvent::SplashDone).await.unwrap();
    assert!(flow.dispatch(NavEvent::StartDaily).await.is_err());
    assert_eq!(flow.dispatch(NavEvent::OpenShop).await.unwrap(), Screen::Shop);
    assert!(flow.dispatch(NavEvent::Play).await.is_err());
    assert_eq!(flow.dispatch(NavEvent::Home).await.unwrap(), Screen::Home);
}

#[tokio::test]
async fn muting_is_remembered() {
    let storage = Storage::in_memory();
    let audio = RecordingPlayer::new();
    let services = services_with(&storage, fixed_clock(), &audio).await;
    assert!(services.sound_enabled());

    services.set_sound_enabled(false).await.unwrap();
    services.audio().play(SoundEvent::Click);
    assert!(audio.events().is_empty());

    let reopened = services_with(&storage, fixed_clock(), &audio).await;
    assert!(!reopened.sound_enabled());
}
