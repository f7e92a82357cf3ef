use std::time::Duration;

use huduga_core::model::{Level, Question, QuestionBank, QuestionId};
use huduga_core::quiz::{
    ActionRejected, Advance, CoinPurse, CoinReason, QuestionPhase, QuizError, QuizMode,
    QuizSession, Rules, SessionOutcome, SessionStatus, TickResult, Wallet,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn question(id: u64, level: Level) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}"),
        ["A".into(), "B".into(), "C".into(), "D".into()],
        (id % 4) as usize,
        level,
    )
    .unwrap()
}

/// 7 questions on level 1, 3 on level 2, 20 on level 3, none on level 4.
fn bank() -> QuestionBank {
    let mut questions = Vec::new();
    let mut id = 1;
    for (level, count) in [(Level::Recent, 7), (Level::Actors, 3), (Level::Directors, 20)] {
        for _ in 0..count {
            questions.push(question(id, level));
            id += 1;
        }
    }
    QuestionBank::new(questions).unwrap()
}

fn start(mode: QuizMode, seed: u64) -> QuizSession {
    QuizSession::start(mode, &bank(), Rules::default(), StdRng::seed_from_u64(seed)).unwrap()
}

fn correct(session: &QuizSession) -> usize {
    session.current_question().correct_option()
}

fn wrong(session: &QuizSession) -> usize {
    (correct(session) + 1) % 4
}

fn answer_and_advance(
    session: &mut QuizSession,
    index: usize,
    elapsed: Duration,
    wallet: &mut Wallet,
) -> Advance {
    let feedback = session.submit_answer(index, elapsed, wallet).unwrap();
    session.advance(feedback.token).unwrap()
}

fn sorted_ids<'a>(questions: impl Iterator<Item = &'a Question>) -> Vec<u64> {
    let mut ids: Vec<u64> = questions.map(|q| q.id().value()).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn level_session_plays_every_question_of_the_level_once() {
    let bank = bank();
    for level in [Level::Recent, Level::Actors, Level::Directors] {
        let session = QuizSession::start(
            QuizMode::Level(level),
            &bank,
            Rules::default(),
            StdRng::seed_from_u64(7),
        )
        .unwrap();
        assert_eq!(
            sorted_ids(session.questions().iter()),
            sorted_ids(bank.for_level(level))
        );
    }
}

#[test]
fn same_seed_gives_same_order() {
    let a = start(QuizMode::Level(Level::Directors), 42);
    let b = start(QuizMode::Level(Level::Directors), 42);
    let ids = |s: &QuizSession| s.questions().iter().map(|q| q.id()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn empty_level_is_an_error() {
    let err = QuizSession::start(
        QuizMode::Level(Level::BoxOffice),
        &bank(),
        Rules::default(),
        StdRng::seed_from_u64(1),
    )
    .unwrap_err();
    assert_eq!(
        err,
        QuizError::NoQuestions {
            mode: QuizMode::Level(Level::BoxOffice)
        }
    );
}

#[test]
fn daily_challenge_samples_ten_distinct_questions_across_levels() {
    let session = start(QuizMode::DailyChallenge, 3);
    let ids = sorted_ids(session.questions().iter());
    assert_eq!(ids.len(), 10);
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(deduped, ids);
}

#[test]
fn daily_challenge_with_small_bank_uses_everything() {
    let small = QuestionBank::new(vec![question(1, Level::Recent), question(2, Level::BoxOffice)])
        .unwrap();
    let session = QuizSession::start(
        QuizMode::DailyChallenge,
        &small,
        Rules::default(),
        StdRng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(session.questions().len(), 2);
}

#[test]
fn all_correct_completes_without_losing_a_life() {
    let mut session = start(QuizMode::Level(Level::Recent), 11);
    let mut wallet = Wallet::new(0);
    let total = session.questions().len();

    let mut last_score = 0;
    let mut last_index = 0;
    let outcome = loop {
        let idx = correct(&session);
        match answer_and_advance(&mut session, idx, Duration::from_secs(3), &mut wallet) {
            Advance::Next(_) => {
                assert!(session.score() >= last_score);
                assert!(session.current_index() > last_index);
                last_score = session.score();
                last_index = session.current_index();
            }
            Advance::Finished(outcome) => break outcome,
        }
    };

    let SessionOutcome::Completed(result) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(result.correct_count as usize, total);
    assert_eq!(result.questions as usize, total);
    assert_eq!(result.score as usize, total * 15);
    assert_eq!(session.lives(), 3);
    assert_eq!(session.status(), SessionStatus::Finished(outcome));
}

#[test]
fn three_wrong_answers_end_the_game_early() {
    let mut session = start(QuizMode::Level(Level::Directors), 5);
    let mut wallet = Wallet::new(0);

    for round in 1..=3 {
        let idx = wrong(&session);
        let feedback = session
            .submit_answer(idx, Duration::from_secs(1), &mut wallet)
            .unwrap();
        assert_eq!(feedback.phase, QuestionPhase::AnsweredWrong);
        // lives are only checked when leaving the question
        assert!(session.is_running());

        let advance = session.advance(feedback.token).unwrap();
        if round < 3 {
            assert!(matches!(advance, Advance::Next(_)));
        } else {
            let Advance::Finished(SessionOutcome::GameOver(result)) = advance else {
                panic!("expected game over, got {advance:?}");
            };
            assert_eq!(result.questions, 3);
            assert_eq!(result.correct_count, 0);
            assert_eq!(result.score, 0);
        }
    }
    assert_eq!(session.lives(), 0);
}

#[test]
fn losing_last_life_on_last_question_is_game_over() {
    let mut session = start(QuizMode::Level(Level::Actors), 9);
    let mut wallet = Wallet::new(0);
    for _ in 0..3 {
        let idx = wrong(&session);
        if let Advance::Finished(outcome) =
            answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet)
        {
            assert!(matches!(outcome, SessionOutcome::GameOver(_)));
            return;
        }
    }
    panic!("session should have ended");
}

#[test]
fn countdown_times_out_and_costs_a_life() {
    let mut session = start(QuizMode::Level(Level::Recent), 1);
    let token = session.token();

    for expected in (1..15).rev() {
        assert_eq!(
            session.tick(token),
            TickResult::Counting {
                seconds_left: expected
            }
        );
    }
    let TickResult::TimedOut(feedback) = session.tick(token) else {
        panic!("expected timeout");
    };
    assert_eq!(feedback.phase, QuestionPhase::TimedOut);
    assert_eq!(feedback.selected, None);
    assert_eq!(session.lives(), 2);
    assert_eq!(session.streak(), 0);
    assert_eq!(session.score(), 0);

    // late ticks and answers are ignored
    assert_eq!(session.tick(token), TickResult::Stale);
    let mut wallet = Wallet::new(0);
    let idx = correct(&session);
    assert_eq!(
        session.submit_answer(idx, Duration::ZERO, &mut wallet),
        Err(ActionRejected::NotAwaitingAnswer)
    );

    let Advance::Next(next) = session.advance(token).unwrap() else {
        panic!("expected next question");
    };
    assert_eq!(session.tick(token), TickResult::Stale);
    assert_eq!(session.seconds_left(), 15);
    assert!(matches!(session.tick(next), TickResult::Counting { seconds_left: 14 }));
}

#[test]
fn speed_bonus_boundary() {
    let mut wallet = Wallet::new(0);

    let mut fast = start(QuizMode::Level(Level::Recent), 2);
    let idx = correct(&fast);
    let feedback = fast
        .submit_answer(idx, Duration::from_millis(4999), &mut wallet)
        .unwrap();
    assert_eq!(feedback.points, 15);
    assert_eq!(feedback.speed_bonus, 5);

    let mut slow = start(QuizMode::Level(Level::Recent), 2);
    let idx = correct(&slow);
    let feedback = slow
        .submit_answer(idx, Duration::from_secs(5), &mut wallet)
        .unwrap();
    assert_eq!(feedback.points, 10);
    assert_eq!(feedback.speed_bonus, 0);
}

#[test]
fn invalid_and_duplicate_answers_do_not_mutate() {
    let mut session = start(QuizMode::Level(Level::Recent), 4);
    let mut wallet = Wallet::new(0);

    assert_eq!(
        session.submit_answer(4, Duration::ZERO, &mut wallet),
        Err(ActionRejected::InvalidOption { index: 4 })
    );
    assert_eq!(session.phase(), QuestionPhase::AwaitingAnswer);

    let idx = correct(&session);
    session.submit_answer(idx, Duration::ZERO, &mut wallet).unwrap();
    let before = session.snapshot();
    assert_eq!(
        session.submit_answer(idx, Duration::ZERO, &mut wallet),
        Err(ActionRejected::NotAwaitingAnswer)
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn advance_requires_resolved_question_and_current_token() {
    let mut session = start(QuizMode::Level(Level::Recent), 4);
    let token = session.token();
    assert_eq!(session.advance(token), Err(ActionRejected::QuestionUnresolved));

    let mut wallet = Wallet::new(0);
    let idx = correct(&session);
    session.submit_answer(idx, Duration::ZERO, &mut wallet).unwrap();
    session.advance(token).unwrap();
    assert_eq!(session.advance(token), Err(ActionRejected::StaleToken));
}

#[test]
fn fifty_fifty_affordability() {
    let mut session = start(QuizMode::Level(Level::Recent), 8);

    let mut poor = Wallet::new(29);
    assert_eq!(
        session.activate_fifty_fifty(&mut poor),
        Err(ActionRejected::InsufficientCoins {
            needed: 30,
            balance: 29
        })
    );
    assert_eq!(poor.balance(), 29);
    assert!(session.hidden_options().is_empty());
    assert_eq!(session.coins_delta(), 0);

    let mut exact = Wallet::new(30);
    let hidden = session.activate_fifty_fifty(&mut exact).unwrap();
    assert_eq!(exact.balance(), 0);
    assert_eq!(session.coins_delta(), -30);
    let correct_idx = correct(&session);
    assert!(!hidden.contains(&correct_idx));
    assert_ne!(hidden[0], hidden[1]);

    let mut rich = Wallet::new(500);
    assert_eq!(
        session.activate_fifty_fifty(&mut rich),
        Err(ActionRejected::AlreadyUsed)
    );
    assert_eq!(
        session.submit_answer(hidden[0], Duration::ZERO, &mut rich),
        Err(ActionRejected::OptionHidden { index: hidden[0] })
    );
}

#[test]
fn fifty_fifty_resets_on_next_question() {
    let mut session = start(QuizMode::Level(Level::Recent), 8);
    let mut wallet = Wallet::new(100);
    session.activate_fifty_fifty(&mut wallet).unwrap();
    let idx = correct(&session);
    answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);

    assert!(session.hidden_options().is_empty());
    assert!(session.activate_fifty_fifty(&mut wallet).is_ok());
}

#[test]
fn extra_life_only_when_missing_one() {
    let mut session = start(QuizMode::Level(Level::Recent), 6);
    let mut wallet = Wallet::new(200);
    assert_eq!(
        session.activate_extra_life(&mut wallet),
        Err(ActionRejected::LivesFull)
    );
    assert_eq!(wallet.balance(), 200);

    let idx = wrong(&session);
    answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    assert_eq!(session.lives(), 2);

    assert_eq!(session.activate_extra_life(&mut wallet), Ok(3));
    assert_eq!(wallet.balance(), 150);
    assert_eq!(session.coins_delta(), -50);
    assert_eq!(
        session.activate_extra_life(&mut wallet),
        Err(ActionRejected::LivesFull)
    );
}

#[test]
fn skip_consumes_question_without_scoring() {
    let mut session = start(QuizMode::Level(Level::Recent), 12);
    let mut wallet = Wallet::new(100);

    let idx = correct(&session);
    answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    let score = session.score();
    let streak = session.streak();

    let advance = session.activate_skip(&mut wallet).unwrap();
    assert!(matches!(advance, Advance::Next(_)));
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.score(), score);
    assert_eq!(session.streak(), streak);
    assert_eq!(session.correct_count(), 1);
    assert_eq!(wallet.balance(), 100 + 10 - 40);
}

#[test]
fn skip_on_last_question_completes() {
    let mut session = start(QuizMode::Level(Level::Actors), 12);
    let mut wallet = Wallet::new(100);
    for _ in 0..2 {
        let idx = correct(&session);
        answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    }
    let Advance::Finished(SessionOutcome::Completed(result)) =
        session.activate_skip(&mut wallet).unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(result.correct_count, 2);
    assert_eq!(result.questions, 3);
}

#[test]
fn skip_rejected_when_unaffordable() {
    let mut session = start(QuizMode::Level(Level::Recent), 12);
    let mut wallet = Wallet::new(39);
    assert_eq!(
        session.activate_skip(&mut wallet),
        Err(ActionRejected::InsufficientCoins {
            needed: 40,
            balance: 39
        })
    );
    assert_eq!(session.current_index(), 0);
}

#[test]
fn streak_bonuses_for_six_in_a_row() {
    let mut session = start(QuizMode::Level(Level::Recent), 21);
    let mut wallet = Wallet::new(0);
    for _ in 0..6 {
        let idx = correct(&session);
        answer_and_advance(&mut session, idx, Duration::from_secs(10), &mut wallet);
    }

    let bonuses: Vec<(u32, i64)> = wallet
        .take_ledger()
        .into_iter()
        .filter_map(|entry| match entry.reason {
            CoinReason::StreakBonus { streak } => Some((streak, entry.amount)),
            _ => None,
        })
        .collect();
    assert_eq!(bonuses, vec![(3, 20), (5, 50), (6, 20)]);
    assert_eq!(session.coins_delta(), 6 * 10 + 90);
}

#[test]
fn wrong_answer_resets_streak() {
    let mut session = start(QuizMode::Level(Level::Directors), 21);
    let mut wallet = Wallet::new(0);
    for _ in 0..2 {
        let idx = correct(&session);
        answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    }
    let idx = wrong(&session);
    answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    assert_eq!(session.streak(), 0);

    // three more: the first bonus comes at the new streak of 3
    wallet.take_ledger();
    for _ in 0..3 {
        let idx = correct(&session);
        answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet);
    }
    let streak_entries = wallet
        .take_ledger()
        .into_iter()
        .filter(|e| matches!(e.reason, CoinReason::StreakBonus { .. }))
        .count();
    assert_eq!(streak_entries, 1);
}

#[test]
fn daily_challenge_pays_twenty_per_correct_answer() {
    let mut session = start(QuizMode::DailyChallenge, 30);
    let mut wallet = Wallet::new(0);
    let idx = correct(&session);
    let feedback = session
        .submit_answer(idx, Duration::ZERO, &mut wallet)
        .unwrap();
    assert_eq!(feedback.coins, 20);
    assert_eq!(wallet.balance(), 20);
}

#[test]
fn finished_session_refuses_everything() {
    let mut session = start(QuizMode::Level(Level::Actors), 3);
    let mut wallet = Wallet::new(1000);
    loop {
        let idx = correct(&session);
        if let Advance::Finished(_) =
            answer_and_advance(&mut session, idx, Duration::ZERO, &mut wallet)
        {
            break;
        }
    }
    let token = session.token();
    assert_eq!(session.tick(token), TickResult::Stale);
    assert_eq!(session.advance(token), Err(ActionRejected::SessionOver));
    assert_eq!(
        session.submit_answer(0, Duration::ZERO, &mut wallet),
        Err(ActionRejected::SessionOver)
    );
    assert_eq!(
        session.activate_skip(&mut wallet),
        Err(ActionRejected::SessionOver)
    );
}

#[test]
fn abandon_invalidates_pending_ticks() {
    let mut session = start(QuizMode::Level(Level::Recent), 3);
    let token = session.token();
    session.abandon();
    assert_eq!(session.status(), SessionStatus::Abandoned);
    assert_eq!(session.tick(token), TickResult::Stale);
    assert_eq!(session.seconds_left(), 15);
}
