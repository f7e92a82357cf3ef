use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::model::{OPTION_COUNT, Question, QuestionBank, SessionId};

use super::outcome::{QuizMode, SessionOutcome, SessionResult};
use super::purse::{CoinPurse, CoinReason};
use super::rules::{PowerUp, Rules};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for {mode}")]
    NoQuestions { mode: QuizMode },
}

/// Reasons an action was refused. A refused action never changes the session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionRejected {
    #[error("session is over")]
    SessionOver,
    #[error("question already resolved")]
    NotAwaitingAnswer,
    #[error("question is still awaiting an answer")]
    QuestionUnresolved,
    #[error("token belongs to an earlier question")]
    StaleToken,
    #[error("option {index} does not exist")]
    InvalidOption { index: usize },
    #[error("option {index} is hidden")]
    OptionHidden { index: usize },
    #[error("insufficient coins: need {needed}, have {balance}")]
    InsufficientCoins { needed: u32, balance: u32 },
    #[error("power-up already used on this question")]
    AlreadyUsed,
    #[error("lives are already full")]
    LivesFull,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// State of the question currently on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionPhase {
    AwaitingAnswer,
    AnsweredCorrect,
    AnsweredWrong,
    TimedOut,
}

impl QuestionPhase {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, QuestionPhase::AwaitingAnswer)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(SessionOutcome),
    Abandoned,
}

/// Epoch tag for the question being shown. Timers carry it so that a tick or a
/// scheduled advance aimed at an earlier question is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuestionToken(u64);

/// What happened when a question was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub token: QuestionToken,
    pub phase: QuestionPhase,
    pub selected: Option<usize>,
    pub correct_option: usize,
    pub points: u32,
    pub speed_bonus: u32,
    pub coins: u32,
    pub streak: u32,
    pub streak_bonus: u32,
    pub lives_remaining: u8,
}

impl AnswerFeedback {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self.phase, QuestionPhase::AnsweredCorrect)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    Stale,
    Counting { seconds_left: u32 },
    TimedOut(AnswerFeedback),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next(QuestionToken),
    Finished(SessionOutcome),
}

/// Owned render data for one moment of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub mode: QuizMode,
    pub index: usize,
    pub total: usize,
    pub question: Question,
    pub hidden_options: Vec<usize>,
    pub selected_option: Option<usize>,
    pub phase: QuestionPhase,
    pub seconds_left: u32,
    pub score: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub streak: u32,
    pub correct_count: u32,
    pub coins_delta: i64,
    pub fifty_fifty_used: bool,
    pub status: SessionStatus,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt, from the first question to a terminal outcome.
///
/// The session is a plain state machine: it never sleeps or spawns. Whoever
/// drives it calls `tick` once per second with the current token, and calls
/// `advance` once the feedback pause for a resolved question has elapsed.
pub struct QuizSession {
    id: SessionId,
    mode: QuizMode,
    rules: Rules,
    rng: StdRng,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    lives: u8,
    correct_count: u32,
    streak: u32,
    phase: QuestionPhase,
    seconds_left: u32,
    epoch: u64,
    fifty_fifty_used: bool,
    hidden: Vec<usize>,
    selected: Option<usize>,
    coins_delta: i64,
    status: SessionStatus,
}

impl QuizSession {
    /// Pick and shuffle the question set for `mode` and present the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when the bank has nothing for the mode.
    pub fn start(
        mode: QuizMode,
        bank: &QuestionBank,
        rules: Rules,
        mut rng: StdRng,
    ) -> Result<Self, QuizError> {
        let mut questions: Vec<Question> = match mode {
            QuizMode::Level(level) => bank.for_level(level).cloned().collect(),
            QuizMode::DailyChallenge => bank.all().to_vec(),
        };
        questions.shuffle(&mut rng);
        if mode.is_daily() {
            questions.truncate(rules.daily_question_count);
        }

        if questions.is_empty() {
            return Err(QuizError::NoQuestions { mode });
        }

        let lives = rules.max_lives;
        let seconds_left = rules.question_time_secs;
        Ok(Self {
            id: SessionId::generate(),
            mode,
            rules,
            rng,
            questions,
            current: 0,
            score: 0,
            lives,
            correct_count: 0,
            streak: 0,
            phase: QuestionPhase::AwaitingAnswer,
            seconds_left,
            epoch: 0,
            fifty_fifty_used: false,
            hidden: Vec::new(),
            selected: None,
            coins_delta: 0,
            status: SessionStatus::Running,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn token(&self) -> QuestionToken {
        QuestionToken(self.epoch)
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn phase(&self) -> QuestionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    #[must_use]
    pub fn coins_delta(&self) -> i64 {
        self.coins_delta
    }

    #[must_use]
    pub fn hidden_options(&self) -> &[usize] {
        &self.hidden
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.status, SessionStatus::Running)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            mode: self.mode,
            index: self.current,
            total: self.questions.len(),
            question: self.current_question().clone(),
            hidden_options: self.hidden.clone(),
            selected_option: self.selected,
            phase: self.phase,
            seconds_left: self.seconds_left,
            score: self.score,
            lives: self.lives,
            max_lives: self.rules.max_lives,
            streak: self.streak,
            correct_count: self.correct_count,
            coins_delta: self.coins_delta,
            fifty_fifty_used: self.fifty_fifty_used,
            status: self.status,
        }
    }

    /// One second of countdown for the question tagged `token`.
    pub fn tick(&mut self, token: QuestionToken) -> TickResult {
        if !self.is_running() || token != self.token() || self.phase.is_resolved() {
            return TickResult::Stale;
        }

        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return TickResult::Counting {
                seconds_left: self.seconds_left,
            };
        }

        self.phase = QuestionPhase::TimedOut;
        self.lose_life();
        TickResult::TimedOut(self.feedback(0, 0, 0, 0))
    }

    /// Submit the option at `index`, answered `elapsed` after the question appeared.
    ///
    /// # Errors
    ///
    /// Returns `ActionRejected` when the session is over, the question is already
    /// resolved, or the index is out of range or hidden by fifty-fifty.
    pub fn submit_answer(
        &mut self,
        index: usize,
        elapsed: Duration,
        purse: &mut dyn CoinPurse,
    ) -> Result<AnswerFeedback, ActionRejected> {
        self.ensure_awaiting()?;
        if index >= OPTION_COUNT {
            return Err(ActionRejected::InvalidOption { index });
        }
        if self.hidden.contains(&index) {
            return Err(ActionRejected::OptionHidden { index });
        }

        self.selected = Some(index);
        if !self.current_question().is_correct(index) {
            self.phase = QuestionPhase::AnsweredWrong;
            self.lose_life();
            return Ok(self.feedback(0, 0, 0, 0));
        }

        self.phase = QuestionPhase::AnsweredCorrect;
        let speed_bonus = self.rules.speed_bonus(elapsed);
        let points = self.rules.points_per_correct + speed_bonus;
        self.score = self.score.saturating_add(points);
        self.correct_count += 1;
        self.streak += 1;

        let coins = self.rules.coins_per_correct(self.mode);
        purse.earn(coins, CoinReason::CorrectAnswer);
        let streak_bonus = self.rules.streak_bonus(self.streak);
        if streak_bonus > 0 {
            purse.earn(
                streak_bonus,
                CoinReason::StreakBonus {
                    streak: self.streak,
                },
            );
        }
        self.coins_delta += i64::from(coins) + i64::from(streak_bonus);

        Ok(self.feedback(points, speed_bonus, coins, streak_bonus))
    }

    /// Hide two of the three wrong options on the current question.
    ///
    /// # Errors
    ///
    /// Returns `ActionRejected` when not awaiting, already used on this question,
    /// or the purse cannot cover the cost.
    pub fn activate_fifty_fifty(
        &mut self,
        purse: &mut dyn CoinPurse,
    ) -> Result<[usize; 2], ActionRejected> {
        self.ensure_awaiting()?;
        if self.fifty_fifty_used {
            return Err(ActionRejected::AlreadyUsed);
        }
        self.buy(PowerUp::FiftyFifty, purse)?;

        let mut wrong = self.current_question().wrong_options();
        wrong.shuffle(&mut self.rng);
        let mut hidden = [wrong[0], wrong[1]];
        hidden.sort_unstable();

        self.fifty_fifty_used = true;
        self.hidden = hidden.to_vec();
        Ok(hidden)
    }

    /// Restore one life, up to the maximum.
    ///
    /// # Errors
    ///
    /// Returns `ActionRejected::LivesFull` at max lives, or another rejection when
    /// not awaiting or short on coins.
    pub fn activate_extra_life(&mut self, purse: &mut dyn CoinPurse) -> Result<u8, ActionRejected> {
        self.ensure_awaiting()?;
        if self.lives >= self.rules.max_lives {
            return Err(ActionRejected::LivesFull);
        }
        self.buy(PowerUp::ExtraLife, purse)?;
        self.lives += 1;
        Ok(self.lives)
    }

    /// Abandon the current question without scoring it and move on.
    ///
    /// # Errors
    ///
    /// Returns `ActionRejected` when not awaiting or short on coins.
    pub fn activate_skip(&mut self, purse: &mut dyn CoinPurse) -> Result<Advance, ActionRejected> {
        self.ensure_awaiting()?;
        self.buy(PowerUp::Skip, purse)?;
        Ok(self.finish_or_next())
    }

    /// Leave a resolved question once its feedback pause has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `ActionRejected::StaleToken` for an earlier question and
    /// `ActionRejected::QuestionUnresolved` while still awaiting an answer.
    pub fn advance(&mut self, token: QuestionToken) -> Result<Advance, ActionRejected> {
        if !self.is_running() {
            return Err(ActionRejected::SessionOver);
        }
        if token != self.token() {
            return Err(ActionRejected::StaleToken);
        }
        if !self.phase.is_resolved() {
            return Err(ActionRejected::QuestionUnresolved);
        }
        Ok(self.finish_or_next())
    }

    /// Discard the session. Pending ticks and advances become stale.
    pub fn abandon(&mut self) {
        if self.is_running() {
            self.status = SessionStatus::Abandoned;
            self.epoch += 1;
        }
    }

    fn ensure_awaiting(&self) -> Result<(), ActionRejected> {
        if !self.is_running() {
            return Err(ActionRejected::SessionOver);
        }
        if self.phase.is_resolved() {
            return Err(ActionRejected::NotAwaitingAnswer);
        }
        Ok(())
    }

    fn buy(&mut self, power_up: PowerUp, purse: &mut dyn CoinPurse) -> Result<(), ActionRejected> {
        let cost = self.rules.cost(power_up);
        let balance = purse.balance();
        if !purse.try_spend(cost, CoinReason::PowerUp(power_up)) {
            return Err(ActionRejected::InsufficientCoins {
                needed: cost,
                balance,
            });
        }
        self.coins_delta -= i64::from(cost);
        Ok(())
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.streak = 0;
    }

    fn feedback(&self, points: u32, speed_bonus: u32, coins: u32, streak_bonus: u32) -> AnswerFeedback {
        AnswerFeedback {
            token: self.token(),
            phase: self.phase,
            selected: self.selected,
            correct_option: self.current_question().correct_option(),
            points,
            speed_bonus,
            coins,
            streak: self.streak,
            streak_bonus,
            lives_remaining: self.lives,
        }
    }

    fn result(&self, questions: usize) -> SessionResult {
        SessionResult {
            session_id: self.id,
            mode: self.mode,
            score: self.score,
            correct_count: self.correct_count,
            questions: u32::try_from(questions).unwrap_or(u32::MAX),
            coins_delta: self.coins_delta,
        }
    }

    fn finish_or_next(&mut self) -> Advance {
        // Any timer still holding the old token is now stale.
        self.epoch += 1;

        if self.lives == 0 {
            let outcome = SessionOutcome::GameOver(self.result(self.current + 1));
            self.status = SessionStatus::Finished(outcome);
            return Advance::Finished(outcome);
        }
        if self.current + 1 == self.questions.len() {
            let outcome = SessionOutcome::Completed(self.result(self.questions.len()));
            self.status = SessionStatus::Finished(outcome);
            return Advance::Finished(outcome);
        }

        self.current += 1;
        self.phase = QuestionPhase::AwaitingAnswer;
        self.seconds_left = self.rules.question_time_secs;
        self.fifty_fifty_used = false;
        self.hidden.clear();
        self.selected = None;
        Advance::Next(self.token())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("phase", &self.phase)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
