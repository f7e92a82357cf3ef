use std::time::Duration;

use super::outcome::QuizMode;

/// Purchasable in-question helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUp {
    FiftyFifty,
    ExtraLife,
    Skip,
}

/// Tuning knobs for scoring, coins and timing.
///
/// `Rules::default()` is the shipped game balance; tests build variants to
/// exercise edge cases with small banks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub question_time_secs: u32,
    pub feedback_pause: Duration,
    pub speed_bonus_window: Duration,
    pub points_per_correct: u32,
    pub speed_bonus_points: u32,
    pub coins_per_correct: u32,
    pub daily_coins_per_correct: u32,
    pub max_lives: u8,
    pub daily_question_count: usize,
    pub fifty_fifty_cost: u32,
    pub extra_life_cost: u32,
    pub skip_cost: u32,
    pub completion_bonus: u32,
    pub daily_bonus: u32,
    pub unlock_percent: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            question_time_secs: 15,
            feedback_pause: Duration::from_millis(1500),
            speed_bonus_window: Duration::from_secs(5),
            points_per_correct: 10,
            speed_bonus_points: 5,
            coins_per_correct: 10,
            daily_coins_per_correct: 20,
            max_lives: 3,
            daily_question_count: 10,
            fifty_fifty_cost: 30,
            extra_life_cost: 50,
            skip_cost: 40,
            completion_bonus: 50,
            daily_bonus: 100,
            unlock_percent: 70,
        }
    }
}

impl Rules {
    #[must_use]
    pub fn cost(&self, power_up: PowerUp) -> u32 {
        match power_up {
            PowerUp::FiftyFifty => self.fifty_fifty_cost,
            PowerUp::ExtraLife => self.extra_life_cost,
            PowerUp::Skip => self.skip_cost,
        }
    }

    #[must_use]
    pub fn coins_per_correct(&self, mode: QuizMode) -> u32 {
        match mode {
            QuizMode::Level(_) => self.coins_per_correct,
            QuizMode::DailyChallenge => self.daily_coins_per_correct,
        }
    }

    /// Bonus points for a correct answer given within `[0, speed_bonus_window)`.
    #[must_use]
    pub fn speed_bonus(&self, elapsed: Duration) -> u32 {
        if elapsed < self.speed_bonus_window {
            self.speed_bonus_points
        } else {
            0
        }
    }

    /// Extra coins paid when a streak reaches `streak`.
    #[must_use]
    pub fn streak_bonus(&self, streak: u32) -> u32 {
        match streak {
            3 => 20,
            5 => 50,
            s if s > 5 && s % 3 == 0 => 20,
            _ => 0,
        }
    }

    /// Unlock decision on the exact ratio, never the rounded percentage.
    #[must_use]
    pub fn passes_unlock(&self, correct: u32, total: u32) -> bool {
        total > 0 && u64::from(correct) * 100 >= u64::from(total) * u64::from(self.unlock_percent)
    }

    /// Accuracy rounded to the nearest percent, for display only.
    #[must_use]
    pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        let scaled = u64::from(correct) * 200 + u64::from(total);
        u32::try_from(scaled / (u64::from(total) * 2)).unwrap_or(u32::MAX)
    }
}
