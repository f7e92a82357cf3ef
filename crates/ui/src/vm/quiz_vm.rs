use huduga_core::quiz::{PowerUp, QuestionPhase, Rules, SessionSnapshot, SessionStatus};

/// Seconds at and below which the timer is drawn as urgent.
const URGENT_SECS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Selectable,
    Hidden,
    /// The right answer, revealed after the question resolved.
    Correct,
    /// The player's pick, and it was wrong.
    Wrong,
    /// Resolved question, neither picked nor correct.
    Dimmed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub state: OptionState,
}

impl OptionVm {
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.state == OptionState::Selectable
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.state {
            OptionState::Selectable => "option",
            OptionState::Hidden => "option option-hidden",
            OptionState::Correct => "option option-correct",
            OptionState::Wrong => "option option-wrong",
            OptionState::Dimmed => "option option-dimmed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpVm {
    pub power_up: PowerUp,
    pub icon: &'static str,
    pub cost: u32,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub title: &'static str,
    pub progress_label: String,
    pub question_text: String,
    pub options: Vec<OptionVm>,
    pub seconds_left: u32,
    pub timer_percent: u32,
    pub timer_urgent: bool,
    /// One entry per life slot; true while the life is still available.
    pub hearts: Vec<bool>,
    pub score: u32,
    pub streak_banner: Option<String>,
    pub feedback: Option<&'static str>,
    pub power_ups: Vec<PowerUpVm>,
    pub finished: bool,
}

impl QuizVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot, rules: &Rules, coins: u32) -> Self {
        let resolved = snapshot.phase.is_resolved();
        let correct = snapshot.question.correct_option();
        let options = snapshot
            .question
            .options()
            .iter()
            .enumerate()
            .map(|(index, label)| OptionVm {
                index,
                label: label.clone(),
                state: option_state(snapshot, index, correct, resolved),
            })
            .collect();

        let awaiting = snapshot.status == SessionStatus::Running && !resolved;
        let power_ups = [
            (PowerUp::FiftyFifty, "50:50", !snapshot.fifty_fifty_used),
            (PowerUp::ExtraLife, "❤️", snapshot.lives < snapshot.max_lives),
            (PowerUp::Skip, "⏭️", true),
        ]
        .into_iter()
        .map(|(power_up, icon, available)| {
            let cost = rules.cost(power_up);
            PowerUpVm {
                power_up,
                icon,
                cost,
                enabled: awaiting && available && coins >= cost,
            }
        })
        .collect();

        Self {
            title: snapshot.mode.title(),
            progress_label: format!("{} / {}", snapshot.index + 1, snapshot.total),
            question_text: snapshot.question.text().to_owned(),
            options,
            seconds_left: snapshot.seconds_left,
            timer_percent: snapshot.seconds_left * 100 / rules.question_time_secs.max(1),
            timer_urgent: snapshot.seconds_left <= URGENT_SECS,
            hearts: (0..snapshot.max_lives).map(|i| i < snapshot.lives).collect(),
            score: snapshot.score,
            streak_banner: streak_banner(snapshot.streak, rules),
            feedback: feedback_text(snapshot.phase),
            power_ups,
            finished: !matches!(snapshot.status, SessionStatus::Running),
        }
    }
}

fn option_state(
    snapshot: &SessionSnapshot,
    index: usize,
    correct: usize,
    resolved: bool,
) -> OptionState {
    if !resolved {
        return if snapshot.hidden_options.contains(&index) {
            OptionState::Hidden
        } else {
            OptionState::Selectable
        };
    }
    if index == correct {
        OptionState::Correct
    } else if snapshot.selected_option == Some(index) {
        OptionState::Wrong
    } else {
        OptionState::Dimmed
    }
}

fn streak_banner(streak: u32, rules: &Rules) -> Option<String> {
    match rules.streak_bonus(streak) {
        0 => None,
        bonus if streak == 5 => Some(format!("🔥🔥 Super Streak! +{bonus} 🪙")),
        bonus => Some(format!("🔥 Streak x{streak}! +{bonus} 🪙")),
    }
}

fn feedback_text(phase: QuestionPhase) -> Option<&'static str> {
    match phase {
        QuestionPhase::AwaitingAnswer => None,
        QuestionPhase::AnsweredCorrect => Some("✓ ಸರಿಯಾದ ಉತ್ತರ!"),
        QuestionPhase::AnsweredWrong => Some("✗ ತಪ್ಪು ಉತ್ತರ"),
        QuestionPhase::TimedOut => Some("⏰ ಸಮಯ ಮುಗಿದಿದೆ!"),
    }
}
