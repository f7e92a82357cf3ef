use huduga_core::quiz::QuizMode;
use services::ProgressionReport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub heading: &'static str,
    pub emblem: &'static str,
    pub subtitle: &'static str,
    pub score: u32,
    pub correct_label: String,
    pub accuracy_label: String,
    pub coins_label: String,
    pub unlocked_message: Option<String>,
    pub best_label: String,
    pub new_best: bool,
    pub share_text: String,
}

impl ResultVm {
    #[must_use]
    pub fn from_report(report: &ProgressionReport) -> Self {
        let result = report.outcome.result();
        let completed = report.outcome.is_completed();
        let heading = match (completed, result.mode) {
            (false, _) => "💀 ಆಟ ಮುಗಿದಿದೆ 💀",
            (true, QuizMode::DailyChallenge) => "ಸವಾಲು ಪೂರ್ಣ!",
            (true, QuizMode::Level(_)) => "ಹಂತ ಪೂರ್ಣ!",
        };
        let emblem = match (completed, report.passed) {
            (false, _) => "🎬",
            (true, true) => "🏆",
            (true, false) => "🎬",
        };

        Self {
            heading,
            emblem,
            subtitle: result.mode.title(),
            score: result.score,
            correct_label: format!("{}/{}", result.correct_count, result.questions),
            accuracy_label: format!("{}%", report.accuracy_percent),
            coins_label: signed_coins(report.coins_earned),
            unlocked_message: report
                .unlocked
                .map(|level| format!("🔓 ಹಂತ {} ತೆರೆದಿದೆ!", level.number())),
            best_label: format!("ಅತ್ಯುತ್ತಮ ಅಂಕ: {}", report.best_score),
            new_best: report.new_best,
            share_text: format!(
                "🔥 ನಾನು Cinema Huduga ನಲ್ಲಿ {} ಅಂಕ ಗಳಿಸಿದ್ದೇನೆ! ನೀನು ಗೆಲ್ಲಬಲ್ಲೆಯಾ?",
                result.score
            ),
        }
    }
}

fn signed_coins(amount: i64) -> String {
    if amount >= 0 {
        format!("+{amount} 🪙")
    } else {
        format!("{amount} 🪙")
    }
}
