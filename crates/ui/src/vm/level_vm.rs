use huduga_core::model::{Level, QuestionBank, UnlockedLevels};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCardVm {
    pub level: Level,
    pub name: &'static str,
    pub label: &'static str,
    pub question_count: usize,
    pub locked: bool,
}

#[must_use]
pub fn map_level_cards(bank: &QuestionBank, unlocked: &UnlockedLevels) -> Vec<LevelCardVm> {
    Level::ALL
        .into_iter()
        .map(|level| LevelCardVm {
            level,
            name: level.display_name(),
            label: level.label(),
            question_count: bank.count_for_level(level),
            locked: !unlocked.contains(level),
        })
        .collect()
}
