use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::model::Level;

/// Coins a brand-new player starts with.
pub const STARTING_COINS: u32 = 100;

/// Set of unlocked levels. Level 1 is always present and levels are never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedLevels(BTreeSet<Level>);

impl UnlockedLevels {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::from([Level::FIRST]))
    }

    /// Builds the set from persisted levels, re-adding level 1 if missing.
    #[must_use]
    pub fn from_levels(levels: impl IntoIterator<Item = Level>) -> Self {
        let mut set: BTreeSet<Level> = levels.into_iter().collect();
        set.insert(Level::FIRST);
        Self(set)
    }

    /// Returns true if the level was newly added.
    pub fn unlock(&mut self, level: Level) -> bool {
        self.0.insert(level)
    }

    #[must_use]
    pub fn contains(&self, level: Level) -> bool {
        self.0.contains(&level)
    }

    pub fn iter(&self) -> impl Iterator<Item = Level> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn highest(&self) -> Level {
        self.0.iter().next_back().copied().unwrap_or(Level::FIRST)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for UnlockedLevels {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of everything persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub best_score: u32,
    pub unlocked_levels: UnlockedLevels,
    pub coin_balance: u32,
    pub sound_enabled: bool,
    pub daily_challenge_last_played: Option<NaiveDate>,
}

impl Profile {
    /// The daily challenge can be played once per calendar day.
    #[must_use]
    pub fn daily_challenge_available(&self, today: NaiveDate) -> bool {
        self.daily_challenge_last_played != Some(today)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            best_score: 0,
            unlocked_levels: UnlockedLevels::new(),
            coin_balance: STARTING_COINS,
            sound_enabled: true,
            daily_challenge_last_played: None,
        }
    }
}
