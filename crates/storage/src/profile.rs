use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

use huduga_core::model::{Level, Profile, STARTING_COINS, UnlockedLevels};

use crate::repository::{KeyValueRepository, StorageError};

pub(crate) const KEY_BEST_SCORE: &str = "bestScore";
pub(crate) const KEY_UNLOCKED_LEVELS: &str = "unlockedLevels";
pub(crate) const KEY_COINS: &str = "coins";
pub(crate) const KEY_SOUND_ON: &str = "soundOn";
pub(crate) const KEY_DAILY_CHALLENGE_DATE: &str = "dailyChallengeDate";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Typed access to the persisted player profile.
///
/// Values are stored as strings so that a damaged entry can be detected and
/// replaced with its default instead of failing the caller. Read-modify-write
/// operations are serialized through `write_lock`.
#[derive(Clone)]
pub struct ProfileStore {
    kv: Arc<dyn KeyValueRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueRepository>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn best_score(&self) -> Result<u32, StorageError> {
        let raw = self.kv.get(KEY_BEST_SCORE).await?;
        Ok(decode_u32(KEY_BEST_SCORE, raw.as_deref(), 0))
    }

    /// Store `score` if it beats the current best. Returns true when it did.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn record_score(&self, score: u32) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let best = self.best_score().await?;
        if score <= best {
            return Ok(false);
        }
        self.kv.set(KEY_BEST_SCORE, &score.to_string()).await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn unlocked_levels(&self) -> Result<UnlockedLevels, StorageError> {
        let raw = self.kv.get(KEY_UNLOCKED_LEVELS).await?;
        Ok(decode_levels(raw.as_deref()))
    }

    /// Add `level` to the unlocked set. Returns true if it was newly unlocked.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn unlock_level(&self, level: Level) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut levels = self.unlocked_levels().await?;
        if !levels.unlock(level) {
            return Ok(false);
        }
        self.kv
            .set(KEY_UNLOCKED_LEVELS, &encode_levels(&levels)?)
            .await?;
        Ok(true)
    }

    /// Current balance; a new player starts with `STARTING_COINS`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn coin_balance(&self) -> Result<u32, StorageError> {
        let raw = self.kv.get(KEY_COINS).await?;
        Ok(decode_coins(raw.as_deref()))
    }

    /// Add coins and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn credit(&self, amount: u32) -> Result<u32, StorageError> {
        let _guard = self.write_lock.lock().await;
        let balance = self.coin_balance().await?.saturating_add(amount);
        self.kv.set(KEY_COINS, &balance.to_string()).await?;
        Ok(balance)
    }

    /// Remove coins if the balance covers `amount`. Returns false, without
    /// touching the balance, when it does not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    pub async fn debit(&self, amount: u32) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let balance = self.coin_balance().await?;
        if amount > balance {
            return Ok(false);
        }
        self.kv
            .set(KEY_COINS, &(balance - amount).to_string())
            .await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn sound_enabled(&self) -> Result<bool, StorageError> {
        let raw = self.kv.get(KEY_SOUND_ON).await?;
        Ok(raw.as_deref() != Some("false"))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn set_sound_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.kv
            .set(KEY_SOUND_ON, if enabled { "true" } else { "false" })
            .await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn daily_challenge_last_played(&self) -> Result<Option<NaiveDate>, StorageError> {
        let raw = self.kv.get(KEY_DAILY_CHALLENGE_DATE).await?;
        Ok(decode_date(raw.as_deref()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn record_daily_challenge_played(&self, on: NaiveDate) -> Result<(), StorageError> {
        self.kv
            .set(KEY_DAILY_CHALLENGE_DATE, &on.format(DATE_FORMAT).to_string())
            .await
    }

    /// Read every field at once.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load_profile(&self) -> Result<Profile, StorageError> {
        Ok(Profile {
            best_score: self.best_score().await?,
            unlocked_levels: self.unlocked_levels().await?,
            coin_balance: self.coin_balance().await?,
            sound_enabled: self.sound_enabled().await?,
            daily_challenge_last_played: self.daily_challenge_last_played().await?,
        })
    }

    /// Forget everything; the next read returns a fresh profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn reset(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        for key in [
            KEY_BEST_SCORE,
            KEY_UNLOCKED_LEVELS,
            KEY_COINS,
            KEY_SOUND_ON,
            KEY_DAILY_CHALLENGE_DATE,
        ] {
            self.kv.remove(key).await?;
        }
        Ok(())
    }
}

//
// ─── DECODING ──────────────────────────────────────────────────────────────────
//

fn decode_u32(key: &str, raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse::<u32>().unwrap_or_else(|err| {
        tracing::warn!(key, raw, %err, "discarding unreadable profile value");
        default
    })
}

fn decode_coins(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return STARTING_COINS;
    };
    // Older writes could go below zero; clamp rather than reset.
    match raw.trim().parse::<i64>() {
        Ok(value) => u32::try_from(value.max(0)).unwrap_or(u32::MAX),
        Err(err) => {
            tracing::warn!(key = KEY_COINS, raw, %err, "discarding unreadable coin balance");
            STARTING_COINS
        }
    }
}

fn decode_levels(raw: Option<&str>) -> UnlockedLevels {
    let Some(raw) = raw else {
        return UnlockedLevels::new();
    };
    match serde_json::from_str::<Vec<i64>>(raw) {
        Ok(numbers) => UnlockedLevels::from_levels(numbers.into_iter().filter_map(|n| {
            let level = u8::try_from(n).ok().and_then(|n| Level::new(n).ok());
            if level.is_none() {
                tracing::warn!(value = n, "ignoring unknown unlocked level");
            }
            level
        })),
        Err(err) => {
            tracing::warn!(key = KEY_UNLOCKED_LEVELS, raw, %err, "resetting unlocked levels");
            UnlockedLevels::new()
        }
    }
}

fn encode_levels(levels: &UnlockedLevels) -> Result<String, StorageError> {
    let numbers: Vec<u8> = levels.iter().map(Level::number).collect();
    serde_json::to_string(&numbers).map_err(|err| StorageError::Serialization(err.to_string()))
}

fn decode_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(key = KEY_DAILY_CHALLENGE_DATE, raw, %err, "ignoring unreadable date");
            None
        }
    }
}
