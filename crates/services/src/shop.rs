use storage::ProfileStore;

use crate::error::ShopError;

/// Free coin rewards offered in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reward {
    Small,
    Large,
}

impl Reward {
    pub const ALL: [Reward; 2] = [Reward::Small, Reward::Large];

    #[must_use]
    pub fn coins(self) -> u32 {
        match self {
            Reward::Small => 50,
            Reward::Large => 100,
        }
    }
}

#[derive(Clone)]
pub struct ShopService {
    profile: ProfileStore,
}

impl ShopService {
    #[must_use]
    pub fn new(profile: ProfileStore) -> Self {
        Self { profile }
    }

    /// Credit `reward` and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the balance cannot be updated.
    pub async fn claim(&self, reward: Reward) -> Result<u32, ShopError> {
        let balance = self.profile.credit(reward.coins()).await?;
        tracing::info!(?reward, coins = reward.coins(), balance, "shop reward claimed");
        Ok(balance)
    }

    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the balance cannot be read.
    pub async fn balance(&self) -> Result<u32, ShopError> {
        Ok(self.profile.coin_balance().await?)
    }
}
