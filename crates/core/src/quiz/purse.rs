use super::rules::PowerUp;

/// Why coins moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoinReason {
    CorrectAnswer,
    StreakBonus { streak: u32 },
    PowerUp(PowerUp),
}

/// A single signed coin movement recorded during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoinEntry {
    pub amount: i64,
    pub reason: CoinReason,
}

/// The coin capability handed to the engine for one action.
///
/// The engine never talks to persistence; whatever implements this decides
/// where the coins end up.
pub trait CoinPurse {
    fn balance(&self) -> u32;

    /// Spend `amount` if affordable. Returns false and leaves the balance
    /// untouched otherwise.
    fn try_spend(&mut self, amount: u32, reason: CoinReason) -> bool;

    fn earn(&mut self, amount: u32, reason: CoinReason);
}

/// In-memory purse that keeps a ledger of every movement until it is drained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: u32,
    ledger: Vec<CoinEntry>,
}

impl Wallet {
    #[must_use]
    pub fn new(balance: u32) -> Self {
        Self {
            balance,
            ledger: Vec::new(),
        }
    }

    /// Movements since the last drain, oldest first.
    pub fn take_ledger(&mut self) -> Vec<CoinEntry> {
        std::mem::take(&mut self.ledger)
    }

    #[must_use]
    pub fn pending(&self) -> &[CoinEntry] {
        &self.ledger
    }

    /// Drop the oldest pending movement once it has been persisted.
    pub fn settle_oldest(&mut self) -> Option<CoinEntry> {
        if self.ledger.is_empty() {
            None
        } else {
            Some(self.ledger.remove(0))
        }
    }

    /// Overwrite the cached balance, e.g. after re-reading persistence.
    pub fn resync(&mut self, balance: u32) {
        self.balance = balance;
    }
}

impl CoinPurse for Wallet {
    fn balance(&self) -> u32 {
        self.balance
    }

    fn try_spend(&mut self, amount: u32, reason: CoinReason) -> bool {
        if amount > self.balance {
            return false;
        }
        self.balance -= amount;
        self.ledger.push(CoinEntry {
            amount: -i64::from(amount),
            reason,
        });
        true
    }

    fn earn(&mut self, amount: u32, reason: CoinReason) {
        if amount == 0 {
            return;
        }
        self.balance = self.balance.saturating_add(amount);
        self.ledger.push(CoinEntry {
            amount: i64::from(amount),
            reason,
        });
    }
}
