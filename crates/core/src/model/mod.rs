mod bank;
mod ids;
mod level;
mod profile;
mod question;

pub use ids::{ParseIdError, QuestionId, SessionId};

pub use bank::{BankError, QuestionBank};
pub use level::{Level, LevelError};
pub use profile::{Profile, STARTING_COINS, UnlockedLevels};
pub use question::{OPTION_COUNT, Question, QuestionError};
