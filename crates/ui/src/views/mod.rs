mod chrome;
mod daily;
mod home;
mod level_select;
mod quiz;
mod result;
mod shop;
mod splash;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chrome::{CoinBadge, CoinRefresh, SoundToggle, TopBar};
pub use daily::{DailyChallengeView, DailyPanel, DailyTerms};
pub use home::{HomePanel, HomeView, HowToPlay, HowToPlayTerms};
pub use level_select::{LevelList, LevelSelectView};
pub use quiz::{QuizPanel, QuizView};
pub use result::{ResultPanel, ResultView};
pub use shop::{ShopPanel, ShopView};
pub use splash::{SPLASH_DURATION, SplashView};
pub use state::{ViewError, ViewState, view_state_from_resource};
