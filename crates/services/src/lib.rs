#![forbid(unsafe_code)]

pub mod audio;
pub mod error;
pub mod flow;
pub mod game_services;
pub mod live_session;
pub mod progression;
pub mod quiz_service;
pub mod shop;

pub use huduga_core::Clock;

pub use error::{
    AudioError, FlowError, GameServicesError, ProgressionError, QuizServiceError, ShopError,
};
pub use flow::{NavEvent, Screen, ScreenFlow};
pub use game_services::{GameConfig, GameServices};
pub use live_session::{LiveSession, NoopOutcomeHandler, OutcomeHandler};
pub use progression::{ProgressionReport, ProgressionService};
pub use quiz_service::QuizService;
pub use shop::{Reward, ShopService};
