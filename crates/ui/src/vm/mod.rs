mod level_vm;
mod quiz_vm;
mod result_vm;

pub use level_vm::{LevelCardVm, map_level_cards};
pub use quiz_vm::{OptionState, OptionVm, PowerUpVm, QuizVm};
pub use result_vm::ResultVm;
