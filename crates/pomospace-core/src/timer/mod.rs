mod engine;
mod phase;
mod ticker;

pub use engine::{
    Collaborators, CompletionBanner, TimerEngine, TimerProgress, JUST_COMPLETED_TTL_MS,
};
pub use phase::{format_clock, Phase};
pub use ticker::Ticker;
