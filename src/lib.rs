// Library surface for the binary, headless drivers and integration tests.
// Keep this lean: everything terminal-specific lives in ui/runtime.
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod sizing;
pub mod slot;
pub mod surface;
pub mod ui;

pub use config::{ConfigError, ExperimentConfig};
pub use controller::{ClickOutcome, TrialController};
pub use session::{SessionPhase, SessionState, Summary};
pub use slot::{Slot, SlotLabel, NUM_SLOTS};
pub use surface::{DisplaySurface, RecordingSurface};

/// Result type alias for the experiment runner
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the experiment runner
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid slot index {index}: expected 0..{}", NUM_SLOTS)]
    InvalidSlotIndex { index: usize },

    #[error("Session already ended after {trials} trials")]
    TerminalStateViolation { trials: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
