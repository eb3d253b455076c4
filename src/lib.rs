// Re-export from sub-crates
pub use moodcap_audio::{
    AudioPicker, PathPicker, PickError, Recorder, RecorderError, Recording, RecordingHandle,
};
pub use moodcap_core::{
    APP_NAME, APP_NAME_PRETTY, Config, ConfigManager, DEFAULT_ENDPOINT, DEFAULT_LOG_LEVEL, Label,
    Mode, Session, SessionEffect, SessionInput, SourceLocator,
};
pub use moodcap_predict::{HttpPredictor, PredictError, Predictor};

// App-specific modules
pub mod config_ext;
pub mod event;
pub mod icon;
pub mod notify;
pub mod upload;

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
