//! Core types and configuration for moodcap.
//!
//! This crate owns the session state machine that drives the whole
//! application, plus the platform-agnostic supporting types. Nothing here
//! touches audio devices, the network, or the UI.

mod config;
mod label;
mod session;
mod source;

pub use config::{Config, ConfigManager};
pub use label::{Label, UnknownLabel};
pub use session::{Mode, Session, SessionEffect, SessionInput};
pub use source::SourceLocator;

/// Application name
pub const APP_NAME: &str = "moodcap";

/// Pretty application name for display
pub const APP_NAME_PRETTY: &str = "Moodcap";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default predictor endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predictor";
