//! File picking seam.
//!
//! The picker is an external service from the session's point of view: it
//! either hands back an audio resource or reports a cancellation. The
//! shipped implementation serves a preconfigured path; tests and future
//! frontends can plug in their own.

use std::path::{Path, PathBuf};

use moodcap_core::SourceLocator;
use thiserror::Error;
use tracing::info;

/// Extensions accepted as audio input, mirroring what the predictor side
/// can decode.
const AUDIO_EXTENSIONS: &[&str] = &[
    "m4a", "mp4", "mp3", "wav", "webm", "mpga", "mpeg", "aac", "ogg", "flac",
];

#[derive(Debug, Error)]
pub enum PickError {
    #[error("not an audio file: {0}")]
    NotAudio(PathBuf),
    #[error("file not found: {0}")]
    NotFound(PathBuf),
}

/// Picker seam. `Ok(None)` means the pick was cancelled.
pub trait AudioPicker {
    fn pick(&self) -> Result<Option<SourceLocator>, PickError>;
}

/// Serves a preconfigured file path; reports a cancellation when none is
/// configured.
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl AudioPicker for PathPicker {
    fn pick(&self) -> Result<Option<SourceLocator>, PickError> {
        let Some(path) = &self.path else {
            info!("no open_file configured, treating pick as cancelled");
            return Ok(None);
        };
        if !path.exists() {
            return Err(PickError::NotFound(path.clone()));
        }
        if !is_audio(path) {
            return Err(PickError::NotAudio(path.clone()));
        }
        Ok(Some(SourceLocator::File(path.clone())))
    }
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
