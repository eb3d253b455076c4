//! Application events for the tao event loop.

use crate::Label;

/// Events delivered back to the event loop by the upload pipeline.
#[derive(Debug, Clone)]
pub enum MoodEvent {
    /// The predictor classified the last upload
    PredictionReady(Label),
    /// The upload or the predictor failed
    PredictionFailed,
}
