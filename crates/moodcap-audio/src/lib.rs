//! Audio input for moodcap: microphone capture and the file-picking seam.

mod picker;
mod record;

pub use picker::{AudioPicker, PathPicker, PickError};
pub use record::{Recorder, RecorderError, Recording, RecordingHandle};
