//! Opaque references to audio resources.

use std::path::PathBuf;

/// Reference to the audio that will be uploaded. Captured audio lives in
/// memory; picked audio stays on disk until upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    /// Encoded audio captured from the microphone.
    Memory(Vec<u8>),
    /// An audio file the user picked.
    File(PathBuf),
}

impl SourceLocator {
    /// File name presented to the server in the multipart upload.
    pub fn file_name(&self) -> String {
        match self {
            SourceLocator::Memory(_) => "recording.mp4".to_string(),
            SourceLocator::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "recording.mp4".to_string()),
        }
    }

    /// Size of the resource, when known without touching the filesystem.
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            SourceLocator::Memory(data) => Some(data.len()),
            SourceLocator::File(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_path() {
        let source = SourceLocator::File(PathBuf::from("/tmp/clips/shout.m4a"));
        assert_eq!(source.file_name(), "shout.m4a");
    }

    #[test]
    fn file_name_for_captured_audio() {
        let source = SourceLocator::Memory(vec![0; 4]);
        assert_eq!(source.file_name(), "recording.mp4");
        assert_eq!(source.len_hint(), Some(4));
    }
}
