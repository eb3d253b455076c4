//! Microphone capture. There can only be one active recording at a time;
//! audio is written as WAV into memory and handed off when the recording
//! finishes. The predictor accepts the clip as an opaque byte stream, so no
//! re-encoding happens on this side.

use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, Host};
use hound::WavWriter;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info};

/// Errors from the capture service.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The platform refused access to the input device.
    #[error("microphone access denied")]
    PermissionDenied,
    /// No recording device available
    #[error("no input device available")]
    NoInputDevice,
    /// Sample format not supported
    #[error("sample format not supported: {0}")]
    SampleFormatNotSupported(String),
    /// generic anyhow error
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, RecorderError>;
type WavWriterHandle = Arc<Mutex<Option<WavWriter<WavBuffer>>>>;

/// In-memory sink for the WAV writer. Finalizing a `WavWriter` does not
/// return its sink, so the bytes live behind a shared handle that both the
/// writer and the recording handle can reach.
#[derive(Clone)]
struct WavBuffer {
    inner: Arc<Mutex<Cursor<Vec<u8>>>>,
}

impl WavBuffer {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Cursor::new(Vec::with_capacity(8 * 1024)))),
        }
    }

    fn try_into_inner(self) -> Result<Vec<u8>> {
        let owned = Arc::try_unwrap(self.inner)
            .map_err(|_| RecorderError::Anyhow(anyhow!("wav buffer still shared")))?;
        Ok(owned.into_inner().into_inner())
    }
}

impl Seek for WavBuffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.lock().seek(pos)
    }
}

impl Write for WavBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// A finished capture: encoded bytes plus basic stats for logging.
#[derive(Debug)]
pub struct Recording {
    data: Vec<u8>,
    samples: usize,
    sample_rate: u32,
    channels: u16,
}

impl Recording {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn duration(&self) -> Duration {
        let frames_per_second = self.sample_rate as f64 * self.channels.max(1) as f64;
        Duration::from_secs_f64(self.samples as f64 / frames_per_second)
    }
}

pub struct Recorder {
    host: Host,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// Start capturing from the default input device. The returned handle
    /// must be finished to obtain the audio.
    pub fn start_recording(&self) -> Result<RecordingHandle> {
        let device = self
            .host
            .default_input_device()
            .ok_or(RecorderError::NoInputDevice)?;
        let config = device
            .default_input_config()
            .map_err(|_| RecorderError::NoInputDevice)?;

        info!(
            device = %device.name().unwrap_or_else(|_| "<unknown>".to_string()),
            config = ?config,
            "recording from device"
        );

        let spec = wav_spec_from_config(&config);
        let sample_rate = spec.sample_rate;
        let channels = spec.channels;

        let buffer = WavBuffer::new();
        let writer =
            WavWriter::new(buffer.clone(), spec).map_err(|e| RecorderError::Anyhow(e.into()))?;
        let writer = Arc::new(Mutex::new(Some(writer)));
        let samples = Arc::new(AtomicUsize::new(0));

        let writer_2 = writer.clone();
        let samples_2 = samples.clone();
        let err_fn = move |err| {
            error!("an error occurred on the input stream: {}", err);
        };

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device
                .build_input_stream(
                    &config.into(),
                    move |data: &[f32], _: &_| write_samples(data, &writer_2, &samples_2),
                    err_fn,
                    None,
                )
                .map_err(map_build_error)?,
            cpal::SampleFormat::I16 => device
                .build_input_stream(
                    &config.into(),
                    move |data: &[i16], _: &_| write_samples(data, &writer_2, &samples_2),
                    err_fn,
                    None,
                )
                .map_err(map_build_error)?,
            sample_format => {
                return Err(RecorderError::SampleFormatNotSupported(format!(
                    "{:?}",
                    sample_format
                )));
            }
        };

        stream
            .play()
            .map_err(|_| anyhow!("failed to start input stream"))?;

        Ok(RecordingHandle {
            stream,
            writer,
            buffer: Some(buffer),
            samples,
            sample_rate,
            channels,
        })
    }
}

// macOS reports a denied microphone permission as the device going away
// rather than as a dedicated error.
fn map_build_error(err: BuildStreamError) -> RecorderError {
    match err {
        BuildStreamError::DeviceNotAvailable => RecorderError::PermissionDenied,
        other => RecorderError::Anyhow(other.into()),
    }
}

/// Handle to the active recording. Dropping it ends the capture; call
/// [`finish`](Self::finish) to receive the data.
pub struct RecordingHandle {
    stream: cpal::Stream,
    writer: WavWriterHandle,
    // Presence of the buffer indicates the recording has not been finished.
    buffer: Option<WavBuffer>,
    samples: Arc<AtomicUsize>,
    sample_rate: u32,
    channels: u16,
}

impl RecordingHandle {
    /// Stop the stream, finalize the WAV framing, and return the recording.
    /// Returns `Ok(None)` when the handle was already finished.
    pub fn finish(&mut self) -> Result<Option<Recording>> {
        let Some(buffer) = self.buffer.take() else {
            return Ok(None);
        };
        info!("ending recording");
        self.stream.pause().ok();

        let Some(writer) = self.writer.lock().take() else {
            return Err(RecorderError::Anyhow(anyhow!("wav writer already taken")));
        };
        writer
            .finalize()
            .map_err(|e| RecorderError::Anyhow(anyhow!("failed to finalize wav writer: {}", e)))?;

        let data = buffer.try_into_inner()?;
        Ok(Some(Recording {
            data,
            samples: self.samples.load(Ordering::Relaxed),
            sample_rate: self.sample_rate,
            channels: self.channels,
        }))
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        if self.buffer.is_some() {
            if let Err(e) = self.finish() {
                error!("failed to finalize recording: {}", e);
            }
        }
    }
}

fn wav_spec_from_config(config: &cpal::SupportedStreamConfig) -> hound::WavSpec {
    hound::WavSpec {
        channels: config.channels(),
        sample_rate: config.sample_rate().0,
        bits_per_sample: (config.sample_format().sample_size() * 8) as _,
        sample_format: sample_format(config.sample_format()),
    }
}

fn sample_format(format: cpal::SampleFormat) -> hound::SampleFormat {
    if format.is_float() {
        hound::SampleFormat::Float
    } else {
        hound::SampleFormat::Int
    }
}

fn write_samples<S>(data: &[S], writer: &WavWriterHandle, samples: &AtomicUsize)
where
    S: hound::Sample + Copy,
{
    samples.fetch_add(data.len(), Ordering::Relaxed);
    if let Some(mut guard) = writer.try_lock() {
        if let Some(writer) = guard.as_mut() {
            for &sample in data.iter() {
                writer.write_sample(sample).ok();
            }
        }
    }
}
