//! The record/upload/display session.
//!
//! All UI state lives in a single [`Session`] and changes only through
//! [`Session::apply`]. Every external outcome (capture stop, picker result,
//! prediction result) is fed back in as a [`SessionInput`], so there is
//! exactly one place where transitions happen and no two service calls can
//! overlap: the triggering affordances are no-ops while the session is
//! already recording or processing.

use tracing::debug;

use crate::{Label, SourceLocator};

/// Display mode of the session. A result label only exists inside
/// `ResultReady`, so a stale label can never outlive its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the user.
    Idle,
    /// Capture in progress.
    Recording,
    /// Waiting on the picker or an in-flight upload.
    Processing,
    /// The predictor answered.
    ResultReady(Label),
    /// The upload path failed; the user must retry manually.
    Error,
}

impl Mode {
    /// Caption for this mode. Pure function of the mode (and its label).
    pub fn caption(&self) -> &'static str {
        match self {
            Mode::Idle => "press button to record\nor open file to look emotional",
            Mode::Recording => "recording",
            Mode::Processing => "Processing",
            Mode::ResultReady(label) => label.caption(),
            Mode::Error => "please try again.",
        }
    }
}

/// External events fed into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// The action button was pressed.
    ActionPressed,
    /// The open-file affordance was pressed.
    OpenFilePressed,
    /// The capture service refused to start (microphone permission).
    CaptureDenied,
    /// Capture stopped and produced an audio resource.
    CaptureStopped(SourceLocator),
    /// Capture failed to start or stop for a reason other than permission.
    CaptureFailed,
    /// The picker returned a file.
    FilePicked(SourceLocator),
    /// The picker was dismissed without a selection.
    PickerCancelled,
    /// The predictor classified the upload.
    PredictionReady(Label),
    /// The upload or the predictor failed.
    PredictionFailed,
}

/// What the caller must carry out after a transition. At most one effect
/// per input; service outcomes come back as new inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Nothing to do.
    None,
    /// Start a capture session.
    StartCapture,
    /// Stop the active capture session.
    StopCapture,
    /// Open the file picker.
    OpenPicker,
    /// Upload the given resource to the predictor.
    Upload(SourceLocator),
    /// Tell the user that microphone access was denied.
    WarnPermission,
}

/// Owns all mutable state for one record/upload/display interaction at a
/// time. Created at startup in `Idle`; never persisted.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    source: Option<SourceLocator>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            source: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The label of the last prediction, present only in `ResultReady`.
    pub fn label(&self) -> Option<Label> {
        match self.mode {
            Mode::ResultReady(label) => Some(label),
            _ => None,
        }
    }

    /// The audio resource of the current request, if one has been produced.
    pub fn source(&self) -> Option<&SourceLocator> {
        self.source.as_ref()
    }

    /// Caption for the current display state.
    pub fn caption(&self) -> &'static str {
        self.mode.caption()
    }

    /// Apply one input and return the effect the caller must carry out.
    ///
    /// Total over (mode, input): combinations outside the transition table
    /// leave the session untouched. That covers both presses while busy and
    /// stale service callbacks arriving after the user moved on.
    pub fn apply(&mut self, input: SessionInput) -> SessionEffect {
        use Mode::*;
        use SessionInput::*;

        match (self.mode, input) {
            // The action button always (re)starts the recording flow from
            // any settled state.
            (Idle | ResultReady(_) | Error, ActionPressed) => {
                self.source = None;
                self.mode = Recording;
                SessionEffect::StartCapture
            }
            (Recording, ActionPressed) => {
                self.mode = Processing;
                SessionEffect::StopCapture
            }
            (Idle, OpenFilePressed) => {
                self.source = None;
                self.mode = Processing;
                SessionEffect::OpenPicker
            }
            (Recording, CaptureDenied) => {
                self.mode = Idle;
                SessionEffect::WarnPermission
            }
            (Recording, CaptureFailed) => {
                self.mode = Idle;
                SessionEffect::None
            }
            (Processing, CaptureStopped(source) | FilePicked(source)) => {
                self.source = Some(source.clone());
                SessionEffect::Upload(source)
            }
            // A stop failure happens on the upload path, so it degrades to
            // the error display like any other upload failure.
            (Processing, CaptureFailed) => {
                self.mode = Error;
                SessionEffect::None
            }
            (Processing, PickerCancelled) => {
                self.mode = Idle;
                SessionEffect::None
            }
            (Processing, PredictionReady(label)) => {
                self.mode = ResultReady(label);
                SessionEffect::None
            }
            (Processing, PredictionFailed) => {
                self.mode = Error;
                SessionEffect::None
            }
            (mode, input) => {
                debug!(?mode, ?input, "input ignored");
                SessionEffect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn drive(session: &mut Session, inputs: Vec<SessionInput>) -> Vec<SessionEffect> {
        inputs
            .into_iter()
            .map(|input| session.apply(input))
            .collect()
    }

    fn mem_source() -> SourceLocator {
        SourceLocator::Memory(vec![1, 2, 3])
    }

    #[test]
    fn record_upload_happy_path() {
        let mut session = Session::new();

        assert_eq!(
            session.apply(SessionInput::ActionPressed),
            SessionEffect::StartCapture
        );
        assert_eq!(session.mode(), Mode::Recording);
        assert_eq!(session.caption(), "recording");

        assert_eq!(
            session.apply(SessionInput::ActionPressed),
            SessionEffect::StopCapture
        );
        assert_eq!(session.mode(), Mode::Processing);
        assert_eq!(session.caption(), "Processing");

        assert_eq!(
            session.apply(SessionInput::CaptureStopped(mem_source())),
            SessionEffect::Upload(mem_source())
        );
        assert_eq!(session.mode(), Mode::Processing);
        assert_eq!(session.source(), Some(&mem_source()));

        assert_eq!(
            session.apply(SessionInput::PredictionReady(Label::Happy)),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::ResultReady(Label::Happy));
        assert_eq!(session.label(), Some(Label::Happy));
        assert_eq!(session.caption(), "Happy");
    }

    #[test]
    fn sad_label_yields_exact_caption() {
        let mut session = Session::new();
        drive(
            &mut session,
            vec![
                SessionInput::ActionPressed,
                SessionInput::ActionPressed,
                SessionInput::CaptureStopped(mem_source()),
                SessionInput::PredictionReady(Label::Sad),
            ],
        );
        assert_eq!(session.caption(), "Sad");
    }

    #[test]
    fn upload_failure_shows_retry_prompt() {
        let mut session = Session::new();
        drive(
            &mut session,
            vec![
                SessionInput::ActionPressed,
                SessionInput::ActionPressed,
                SessionInput::CaptureStopped(mem_source()),
                SessionInput::PredictionFailed,
            ],
        );
        assert_eq!(session.mode(), Mode::Error);
        assert_eq!(session.caption(), "please try again.");
        assert_eq!(session.label(), None);
    }

    #[test]
    fn permission_denial_returns_to_idle_with_warning() {
        let mut session = Session::new();
        session.apply(SessionInput::ActionPressed);
        assert_eq!(
            session.apply(SessionInput::CaptureDenied),
            SessionEffect::WarnPermission
        );
        assert_eq!(session.mode(), Mode::Idle);
    }

    #[test]
    fn capture_start_failure_returns_to_idle() {
        let mut session = Session::new();
        session.apply(SessionInput::ActionPressed);
        assert_eq!(
            session.apply(SessionInput::CaptureFailed),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Idle);
    }

    #[test]
    fn capture_stop_failure_degrades_to_error() {
        let mut session = Session::new();
        session.apply(SessionInput::ActionPressed);
        session.apply(SessionInput::ActionPressed);
        session.apply(SessionInput::CaptureFailed);
        assert_eq!(session.mode(), Mode::Error);
        assert_eq!(session.caption(), "please try again.");
    }

    #[test]
    fn picked_file_is_uploaded() {
        let mut session = Session::new();
        let picked = SourceLocator::File(PathBuf::from("clip.m4a"));

        assert_eq!(
            session.apply(SessionInput::OpenFilePressed),
            SessionEffect::OpenPicker
        );
        assert_eq!(session.mode(), Mode::Processing);

        assert_eq!(
            session.apply(SessionInput::FilePicked(picked.clone())),
            SessionEffect::Upload(picked)
        );
        assert_eq!(
            session.apply(SessionInput::PredictionReady(Label::Normal)),
            SessionEffect::None
        );
        assert_eq!(session.caption(), "Normal");
    }

    #[test]
    fn picker_cancellation_returns_to_idle() {
        let mut session = Session::new();
        session.apply(SessionInput::OpenFilePressed);
        session.apply(SessionInput::PickerCancelled);
        assert_eq!(session.mode(), Mode::Idle);
    }

    #[test]
    fn open_file_ignored_while_recording() {
        let mut session = Session::new();
        session.apply(SessionInput::ActionPressed);
        assert_eq!(
            session.apply(SessionInput::OpenFilePressed),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Recording);
    }

    #[test]
    fn open_file_ignored_while_processing() {
        let mut session = Session::new();
        session.apply(SessionInput::OpenFilePressed);
        assert_eq!(
            session.apply(SessionInput::OpenFilePressed),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Processing);
    }

    #[test]
    fn double_press_starts_exactly_one_capture() {
        let mut session = Session::new();
        let effects = drive(
            &mut session,
            vec![SessionInput::ActionPressed, SessionInput::ActionPressed],
        );
        assert_eq!(
            effects,
            vec![SessionEffect::StartCapture, SessionEffect::StopCapture]
        );
    }

    #[test]
    fn button_ignored_while_processing() {
        let mut session = Session::new();
        session.apply(SessionInput::ActionPressed);
        session.apply(SessionInput::ActionPressed);
        assert_eq!(
            session.apply(SessionInput::ActionPressed),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Processing);
    }

    #[test]
    fn button_restarts_from_result_and_error() {
        let mut session = Session::new();
        drive(
            &mut session,
            vec![
                SessionInput::ActionPressed,
                SessionInput::ActionPressed,
                SessionInput::CaptureStopped(mem_source()),
                SessionInput::PredictionReady(Label::Happy),
            ],
        );
        assert_eq!(
            session.apply(SessionInput::ActionPressed),
            SessionEffect::StartCapture
        );
        assert_eq!(session.mode(), Mode::Recording);
        assert_eq!(session.label(), None);

        drive(
            &mut session,
            vec![
                SessionInput::ActionPressed,
                SessionInput::CaptureStopped(mem_source()),
                SessionInput::PredictionFailed,
            ],
        );
        assert_eq!(session.mode(), Mode::Error);
        assert_eq!(
            session.apply(SessionInput::ActionPressed),
            SessionEffect::StartCapture
        );
        assert_eq!(session.mode(), Mode::Recording);
    }

    #[test]
    fn label_present_only_in_result_ready() {
        let mut session = Session::new();
        let inputs = vec![
            SessionInput::ActionPressed,
            SessionInput::ActionPressed,
            SessionInput::CaptureStopped(mem_source()),
            SessionInput::PredictionReady(Label::Normal),
            SessionInput::ActionPressed,
            SessionInput::ActionPressed,
            SessionInput::CaptureStopped(mem_source()),
            SessionInput::PredictionFailed,
        ];
        for input in inputs {
            session.apply(input);
            assert_eq!(
                session.label().is_some(),
                matches!(session.mode(), Mode::ResultReady(_)),
            );
        }
    }

    #[test]
    fn stale_service_callbacks_are_ignored() {
        let mut session = Session::new();
        assert_eq!(
            session.apply(SessionInput::PredictionReady(Label::Happy)),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Idle);

        assert_eq!(
            session.apply(SessionInput::CaptureStopped(mem_source())),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Idle);

        assert_eq!(
            session.apply(SessionInput::PickerCancelled),
            SessionEffect::None
        );
        assert_eq!(session.mode(), Mode::Idle);
    }
}
