use std::sync::Arc;

use anyhow::{Context, Result};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use moodcap::config_ext::ConfigExt;
use moodcap::event::MoodEvent;
use moodcap::upload::UploadPipeline;
use moodcap::{
    AudioPicker, ConfigManager, DEFAULT_LOG_LEVEL, Mode, PathPicker, Recorder, RecorderError,
    RecordingHandle, Session, SessionEffect, SessionInput, SourceLocator, VERSION, icon, notify,
};
use parking_lot::RwLock;
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tray_icon::menu::{AboutMetadataBuilder, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder, TrayIconEvent};

fn main() -> Result<()> {
    // Initialize the logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MOODCAP_LOG")
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .init();

    // Load config
    let config_manager = ConfigManager::new()?;
    let config = Arc::new(RwLock::new(config_manager.load()?));
    // save back the config to create the file if it doesn't exist
    config_manager.save(&config.read())?;

    // Set up hotkey (the "action button")
    let hotkey_manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;
    hotkey_manager
        .register(config.hotkey())
        .context("Failed to register hotkey")?;

    // Set up the capture and picker services
    let recorder = Recorder::new();
    let mut active_recording: Option<RecordingHandle> = None;
    let picker = PathPicker::new(config.read().open_file.clone());

    // Create the tray menu
    let tray_menu = Menu::new();
    let menu_open_file = MenuItem::new("Open audio file", true, None);
    let menu_config_path = MenuItem::new("Show config path", true, None);
    let menu_quit = MenuItem::new("Quit", true, None);
    tray_menu.append_items(&[
        // the name of the app
        &MenuItem::new("Moodcap", false, None),
        &PredefinedMenuItem::separator(),
        &PredefinedMenuItem::about(
            None,
            Some(
                AboutMetadataBuilder::new()
                    .version(Some(VERSION.to_owned()))
                    .build(),
            ),
        ),
        &menu_open_file,
        &menu_config_path,
        &PredefinedMenuItem::separator(),
        &menu_quit,
    ])?;

    // Set up the event loop
    let mut icon_tray: Option<TrayIcon> = None;

    let menu_channel = MenuEvent::receiver();
    let tray_channel = TrayIconEvent::receiver();
    let hotkey_channel = GlobalHotKeyEvent::receiver();

    let event_loop: EventLoop<MoodEvent> = EventLoopBuilder::with_user_event().build();
    let event_sender = event_loop.create_proxy();

    // Pipeline that carries uploads to the predictor
    let pipeline = UploadPipeline::new(&config.read().endpoint, event_sender.clone())?;

    // The session owns all display state; everything below only feeds it
    // inputs and carries out its effects.
    let mut session = Session::new();
    let mut shown_mode = session.mode();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        if let Event::NewEvents(StartCause::Init) = event {
            // We create the icon once the event loop is actually running
            // to prevent issues like https://github.com/tauri-apps/tray-icon/issues/90

            icon_tray.replace(
                TrayIconBuilder::new()
                    .with_menu(Box::new(tray_menu.clone()))
                    .with_tooltip(session.caption())
                    .with_icon(icon::icon_for(session.mode()))
                    .build()
                    .unwrap(),
            );

            // We have to request a redraw here to have the icon actually show up.
            // Tao only exposes a redraw method on the Window so we use core-foundation directly.
            #[cfg(target_os = "macos")]
            unsafe {
                use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};

                let rl = CFRunLoopGetMain();
                CFRunLoopWakeUp(rl);
            }

            info!("Moodcap ready");
        }

        let mut pending: Option<SessionInput> = None;

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == menu_quit.id() {
                icon_tray.take();
                *control_flow = ControlFlow::Exit;
            } else if event.id == menu_config_path.id() {
                let path = config_manager.config_path().display().to_string();
                info!(path = %path, "config path requested");
                notify::show("Config path", &path);
            } else if event.id == menu_open_file.id() {
                pending = Some(SessionInput::OpenFilePressed);
            }
        }

        if tray_channel.try_recv().is_ok() {
            // Handle tray icon events
        }

        // Prediction outcomes delivered by the pipeline
        if let Event::UserEvent(event) = event {
            pending = Some(match event {
                MoodEvent::PredictionReady(label) => SessionInput::PredictionReady(label),
                MoodEvent::PredictionFailed => SessionInput::PredictionFailed,
            });
        }

        // Hotkey presses (the action button)
        if let Ok(event) = hotkey_channel.try_recv() {
            if event.id() == config.hotkey().id() && event.state() == HotKeyState::Pressed {
                pending = Some(SessionInput::ActionPressed);
            }
        }

        if let Some(input) = pending {
            drive_session(
                &mut session,
                input,
                &recorder,
                &mut active_recording,
                &picker,
                &pipeline,
            );
            render(&session, icon_tray.as_ref(), &mut shown_mode);
        }
    });
}

/// Feed one input into the session, then keep carrying out effects until
/// the machine settles. Service outcomes (capture stop, picker result) come
/// straight back as new inputs; only uploads resolve later, via the event
/// loop.
fn drive_session(
    session: &mut Session,
    input: SessionInput,
    recorder: &Recorder,
    active_recording: &mut Option<RecordingHandle>,
    picker: &dyn AudioPicker,
    pipeline: &UploadPipeline,
) {
    let mut next = Some(input);
    while let Some(input) = next.take() {
        let effect = session.apply(input);
        next = run_effect(effect, recorder, active_recording, picker, pipeline);
    }
}

fn run_effect(
    effect: SessionEffect,
    recorder: &Recorder,
    active_recording: &mut Option<RecordingHandle>,
    picker: &dyn AudioPicker,
    pipeline: &UploadPipeline,
) -> Option<SessionInput> {
    match effect {
        SessionEffect::None => None,
        SessionEffect::StartCapture => match recorder.start_recording() {
            Ok(handle) => {
                active_recording.replace(handle);
                None
            }
            Err(e) => {
                match &e {
                    // The session turns this into the permission alert.
                    RecorderError::PermissionDenied => {}
                    RecorderError::NoInputDevice => {
                        warn!("no input device available");
                        notify::show("Recording", "No input device available");
                    }
                    other => error!("failed to start recording: {:?}", other),
                }
                Some(capture_failure_input(&e))
            }
        },
        SessionEffect::StopCapture => match active_recording.take() {
            Some(mut recording) => match recording.finish() {
                Ok(Some(recording)) => {
                    info!(
                        samples = recording.samples(),
                        bytes = recording.data().len(),
                        length_seconds = recording.duration().as_secs_f64(),
                        "recording captured"
                    );
                    Some(SessionInput::CaptureStopped(SourceLocator::Memory(
                        recording.into_data(),
                    )))
                }
                Ok(None) => {
                    warn!("recording finished but no data was recorded");
                    Some(SessionInput::CaptureFailed)
                }
                Err(e) => {
                    error!(error = ?e, "failed to finish recording");
                    Some(SessionInput::CaptureFailed)
                }
            },
            None => {
                warn!("stop requested but no recording is active");
                Some(SessionInput::CaptureFailed)
            }
        },
        SessionEffect::OpenPicker => match picker.pick() {
            Ok(Some(source)) => Some(SessionInput::FilePicked(source)),
            Ok(None) => Some(SessionInput::PickerCancelled),
            Err(e) => {
                warn!("picker failed: {}", e);
                Some(SessionInput::PickerCancelled)
            }
        },
        SessionEffect::Upload(source) => match pipeline.submit(source) {
            Ok(()) => None,
            Err(e) => {
                error!("failed to submit upload: {:?}", e);
                Some(SessionInput::PredictionFailed)
            }
        },
        SessionEffect::WarnPermission => {
            warn!("microphone permission denied");
            notify::permission_alert();
            None
        }
    }
}

/// Map a capture-start failure to the session input it represents. Only a
/// genuine permission refusal enters the permission flow; a missing or
/// broken device is an ordinary capture failure.
fn capture_failure_input(err: &RecorderError) -> SessionInput {
    match err {
        RecorderError::PermissionDenied => SessionInput::CaptureDenied,
        _ => SessionInput::CaptureFailed,
    }
}

/// Push the session's display state to the tray. Captions for settled
/// outcomes also go out as a notification, standing in for the caption text
/// of the source UI.
fn render(session: &Session, icon_tray: Option<&TrayIcon>, shown_mode: &mut Mode) {
    if session.mode() == *shown_mode {
        return;
    }
    *shown_mode = session.mode();
    info!(mode = ?session.mode(), "state changed");

    if let Some(tray) = icon_tray {
        tray.set_icon(Some(icon::icon_for(session.mode()))).ok();
        tray.set_tooltip(Some(session.caption())).ok();
    }

    if matches!(session.mode(), Mode::ResultReady(_) | Mode::Error) {
        notify::caption(session.caption());
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn only_permission_refusal_enters_permission_flow() {
        assert_eq!(
            capture_failure_input(&RecorderError::PermissionDenied),
            SessionInput::CaptureDenied
        );
        assert_eq!(
            capture_failure_input(&RecorderError::NoInputDevice),
            SessionInput::CaptureFailed
        );
        assert_eq!(
            capture_failure_input(&RecorderError::SampleFormatNotSupported("U16".to_string())),
            SessionInput::CaptureFailed
        );
        assert_eq!(
            capture_failure_input(&RecorderError::Anyhow(anyhow!("stream error"))),
            SessionInput::CaptureFailed
        );
    }
}
