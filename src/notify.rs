//! System notifications carrying the session captions.

use notify_rust::Notification;
use tracing::error;

use crate::icon::ICON_PATH;
use crate::{APP_NAME, APP_NAME_PRETTY};

/// Show the caption for a settled display state.
pub fn caption(text: &str) {
    show(APP_NAME_PRETTY, text);
}

/// Alert shown when microphone access is denied.
pub fn permission_alert() {
    show(
        "Microphone access",
        "Please grant permission to access the microphone",
    );
}

/// Send a system notification with a summary and body.
pub fn show(summary: &str, body: &str) {
    Notification::new()
        .icon(ICON_PATH)
        .appname(APP_NAME)
        .summary(summary)
        .body(body)
        .show()
        .map_err(|e| error!("Failed to send notification: {}", e))
        .ok();
}
