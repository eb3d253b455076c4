//! Tray icons for each display state.
//!
//! The source app showed a distinct picture per emotion; in the tray that
//! becomes the base icon recolored per state. Colors are the macOS system
//! palette defaults.

use std::path::Path;
use std::sync::LazyLock;

use crate::{Label, Mode};

pub const ICON_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/icon.png");

const COLOR_RECORDING: (u8, u8, u8) = (255, 59, 48); // red
const COLOR_PROCESSING: (u8, u8, u8) = (255, 204, 0); // yellow
const COLOR_HAPPY: (u8, u8, u8) = (40, 205, 65); // green
const COLOR_NORMAL: (u8, u8, u8) = (0, 122, 255); // blue
const COLOR_SAD: (u8, u8, u8) = (88, 86, 214); // indigo
const COLOR_ERROR: (u8, u8, u8) = (255, 149, 0); // orange

static ICON_IDLE: LazyLock<tray_icon::Icon> = LazyLock::new(|| load_icon(ICON_PATH, None));
static ICON_RECORDING: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_RECORDING)));
static ICON_PROCESSING: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_PROCESSING)));
static ICON_HAPPY: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_HAPPY)));
static ICON_NORMAL: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_NORMAL)));
static ICON_SAD: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_SAD)));
static ICON_ERROR: LazyLock<tray_icon::Icon> =
    LazyLock::new(|| load_icon(ICON_PATH, Some(COLOR_ERROR)));

/// Icon for the given display state.
pub fn icon_for(mode: Mode) -> tray_icon::Icon {
    match mode {
        Mode::Idle => ICON_IDLE.clone(),
        Mode::Recording => ICON_RECORDING.clone(),
        Mode::Processing => ICON_PROCESSING.clone(),
        Mode::ResultReady(Label::Happy) => ICON_HAPPY.clone(),
        Mode::ResultReady(Label::Normal) => ICON_NORMAL.clone(),
        Mode::ResultReady(Label::Sad) => ICON_SAD.clone(),
        Mode::Error => ICON_ERROR.clone(),
    }
}

fn load_icon(path: impl AsRef<Path>, recolor: Option<(u8, u8, u8)>) -> tray_icon::Icon {
    let (icon_rgba, icon_width, icon_height) = {
        let mut image = image::open(path)
            .expect("Failed to open icon path")
            .into_rgba8();

        if let Some((r, g, b)) = recolor {
            for pixel in image.pixels_mut() {
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
            }
        }

        let (width, height) = image.dimensions();
        let rgba = image.into_raw();
        (rgba, width, height)
    };
    tray_icon::Icon::from_rgba(icon_rgba, icon_width, icon_height).expect("Failed to open icon")
}
