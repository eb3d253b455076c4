//! App-specific configuration extensions.
//!
//! This module provides hotkey support on top of the core Config.

use std::sync::Arc;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use parking_lot::RwLock;
use tracing::warn;

use crate::Config;

/// Default hotkey: Meta+Shift+M
pub fn default_hotkey() -> HotKey {
    HotKey::new(Some(Modifiers::META | Modifiers::SHIFT), Code::KeyM)
}

/// Extension trait for Config to handle hotkeys.
pub trait ConfigExt {
    /// Get the hotkey, parsing from config or using default.
    fn hotkey(&self) -> HotKey;
}

impl ConfigExt for Config {
    fn hotkey(&self) -> HotKey {
        match &self.hotkey {
            Some(spec) => match spec.parse::<HotKey>() {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    warn!(spec = %spec, error = %e, "could not parse hotkey, using default");
                    default_hotkey()
                }
            },
            None => default_hotkey(),
        }
    }
}

impl ConfigExt for Arc<RwLock<Config>> {
    fn hotkey(&self) -> HotKey {
        self.read().hotkey()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_hotkey_uses_default() {
        let config = Config::default();
        assert_eq!(config.hotkey(), default_hotkey());
    }

    #[test]
    fn parses_configured_hotkey() {
        let config = Config {
            hotkey: Some("alt+KeyP".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.hotkey(),
            HotKey::new(Some(Modifiers::ALT), Code::KeyP)
        );
    }

    #[test]
    fn garbage_hotkey_falls_back_to_default() {
        let config = Config {
            hotkey: Some("not a hotkey".to_string()),
            ..Default::default()
        };
        assert_eq!(config.hotkey(), default_hotkey());
    }
}
