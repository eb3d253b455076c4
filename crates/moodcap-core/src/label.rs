//! Classification labels returned by the predictor.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The server answered with a label outside the fixed emotion set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label {0:?}")]
pub struct UnknownLabel(pub String);

/// Emotion classification produced by the predictor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Happy,
    Normal,
    Sad,
}

impl Label {
    /// Caption shown to the user for this label.
    pub fn caption(&self) -> &'static str {
        match self {
            Label::Happy => "Happy",
            Label::Normal => "Normal",
            Label::Sad => "Sad",
        }
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Label::Happy),
            "normal" => Ok(Label::Normal),
            "sad" => Ok(Label::Sad),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}
