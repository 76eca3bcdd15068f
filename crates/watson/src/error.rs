use std::{error::Error, fmt::Display};

use crate::{MAX_MODES, MIN_MODES};

#[derive(Debug, PartialEq, Eq)]
pub enum WatsonError {
    /// a force constant with too few or too many mode indices
    IndexCount(usize),

    /// mode indices start at 1, with negative values for mirrored modes, so 0
    /// is never valid
    ZeroIndex,

    ModeOutOfRange { mode: i32, num_modes: usize },

    /// a table filed under body order `expected` holding terms of order `got`
    BodyOrder { expected: usize, got: usize },
}

impl Display for WatsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatsonError::IndexCount(n) => write!(
                f,
                "force constant has {n} mode indices, \
                 expected {MIN_MODES} to {MAX_MODES}"
            ),
            WatsonError::ZeroIndex => {
                write!(f, "mode index 0 in force constant")
            }
            WatsonError::ModeOutOfRange { mode, num_modes } => write!(
                f,
                "mode index {mode} out of range for {num_modes} modes"
            ),
            WatsonError::BodyOrder { expected, got } => write!(
                f,
                "{got}-body terms in the table of {expected}-body terms"
            ),
        }
    }
}

impl Error for WatsonError {}
