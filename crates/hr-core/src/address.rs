use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// How a texel read outside `[0, len)` is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    /// Reuse the nearest edge texel.
    #[default]
    Clamp,
    /// Modulo addressing; `-1` maps to `len - 1`.
    Wrap,
    /// Out-of-range reads return a fixed color.
    Border(Rgba),
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamp => write!(f, "clamp"),
            Self::Wrap => write!(f, "wrap"),
            Self::Border(c) => write!(f, "border({},{},{},{})", c.r, c.g, c.b, c.a),
        }
    }
}

/// Maps a possibly out-of-range index onto `[0, len)`.
///
/// Returns `None` when the read must use the border color, or when `len == 0`.
pub fn map_index(i: isize, len: usize, mode: &AddressMode) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        AddressMode::Border(_) => {
            if i < 0 || i as usize >= len {
                None
            } else {
                Some(i as usize)
            }
        }
        AddressMode::Clamp => {
            if i < 0 {
                Some(0)
            } else {
                Some((i as usize).min(len - 1))
            }
        }
        AddressMode::Wrap => Some(i.rem_euclid(len as isize) as usize),
    }
}
