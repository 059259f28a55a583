//! Error type shared by every fallible boundary of the compositor.

use crate::render::NodeId;

/// Errors raised at the boundaries of the rendering core.
///
/// These are contract errors: malformed input is rejected as soon as it
/// reaches the core and is never coerced into something renderable.
/// Missing data (an unknown child id, a node without layout) is not an
/// error and never produces one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A buffer was requested whose cell count cannot be allocated.
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in columns.
        width: usize,
        /// Requested height in rows.
        height: usize,
    },

    /// A size, gap or flex weight was negative, NaN or infinite.
    #[error("invalid {what}: {value}")]
    InvalidSize {
        /// Which quantity was rejected.
        what: &'static str,
        /// The offending value.
        value: f32,
    },

    /// A border style name outside the fixed charset table.
    #[error("unknown border style '{0}'")]
    UnknownBorderStyle(String),

    /// A color string that is not a known name, hex, `rgb()` or `ansi256()`.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// A keyword style property received a value it does not understand.
    #[error("unknown value '{value}' for {property}")]
    UnknownValue {
        /// Style property name.
        property: &'static str,
        /// The rejected keyword.
        value: String,
    },

    /// The root id passed to the renderer is not in the registry.
    #[error("root node {0:?} is not in the registry")]
    MissingRoot(NodeId),

    /// Writing to the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject negative, NaN and infinite values for a named quantity.
pub(crate) fn check_size(what: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidSize { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size_accepts_zero_and_positive() {
        assert_eq!(check_size("width", 0.0).unwrap(), 0.0);
        assert_eq!(check_size("width", 12.5).unwrap(), 12.5);
    }

    #[test]
    fn test_check_size_rejects_negative_and_nan() {
        assert!(matches!(
            check_size("gap", -1.0),
            Err(Error::InvalidSize { what: "gap", .. })
        ));
        assert!(check_size("gap", f32::NAN).is_err());
        assert!(check_size("gap", f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::UnknownBorderStyle("wavy".into());
        assert_eq!(err.to_string(), "unknown border style 'wavy'");
    }
}
