//! Error types for glyphart core

use thiserror::Error;

/// Result type for glyphart core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Character outside the printable range or missing from the banner
    #[error("unsupported character: code {0}")]
    UnsupportedChar(u32),

    /// Target width cannot hold the rendered line
    #[error("width too small for alignment: need {required} columns, have {width}")]
    WidthTooSmall { width: usize, required: usize },

    /// Glyph or glyph table construction failed
    #[error("invalid glyph: {0}")]
    InvalidGlyph(String),

    /// Malformed banner file
    #[error("banner error: {0}")]
    Banner(String),

    /// No banner registered under the requested name
    #[error("unknown banner: {0}")]
    UnknownBanner(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::UnsupportedChar(233).to_string(),
            "unsupported character: code 233"
        );
        let err = CoreError::WidthTooSmall {
            width: 10,
            required: 24,
        };
        assert_eq!(
            err.to_string(),
            "width too small for alignment: need 24 columns, have 10"
        );
    }
}
