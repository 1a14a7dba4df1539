//! Errors raised while reading, parsing or expanding a stylesheet.

use std::path::PathBuf;

use cssparser::SourceLocation;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a transform.
///
/// Malformed `light-dark()` calls are not errors: they are left in place and
/// counted in [`crate::TransformStats::malformed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stylesheet text is not valid CSS. Lines and columns are 1-based.
    #[error("{line}:{column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// A selector list could not be split or rewritten.
    #[error("Cannot rewrite selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// The configured theme attribute is not a CSS identifier.
    #[error("Theme attribute '{0}' is not a CSS identifier")]
    InvalidThemeAttribute(String),

    /// A stylesheet or watched path could not be read.
    #[error("Cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file watcher could not be started or extended.
    #[cfg(feature = "hot-reload")]
    #[error("File watcher: {0}")]
    HotReload(#[from] notify::Error),
}

impl Error {
    /// Build a parse error from a cssparser location (0-based lines).
    pub(crate) fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Parse {
            message: message.into(),
            line: location.line + 1,
            column: location.column,
        }
    }

    pub(crate) fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `(line, column)` of a parse error.
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            Self::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_are_one_based() {
        let err = Error::syntax("Unexpected token", SourceLocation { line: 0, column: 5 });

        assert_eq!(err.location(), Some((1, 5)));
        assert_eq!(err.to_string(), "1:5: Unexpected token");
    }

    #[test]
    fn other_errors_have_no_location() {
        let err = Error::InvalidThemeAttribute("data theme".into());
        assert_eq!(err.location(), None);
        assert!(err.to_string().contains("data theme"));
    }
}
