use thiserror::Error;

/// A JSON parse failure.
///
/// Carries the underlying parser's message verbatim plus the line/column the
/// failure was reported at, where the parser could derive one (1-based, as
/// reported). Parse failures are recoverable: the document enters an invalid
/// state and the last-known-good value stays available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    pub(crate) fn from_serde(err: &serde_json::Error) -> Self {
        let (line, column) = if err.line() == 0 {
            (None, None)
        } else {
            (Some(err.line()), Some(err.column()))
        };
        Self {
            message: err.to_string(),
            line,
            column,
        }
    }
}

/// Failures surfaced to the host.
///
/// Every variant is recoverable: the current document is never corrupted by
/// a failing operation. Fold analysis has no variant here because the
/// analyzer degrades to fewer regions instead of failing.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("export failed: {0}")]
    Export(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": oops\n}")
            .expect_err("input is invalid");
        let parse = ParseError::from_serde(&err);
        assert_eq!(parse.line, Some(2));
        assert!(parse.column.is_some());
        assert!(!parse.message.is_empty());
    }

    #[test]
    fn viewer_error_messages() {
        let fetch = ViewerError::Fetch("connection refused".into());
        assert_eq!(fetch.to_string(), "fetch failed: connection refused");
        let export = ViewerError::Export("bad row".into());
        assert_eq!(export.to_string(), "export failed: bad row");
    }
}
