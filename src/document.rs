use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ParseError;

/// Output spacing for [`serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeMode {
    /// Two-space indentation, one member per line.
    Pretty,
    /// No whitespace.
    Compact,
}

/// Parses strict JSON text into a value tree.
///
/// Object member order is preserved, so `parse(serialize(v)) == v` holds for
/// both serialization modes with the original member order intact. No
/// extensions are accepted: comments and trailing commas are parse errors.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|err| ParseError::from_serde(&err))
}

/// Serializes a value tree back to text.
pub fn serialize(value: &Value, mode: SerializeMode) -> String {
    let result = match mode {
        SerializeMode::Pretty => serde_json::to_string_pretty(value),
        SerializeMode::Compact => serde_json::to_string(value),
    };
    result.unwrap_or_else(|_| String::from("null"))
}

/// The shared in-memory document behind all three views.
///
/// Holds the raw text and the last-known-good parsed value. Validity is
/// recomputed on every text change; an invalidating edit keeps the previous
/// parsed value available so projections built from it stay usable while the
/// host shows its guidance placeholder.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    parsed: Option<Value>,
    error: Option<ParseError>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let mut doc = Self::default();
        doc.set_text(text);
        doc
    }

    /// Replaces the text and re-parses. Returns whether the new text is
    /// valid JSON.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        match parse(&self.text) {
            Ok(value) => {
                debug!(bytes = self.text.len(), "document parsed");
                self.parsed = Some(value);
                self.error = None;
                true
            }
            Err(err) => {
                warn!(error = %err, "document failed to parse");
                self.error = Some(err);
                false
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successfully parsed value, if any edit has ever parsed.
    pub fn value(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> &str {
        self.error.as_ref().map(|e| e.message.as_str()).unwrap_or("")
    }

    /// Rewrites the text in pretty form. No-op on invalid documents.
    pub fn beautify(&mut self) -> bool {
        self.reserialize(SerializeMode::Pretty)
    }

    /// Rewrites the text in compact form. No-op on invalid documents.
    pub fn minify(&mut self) -> bool {
        self.reserialize(SerializeMode::Compact)
    }

    fn reserialize(&mut self, mode: SerializeMode) -> bool {
        if !self.is_valid() {
            return false;
        }
        let Some(value) = self.parsed.as_ref() else {
            return false;
        };
        let text = serialize(value, mode);
        self.set_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_preserves_structure_and_order() {
        let text = "{\"zeta\":1,\"alpha\":{\"b\":[1,2,3],\"a\":null},\"mid\":true}";
        let value = parse(text).expect("valid");

        let pretty = serialize(&value, SerializeMode::Pretty);
        let compact = serialize(&value, SerializeMode::Compact);
        assert_eq!(parse(&pretty).expect("pretty round-trip"), value);
        assert_eq!(parse(&compact).expect("compact round-trip"), value);

        // Member order survives serialization, not just structural equality.
        assert_eq!(compact, text);
        let zeta = pretty.find("zeta").expect("zeta present");
        let alpha = pretty.find("alpha").expect("alpha present");
        assert!(zeta < alpha);
    }

    #[test]
    fn pretty_uses_two_space_indent() {
        let value = json!({"a": 1});
        assert_eq!(serialize(&value, SerializeMode::Pretty), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn strict_json_only() {
        assert!(parse("{\"a\": 1,}").is_err());
        assert!(parse("// comment\n{}").is_err());
        assert!(parse("{'a': 1}").is_err());
    }

    #[test]
    fn invalid_edit_keeps_last_good_value() {
        let mut doc = Document::new("{\"a\": 1}");
        assert!(doc.is_valid());
        let before = doc.value().cloned();

        assert!(!doc.set_text("{\"a\": "));
        assert!(!doc.is_valid());
        assert!(!doc.error_message().is_empty());
        assert_eq!(doc.value().cloned(), before);

        assert!(doc.set_text("{\"b\": 2}"));
        assert!(doc.is_valid());
        assert_eq!(doc.error_message(), "");
        assert_eq!(doc.value(), Some(&json!({"b": 2})));
    }

    #[test]
    fn beautify_and_minify_rewrite_text() {
        let mut doc = Document::new("{\"a\":[1,2]}");
        assert!(doc.beautify());
        assert_eq!(doc.text(), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
        assert!(doc.minify());
        assert_eq!(doc.text(), "{\"a\":[1,2]}");
    }

    #[test]
    fn beautify_is_noop_while_invalid() {
        let mut doc = Document::new("nope");
        assert!(!doc.is_valid());
        let before = doc.text().to_string();
        assert!(!doc.beautify());
        assert_eq!(doc.text(), before);
    }
}
