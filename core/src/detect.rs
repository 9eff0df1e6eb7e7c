//! Discovery of the schema a document links to via `__schema`.
//!
//! Detection starts with a plain textual scan so it works on documents that
//! cannot be parsed or validated yet. The scan does not know whether a match
//! sits in a meaningful position: a string containing `__schema`, or an
//! attribute such as `__schema_version`, can fool it. When a parsed document
//! is available, [`detect_schema_link`] therefore confirms the hit by reading
//! the root-level attribute itself.

use tracing::debug;

use crate::document::Document;
use crate::eval::string_value;
use crate::types::LINK_ATTRIBUTE;

/// Scans raw text for `__schema = "<reference>"` and returns the reference.
///
/// Finds the first occurrence of `__schema`, then the next `=`, skips
/// whitespace, and reads a `"` or `'` quoted string up to the matching
/// closing quote (escape sequences are not interpreted).
///
/// # Examples
///
/// ```
/// use hcl_schema_core::detect_link_text;
///
/// let text = "__schema = \"relative/path.schema.hcl\"\nname = \"x\"\n";
/// assert_eq!(detect_link_text(text).as_deref(), Some("relative/path.schema.hcl"));
/// assert_eq!(detect_link_text("name = \"x\"\n"), None);
/// ```
pub fn detect_link_text(text: &str) -> Option<String> {
    let start = text.find(LINK_ATTRIBUTE)?;
    let after_name = &text[start..];
    let equals = after_name.find('=')?;
    let rest = after_name[equals + 1..]
        .trim_start_matches([' ', '\t', '\n', '\r']);

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let quoted = &rest[quote.len_utf8()..];
    let end = quoted.find(quote)?;
    Some(quoted[..end].to_string())
}

/// Detects the schema reference of a document.
///
/// Text without `__schema` anywhere has no link. Otherwise, with a parsed
/// `doc`, the result is the evaluated string value of the root `__schema`
/// attribute (no link if that attribute is absent or not a string). Without
/// one, the textual scan result is returned.
pub fn detect_schema_link(text: &str, doc: Option<&Document>) -> Option<String> {
    if !text.contains(LINK_ATTRIBUTE) {
        return None;
    }
    let Some(doc) = doc else {
        return detect_link_text(text);
    };

    let confirmed = doc.root_attribute(LINK_ATTRIBUTE).and_then(string_value);
    let textual = detect_link_text(text);
    if confirmed != textual {
        debug!(
            file = doc.filename(),
            textual = ?textual,
            confirmed = ?confirmed,
            "textual schema link disagrees with parsed document"
        );
    }
    confirmed
}
