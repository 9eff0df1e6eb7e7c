//! Parsed HCL documents with source-position mapping.
//!
//! [`Document`] wraps an [`hcl_edit`] syntax tree together with the source
//! text it came from, so that byte spans recorded by the parser can be turned
//! into the 1-indexed [`SourceRange`]s carried by diagnostics.

use std::fs;
use std::ops::Range;
use std::path::Path;

use hcl_edit::Span;
use hcl_edit::structure::{Attribute, Block, BlockLabel, Body, Structure};

use crate::diagnostic::{Diagnostic, Position, SourceRange};

/// A parsed HCL document.
///
/// # Examples
///
/// ```
/// use hcl_schema_core::Document;
///
/// let doc = Document::parse("name = \"x\"\n", "main.hcl").unwrap();
/// assert_eq!(doc.filename(), "main.hcl");
/// assert!(doc.root_attribute("name").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    filename: String,
    source: String,
    body: Body,
    line_starts: Vec<usize>,
}

impl Document {
    /// Parses `source` as an HCL body, recording `filename` for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an "Invalid HCL syntax" error diagnostic pointing at the
    /// location reported by the parser.
    pub fn parse(
        source: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self, Diagnostic> {
        let source = source.into();
        let filename = filename.into();

        let body = match hcl_edit::parser::parse_body(&source) {
            Ok(body) => body,
            Err(err) => {
                let location = err.location();
                let position = Position::new(location.line(), location.column());
                return Err(Diagnostic::error("Invalid HCL syntax")
                    .with_detail(err.message().to_string())
                    .with_subject(Some(SourceRange::point(filename, position))));
            }
        };

        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        Ok(Self {
            filename,
            source,
            body,
            line_starts,
        })
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a "Failed to read file" diagnostic if the file cannot be read,
    /// or the parse diagnostic described in [`Document::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Diagnostic> {
        let path = path.as_ref();
        let filename = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|err| {
            Diagnostic::error("Failed to read file")
                .with_detail(format!("{filename}: {err}"))
        })?;
        Self::parse(source, filename)
    }

    /// Name recorded for this document in diagnostics.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root body of the document.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the root-level attribute called `name`, if present.
    pub fn root_attribute(&self, name: &str) -> Option<&Attribute> {
        self.body.iter().find_map(|structure| match structure {
            Structure::Attribute(attr) if attr.key.value().as_str() == name => Some(attr),
            _ => None,
        })
    }

    /// Converts a byte offset into a 1-indexed position.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        Position::new(line + 1, column + 1)
    }

    /// Converts a parser span into a source range in this document.
    pub fn range(&self, span: Option<Range<usize>>) -> Option<SourceRange> {
        let span = span?;
        Some(SourceRange {
            filename: self.filename.clone(),
            start: self.position(span.start),
            end: self.position(span.end),
        })
    }

    /// Range of an attribute's name.
    pub fn attribute_name_range(&self, attr: &Attribute) -> Option<SourceRange> {
        self.range(attr.key.span().or_else(|| attr.span()))
    }

    /// Range of a block's type identifier.
    pub fn block_type_range(&self, block: &Block) -> Option<SourceRange> {
        self.range(block.ident.span().or_else(|| block.span()))
    }

    /// Range of a single block label.
    pub fn label_range(&self, label: &BlockLabel) -> Option<SourceRange> {
        self.range(match label {
            BlockLabel::Ident(ident) => ident.span(),
            BlockLabel::String(string) => string.span(),
        })
    }

    /// Where "missing item" diagnostics for a body are reported: the header
    /// of the owning block, or the start of the file for the root body.
    pub fn missing_item_range(&self, owner: Option<&Block>) -> Option<SourceRange> {
        match owner {
            Some(block) => self.block_type_range(block),
            None => Some(SourceRange::point(
                self.filename.clone(),
                Position::new(1, 1),
            )),
        }
    }
}

/// Returns the text of each label on `block`, in order.
pub fn block_labels(block: &Block) -> Vec<&str> {
    block
        .labels
        .iter()
        .map(|label| match label {
            BlockLabel::Ident(ident) => ident.value().as_str(),
            BlockLabel::String(string) => string.value().as_str(),
        })
        .collect()
}

/// Returns the type identifier of `block`.
pub fn block_type(block: &Block) -> &str {
    block.ident.value().as_str()
}
