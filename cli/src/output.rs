//! JSON rendering of diagnostics.

use std::io::Write;
use std::path::Path;

use hcl_schema_core::Diagnostic;
use serde::Serialize;

/// One diagnostic as emitted on stdout. Lines and columns are zero-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutDiagnostic {
    pub file: String,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub severity: String,
    pub message: String,
}

impl OutDiagnostic {
    /// Converts a diagnostic, using `fallback_file` when it has no subject
    /// (or the subject names no file).
    pub fn from_diagnostic(diag: &Diagnostic, fallback_file: &str) -> Self {
        let (file, start_line, start_col, end_line, end_col) = match &diag.subject {
            Some(range) => (
                if range.filename.is_empty() {
                    fallback_file.to_string()
                } else {
                    range.filename.clone()
                },
                range.start.line.saturating_sub(1),
                range.start.column.saturating_sub(1),
                range.end.line.saturating_sub(1),
                range.end.column.saturating_sub(1),
            ),
            None => (fallback_file.to_string(), 0, 0, 0, 0),
        };

        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
            severity: diag.severity.as_str().to_string(),
            message: diag.message(),
        }
    }
}

/// Absolute form of `path` for diagnostics without a subject file.
pub fn fallback_file(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Writes `diags` as a pretty-printed JSON array followed by a newline.
pub fn write_json<W: Write>(
    mut writer: W,
    diags: &[Diagnostic],
    fallback: &str,
) -> Result<(), String> {
    let out: Vec<OutDiagnostic> = diags
        .iter()
        .map(|diag| OutDiagnostic::from_diagnostic(diag, fallback))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &out)
        .map_err(|err| format!("failed to emit json: {err}"))?;
    writeln!(writer).map_err(|err| format!("failed to emit json: {err}"))?;
    writer
        .flush()
        .map_err(|err| format!("failed to emit json: {err}"))
}

#[cfg(test)]
mod tests {
    use hcl_schema_core::{Position, SourceRange};

    use super::*;

    #[test]
    fn test_positions_become_zero_indexed() {
        let diag = Diagnostic::error("Unsupported argument")
            .with_detail("An argument named \"y\" is not expected here.")
            .with_subject(Some(SourceRange {
                filename: "app.hcl".to_string(),
                start: Position::new(3, 5),
                end: Position::new(3, 6),
            }));

        let out = OutDiagnostic::from_diagnostic(&diag, "/abs/app.hcl");
        assert_eq!(out.file, "app.hcl");
        assert_eq!((out.start_line, out.start_col), (2, 4));
        assert_eq!((out.end_line, out.end_col), (2, 5));
        assert_eq!(out.severity, "error");
        assert_eq!(
            out.message,
            "Unsupported argument: An argument named \"y\" is not expected here."
        );
    }

    #[test]
    fn test_missing_subject_uses_fallback_file() {
        let diag = Diagnostic::error("insecure schema URL");
        let out = OutDiagnostic::from_diagnostic(&diag, "/abs/app.hcl");
        assert_eq!(out.file, "/abs/app.hcl");
        assert_eq!(out.start_line, 0);
        assert_eq!(out.end_col, 0);
        assert_eq!(out.message, "insecure schema URL");
    }

    #[test]
    fn test_json_field_names() {
        let diag = Diagnostic::warning("note");
        let mut buf = Vec::new();
        write_json(&mut buf, &[diag], "/abs/app.hcl").unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let entry = &value[0];
        for key in ["file", "startLine", "startCol", "endLine", "endCol", "severity", "message"] {
            assert!(entry.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(entry["severity"], "warning");
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[], "/abs/app.hcl").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }

    #[test]
    fn test_fallback_file_is_absolute() {
        assert!(Path::new(&fallback_file(Path::new("app.hcl"))).is_absolute());
    }
}
