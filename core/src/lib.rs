//! Meta-schema compiler and structural validator for HCL documents.
//!
//! A meta-schema is itself an HCL document (conventionally `*.schema.hcl`)
//! describing, level by level, which attributes and labeled blocks a
//! document may contain. This crate provides:
//!
//! - [`Document`]: a parsed HCL document with source-position mapping.
//! - [`compile_schema`]: turns a meta-schema document into a [`SchemaTree`]
//!   of [`SchemaNode`]s.
//! - [`validate_document`]: checks a document against a [`SchemaTree`],
//!   reporting unexpected or missing attributes, unexpected blocks and label
//!   count mismatches as [`Diagnostic`]s.
//! - [`detect_schema_link`]: finds the schema a document names through its
//!   reserved `__schema` attribute.
//!
//! Locating schema files and fetching remote schemas lives in the
//! `hcl-schema-resolve` crate.
//!
//! # Example
//!
//! ```
//! use hcl_schema_core::*;
//!
//! let schema = Document::parse(r#"
//! __schema = "draft"
//! __id     = "example"
//! body {
//!   attribute "name" { required = true }
//!   block_header "tag" {
//!     label_names = ["id"]
//!     body {
//!       attribute "value" {}
//!     }
//!   }
//! }
//! "#, "example.schema.hcl").unwrap();
//! let (tree, diags) = compile_schema(&schema);
//! assert!(!diags.has_errors());
//! let tree = tree.unwrap();
//!
//! let doc = Document::parse("name = \"x\"\ntag \"a\" { value = \"y\" }\n", "ok.hcl").unwrap();
//! assert!(validate_document(&doc, &tree).is_empty());
//!
//! let doc = Document::parse("name = \"x\"\ntag { value = \"y\" }\n", "bad.hcl").unwrap();
//! let diags = validate_document(&doc, &tree);
//! assert_eq!(diags[0].summary, "Missing id for tag");
//! ```

mod compile;
mod content;
mod detect;
mod diagnostic;
mod document;
mod eval;
pub mod meta;
mod types;
mod validate;

pub use compile::compile_schema;
pub use content::{BodyContent, extract_content};
pub use detect::{detect_link_text, detect_schema_link};
pub use diagnostic::{Diagnostic, DiagnosticsExt, Position, Severity, SourceRange};
pub use document::{Document, block_labels, block_type};
pub use eval::{evaluate_attribute, string_value};
pub use types::*;
pub use validate::validate_document;
