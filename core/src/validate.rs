//! Structural validation of documents against a compiled [`SchemaTree`].
//!
//! Each body is checked with [`extract_content`] against the permitted
//! shape of its [`SchemaNode`]; the root additionally permits the reserved
//! `__schema` linking attribute. For every accepted block, the first rule in
//! declaration order whose type and label count match is selected, and the
//! block's body is validated against that rule's nested node. A rule without
//! a nested node permits an empty body only.
//!
//! Diagnostics come out depth-first in source order, so repeated runs over
//! the same inputs produce identical output.
//!
//! # Examples
//!
//! ```
//! use hcl_schema_core::{
//!     AttributeRule, BlockRule, Document, SchemaNode, SchemaTree, validate_document,
//! };
//!
//! let tree = SchemaTree::new(
//!     SchemaNode::default()
//!         .with_attribute(AttributeRule::required("name"))
//!         .with_block(BlockRule::new("tag", ["id"]).with_body(
//!             SchemaNode::default().with_attribute(AttributeRule::optional("value")),
//!         )),
//! );
//!
//! let ok = Document::parse("name = \"x\"\ntag \"a\" { value = \"y\" }\n", "ok.hcl").unwrap();
//! assert!(validate_document(&ok, &tree).is_empty());
//!
//! let bad = Document::parse("name = \"x\"\ntag { value = \"y\" }\n", "bad.hcl").unwrap();
//! assert_eq!(validate_document(&bad, &tree).len(), 1);
//! ```

use hcl_edit::structure::{Block, Body};
use tracing::debug;

use crate::content::extract_content;
use crate::diagnostic::Diagnostic;
use crate::document::{Document, block_type};
use crate::types::{SchemaNode, SchemaTree};

static EMPTY_NODE: SchemaNode = SchemaNode {
    attributes: Vec::new(),
    blocks: Vec::new(),
};

/// Validates `doc` against `tree`, returning every structural diagnostic.
pub fn validate_document(doc: &Document, tree: &SchemaTree) -> Vec<Diagnostic> {
    let diagnostics = validate_body(doc, doc.body(), None, tree.root(), true);
    debug!(
        file = doc.filename(),
        diagnostics = diagnostics.len(),
        "validated document"
    );
    diagnostics
}

fn validate_body(
    doc: &Document,
    body: &Body,
    owner: Option<&Block>,
    node: &SchemaNode,
    allow_link: bool,
) -> Vec<Diagnostic> {
    let (content, mut diagnostics) =
        extract_content(doc, body, owner, &node.body_schema(allow_link));

    for block in content.blocks {
        let Some(rule) = node.find_block(block_type(block), block.labels.len()) else {
            continue;
        };
        let nested = rule.nested.as_ref().unwrap_or(&EMPTY_NODE);
        diagnostics.extend(validate_body(doc, &block.body, Some(block), nested, false));
    }

    diagnostics
}
