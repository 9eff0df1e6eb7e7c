//! Meta-schema compilation.
//!
//! [`compile_schema`] interprets a parsed meta-schema document (see
//! [`crate::meta`] for its grammar) and builds a [`SchemaTree`]. The walk is
//! depth-first:
//!
//! - `attribute "<name>"` becomes an [`AttributeRule`]; its optional
//!   `required` setting must evaluate to a bool (anything else means `false`).
//! - `block_header "<type>"` becomes a [`BlockRule`]; `label_names` fixes the
//!   label arity (non-string elements are skipped) and a nested `body`
//!   compiles into the rule's child node.
//! - `body` is hoisted into the enclosing level.
//!
//! A structural error in a body stops compilation of that body's subtree,
//! but siblings are still compiled so one pass reports as much as possible.
//! Evaluation failures fall back to defaults and are reported as errors. A
//! tree is returned only if no error was reported.

use hcl::Value;
use hcl_edit::Span;
use hcl_edit::structure::{Attribute, Block, Body};
use tracing::debug;

use crate::content::extract_content;
use crate::diagnostic::{Diagnostic, DiagnosticsExt, SourceRange};
use crate::document::{Document, block_labels, block_type};
use crate::eval::{evaluate_attribute, string_value};
use crate::meta::{
    self, ATTRIBUTE_BLOCK, BLOCK_HEADER_BLOCK, BODY_BLOCK, LABEL_NAMES_SETTING, REQUIRED_SETTING,
};
use crate::types::{
    AttributeRule, BlockRule, BodySchema, ID_ATTRIBUTE, LINK_ATTRIBUTE, SchemaNode, SchemaTree,
};

/// Compiles a meta-schema document into a [`SchemaTree`].
///
/// Returns `None` for the tree when any error diagnostic was produced.
///
/// # Examples
///
/// ```
/// use hcl_schema_core::{Document, compile_schema};
///
/// let schema = Document::parse(r#"
/// __schema = "draft"
/// __id     = "example"
/// body {
///   attribute "name" { required = true }
///   block_header "tag" {
///     label_names = ["id"]
///     body {
///       attribute "value" {}
///     }
///   }
/// }
/// "#, "example.schema.hcl").unwrap();
///
/// let (tree, diags) = compile_schema(&schema);
/// assert!(diags.is_empty());
/// let tree = tree.unwrap();
/// assert!(tree.root().find_attribute("name").unwrap().required);
/// assert!(tree.root().find_block("tag", 1).unwrap().nested.is_some());
/// ```
pub fn compile_schema(doc: &Document) -> (Option<SchemaTree>, Vec<Diagnostic>) {
    let mut compiler = Compiler {
        doc,
        diagnostics: Vec::new(),
    };
    let tree = compiler.compile_root();
    let diagnostics = compiler.diagnostics;

    if diagnostics.has_errors() {
        debug!(
            file = doc.filename(),
            errors = diagnostics.error_count(),
            "schema compilation failed"
        );
        return (None, diagnostics);
    }
    (tree, diagnostics)
}

/// Attribute rules collected for one level before duplicate checking. Source
/// ranges are kept so duplicates can be reported at the declaration.
#[derive(Default)]
struct PendingNode {
    attributes: Vec<(AttributeRule, Option<SourceRange>)>,
    blocks: Vec<BlockRule>,
}

impl PendingNode {
    fn absorb(&mut self, other: PendingNode) {
        self.attributes.extend(other.attributes);
        self.blocks.extend(other.blocks);
    }
}

struct Compiler<'d> {
    doc: &'d Document,
    diagnostics: Vec<Diagnostic>,
}

impl<'d> Compiler<'d> {
    fn compile_root(&mut self) -> Option<SchemaTree> {
        let doc = self.doc;
        let pending = self.compile_body(doc.body(), None, &meta::root_schema())?;
        let root = self.finish(pending);

        debug!(
            file = doc.filename(),
            attributes = root.attributes.len(),
            blocks = root.blocks.len(),
            "compiled schema root"
        );

        let id = doc.root_attribute(ID_ATTRIBUTE).and_then(string_value);
        let meta_schema = doc.root_attribute(LINK_ATTRIBUTE).and_then(string_value);
        Some(SchemaTree::new(root).with_metadata(id, meta_schema))
    }

    fn compile_body(
        &mut self,
        body: &'d Body,
        owner: Option<&'d Block>,
        shape: &BodySchema,
    ) -> Option<PendingNode> {
        let (content, diags) = extract_content(self.doc, body, owner, shape);
        let failed = diags.has_errors();
        self.diagnostics.extend(diags);
        if failed {
            return None;
        }

        let mut pending = PendingNode::default();
        for block in content.blocks {
            match block_type(block) {
                ATTRIBUTE_BLOCK => {
                    let rule = self.compile_attribute(block);
                    pending.attributes.push(rule);
                }
                BLOCK_HEADER_BLOCK => {
                    let rule = self.compile_block_header(block);
                    pending.blocks.push(rule);
                }
                BODY_BLOCK => {
                    if let Some(inner) =
                        self.compile_body(&block.body, Some(block), &meta::body_schema())
                    {
                        pending.absorb(inner);
                    }
                }
                _ => {}
            }
        }
        Some(pending)
    }

    fn compile_attribute(&mut self, block: &'d Block) -> (AttributeRule, Option<SourceRange>) {
        let name = first_label(block);
        let (content, diags) =
            extract_content(self.doc, &block.body, Some(block), &meta::attribute_schema());
        self.diagnostics.extend(diags);

        let mut required = false;
        if let Some(attr) = content.attribute(REQUIRED_SETTING) {
            match evaluate_attribute(attr) {
                Ok(Value::Bool(value)) => required = value,
                Ok(_) => {}
                Err(err) => self.evaluation_failed(attr, REQUIRED_SETTING, err),
            }
        }

        let range = self.doc.block_type_range(block);
        (AttributeRule { name, required }, range)
    }

    fn compile_block_header(&mut self, block: &'d Block) -> BlockRule {
        let type_name = first_label(block);
        let (content, diags) =
            extract_content(self.doc, &block.body, Some(block), &meta::block_header_schema());
        self.diagnostics.extend(diags);

        let mut label_names = Vec::new();
        if let Some(attr) = content.attribute(LABEL_NAMES_SETTING) {
            match evaluate_attribute(attr) {
                Ok(Value::Array(items)) => label_names = string_items(items),
                Ok(Value::Object(map)) => label_names = string_items(map.into_values()),
                Ok(_) => {}
                Err(err) => self.evaluation_failed(attr, LABEL_NAMES_SETTING, err),
            }
        }

        let mut bodies = content.blocks_of_type(BODY_BLOCK);
        let nested = bodies
            .next()
            .and_then(|inner| self.compile_body(&inner.body, Some(inner), &meta::body_schema()))
            .map(|pending| self.finish(pending));
        for extra in bodies {
            self.diagnostics.push(
                Diagnostic::error("Duplicate body definition")
                    .with_detail(format!(
                        "Block header \"{type_name}\" already has a body; \
                         only the first one is used."
                    ))
                    .with_subject(self.doc.block_type_range(extra)),
            );
        }

        BlockRule {
            type_name,
            label_names,
            nested,
        }
    }

    /// Turns collected rules into a node, reporting attribute names declared
    /// more than once at the same level.
    fn finish(&mut self, pending: PendingNode) -> SchemaNode {
        let mut node = SchemaNode {
            attributes: Vec::with_capacity(pending.attributes.len()),
            blocks: pending.blocks,
        };
        for (rule, range) in pending.attributes {
            if node.find_attribute(&rule.name).is_some() {
                self.diagnostics.push(
                    Diagnostic::error("Duplicate attribute definition")
                        .with_detail(format!(
                            "Attribute \"{}\" is already declared at this level of the schema.",
                            rule.name
                        ))
                        .with_subject(range),
                );
                continue;
            }
            node.attributes.push(rule);
        }
        node
    }

    fn evaluation_failed(&mut self, attr: &Attribute, setting: &str, err: String) {
        self.diagnostics.push(
            Diagnostic::error(format!("Failed to evaluate '{setting}'"))
                .with_detail(err)
                .with_subject(self.doc.range(attr.span())),
        );
    }
}

fn first_label(block: &Block) -> String {
    block_labels(block)
        .first()
        .map_or_else(String::new, |label| (*label).to_string())
}

/// Keeps the string elements of a list, tuple or object, in order.
fn string_items(items: impl IntoIterator<Item = Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name),
            _ => None,
        })
        .collect()
}
