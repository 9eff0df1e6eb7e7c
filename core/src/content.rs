//! Content extraction: checking one body against a flat [`BodySchema`].
//!
//! This is the single source of structural diagnostics. It reports:
//!
//! - attributes the schema does not permit ("Unsupported argument"),
//! - attributes set more than once in the same body ("Attribute redefined";
//!   the parser already rejects this in source text, so it only fires for
//!   bodies built programmatically),
//! - required attributes that are absent ("Missing required argument"),
//! - block types the schema does not permit ("Unsupported block type"),
//! - blocks whose label count matches no header of their type.
//!
//! Accepted attributes and blocks are returned in source order so callers
//! can descend into them. Rejected items are left out, which keeps
//! recursion away from subtrees that already failed.

use std::collections::HashMap;

use hcl_edit::structure::{Attribute, Block, Body, Structure};

use crate::diagnostic::Diagnostic;
use crate::document::{Document, block_type};
use crate::types::{BlockHeader, BodySchema};

/// Items of a body that passed content extraction.
#[derive(Debug, Default)]
pub struct BodyContent<'a> {
    /// Accepted attributes, in source order.
    pub attributes: Vec<&'a Attribute>,
    /// Accepted blocks, in source order.
    pub blocks: Vec<&'a Block>,
}

impl<'a> BodyContent<'a> {
    /// Returns the accepted attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.attributes
            .iter()
            .copied()
            .find(|attr| attr.key.value().as_str() == name)
    }

    /// Returns accepted blocks of type `type_name`, in source order.
    pub fn blocks_of_type<'s>(
        &'s self,
        type_name: &'s str,
    ) -> impl Iterator<Item = &'a Block> + 's {
        self.blocks
            .iter()
            .copied()
            .filter(move |block| block_type(block) == type_name)
    }
}

/// Checks `body` against `schema`.
///
/// `owner` is the block whose body is being checked (`None` for the document
/// root); it anchors "missing required argument" diagnostics.
pub fn extract_content<'a>(
    doc: &Document,
    body: &'a Body,
    owner: Option<&Block>,
    schema: &BodySchema,
) -> (BodyContent<'a>, Vec<Diagnostic>) {
    let mut content = BodyContent::default();
    let mut diagnostics = Vec::new();
    let mut seen: HashMap<&str, &Attribute> = HashMap::new();

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                let name = attr.key.value().as_str();
                if let Some(previous) = seen.get(name) {
                    let location = doc
                        .attribute_name_range(previous)
                        .map_or_else(|| doc.filename().to_string(), |range| range.to_string());
                    diagnostics.push(
                        Diagnostic::error("Attribute redefined")
                            .with_detail(format!(
                                "The argument \"{name}\" was already set at {location}. \
                                 Each argument may be set only once."
                            ))
                            .with_subject(doc.attribute_name_range(attr)),
                    );
                    continue;
                }
                seen.insert(name, attr);

                if schema.attribute(name).is_none() {
                    let mut detail = format!("An argument named \"{name}\" is not expected here.");
                    if schema.has_block_type(name) {
                        detail.push_str(&format!(
                            " Did you mean to define a block of type \"{name}\"?"
                        ));
                    }
                    diagnostics.push(
                        Diagnostic::error("Unsupported argument")
                            .with_detail(detail)
                            .with_subject(doc.attribute_name_range(attr)),
                    );
                    continue;
                }
                content.attributes.push(attr);
            }
            Structure::Block(block) => {
                let type_name = block_type(block);
                let candidates: Vec<&BlockHeader> = schema
                    .blocks
                    .iter()
                    .filter(|header| header.type_name == type_name)
                    .collect();

                let Some(first) = candidates.first() else {
                    let mut detail =
                        format!("Blocks of type \"{type_name}\" are not expected here.");
                    if schema.attribute(type_name).is_some() {
                        detail.push_str(&format!(
                            " Did you mean to define argument \"{type_name}\"? \
                             If so, use the equals sign to assign it a value."
                        ));
                    }
                    diagnostics.push(
                        Diagnostic::error("Unsupported block type")
                            .with_detail(detail)
                            .with_subject(doc.block_type_range(block)),
                    );
                    continue;
                };

                let label_count = block.labels.len();
                if candidates
                    .iter()
                    .any(|header| header.label_names.len() == label_count)
                {
                    content.blocks.push(block);
                } else {
                    diagnostics.push(label_mismatch(doc, block, first));
                }
            }
        }
    }

    for rule in schema.attributes.iter().filter(|rule| rule.required) {
        if !seen.contains_key(rule.name.as_str()) {
            diagnostics.push(
                Diagnostic::error("Missing required argument")
                    .with_detail(format!(
                        "The argument \"{}\" is required, but no definition was found.",
                        rule.name
                    ))
                    .with_subject(doc.missing_item_range(owner)),
            );
        }
    }

    (content, diagnostics)
}

fn label_mismatch(doc: &Document, block: &Block, header: &BlockHeader) -> Diagnostic {
    let type_name = &header.type_name;
    let expected = header.label_names.len();

    if let Some(extra) = block.labels.get(expected) {
        return Diagnostic::error(format!("Extraneous label for {type_name}"))
            .with_detail(format!("No more labels are expected for {type_name} blocks."))
            .with_subject(doc.label_range(extra));
    }

    let missing = header
        .label_names
        .get(block.labels.len())
        .map_or("label", String::as_str);
    let noun = if expected == 1 { "label" } else { "labels" };
    Diagnostic::error(format!("Missing {missing} for {type_name}"))
        .with_detail(format!(
            "All {type_name} blocks must have {expected} {noun} ({}).",
            header.label_names.join(", ")
        ))
        .with_subject(doc.block_type_range(block))
}
