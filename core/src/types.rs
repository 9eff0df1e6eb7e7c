//! Compiled schema representation.
//!
//! A meta-schema document compiles into a [`SchemaTree`]: a strictly owned
//! tree of [`SchemaNode`]s. Each node describes the permitted shape of one
//! body (the document root or the body of a block), and each [`BlockRule`]
//! owns at most one child node describing the bodies of matching blocks.

use serde::{Deserialize, Serialize};

/// Reserved root attribute a document uses to name its governing schema.
pub const LINK_ATTRIBUTE: &str = "__schema";

/// Reserved root attribute identifying a meta-schema.
pub const ID_ATTRIBUTE: &str = "__id";

/// File extension of meta-schema documents.
pub const SCHEMA_EXTENSION: &str = ".schema.hcl";

/// A permitted attribute at one body level.
///
/// # Examples
///
/// ```
/// use hcl_schema_core::AttributeRule;
///
/// let rule = AttributeRule::required("name");
/// assert!(rule.required);
/// assert!(!AttributeRule::optional("tags").required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRule {
    /// Attribute name.
    pub name: String,
    /// Whether the attribute must be present.
    pub required: bool,
}

impl AttributeRule {
    /// Creates a required attribute rule.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// Creates an optional attribute rule.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// A permitted block type at one body level.
///
/// Only the *number* of `label_names` is enforced on block instances; the
/// names document what each label means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRule {
    /// Block type identifier.
    pub type_name: String,
    /// Names of the labels a matching block carries.
    pub label_names: Vec<String>,
    /// Shape of matching blocks' bodies. `None` permits an empty body only.
    pub nested: Option<SchemaNode>,
}

impl BlockRule {
    /// Creates a block rule with no nested body schema.
    pub fn new<S: Into<String>>(
        type_name: impl Into<String>,
        label_names: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            label_names: label_names.into_iter().map(Into::into).collect(),
            nested: None,
        }
    }

    /// Sets the nested body schema.
    pub fn with_body(mut self, nested: SchemaNode) -> Self {
        self.nested = Some(nested);
        self
    }

    /// Returns `true` if a block of `type_name` with `label_count` labels
    /// matches this rule.
    pub fn matches(&self, type_name: &str, label_count: usize) -> bool {
        self.type_name == type_name && self.label_names.len() == label_count
    }

    /// Header portion of the rule, used for content extraction.
    pub fn header(&self) -> BlockHeader {
        BlockHeader {
            type_name: self.type_name.clone(),
            label_names: self.label_names.clone(),
        }
    }
}

/// Permitted shape of one body.
///
/// # Examples
///
/// ```
/// use hcl_schema_core::{AttributeRule, BlockRule, SchemaNode};
///
/// let node = SchemaNode::default()
///     .with_attribute(AttributeRule::required("name"))
///     .with_block(BlockRule::new("tag", ["id"]));
/// assert!(node.find_block("tag", 1).is_some());
/// assert!(node.find_block("tag", 0).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Permitted attributes, unique by name.
    pub attributes: Vec<AttributeRule>,
    /// Permitted block types, in declaration order.
    pub blocks: Vec<BlockRule>,
}

impl SchemaNode {
    /// Adds an attribute rule.
    pub fn with_attribute(mut self, rule: AttributeRule) -> Self {
        self.attributes.push(rule);
        self
    }

    /// Adds a block rule.
    pub fn with_block(mut self, rule: BlockRule) -> Self {
        self.blocks.push(rule);
        self
    }

    /// Looks up an attribute rule by name.
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeRule> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns the first block rule, in declaration order, whose type and
    /// label count match.
    pub fn find_block(&self, type_name: &str, label_count: usize) -> Option<&BlockRule> {
        self.blocks
            .iter()
            .find(|b| b.matches(type_name, label_count))
    }

    /// Builds the permitted-shape view of this node. With `allow_link` the
    /// reserved linking attribute is permitted (never required) unless the
    /// node already declares it.
    pub fn body_schema(&self, allow_link: bool) -> BodySchema {
        let mut attributes = self.attributes.clone();
        if allow_link && self.find_attribute(LINK_ATTRIBUTE).is_none() {
            attributes.push(AttributeRule::optional(LINK_ATTRIBUTE));
        }
        BodySchema {
            attributes,
            blocks: self.blocks.iter().map(BlockRule::header).collect(),
        }
    }
}

/// A compiled meta-schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTree {
    root: SchemaNode,
    id: Option<String>,
    meta_schema: Option<String>,
}

impl SchemaTree {
    /// Wraps a root node.
    pub fn new(root: SchemaNode) -> Self {
        Self {
            root,
            id: None,
            meta_schema: None,
        }
    }

    /// Records the schema's own `__id` and `__schema` values.
    pub fn with_metadata(mut self, id: Option<String>, meta_schema: Option<String>) -> Self {
        self.id = id;
        self.meta_schema = meta_schema;
        self
    }

    /// Root body shape.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// The schema's `__id`, when it is a string literal.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The meta-schema the schema itself links to, when it is a string literal.
    pub fn meta_schema(&self) -> Option<&str> {
        self.meta_schema.as_deref()
    }
}

/// Block header shape used by content extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block type identifier.
    pub type_name: String,
    /// Label names; their count is the required label arity.
    pub label_names: Vec<String>,
}

impl BlockHeader {
    /// Creates a block header.
    pub fn new<S: Into<String>>(
        type_name: impl Into<String>,
        label_names: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            label_names: label_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flat permitted-shape view of one body: what content extraction checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    /// Permitted attributes.
    pub attributes: Vec<AttributeRule>,
    /// Permitted block headers.
    pub blocks: Vec<BlockHeader>,
}

impl BodySchema {
    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeRule> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns `true` if any block header has `type_name`.
    pub fn has_block_type(&self, type_name: &str) -> bool {
        self.blocks.iter().any(|b| b.type_name == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_block_is_first_match() {
        let node = SchemaNode::default()
            .with_block(BlockRule::new("tag", ["a"]).with_body(
                SchemaNode::default().with_attribute(AttributeRule::optional("first")),
            ))
            .with_block(BlockRule::new("tag", ["b"]).with_body(
                SchemaNode::default().with_attribute(AttributeRule::optional("second")),
            ));

        let rule = node.find_block("tag", 1).unwrap();
        assert_eq!(rule.label_names, vec!["a".to_string()]);
        assert!(
            rule.nested
                .as_ref()
                .unwrap()
                .find_attribute("first")
                .is_some()
        );
    }

    #[test]
    fn test_find_block_distinguishes_arity() {
        let node = SchemaNode::default()
            .with_block(BlockRule::new("tag", Vec::<String>::new()))
            .with_block(BlockRule::new("tag", ["id", "kind"]));

        assert!(node.find_block("tag", 0).is_some());
        assert_eq!(node.find_block("tag", 2).unwrap().label_names.len(), 2);
        assert!(node.find_block("tag", 1).is_none());
    }

    #[test]
    fn test_body_schema_adds_link_attribute_once() {
        let node = SchemaNode::default().with_attribute(AttributeRule::required("name"));
        let with_link = node.body_schema(true);
        assert_eq!(with_link.attributes.len(), 2);
        assert!(!with_link.attribute(LINK_ATTRIBUTE).unwrap().required);
        assert!(
            node.body_schema(false)
                .attribute(LINK_ATTRIBUTE)
                .is_none()
        );

        let declared =
            SchemaNode::default().with_attribute(AttributeRule::required(LINK_ATTRIBUTE));
        let view = declared.body_schema(true);
        assert_eq!(view.attributes.len(), 1);
        assert!(view.attribute(LINK_ATTRIBUTE).unwrap().required);
    }
}
