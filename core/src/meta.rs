//! The fixed grammar of meta-schema documents.
//!
//! A meta-schema looks like this:
//!
//! ```hcl
//! __schema = "https://example.com/draft/2025-10/.schema.hcl"
//! __id     = "https://example.com/service.schema.hcl"
//!
//! body {
//!   attribute "name" {
//!     required = true
//!   }
//!
//!   block_header "tag" {
//!     label_names = ["id"]
//!     body {
//!       attribute "value" {}
//!     }
//!   }
//! }
//! ```
//!
//! `body` blocks are transparent groupings: their contents are hoisted into
//! the enclosing level. Only a `body` nested directly in a `block_header`
//! introduces a new nesting level.

use crate::types::{AttributeRule, BlockHeader, BodySchema, ID_ATTRIBUTE, LINK_ATTRIBUTE};

/// Block type declaring a permitted attribute.
pub const ATTRIBUTE_BLOCK: &str = "attribute";
/// Block type declaring a permitted block type.
pub const BLOCK_HEADER_BLOCK: &str = "block_header";
/// Grouping block / nested body declaration.
pub const BODY_BLOCK: &str = "body";
/// `attribute` setting: whether the attribute must be present.
pub const REQUIRED_SETTING: &str = "required";
/// `block_header` setting: list of label names.
pub const LABEL_NAMES_SETTING: &str = "label_names";

/// Shape of a meta-schema's root body.
pub fn root_schema() -> BodySchema {
    BodySchema {
        attributes: vec![
            AttributeRule::required(LINK_ATTRIBUTE),
            AttributeRule::required(ID_ATTRIBUTE),
        ],
        blocks: vec![BlockHeader::new(BODY_BLOCK, Vec::<String>::new())],
    }
}

/// Shape of a `body` block at any level.
pub fn body_schema() -> BodySchema {
    BodySchema {
        attributes: Vec::new(),
        blocks: vec![
            BlockHeader::new(ATTRIBUTE_BLOCK, ["attribute_name"]),
            BlockHeader::new(BLOCK_HEADER_BLOCK, ["block_header_type"]),
            BlockHeader::new(BODY_BLOCK, Vec::<String>::new()),
        ],
    }
}

/// Shape of an `attribute` block's body.
pub fn attribute_schema() -> BodySchema {
    BodySchema {
        attributes: vec![AttributeRule::optional(REQUIRED_SETTING)],
        blocks: Vec::new(),
    }
}

/// Shape of a `block_header` block's body. `ref` and `id` are accepted for
/// documentation and cross-referencing but carry no validation meaning.
pub fn block_header_schema() -> BodySchema {
    BodySchema {
        attributes: vec![
            AttributeRule::optional(LABEL_NAMES_SETTING),
            AttributeRule::optional("ref"),
            AttributeRule::optional("id"),
        ],
        blocks: vec![BlockHeader::new(BODY_BLOCK, Vec::<String>::new())],
    }
}
