//! Parsing of a version's embedded schema document.
//!
//! A model version carries an OpenAPI-style document whose
//! `components.schemas` section describes the model's input and output
//! shapes. This module turns that loosely-typed JSON into a closed tree of
//! [`SchemaNode`]s and resolves local `$ref` pointers up front, so the
//! mapper can match exhaustively instead of probing raw JSON.
//!
//! Unrecognized keywords or shapes never abort parsing: they become
//! [`SchemaKind::Unknown`] nodes carrying the original value, and degrade to
//! placeholder fields downstream.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::errors::GeneratorError;

const LOCAL_REF_PREFIX: &str = "#/components/schemas/";

/// A parsed schema node: structural kind plus the metadata keywords that can
/// accompany any shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// The structural kind of the node.
    pub kind: SchemaKind,

    /// The `title` keyword, if present.
    pub title: Option<String>,

    /// The `description` keyword, if present.
    pub description: Option<String>,

    /// The `default` literal, if present. Carried as raw JSON; the mapper
    /// decides whether its kind matches the mapped type.
    pub default: Option<Value>,

    /// The `enum` values, if present.
    pub enum_values: Option<Vec<Value>>,
}

/// The structural kinds a schema node can take.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Boolean,
    Number,
    Integer,
    String,
    /// The `null` type; only meaningful inside `anyOf`.
    Null,
    Array {
        items: Box<SchemaNode>,
    },
    Object {
        /// Properties in document declaration order.
        properties: Vec<(String, SchemaNode)>,
        /// Names listed in the object's `required` array.
        required: BTreeSet<String>,
    },
    /// A local reference; resolved away before parsing returns.
    Ref {
        pointer: String,
    },
    AnyOf {
        variants: Vec<SchemaNode>,
    },
    /// Anything the parser does not recognize, kept for diagnostics.
    Unknown {
        raw: Value,
    },
}

impl SchemaNode {
    fn with_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            default: None,
            enum_values: None,
        }
    }
}

/// The named schemas of a document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    entries: Vec<(String, SchemaNode)>,
}

impl SchemaSet {
    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// The schema names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses the `components.schemas` section of a schema document and resolves
/// every local reference.
///
/// A document without a `components.schemas` object yields an empty set (the
/// pipeline reports the missing `Input` separately). Unresolved or cyclic
/// references are fatal.
pub fn parse_document(document: &Value) -> Result<SchemaSet, GeneratorError> {
    let Some(schemas) = document
        .pointer("/components/schemas")
        .and_then(Value::as_object)
    else {
        debug!("document has no components.schemas section");
        return Ok(SchemaSet::default());
    };

    let raw: Vec<(String, SchemaNode)> = schemas
        .iter()
        .map(|(name, value)| (name.clone(), parse_node(value)))
        .collect();

    let mut entries = Vec::with_capacity(raw.len());
    for (name, node) in &raw {
        let mut stack = vec![name.clone()];
        let resolved = resolve_node(node, &raw, &mut stack)?;
        entries.push((name.clone(), resolved));
    }

    debug!(schemas = entries.len(), "parsed schema document");
    Ok(SchemaSet { entries })
}

/// Parses a single schema value. Total: unrecognized shapes become
/// [`SchemaKind::Unknown`], never an error.
pub fn parse_node(value: &Value) -> SchemaNode {
    let Some(obj) = value.as_object() else {
        return SchemaNode::with_kind(SchemaKind::Unknown { raw: value.clone() });
    };

    let kind = if let Some(pointer) = obj.get("$ref").and_then(Value::as_str) {
        SchemaKind::Ref {
            pointer: pointer.to_string(),
        }
    } else if let Some(variants) = obj.get("anyOf").and_then(Value::as_array) {
        SchemaKind::AnyOf {
            variants: variants.iter().map(parse_node).collect(),
        }
    } else {
        match obj.get("type").and_then(Value::as_str) {
            Some("boolean") => SchemaKind::Boolean,
            Some("number") => SchemaKind::Number,
            Some("integer") => SchemaKind::Integer,
            Some("string") => SchemaKind::String,
            Some("null") => SchemaKind::Null,
            Some("array") => SchemaKind::Array {
                items: Box::new(
                    obj.get("items")
                        .map(parse_node)
                        .unwrap_or_else(|| {
                            SchemaNode::with_kind(SchemaKind::Unknown { raw: Value::Null })
                        }),
                ),
            },
            Some("object") => parse_object(obj),
            // An object shape without an explicit type is still an object.
            None if obj.contains_key("properties") => parse_object(obj),
            _ => SchemaKind::Unknown { raw: value.clone() },
        }
    };

    SchemaNode {
        kind,
        title: obj.get("title").and_then(Value::as_str).map(str::to_string),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        default: obj.get("default").cloned(),
        enum_values: obj
            .get("enum")
            .and_then(Value::as_array)
            .map(|values| values.to_vec()),
    }
}

fn parse_object(obj: &serde_json::Map<String, Value>) -> SchemaKind {
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, value)| (name.clone(), parse_node(value)))
                .collect()
        })
        .unwrap_or_default();

    let required = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SchemaKind::Object {
        properties,
        required,
    }
}

/// Replaces every `Ref` in the tree with the node it points to.
///
/// `stack` carries the chain of schema names currently being resolved;
/// revisiting one means the document is cyclic, which is reported as an
/// unresolved reference.
fn resolve_node(
    node: &SchemaNode,
    table: &[(String, SchemaNode)],
    stack: &mut Vec<String>,
) -> Result<SchemaNode, GeneratorError> {
    let kind = match &node.kind {
        SchemaKind::Ref { pointer } => {
            let name = pointer.strip_prefix(LOCAL_REF_PREFIX).ok_or_else(|| {
                GeneratorError::UnresolvedReference {
                    pointer: pointer.clone(),
                }
            })?;

            if stack.iter().any(|seen| seen == name) {
                return Err(GeneratorError::UnresolvedReference {
                    pointer: pointer.clone(),
                });
            }

            let (_, target) = table.iter().find(|(n, _)| n == name).ok_or_else(|| {
                GeneratorError::UnresolvedReference {
                    pointer: pointer.clone(),
                }
            })?;

            stack.push(name.to_string());
            let mut resolved = resolve_node(target, table, stack)?;
            stack.pop();

            // Metadata written at the reference site wins over the target's.
            if node.title.is_some() {
                resolved.title = node.title.clone();
            }
            if node.description.is_some() {
                resolved.description = node.description.clone();
            }
            if node.default.is_some() {
                resolved.default = node.default.clone();
            }
            if node.enum_values.is_some() {
                resolved.enum_values = node.enum_values.clone();
            }
            return Ok(resolved);
        }
        SchemaKind::Array { items } => SchemaKind::Array {
            items: Box::new(resolve_node(items, table, stack)?),
        },
        SchemaKind::Object {
            properties,
            required,
        } => SchemaKind::Object {
            properties: properties
                .iter()
                .map(|(name, child)| {
                    Ok((name.clone(), resolve_node(child, table, stack)?))
                })
                .collect::<Result<_, GeneratorError>>()?,
            required: required.clone(),
        },
        SchemaKind::AnyOf { variants } => SchemaKind::AnyOf {
            variants: variants
                .iter()
                .map(|variant| resolve_node(variant, table, stack))
                .collect::<Result<_, _>>()?,
        },
        other => other.clone(),
    };

    Ok(SchemaNode { kind, ..node.clone() })
}
