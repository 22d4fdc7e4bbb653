//! Mapping from schema nodes to Rust type descriptors.
//!
//! The mapping is total: every [`SchemaNode`] produces a [`TypeDescriptor`],
//! with unrecognized constructs degrading to [`TypeDescriptor::Placeholder`]
//! (a raw JSON value) plus a diagnostic, so one odd field never sinks a whole
//! binding.

use serde_json::Value;
use tracing::warn;

use crate::binding::FieldDescriptor;
use crate::schema::{SchemaKind, SchemaNode};

/// The Rust-facing shape a schema node maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Bool,
    Float,
    Integer,
    String,
    Sequence(Box<TypeDescriptor>),
    Optional(Box<TypeDescriptor>),
    /// An inline object, hoisted into its own struct at emission time.
    Record(Vec<FieldDescriptor>),
    /// A raw JSON value standing in for an unrecognized construct.
    Placeholder,
}

impl TypeDescriptor {
    /// Whether the descriptor is already optional at the type level.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

/// Maps a schema node to a type descriptor. Total; never fails.
pub fn map_node(node: &SchemaNode) -> TypeDescriptor {
    match &node.kind {
        SchemaKind::Boolean => TypeDescriptor::Bool,
        SchemaKind::Number => TypeDescriptor::Float,
        SchemaKind::Integer => TypeDescriptor::Integer,
        SchemaKind::String => TypeDescriptor::String,
        SchemaKind::Array { items } => TypeDescriptor::Sequence(Box::new(map_node(items))),
        SchemaKind::Object {
            properties,
            required,
        } => TypeDescriptor::Record(
            properties
                .iter()
                .map(|(name, child)| field_descriptor(name, child, required.contains(name)))
                .collect(),
        ),
        SchemaKind::AnyOf { variants } => map_any_of(variants),
        // Refs are resolved during parsing; a surviving one is unexpected
        // input and degrades like any other unknown.
        SchemaKind::Null | SchemaKind::Ref { .. } | SchemaKind::Unknown { .. } => {
            warn!(?node.kind, title = ?node.title, "unrecognized schema construct, using placeholder");
            TypeDescriptor::Placeholder
        }
    }
}

/// `anyOf` with a `null` variant is the schema idiom for optionality: the
/// first non-null variant maps, wrapped in `Optional`. Without a `null`
/// variant there is no single Rust type to pick, so it degrades.
fn map_any_of(variants: &[SchemaNode]) -> TypeDescriptor {
    let has_null = variants
        .iter()
        .any(|v| matches!(v.kind, SchemaKind::Null));

    let first_non_null = variants
        .iter()
        .find(|v| !matches!(v.kind, SchemaKind::Null));

    match (has_null, first_non_null) {
        (true, Some(inner)) => TypeDescriptor::Optional(Box::new(map_node(inner))),
        _ => {
            warn!(variants = variants.len(), "anyOf without a null variant, using placeholder");
            TypeDescriptor::Placeholder
        }
    }
}

/// Builds the full field descriptor for one object property.
pub fn field_descriptor(source_name: &str, node: &SchemaNode, required: bool) -> FieldDescriptor {
    let ty = map_node(node);
    let placeholder = matches!(ty, TypeDescriptor::Placeholder);

    // A required nullable field keeps its Option type but is still
    // serialized unconditionally (the key must appear, possibly as null).
    let optional = !required;

    let default = node
        .default
        .as_ref()
        .filter(|literal| {
            if literal_matches(literal, &ty) {
                true
            } else {
                warn!(field = source_name, "default literal does not match mapped type, dropping");
                false
            }
        })
        .cloned();

    let mut doc = doc_text(node);
    if placeholder {
        let note = "Unrecognized schema construct; accepts any JSON value.";
        doc = Some(match doc {
            Some(existing) => format!("{existing}\n\n{note}"),
            None => note.to_string(),
        });
    }

    FieldDescriptor {
        source_name: source_name.to_string(),
        identifier: rust_identifier(source_name),
        ty,
        optional,
        default,
        doc,
    }
}

/// Whether a default literal is representable as the mapped type.
fn literal_matches(literal: &Value, ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Bool => literal.is_boolean(),
        TypeDescriptor::Integer => literal.as_i64().is_some(),
        TypeDescriptor::Float => literal.is_number(),
        TypeDescriptor::String => literal.is_string(),
        TypeDescriptor::Sequence(element) => literal
            .as_array()
            .is_some_and(|items| items.iter().all(|item| literal_matches(item, element))),
        TypeDescriptor::Optional(inner) => {
            literal.is_null() || literal_matches(literal, inner)
        }
        TypeDescriptor::Record(_) | TypeDescriptor::Placeholder => false,
    }
}

/// Assembles doc text from a node's title, description, and enum values.
fn doc_text(node: &SchemaNode) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(title) = node.title.as_deref().filter(|t| !t.is_empty()) {
        parts.push(title.to_string());
    }
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(description.to_string());
    }
    if let Some(values) = node.enum_values.as_deref().filter(|v| !v.is_empty()) {
        let rendered = values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Allowed values: {rendered}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Splits a name into lowercase word segments.
///
/// Breaks on runs of non-alphanumeric characters and on camelCase
/// boundaries, including the end of an acronym ("HTTPClient" splits as
/// "http", "client"). Shared by field and binding-name derivation so both
/// agree on word boundaries.
pub(crate) fn segments(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let upper_after_lower = c.is_uppercase() && prev.is_lowercase();
            let acronym_end = c.is_uppercase()
                && prev.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let digit_boundary = c.is_ascii_digit() != prev.is_ascii_digit()
                && c.is_uppercase();
            if upper_after_lower || acronym_end || digit_boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Converts a wire field name into a snake_case Rust identifier.
///
/// Both `numOutputs` and `num_outputs` become `num_outputs`; names with no
/// usable characters become `field`; a leading digit gains an underscore
/// prefix; keywords gain a trailing underscore.
pub fn rust_identifier(source_name: &str) -> String {
    let words = segments(source_name);
    let mut identifier = if words.is_empty() {
        "field".to_string()
    } else {
        words.join("_")
    };

    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    if KEYWORDS.contains(&identifier.as_str()) {
        identifier.push('_');
    }

    identifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_node;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SchemaNode {
        parse_node(&value)
    }

    #[test]
    fn primitives_map_directly() {
        assert_eq!(map_node(&node(json!({"type": "boolean"}))), TypeDescriptor::Bool);
        assert_eq!(map_node(&node(json!({"type": "number"}))), TypeDescriptor::Float);
        assert_eq!(map_node(&node(json!({"type": "integer"}))), TypeDescriptor::Integer);
        assert_eq!(map_node(&node(json!({"type": "string"}))), TypeDescriptor::String);
    }

    #[test]
    fn arrays_map_to_sequences() {
        let ty = map_node(&node(json!({"type": "array", "items": {"type": "string"}})));
        assert_eq!(ty, TypeDescriptor::Sequence(Box::new(TypeDescriptor::String)));
    }

    #[test]
    fn any_of_with_null_maps_to_optional() {
        let ty = map_node(&node(json!({
            "anyOf": [{"type": "integer"}, {"type": "null"}]
        })));
        assert_eq!(ty, TypeDescriptor::Optional(Box::new(TypeDescriptor::Integer)));
    }

    #[test]
    fn any_of_without_null_degrades_to_placeholder() {
        let ty = map_node(&node(json!({
            "anyOf": [{"type": "integer"}, {"type": "string"}]
        })));
        assert_eq!(ty, TypeDescriptor::Placeholder);
    }

    #[test]
    fn unknown_construct_degrades_to_placeholder() {
        let ty = map_node(&node(json!({"type": "quaternion"})));
        assert_eq!(ty, TypeDescriptor::Placeholder);
    }

    #[test]
    fn required_field_is_not_optional() {
        let field = field_descriptor("prompt", &node(json!({"type": "string"})), true);
        assert!(!field.optional);
    }

    #[test]
    fn non_required_field_is_optional() {
        let field = field_descriptor("prompt", &node(json!({"type": "string"})), false);
        assert!(field.optional);
    }

    #[test]
    fn required_nullable_field_keeps_option_but_serializes() {
        let field = field_descriptor(
            "seed",
            &node(json!({"anyOf": [{"type": "integer"}, {"type": "null"}]})),
            true,
        );
        assert!(field.ty.is_optional());
        assert!(!field.optional);
    }

    #[test]
    fn mismatched_default_is_dropped() {
        let field = field_descriptor(
            "count",
            &node(json!({"type": "integer", "default": "three"})),
            false,
        );
        assert_eq!(field.default, None);
    }

    #[test]
    fn matching_default_is_kept() {
        let field = field_descriptor(
            "count",
            &node(json!({"type": "integer", "default": 3})),
            false,
        );
        assert_eq!(field.default, Some(json!(3)));
    }

    #[test]
    fn fractional_default_does_not_match_integer() {
        let field = field_descriptor(
            "count",
            &node(json!({"type": "integer", "default": 3.5})),
            false,
        );
        assert_eq!(field.default, None);
    }

    #[test]
    fn doc_combines_title_description_and_enum() {
        let field = field_descriptor(
            "style",
            &node(json!({
                "type": "string",
                "title": "Style",
                "description": "Art style to apply",
                "enum": ["anime", "oil"]
            })),
            false,
        );
        let doc = field.doc.unwrap();
        assert!(doc.contains("Style"));
        assert!(doc.contains("Art style to apply"));
        assert!(doc.contains("Allowed values: anime, oil"));
    }

    #[test]
    fn placeholder_field_notes_degradation_in_doc() {
        let field = field_descriptor("weird", &node(json!({"type": "quaternion"})), false);
        assert!(field.doc.unwrap().contains("accepts any JSON value"));
    }

    #[test]
    fn identifier_normalizes_camel_and_snake_alike() {
        assert_eq!(rust_identifier("numOutputs"), "num_outputs");
        assert_eq!(rust_identifier("num_outputs"), "num_outputs");
        assert_eq!(rust_identifier("guidance-scale"), "guidance_scale");
    }

    #[test]
    fn identifier_handles_degenerate_names() {
        assert_eq!(rust_identifier("---"), "field");
        assert_eq!(rust_identifier(""), "field");
        assert_eq!(rust_identifier("2x_upscale"), "_2x_upscale");
        assert_eq!(rust_identifier("type"), "type_");
    }

    #[test]
    fn identifier_splits_acronyms() {
        assert_eq!(rust_identifier("HTTPClient"), "http_client");
        assert_eq!(rust_identifier("imageURL"), "image_url");
    }
}
