//! Synthesis of a binding declaration from mapped schemas.
//!
//! A [`BindingDeclaration`] is the language-neutral middle of the pipeline:
//! everything the emitter needs to render a typed binding, with no JSON or
//! token streams in sight.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::errors::{Collision, CollisionList, GeneratorError};
use crate::mapper::{self, TypeDescriptor};
use crate::schema::{SchemaKind, SchemaNode};

/// One field of a generated input struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// The field name as it appears on the wire.
    pub source_name: String,
    /// The Rust identifier the field is emitted under.
    pub identifier: String,
    /// The field's mapped type.
    pub ty: TypeDescriptor,
    /// Whether the field may be omitted from serialized input.
    pub optional: bool,
    /// A default literal, already checked against `ty`.
    pub default: Option<Value>,
    /// Doc comment text, if any.
    pub doc: Option<String>,
}

/// Everything needed to emit one model binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingDeclaration {
    /// The Rust type name of the binding.
    pub name: String,
    /// Doc comment for the marker type, if any.
    pub doc: Option<String>,
    /// The `owner/name` model identifier, when generating from a live model.
    pub model_id: Option<String>,
    /// The version the schema came from, when generating from a live model.
    pub version_id: Option<String>,
    /// Input struct fields, in schema declaration order.
    pub input: Vec<FieldDescriptor>,
    /// The output type, if the document declares one.
    pub output: Option<TypeDescriptor>,
}

/// Builds a binding declaration from the input and output schemas.
///
/// The input schema must be an object; anything else means the document has
/// no usable input to bind. Fields keep declaration order. Two source names
/// mapping to the same Rust identifier is fatal, and every collision in the
/// schema is reported at once.
pub fn synthesize(
    name: String,
    doc: Option<String>,
    model_id: Option<String>,
    version_id: Option<String>,
    input_schema: &SchemaNode,
    output_schema: Option<&SchemaNode>,
) -> Result<BindingDeclaration, GeneratorError> {
    let SchemaKind::Object {
        properties,
        required,
    } = &input_schema.kind
    else {
        return Err(GeneratorError::SchemaNotFound);
    };

    let input: Vec<FieldDescriptor> = properties
        .iter()
        .map(|(source_name, node)| {
            mapper::field_descriptor(source_name, node, required.contains(source_name))
        })
        .collect();

    check_collisions(&input)?;

    let output = output_schema.map(mapper::map_node);

    debug!(
        name,
        fields = input.len(),
        has_output = output.is_some(),
        "synthesized binding declaration"
    );

    Ok(BindingDeclaration {
        name,
        doc,
        model_id,
        version_id,
        input,
        output,
    })
}

fn check_collisions(fields: &[FieldDescriptor]) -> Result<(), GeneratorError> {
    let mut by_identifier: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for field in fields {
        by_identifier
            .entry(&field.identifier)
            .or_default()
            .push(&field.source_name);
    }

    let collisions: Vec<Collision> = by_identifier
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(identifier, sources)| Collision {
            identifier: identifier.to_string(),
            sources: sources.into_iter().map(str::to_string).collect(),
        })
        .collect();

    if collisions.is_empty() {
        Ok(())
    } else {
        Err(GeneratorError::NameCollision(CollisionList(collisions)))
    }
}

/// Derives a binding type name from a model name.
///
/// Word segments are title-cased and concatenated: `text-to-pokemon` becomes
/// `TextToPokemon`. A name that would start with a digit gains a `Model`
/// prefix; a name with no usable characters becomes `Model`.
pub fn derive_binding_name(model_name: &str) -> String {
    let name: String = mapper::segments(model_name)
        .iter()
        .map(|word| pascal_word(word))
        .collect();

    if name.is_empty() {
        "Model".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Model{name}")
    } else {
        name
    }
}

/// Title-cases one lowercase word segment.
pub(crate) fn pascal_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pascal-cases an identifier for use in an auxiliary struct name.
pub(crate) fn pascal_case(identifier: &str) -> String {
    mapper::segments(identifier)
        .iter()
        .map(|word| pascal_word(word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_node;
    use serde_json::json;

    #[test]
    fn synthesizes_object_input() {
        let input = parse_node(&json!({
            "type": "object",
            "properties": {
                "prompt": {"type": "string"},
                "seed": {"type": "integer"}
            },
            "required": ["prompt"]
        }));

        let binding = synthesize(
            "Stub".to_string(),
            None,
            Some("owner/stub".to_string()),
            Some("v1".to_string()),
            &input,
            None,
        )
        .unwrap();

        assert_eq!(binding.input.len(), 2);
        assert!(!binding.input[0].optional);
        assert!(binding.input[1].optional);
        assert!(binding.output.is_none());
    }

    #[test]
    fn non_object_input_is_rejected() {
        let input = parse_node(&json!({"type": "string"}));
        let err = synthesize("Stub".to_string(), None, None, None, &input, None).unwrap_err();
        assert!(matches!(err, GeneratorError::SchemaNotFound));
    }

    #[test]
    fn colliding_identifiers_are_all_reported() {
        let input = parse_node(&json!({
            "type": "object",
            "properties": {
                "numOutputs": {"type": "integer"},
                "num_outputs": {"type": "integer"},
                "imageURL": {"type": "string"},
                "image_url": {"type": "string"}
            }
        }));

        let err = synthesize("Stub".to_string(), None, None, None, &input, None).unwrap_err();
        let GeneratorError::NameCollision(list) = err else {
            panic!("expected collision error");
        };

        assert_eq!(list.0.len(), 2);
        let message = list.to_string();
        assert!(message.contains("'numOutputs'"));
        assert!(message.contains("'num_outputs'"));
        assert!(message.contains("'imageURL'"));
        assert!(message.contains("'image_url'"));
    }

    #[test]
    fn binding_name_from_hyphenated_model() {
        assert_eq!(derive_binding_name("text-to-pokemon"), "TextToPokemon");
        assert_eq!(derive_binding_name("hello-world"), "HelloWorld");
        assert_eq!(derive_binding_name("stable_diffusion"), "StableDiffusion");
    }

    #[test]
    fn binding_name_with_leading_digit_gets_prefix() {
        assert_eq!(derive_binding_name("3d-photo"), "Model3dPhoto");
    }

    #[test]
    fn binding_name_from_degenerate_input() {
        assert_eq!(derive_binding_name("---"), "Model");
    }
}
