//! The end-to-end generation pipeline.

use std::path::Path;

use replicate_client::{Client, ModelId};
use tracing::info;

use crate::binding::{self, BindingDeclaration};
use crate::emit;
use crate::errors::GeneratorError;
use crate::fetcher;
use crate::schema;

/// Generates binding source for a model.
///
/// Fetches the model and version, parses the version's schema document,
/// synthesizes a binding from its `Input` (and `Output`, if present)
/// schemas, and renders formatted Rust source. `name` overrides the type
/// name otherwise derived from the model name.
pub async fn generate(
    client: &Client,
    model_id: &ModelId,
    version_id: Option<&str>,
    name: Option<&str>,
) -> Result<String, GeneratorError> {
    let resolved = fetcher::resolve(client, model_id, version_id).await?;
    let declaration = declaration_for(&resolved, model_id, name)?;

    info!(binding = %declaration.name, "emitting binding");
    emit::emit(&declaration)
}

fn declaration_for(
    resolved: &fetcher::ResolvedModel,
    model_id: &ModelId,
    name: Option<&str>,
) -> Result<BindingDeclaration, GeneratorError> {
    let schemas = schema::parse_document(&resolved.version.openapi_schema)?;

    let input = schemas.get("Input").ok_or(GeneratorError::SchemaNotFound)?;
    let output = schemas.get("Output");

    let binding_name = match name {
        Some(name) => name.to_string(),
        None => binding::derive_binding_name(&resolved.model.name),
    };

    let doc = (!resolved.model.description.is_empty())
        .then(|| resolved.model.description.clone());

    binding::synthesize(
        binding_name,
        doc,
        Some(model_id.to_string()),
        Some(resolved.version.id.clone()),
        input,
        output,
    )
}

/// Writes generated source to a file, refusing to overwrite an existing one.
pub fn write_binding(path: &Path, source: &str) -> Result<(), GeneratorError> {
    if path.exists() {
        return Err(GeneratorError::OutputExists {
            path: path.display().to_string(),
        });
    }
    std::fs::write(path, source).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}
