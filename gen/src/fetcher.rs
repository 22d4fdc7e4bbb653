//! Resolution of a model and the version to generate from.

use replicate_client::{Client, Error, Model, ModelId, Version};
use tracing::{debug, info};

use crate::errors::GeneratorError;

/// A model together with the version whose schema drives generation.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub model: Model,
    pub version: Version,
}

/// Fetches the model, then the version to generate from.
///
/// The model is always fetched first so its name and description are
/// available for naming and docs. With an explicit `version_id` the version
/// is fetched by ID, and a 404 is reported as a missing version rather than
/// a raw API error. Without one, the model's latest version is used; a model
/// that has none is a missing version too, with no extra request made.
pub async fn resolve(
    client: &Client,
    model_id: &ModelId,
    version_id: Option<&str>,
) -> Result<ResolvedModel, GeneratorError> {
    info!(model = %model_id, "fetching model");
    let model = client.get_model(model_id).await?;

    let version = match version_id {
        Some(id) => {
            debug!(version = id, "fetching explicit version");
            match client.get_model_version(model_id, id).await {
                Ok(version) => version,
                Err(Error::Api { status: 404, .. }) => {
                    return Err(GeneratorError::VersionNotFound {
                        model: model_id.to_string(),
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
        None => model
            .latest_version
            .clone()
            .ok_or_else(|| GeneratorError::VersionNotFound {
                model: model_id.to_string(),
            })?,
    };

    debug!(version = %version.id, "resolved version");
    Ok(ResolvedModel { model, version })
}
