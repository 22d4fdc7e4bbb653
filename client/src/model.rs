//! Model, version, and collection resources.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::timestamp;

/// A model identifier of the form `owner/name`.
///
/// ## Examples
///
/// ```
/// use replicate_client::ModelId;
///
/// let id: ModelId = "replicate/hello-world".parse().unwrap();
/// assert_eq!(id.owner(), "replicate");
/// assert_eq!(id.name(), "hello-world");
/// assert_eq!(id.to_string(), "replicate/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    owner: String,
    name: String,
}

impl ModelId {
    /// The user or organization that owns the model.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The name of the model.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::InvalidModelId(s.to_string())),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The visibility of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public visibility.
    Public,
    /// Private visibility.
    Private,
}

/// A version of a model.
///
/// Carries the raw OpenAPI-style schema document describing the version's
/// input and output shapes; the binding generator consumes it as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    /// The ID of the version.
    pub id: String,

    /// When the version was created.
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,

    /// The embedded schema document for this version.
    #[serde(default)]
    pub openapi_schema: Value,
}

/// A machine learning model hosted on Replicate.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    /// The name of the user or organization that owns the model.
    pub owner: String,

    /// The name of the model.
    pub name: String,

    /// A link to the model on Replicate.
    pub url: String,

    /// A link to the model source code on GitHub.
    #[serde(default)]
    pub github_url: Option<String>,

    /// A link to the model's paper.
    #[serde(default)]
    pub paper_url: Option<String>,

    /// A link to the model's license.
    #[serde(default)]
    pub license_url: Option<String>,

    /// A description for the model.
    #[serde(default)]
    pub description: String,

    /// The visibility of the model.
    pub visibility: Visibility,

    /// The latest version of the model, if any.
    ///
    /// The API has historically emitted this key misspelled as
    /// `lastest_version`; both spellings are accepted.
    #[serde(default, alias = "lastest_version")]
    pub latest_version: Option<Version>,
}

impl Model {
    /// The ID of the model, `owner/name`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A curated collection of models.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    /// The name of the collection.
    pub name: String,

    /// The slug of the collection, like `super-resolution`.
    pub slug: String,

    /// A description for the collection.
    #[serde(default)]
    pub description: String,

    /// The models in the collection.
    #[serde(default)]
    pub models: Vec<Model>,
}
