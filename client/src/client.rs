//! The authenticated HTTP client.
//!
//! All resource calls funnel through a single generic fetch that applies
//! authentication, decodes success bodies, and maps non-2xx responses to
//! structured errors. The client performs no retries; each call is delivered
//! at most once.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::model::{Collection, Model, ModelId, Version};
use crate::pagination::{Cursor, Page};
use crate::prediction::Prediction;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1/";

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A Replicate HTTP API client.
///
/// The token is read-only after construction, so a client can be shared
/// freely across tasks.
///
/// ## Examples
///
/// ```rust,ignore
/// use replicate_client::Client;
///
/// let client = Client::new("r8_xxx");
/// let predictions = client.list_predictions(None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    token: String,
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the given API token, pointed at the production
    /// API.
    pub fn new(token: impl Into<String>) -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self::with_base_url(token, base_url)
    }

    /// Creates a client against an alternative base URL (useful for tests).
    ///
    /// The URL should end with a trailing slash so relative paths join under
    /// it.
    pub fn with_base_url(token: impl Into<String>, base_url: Url) -> Self {
        Self {
            token: token.into(),
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Create a prediction.
    ///
    /// ## Arguments
    ///
    /// * `version` - The ID of the model version to run.
    /// * `input` - The input map; its shape depends on the model.
    pub async fn create_prediction(&self, version: &str, input: Value) -> Result<Prediction, Error> {
        let body = json!({ "version": version, "input": input });
        self.fetch(Method::Post, "predictions", None, Some(body)).await
    }

    /// Get a prediction by ID.
    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, Error> {
        self.fetch(Method::Get, &format!("predictions/{id}"), None, None)
            .await
    }

    /// Get a page of predictions.
    pub async fn list_predictions(&self, cursor: Option<&Cursor>) -> Result<Page<Prediction>, Error> {
        self.fetch(Method::Get, "predictions", cursor, None).await
    }

    /// Get a model.
    pub async fn get_model(&self, id: &ModelId) -> Result<Model, Error> {
        let path = format!("models/{}/{}", id.owner(), id.name());
        self.fetch(Method::Get, &path, None, None).await
    }

    /// Get a page of versions for a model.
    pub async fn list_model_versions(
        &self,
        id: &ModelId,
        cursor: Option<&Cursor>,
    ) -> Result<Page<Version>, Error> {
        let path = format!("models/{}/{}/versions", id.owner(), id.name());
        self.fetch(Method::Get, &path, cursor, None).await
    }

    /// Get a single model version.
    pub async fn get_model_version(&self, id: &ModelId, version: &str) -> Result<Version, Error> {
        let path = format!("models/{}/{}/versions/{version}", id.owner(), id.name());
        self.fetch(Method::Get, &path, None, None).await
    }

    /// Get a curated collection of models by slug.
    pub async fn get_model_collection(&self, slug: &str) -> Result<Collection, Error> {
        self.fetch(Method::Get, &format!("collections/{slug}"), None, None)
            .await
    }

    /// The generic fetch-and-decode funnel every resource call goes through.
    ///
    /// A cursor, when present, is appended verbatim as the `cursor` query
    /// parameter. Responses in 200..=299 decode as `T`; anything else is
    /// decoded as the `{"detail": ...}` error envelope, falling back to a
    /// generic error carrying the raw body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        cursor: Option<&Cursor>,
        body: Option<Value>,
    ) -> Result<T, Error> {
        let mut url = self.base_url.join(path)?;
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("cursor", cursor.as_str());
        }

        debug!("{} {}", method.as_str(), url);

        let mut request = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        }
        .header(AUTHORIZATION, format!("Token {}", self.token))
        .header(ACCEPT, "application/json");

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        #[derive(serde::Deserialize)]
        struct ErrorEnvelope {
            detail: String,
        }

        match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
            Ok(envelope) => Err(Error::Api {
                status: status.as_u16(),
                detail: envelope.detail,
            }),
            Err(_) => Err(Error::UnexpectedResponse {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}
