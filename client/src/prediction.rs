//! Prediction resources.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::error::Error;
use crate::timestamp;

/// The lifecycle state of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    /// The prediction is waiting to start.
    Starting,
    /// The prediction is running.
    Processing,
    /// The prediction finished successfully.
    Succeeded,
    /// The prediction failed.
    Failed,
    /// The prediction was canceled.
    Canceled,
}

impl PredictionStatus {
    /// Returns `true` once the prediction can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// A single run of a model version.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    /// The ID of the prediction.
    pub id: String,

    /// The ID of the model version that produced this prediction.
    pub version: String,

    /// The lifecycle state.
    pub status: PredictionStatus,

    /// The input the prediction was created with.
    #[serde(default)]
    pub input: Value,

    /// The output, once the prediction has succeeded.
    #[serde(default)]
    pub output: Option<Value>,

    /// The failure message, if the prediction failed.
    #[serde(default)]
    pub error: Option<String>,

    /// Log output captured while the prediction ran.
    #[serde(default)]
    pub logs: Option<String>,

    /// When the prediction was created.
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,

    /// When the prediction started running.
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the prediction reached a terminal state.
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A model binding that can run predictions with typed input.
///
/// Generated bindings implement this so callers get a one-call typed entry
/// point instead of assembling raw JSON input themselves.
///
/// ## Examples
///
/// ```rust,ignore
/// use replicate_client::{Client, Predictable};
///
/// let client = Client::new("r8_xxx");
/// let prediction = TextToPokemon::predict(
///     &client,
///     TextToPokemonInput {
///         prompt: "a pokemon that looks like a teapot".to_string(),
///         ..Default::default()
///     },
/// )
/// .await?;
/// ```
pub trait Predictable {
    /// The typed input the model accepts.
    type Input: Serialize + Send;

    /// The `owner/name` identifier of the model.
    const MODEL_ID: &'static str;

    /// The model version the binding was generated from.
    const VERSION_ID: &'static str;

    /// Creates a prediction for this binding's version from typed input.
    fn predict(
        client: &Client,
        input: Self::Input,
    ) -> impl Future<Output = Result<Prediction, Error>> + Send {
        async move {
            let input = serde_json::to_value(input)?;
            client.create_prediction(Self::VERSION_ID, input).await
        }
    }
}
