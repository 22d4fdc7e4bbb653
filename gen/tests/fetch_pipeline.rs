//! Pipeline tests against a mock API server, covering version resolution
//! and end-to-end generation over HTTP.

use replicate_client::{Client, ModelId};
use replicate_gen::{GeneratorError, generate};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    Client::with_base_url("test-token", base_url)
}

fn model_id() -> ModelId {
    "lambdal/text-to-pokemon".parse().unwrap()
}

fn schema_document() -> serde_json::Value {
    json!({
        "openapi": "3.0.2",
        "components": {
            "schemas": {
                "Input": {
                    "type": "object",
                    "required": ["prompt"],
                    "properties": {
                        "prompt": {"type": "string", "description": "Text prompt"},
                        "num_outputs": {"type": "integer", "default": 1}
                    }
                },
                "Output": {
                    "type": "array",
                    "items": {"type": "string"}
                }
            }
        }
    })
}

fn version_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "created_at": "2022-09-04T17:57:04.418669Z",
        "openapi_schema": schema_document()
    })
}

fn model_body(latest: Option<serde_json::Value>) -> serde_json::Value {
    json!({
        "owner": "lambdal",
        "name": "text-to-pokemon",
        "url": "https://replicate.com/lambdal/text-to-pokemon",
        "description": "Generate Pokemon from a text description",
        "visibility": "public",
        "latest_version": latest
    })
}

#[tokio::test]
async fn generates_from_latest_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(model_body(Some(version_body("latest1")))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = generate(&client_for(&server), &model_id(), None, None)
        .await
        .unwrap();

    assert!(source.contains("pub struct TextToPokemon;"));
    assert!(source.contains("pub const MODEL_ID: &'static str = \"lambdal/text-to-pokemon\";"));
    assert!(source.contains("pub const VERSION_ID: &'static str = \"latest1\";"));
    assert!(source.contains("pub type TextToPokemonOutput = Vec<String>;"));
    assert!(source.contains("impl replicate_client::Predictable for TextToPokemon"));
}

#[tokio::test]
async fn explicit_version_is_fetched_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(model_body(Some(version_body("latest1")))),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The latest version must not be used when an explicit one is given.
    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon/versions/pinned2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(version_body("pinned2")))
        .expect(1)
        .mount(&server)
        .await;

    let source = generate(&client_for(&server), &model_id(), Some("pinned2"), None)
        .await
        .unwrap();

    assert!(source.contains("pub const VERSION_ID: &'static str = \"pinned2\";"));
}

#[tokio::test]
async fn missing_explicit_version_reports_version_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_body(None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon/versions/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = generate(&client_for(&server), &model_id(), Some("gone"), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::VersionNotFound { ref model } if model == "lambdal/text-to-pokemon"
    ));
}

#[tokio::test]
async fn model_without_latest_version_makes_no_version_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_body(None)))
        .expect(1)
        .mount(&server)
        .await;

    // Any other request would fail the received-requests assertion below.
    let err = generate(&client_for(&server), &model_id(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::VersionNotFound { .. }));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn document_without_input_schema_is_reported() {
    let server = MockServer::start().await;

    let empty_version = json!({
        "id": "v1",
        "created_at": "2022-09-04T17:57:04.418669Z",
        "openapi_schema": {"openapi": "3.0.2"}
    });

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_body(Some(empty_version))))
        .mount(&server)
        .await;

    let err = generate(&client_for(&server), &model_id(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::SchemaNotFound));
}

#[tokio::test]
async fn name_override_replaces_derived_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(model_body(Some(version_body("v1")))),
        )
        .mount(&server)
        .await;

    let source = generate(&client_for(&server), &model_id(), None, Some("Pokedex"))
        .await
        .unwrap();

    assert!(source.contains("pub struct Pokedex;"));
    assert!(source.contains("pub struct PokedexInput"));
    assert!(!source.contains("TextToPokemon"));
}

#[tokio::test]
async fn api_errors_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/lambdal/text-to-pokemon"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let err = generate(&client_for(&server), &model_id(), None, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GeneratorError::Client(replicate_client::Error::Api { status: 401, .. })
    ));
}
