//! Cursor-based pagination primitives.
//!
//! List endpoints return an envelope of the form
//! `{"results": [...], "next": <url-or-null>, "previous": <url-or-null>}`
//! where `next`/`previous` are absolute URLs embedding the cursor as a
//! `cursor` query parameter. Only that opaque parameter value is kept; it is
//! sent back verbatim on the next request.

use std::fmt;

use serde::{Deserialize, Deserializer, de};
use url::Url;

/// An opaque pointer to a page of results.
///
/// A cursor is never reinterpreted after extraction: the value round-trips
/// byte-for-byte into the `cursor` query parameter of the next request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Creates a cursor from a raw value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw cursor value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    /// Extracts the `cursor` query parameter from a pagination URL.
    ///
    /// A value that is present but is not a valid URL, or that lacks the
    /// `cursor` parameter, fails the decode of the entire page; there is no
    /// null-cursor fallback.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let url = Url::parse(&raw)
            .map_err(|_| de::Error::custom(format!("invalid pagination URL: {raw}")))?;

        url.query_pairs()
            .find(|(key, _)| key == "cursor")
            .map(|(_, value)| Cursor(value.into_owned()))
            .ok_or_else(|| {
                de::Error::custom(format!("pagination URL has no cursor parameter: {raw}"))
            })
    }
}

/// A single page of results from a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// A pointer to the previous page, if any.
    #[serde(default)]
    pub previous: Option<Cursor>,

    /// A pointer to the next page, if any.
    #[serde(default)]
    pub next: Option<Cursor>,

    /// The results for this page, in server order.
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: String,
    }

    #[test]
    fn cursor_extracted_from_next_url() {
        let json = r#"{
            "results": [{"id": "a"}],
            "next": "https://api.example/v1/predictions?cursor=abc123",
            "previous": null
        }"#;

        let page: Page<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.next, Some(Cursor::from("abc123")));
        assert_eq!(page.previous, None);
        assert_eq!(page.results.len(), 1);
    }

    #[test]
    fn cursor_value_is_kept_verbatim() {
        // Percent-decoded once by the query parser, then treated as opaque.
        let json = r#""https://api.example/v1/predictions?cursor=cD0yMDIyLTAxLTIxKzIzJTNBMTglM0EyNC41MzAzNTclMkIwMCUzQTAw""#;
        let cursor: Cursor = serde_json::from_str(json).unwrap();
        assert_eq!(
            cursor.as_str(),
            "cD0yMDIyLTAxLTIxKzIzJTNBMTglM0EyNC41MzAzNTclMkIwMCUzQTAw"
        );
    }

    #[test]
    fn malformed_next_url_fails_whole_page() {
        let json = r#"{
            "results": [],
            "next": "not-a-url",
            "previous": null
        }"#;

        let page: Result<Page<Item>, _> = serde_json::from_str(json);
        assert!(page.is_err());
    }

    #[test]
    fn next_url_without_cursor_param_fails() {
        let json = r#"{
            "results": [],
            "next": "https://api.example/v1/predictions?page=2",
            "previous": null
        }"#;

        let page: Result<Page<Item>, _> = serde_json::from_str(json);
        assert!(page.is_err());
    }

    #[test]
    fn absent_cursors_decode_as_none() {
        let json = r#"{"results": []}"#;
        let page: Page<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }
}
