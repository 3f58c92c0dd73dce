// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Default page size (shard size) requested per search call
pub const DEFAULT_PAGE_SIZE: u64 = 8;

/// Form body posted to the catalog search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// CSRF token issued by the page that hosts the search form
    pub csrf_token: String,
    /// Keyword phrase typed by the user
    pub phrase: String,
    /// Pagination offset
    pub from: u64,
    /// Number of hits requested
    pub size: u64,
    /// Backend search mode (`kw` for keyword search)
    pub search_type: String,
}

/// Cover art reference carried by a flat document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default, deserialize_with = "lenient")]
    pub src: Option<String>,
    #[serde(default)]
    pub url: Option<Value>,
}

/// A holding location together with its circulation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub location: String,
    #[serde(
        rename = "circulationStatus",
        default,
        deserialize_with = "lenient_list"
    )]
    pub circulation_status: Option<Vec<String>>,
}

/// Creator(s) of a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Single(String),
    Many(Vec<String>),
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Single(name) => write!(f, "{}", name),
            Author::Many(names) => write!(f, "{}", names.join(", ")),
        }
    }
}

/// Hit already expanded by the catalog backend.
///
/// Every field is read on its own: a malformed value becomes `None` (or is
/// dropped from its list) without affecting the rest of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatDocument {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_author")]
    pub creators: Option<Author>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover: Option<Cover>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub held_items: Option<Vec<Location>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub locations: Option<Vec<Location>>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

// Keeps the well-formed entries of a list and drops the rest.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_author<'de, D>(deserializer: D) -> std::result::Result<Option<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    let author = match Value::deserialize(deserializer)? {
        Value::String(name) => Some(Author::Single(name)),
        Value::Array(items) => {
            let names: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect();
            (!names.is_empty()).then_some(Author::Many(names))
        }
        _ => None,
    };
    Ok(author)
}

/// Raw hit as stored in the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

/// One raw search result document in any of the shapes the backend emits.
///
/// Variant order matters: the envelope requires `_id`/`_source`, the flat
/// document accepts any object, and anything else is kept as-is so a single
/// odd hit never fails the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawHit {
    Indexed(IndexedHit),
    Flat(FlatDocument),
    Unrecognized(Value),
}

/// Display record produced from a single hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub title: String,
    pub author: Author,
    pub cover_url: String,
    pub url: Option<String>,
    pub locations: Vec<Location>,
    pub held_items: Vec<Location>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHits {
    List(Vec<RawHit>),
    Envelope {
        hits: Vec<RawHit>,
        #[serde(default)]
        total: Option<Value>,
    },
}

/// Search response exactly as it arrives on the wire
#[derive(Debug, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    from: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    hits: Option<RawHits>,
}

/// Normalized search response
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// Backend reported an application-level error
    Failure { message: String },
    /// Expanded hits with pagination metadata
    Page {
        from: u64,
        total: u64,
        hits: Vec<RawHit>,
    },
    /// Index envelope; `total` is only known when the index reports it
    Envelope { total: Option<u64>, hits: Vec<RawHit> },
}

impl SearchResponse {
    /// Decode and normalize a response body
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawSearchResponse = serde_json::from_str(body)?;
        Self::normalize(raw)
    }

    /// Collapse the accepted wire shapes into one enum
    pub fn normalize(raw: RawSearchResponse) -> Result<Self> {
        if raw.message.as_deref() == Some("error") {
            return Ok(SearchResponse::Failure {
                message: raw.body.unwrap_or_else(|| "Search failed".to_string()),
            });
        }

        match raw.hits {
            Some(RawHits::List(hits)) => {
                let (from, total) = raw.from.zip(raw.total).ok_or_else(|| {
                    CatalogError::Decode("hit list without from/total".to_string())
                })?;
                Ok(SearchResponse::Page { from, total, hits })
            }
            Some(RawHits::Envelope { hits, total }) => Ok(SearchResponse::Envelope {
                total: total.as_ref().and_then(envelope_total),
                hits,
            }),
            None => Err(CatalogError::Decode("response carries no hits".to_string())),
        }
    }

    pub fn hit_count(&self) -> usize {
        match self {
            SearchResponse::Failure { .. } => 0,
            SearchResponse::Page { hits, .. } | SearchResponse::Envelope { hits, .. } => hits.len(),
        }
    }
}

// Index totals are either a bare number or `{ "value": n, ... }`.
fn envelope_total(total: &Value) -> Option<u64> {
    total
        .as_u64()
        .or_else(|| total.get("value").and_then(Value::as_u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_is_failure() {
        let response =
            SearchResponse::from_json(r#"{"message": "error", "body": "Index offline"}"#).unwrap();
        assert_eq!(
            response,
            SearchResponse::Failure {
                message: "Index offline".to_string()
            }
        );
    }

    #[test]
    fn test_error_without_body_gets_default_message() {
        let response = SearchResponse::from_json(r#"{"message": "error"}"#).unwrap();
        assert_eq!(
            response,
            SearchResponse::Failure {
                message: "Search failed".to_string()
            }
        );
    }

    #[test]
    fn test_flat_page_response() {
        let body = json!({
            "from": 8,
            "total": 20,
            "hits": [{"uuid": "a1", "title": "Moby Dick", "creators": "Melville"}]
        });
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        match response {
            SearchResponse::Page { from, total, hits } => {
                assert_eq!(from, 8);
                assert_eq!(total, 20);
                assert_eq!(hits.len(), 1);
                assert!(matches!(hits[0], RawHit::Flat(_)));
            }
            other => panic!("expected page, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_response() {
        let body = json!({
            "hits": {"hits": [{"_id": "x", "_type": "Instance", "_source": {}}]}
        });
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        match response {
            SearchResponse::Envelope { total, hits } => {
                assert_eq!(total, None);
                assert!(matches!(hits[0], RawHit::Indexed(_)));
            }
            other => panic!("expected envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_total_object_form() {
        let body = json!({"hits": {"total": {"value": 42}, "hits": []}});
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        assert_eq!(
            response,
            SearchResponse::Envelope {
                total: Some(42),
                hits: vec![]
            }
        );
    }

    #[test]
    fn test_list_without_pagination_is_decode_error() {
        let result = SearchResponse::from_json(r#"{"hits": []}"#);
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_non_object_hit_is_kept() {
        let body = json!({"from": 0, "total": 1, "hits": [42]});
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        assert_eq!(response.hit_count(), 1);
        match response {
            SearchResponse::Page { hits, .. } => {
                assert!(matches!(hits[0], RawHit::Unrecognized(_)))
            }
            other => panic!("expected page, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_optional_fields_keep_flat_document() {
        let body = json!({
            "from": 0,
            "total": 1,
            "hits": [{
                "uuid": "a1",
                "title": "Moby Dick",
                "creators": ["Melville", 7],
                "cover": "not-an-object",
                "locations": [
                    {"location": null, "circulationStatus": ["Available"]},
                    "Main stacks",
                    {"location": "Reading room", "circulationStatus": [null, "On loan"]}
                ],
                "held_items": {"unexpected": true}
            }]
        });
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        let SearchResponse::Page { hits, .. } = response else {
            panic!("expected page");
        };
        let RawHit::Flat(doc) = &hits[0] else {
            panic!("expected flat document, got {:?}", hits[0]);
        };

        assert_eq!(doc.uuid, "a1");
        assert_eq!(doc.title.as_deref(), Some("Moby Dick"));
        assert_eq!(doc.creators, Some(Author::Many(vec!["Melville".to_string()])));
        assert_eq!(doc.cover, None);
        assert_eq!(doc.held_items, None);

        let locations = doc.locations.as_ref().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].location, "");
        assert_eq!(
            locations[1].circulation_status,
            Some(vec!["On loan".to_string()])
        );
    }

    #[test]
    fn test_author_display() {
        assert_eq!(Author::Single("Melville".into()).to_string(), "Melville");
        assert_eq!(
            Author::Many(vec!["Strunk".into(), "White".into()]).to_string(),
            "Strunk, White"
        );
    }

    #[test]
    fn test_request_serializes_form_fields() {
        let request = SearchRequest {
            csrf_token: "tok".to_string(),
            phrase: "jazz".to_string(),
            from: 0,
            size: 8,
            search_type: "kw".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["phrase"], "jazz");
        assert_eq!(value["from"], 0);
        assert_eq!(value["size"], 8);
    }
}
