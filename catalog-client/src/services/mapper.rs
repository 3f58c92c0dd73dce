// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Normalizes raw search hits into display records.

use crate::models::search::{Author, FlatDocument, IndexedHit, RawHit, ResultRecord};
use serde_json::{Map, Value};

/// Cover shown when a hit carries no cover art
pub const PLACEHOLDER_COVER: &str = "/static/images/cover-placeholder.png";
pub const UNKNOWN_TITLE: &str = "Title unknown";
pub const UNKNOWN_AUTHOR: &str = "Author unknown";

type TitleExtractor = fn(&Map<String, Value>) -> Option<String>;

/// Title sources for index documents, tried strictly in this order.
/// Each entry pairs the key whose presence selects the extractor with the
/// extractor itself.
const TITLE_EXTRACTORS: [(&str, TitleExtractor); 3] = [
    ("bf:workTitle", structured_title),
    ("bf:title", plain_title),
    ("bf:titleStatement", title_statement),
];

/// Map one raw hit to a display record
pub fn map_hit(hit: &RawHit) -> ResultRecord {
    match hit {
        RawHit::Flat(doc) => map_flat(doc),
        RawHit::Indexed(indexed) => map_indexed(indexed),
        RawHit::Unrecognized(_) => unknown_record(),
    }
}

fn map_flat(doc: &FlatDocument) -> ResultRecord {
    let cover_url = doc
        .cover
        .as_ref()
        .and_then(|cover| cover.src.clone())
        .unwrap_or_else(|| PLACEHOLDER_COVER.to_string());

    ResultRecord {
        id: doc.uuid.clone(),
        title: doc
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author: doc
            .creators
            .clone()
            .unwrap_or_else(|| Author::Single(UNKNOWN_AUTHOR.to_string())),
        cover_url,
        url: doc.url.clone(),
        locations: doc.locations.clone().unwrap_or_default(),
        held_items: doc.held_items.clone().unwrap_or_default(),
    }
}

fn map_indexed(hit: &IndexedHit) -> ResultRecord {
    let url = if hit.doc_type.is_empty() {
        None
    } else {
        Some(format!("{}/{}", hit.doc_type, hit.id))
    };

    ResultRecord {
        id: hit.id.clone(),
        title: extract_title(&hit.source),
        author: Author::Single(UNKNOWN_AUTHOR.to_string()),
        cover_url: PLACEHOLDER_COVER.to_string(),
        url,
        locations: Vec::new(),
        held_items: Vec::new(),
    }
}

fn unknown_record() -> ResultRecord {
    ResultRecord {
        id: String::new(),
        title: UNKNOWN_TITLE.to_string(),
        author: Author::Single(UNKNOWN_AUTHOR.to_string()),
        cover_url: PLACEHOLDER_COVER.to_string(),
        url: None,
        locations: Vec::new(),
        held_items: Vec::new(),
    }
}

/// Title of an index `_source` document.
///
/// The first key that is present decides; a present key whose value is
/// unusable yields the fallback rather than falling through.
pub fn extract_title(source: &Map<String, Value>) -> String {
    TITLE_EXTRACTORS
        .iter()
        .find(|(key, _)| source.contains_key(*key))
        .and_then(|(_, extract)| extract(source))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

fn structured_title(source: &Map<String, Value>) -> Option<String> {
    let first = first_entry(source.get("bf:workTitle")?)?;
    first_text(first.get("bf:titleValue")?)
}

fn plain_title(source: &Map<String, Value>) -> Option<String> {
    first_text(source.get("bf:title")?)
}

fn title_statement(source: &Map<String, Value>) -> Option<String> {
    first_text(source.get("bf:titleStatement")?)
}

fn first_entry(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

fn first_text(value: &Value) -> Option<String> {
    first_entry(value)?.as_str().map(str::to_string)
}
