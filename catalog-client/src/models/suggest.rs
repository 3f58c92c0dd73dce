// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Entity types that have a typeahead source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Agent,
    Authority,
    Instance,
    Person,
    Topic,
    Work,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Agent,
        EntityType::Authority,
        EntityType::Instance,
        EntityType::Person,
        EntityType::Topic,
        EntityType::Work,
    ];

    /// Value of the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Agent => "Agent",
            EntityType::Authority => "Authority",
            EntityType::Instance => "Instance",
            EntityType::Person => "Person",
            EntityType::Topic => "Topic",
            EntityType::Work => "Work",
        }
    }

    /// Key holding the display text in a suggestion row
    pub fn display_key(&self) -> &'static str {
        match self {
            EntityType::Agent => "agent",
            EntityType::Authority => "authority",
            EntityType::Instance => "instance",
            EntityType::Person => "person",
            EntityType::Topic => "topic",
            EntityType::Work => "work",
        }
    }

    /// Section header rendered above the source's suggestions
    pub fn header(&self) -> &'static str {
        match self {
            EntityType::Agent => "Agents (People/Organizations)",
            EntityType::Authority => "Authorities",
            EntityType::Instance => "Instances",
            EntityType::Person => "People",
            EntityType::Topic => "Topics",
            EntityType::Work => "Works",
        }
    }
}

impl FromStr for EntityType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::InvalidRoute(format!("unknown entity type '{}'", s)))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One suggestion row: `{<display key>: text, uuid: id}`.
///
/// Kept as a raw map because selection resolves the entity type from
/// whichever non-identifier key the row carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionDatum(pub Map<String, Value>);

/// Identifier keys a suggestion row may use
pub const IDENTIFIER_KEYS: [&str; 2] = ["uuid", "id"];

impl SuggestionDatum {
    pub fn new(key: &str, text: &str, id: &str) -> Self {
        let mut map = Map::new();
        map.insert(key.to_string(), Value::String(text.to_string()));
        map.insert("uuid".to_string(), Value::String(id.to_string()));
        Self(map)
    }

    pub fn id(&self) -> Option<&str> {
        IDENTIFIER_KEYS
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_str))
    }

    /// The single key other than the identifier
    pub fn type_key(&self) -> Option<&str> {
        let mut keys = self
            .0
            .keys()
            .filter(|key| !IDENTIFIER_KEYS.contains(&key.as_str()));
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key.as_str()),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// A group of suggestions produced by one source
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionGroup {
    pub entity: EntityType,
    pub header: &'static str,
    pub items: Vec<SuggestionDatum>,
}

/// How a selected suggestion is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Navigate to `#item/<type>/<id>`
    #[default]
    HashRoute,
    /// Full page load of `/<id>`
    Redirect,
}

impl FromStr for SelectionMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash_route" => Ok(SelectionMode::HashRoute),
            "redirect" => Ok(SelectionMode::Redirect),
            _ => Err(CatalogError::Config(format!(
                "selection mode must be 'hash_route' or 'redirect', got: {}",
                s
            ))),
        }
    }
}

/// Where the view goes after a suggestion is picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    HashRoute(String),
    Redirect(String),
}
