// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Two-way binding between the URL fragment and the search selections.
//!
//! Fragment grammar:
//!
//! * `#<sort>/<filter>/<phrase>`, with `$` (or `#$`) standing for no phrase
//! * `#<sort>/<filter>`, the legacy two-segment form
//! * `#item/<type>/<id>`, an item view opened from a suggestion
//! * an empty fragment, which resolves to `Relevance/All` with no phrase

use crate::error::{CatalogError, Result};
use crate::models::route::{FilterOption, Route, RouteState, SortOption};
use tracing::{debug, info};

/// Phrase segment meaning "no phrase"
pub const EMPTY_PHRASE_SENTINEL: &str = "$";

const ITEM_PREFIX: &str = "item";

/// Decode a fragment (with or without the leading `#`)
pub fn parse_fragment(fragment: &str) -> Result<Route> {
    let body = fragment.strip_prefix('#').unwrap_or(fragment);
    if body.is_empty() {
        return Ok(Route::Search(RouteState::default()));
    }

    let segments: Vec<&str> = body.splitn(3, '/').collect();
    match segments.as_slice() {
        [ITEM_PREFIX, entity, id] if !entity.is_empty() && !id.is_empty() => Ok(Route::Item {
            entity: entity.to_string(),
            id: id.to_string(),
        }),
        [sort, filter] => Ok(Route::Search(RouteState {
            sort: sort.parse()?,
            filter: filter.parse()?,
            query_phrase: String::new(),
        })),
        [sort, filter, phrase] => Ok(Route::Search(RouteState {
            sort: sort.parse()?,
            filter: filter.parse()?,
            query_phrase: decode_phrase(phrase)?,
        })),
        _ => Err(CatalogError::InvalidRoute(fragment.to_string())),
    }
}

fn decode_phrase(segment: &str) -> Result<String> {
    let segment = segment.strip_prefix('#').unwrap_or(segment);
    if segment.is_empty() || segment == EMPTY_PHRASE_SENTINEL {
        return Ok(String::new());
    }
    urlencoding::decode(segment)
        .map(|phrase| phrase.trim().to_string())
        .map_err(|e| CatalogError::InvalidRoute(format!("bad phrase encoding: {}", e)))
}

impl RouteState {
    /// Encode as `#<sort>/<filter>/<phrase>`; an empty phrase becomes `#$`
    pub fn to_fragment(&self) -> String {
        let phrase = if self.query_phrase.is_empty() {
            format!("#{}", EMPTY_PHRASE_SENTINEL)
        } else {
            urlencoding::encode(&self.query_phrase).into_owned()
        };
        format!("#{}/{}/{}", self.sort, self.filter, phrase)
    }
}

/// Effects of replaying a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub route: Route,
    pub toolbar_visible: bool,
    /// Phrase to search from offset 0, when the route carries one
    pub search: Option<String>,
}

/// Owns the current route selections
#[derive(Debug, Default)]
pub struct RouteController {
    current: RouteState,
    toolbar_visible: bool,
    fragment: String,
}

impl RouteController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &RouteState {
        &self.current
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible
    }

    /// Last fragment replayed
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Replay a fragment into the route state
    pub fn navigate(&mut self, fragment: &str) -> Result<RouteChange> {
        let route = parse_fragment(fragment)?;
        self.fragment = fragment.to_string();

        let search = match &route {
            Route::Search(state) => {
                self.current = state.clone();
                self.toolbar_visible = !state.query_phrase.is_empty();
                (!state.query_phrase.is_empty()).then(|| state.query_phrase.clone())
            }
            Route::Item { entity, id } => {
                debug!(%entity, %id, "Item route, search selections unchanged");
                None
            }
        };

        info!(
            fragment,
            toolbar = self.toolbar_visible,
            search = search.is_some(),
            "Route replayed"
        );

        Ok(RouteChange {
            route,
            toolbar_visible: self.toolbar_visible,
            search,
        })
    }

    /// Fragment to push for a new sort; filter and phrase are kept
    pub fn set_sort(&self, sort: SortOption) -> String {
        RouteState {
            sort,
            ..self.current.clone()
        }
        .to_fragment()
    }

    /// Fragment to push for a new filter; sort and phrase are kept
    pub fn set_filter(&self, filter: FilterOption) -> String {
        RouteState {
            filter,
            ..self.current.clone()
        }
        .to_fragment()
    }

    /// Fragment to push for a newly typed phrase
    pub fn set_phrase(&self, phrase: &str) -> String {
        RouteState {
            query_phrase: phrase.trim().to_string(),
            ..self.current.clone()
        }
        .to_fragment()
    }
}
