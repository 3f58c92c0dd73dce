// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! The catalog search view: a single owner for the search, route and
//! suggestion controllers, wiring user input through route replay into
//! searches.
//!
//! This module is `pub` so that integration tests can drive a view with
//! scripted transports.

use crate::error::Result;
use crate::models::route::{FilterOption, Route, SortOption};
use crate::models::search::ResultRecord;
use crate::models::settings::ClientConfig;
use crate::models::suggest::{Navigation, SuggestionDatum, SuggestionGroup};
use crate::services::route::{RouteChange, RouteController};
use crate::services::search::{ApplyOutcome, SearchController, SearchState, SearchTransport};
use crate::services::seen_store::SeenStore;
use crate::services::suggest::{SuggestController, SuggestTransport};
use tracing::warn;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `CATALOG_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("CATALOG_VERSION");

/// What a navigation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResult {
    pub change: RouteChange,
    /// Present when the route started a fresh search
    pub search: Option<ApplyOutcome>,
}

pub struct CatalogView<S, T> {
    search: SearchController<S>,
    routes: RouteController,
    suggest: SuggestController<T>,
}

impl<S: SearchTransport, T: SuggestTransport> CatalogView<S, T> {
    pub fn new(
        search: SearchController<S>,
        routes: RouteController,
        suggest: SuggestController<T>,
    ) -> Self {
        Self {
            search,
            routes,
            suggest,
        }
    }

    /// Build a view from configuration, optionally de-duplicating results
    pub fn from_config(
        config: &ClientConfig,
        search_transport: S,
        suggest_transport: T,
        seen: Option<Box<dyn SeenStore>>,
    ) -> Self {
        let mut search = SearchController::from_config(search_transport, config);
        if let Some(store) = seen {
            search = search.with_seen_store(store);
        }
        Self::new(
            search,
            RouteController::new(),
            SuggestController::from_config(suggest_transport, config),
        )
    }

    pub fn state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn results(&self) -> &[ResultRecord] {
        self.search.results()
    }

    pub fn routes(&self) -> &RouteController {
        &self.routes
    }

    pub fn search_controller(&self) -> &SearchController<S> {
        &self.search
    }

    pub fn suggest_controller(&self) -> &SuggestController<T> {
        &self.suggest
    }

    pub fn toolbar_visible(&self) -> bool {
        self.routes.toolbar_visible()
    }

    /// Replay a fragment; a route with a phrase starts a fresh search
    pub async fn navigate(&mut self, fragment: &str) -> Result<NavigationResult> {
        let change = self.routes.navigate(fragment).inspect_err(|e| {
            warn!(fragment, error = %e, "Ignoring unparseable route");
        })?;

        let search = match &change.search {
            Some(phrase) => Some(self.search.new_search(phrase).await),
            None => None,
        };

        Ok(NavigationResult { change, search })
    }

    /// Submit the search box: pushes a fragment carrying the phrase
    pub async fn submit_phrase(&mut self, phrase: &str) -> Result<NavigationResult> {
        let fragment = self.routes.set_phrase(phrase);
        self.navigate(&fragment).await
    }

    /// Change the sort; the new fragment is replayed rather than searched directly
    pub async fn change_sort(&mut self, sort: SortOption) -> Result<NavigationResult> {
        let fragment = self.routes.set_sort(sort);
        self.navigate(&fragment).await
    }

    pub async fn change_filter(&mut self, filter: FilterOption) -> Result<NavigationResult> {
        let fragment = self.routes.set_filter(filter);
        self.navigate(&fragment).await
    }

    pub async fn load_more(&mut self) -> Option<ApplyOutcome> {
        self.search.load_more().await
    }

    pub async fn suggest(&mut self, prefix: &str) -> Vec<SuggestionGroup> {
        self.suggest.suggest(prefix).await
    }

    /// Open a suggestion; hash routes are replayed in place
    pub async fn select_suggestion(&mut self, datum: &SuggestionDatum) -> Result<Navigation> {
        let navigation = self.suggest.select(datum)?;
        if let Navigation::HashRoute(fragment) = &navigation {
            self.navigate(fragment).await?;
        }
        Ok(navigation)
    }

    /// Item currently shown by an `#item/...` route
    pub fn current_item(&self) -> Option<(String, String)> {
        match crate::services::route::parse_fragment(self.routes.fragment()) {
            Ok(Route::Item { entity, id }) => Some((entity, id)),
            _ => None,
        }
    }

    pub fn render_summary(&self) -> String {
        self.search.state().result_summary_text()
    }
}
