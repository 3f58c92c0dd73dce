// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Typeahead suggestions: one source per entity type, each a small local
//! token index fed by a remote lookup.

use crate::error::{CatalogError, Result};
use crate::models::settings::ClientConfig;
use crate::models::suggest::{
    EntityType, Navigation, SelectionMode, SuggestionDatum, SuggestionGroup,
};
use anyhow::Context;
use futures::future::join_all;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Placeholder replaced by the typed prefix in a remote template
pub const QUERY_PLACEHOLDER: &str = "%QUERY";

/// Suggestions shown per source
pub const MAX_SUGGESTIONS: usize = 5;

/// Datums kept in each source's local index
pub const MAX_INDEXED: usize = 500;

/// Order in which sources are rendered under the search box
pub const SOURCE_ORDER: [EntityType; 6] = [
    EntityType::Work,
    EntityType::Instance,
    EntityType::Agent,
    EntityType::Topic,
    EntityType::Person,
    EntityType::Authority,
];

/// How datum text is split into searchable tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokenizer {
    Whitespace,
    /// Split on every non-alphanumeric character
    NonWord,
}

impl Tokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        match self {
            Tokenizer::Whitespace => lower.split_whitespace().map(str::to_string).collect(),
            Tokenizer::NonWord => lower
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Fetches suggestion rows from a remote path such as
/// `/typeahead?q=moby&type=Work`
#[allow(async_fn_in_trait)]
pub trait SuggestTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<SuggestionDatum>>;
}

/// Autocomplete source for one entity type
#[derive(Debug, Clone)]
pub struct SuggestionSource {
    entity: EntityType,
    remote_template: String,
    tokenizer: Tokenizer,
    datums: VecDeque<(Vec<String>, SuggestionDatum)>,
    ids: HashSet<String>,
}

impl SuggestionSource {
    pub fn new(entity: EntityType, typeahead_path: &str) -> Self {
        let tokenizer = match entity {
            EntityType::Topic => Tokenizer::NonWord,
            _ => Tokenizer::Whitespace,
        };
        Self {
            entity,
            remote_template: format!(
                "{}?q={}&type={}",
                typeahead_path,
                QUERY_PLACEHOLDER,
                entity.as_str()
            ),
            tokenizer,
            datums: VecDeque::new(),
            ids: HashSet::new(),
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn remote_template(&self) -> &str {
        &self.remote_template
    }

    pub fn len(&self) -> usize {
        self.datums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datums.is_empty()
    }

    /// Remote path for a query
    pub fn remote_url(&self, query: &str) -> String {
        self.remote_template
            .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query))
    }

    /// Add datums to the local index, skipping ids already indexed.
    /// The oldest datums are evicted once the index holds `MAX_INDEXED`.
    pub fn add(&mut self, datums: Vec<SuggestionDatum>) {
        let key = self.entity.display_key();
        for datum in datums {
            let Some(text) = datum.text(key) else {
                debug!(entity = %self.entity, "Suggestion row without display text");
                continue;
            };
            if let Some(id) = datum.id() {
                if !self.ids.insert(id.to_string()) {
                    continue;
                }
            }
            let tokens = self.tokenizer.tokenize(text);
            self.datums.push_back((tokens, datum));
        }

        while self.datums.len() > MAX_INDEXED {
            if let Some((_, evicted)) = self.datums.pop_front() {
                if let Some(id) = evicted.id() {
                    self.ids.remove(id);
                }
            }
        }
    }

    /// Datums where every query token prefixes some datum token
    pub fn search(&self, query: &str) -> Vec<SuggestionDatum> {
        self.matches(query).take(MAX_SUGGESTIONS).cloned().collect()
    }

    /// Rows the remote lookup returned for this query come first, then local
    /// matches; duplicates by id are shown once. The remote rows are indexed
    /// afterwards.
    pub fn merge(&mut self, remote: Vec<SuggestionDatum>, query: &str) -> Vec<SuggestionDatum> {
        let key = self.entity.display_key();
        let mut items: Vec<SuggestionDatum> = Vec::new();
        let candidates = remote
            .iter()
            .filter(|datum| datum.text(key).is_some())
            .chain(self.matches(query));

        for datum in candidates {
            if items.len() == MAX_SUGGESTIONS {
                break;
            }
            let duplicate = datum.id().is_some()
                && items.iter().any(|shown| shown.id() == datum.id());
            if !duplicate {
                items.push(datum.clone());
            }
        }

        self.add(remote);
        items
    }

    fn matches<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a SuggestionDatum> + 'a {
        let query_tokens = self.tokenizer.tokenize(query);
        self.datums
            .iter()
            .filter(move |(tokens, _)| {
                !query_tokens.is_empty()
                    && query_tokens
                        .iter()
                        .all(|q| tokens.iter().any(|t| t.starts_with(q.as_str())))
            })
            .map(|(_, datum)| datum)
    }
}

/// Drives the typeahead box
pub struct SuggestController<T> {
    transport: T,
    sources: Vec<SuggestionSource>,
    selection_mode: SelectionMode,
}

impl<T: SuggestTransport> SuggestController<T> {
    pub fn new(transport: T, typeahead_path: &str, selection_mode: SelectionMode) -> Self {
        let sources = SOURCE_ORDER
            .iter()
            .map(|entity| SuggestionSource::new(*entity, typeahead_path))
            .collect();
        Self {
            transport,
            sources,
            selection_mode,
        }
    }

    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::new(transport, &config.typeahead_path, config.selection_mode)
    }

    pub fn sources(&self) -> &[SuggestionSource] {
        &self.sources
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Look up `query` remotely in every source and merge the rows with local
    /// matches. A failing source still contributes what it already indexed.
    pub async fn suggest(&mut self, query: &str) -> Vec<SuggestionGroup> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let urls: Vec<String> = self.sources.iter().map(|s| s.remote_url(query)).collect();
        let transport = &self.transport;
        let fetched = join_all(urls.iter().map(|url| transport.fetch(url))).await;

        let mut groups = Vec::new();
        for (source, outcome) in self.sources.iter_mut().zip(fetched) {
            let remote = outcome.unwrap_or_else(|e| {
                warn!(entity = %source.entity, error = %e, "Suggestion lookup failed");
                Vec::new()
            });
            let items = source.merge(remote, query);
            if !items.is_empty() {
                groups.push(SuggestionGroup {
                    entity: source.entity,
                    header: source.entity.header(),
                    items,
                });
            }
        }
        groups
    }

    /// Resolve where a selected suggestion leads
    pub fn select(&self, datum: &SuggestionDatum) -> Result<Navigation> {
        let id = datum
            .id()
            .ok_or_else(|| CatalogError::InvalidRoute("suggestion without id".to_string()))?;
        let item_type = datum.type_key().ok_or_else(|| {
            CatalogError::InvalidRoute("suggestion without a single type key".to_string())
        })?;

        info!(%item_type, %id, "Suggestion selected");

        Ok(match self.selection_mode {
            SelectionMode::HashRoute => Navigation::HashRoute(format!("#item/{}/{}", item_type, id)),
            SelectionMode::Redirect => Navigation::Redirect(format!("/{}", id)),
        })
    }
}

/// Calls the catalog typeahead endpoint over HTTP
pub struct HttpSuggestTransport {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpSuggestTransport {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let base = config.endpoint("/")?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base })
    }
}

impl SuggestTransport for HttpSuggestTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<SuggestionDatum>> {
        let url = self
            .base
            .join(path)
            .map_err(|e| CatalogError::Transport(format!("Invalid typeahead URL: {}", e)))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Transport(format!(
                "typeahead endpoint returned {}",
                status
            )));
        }
        Ok(response.json::<Vec<SuggestionDatum>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned rows keyed by entity type
    #[derive(Default)]
    struct CannedTransport {
        rows: HashMap<&'static str, Vec<SuggestionDatum>>,
        failing: Vec<&'static str>,
        paths: RefCell<Vec<String>>,
    }

    impl SuggestTransport for CannedTransport {
        async fn fetch(&self, path: &str) -> Result<Vec<SuggestionDatum>> {
            self.paths.borrow_mut().push(path.to_string());
            let entity = path.rsplit("type=").next().unwrap_or_default();
            if self.failing.contains(&entity) {
                return Err(CatalogError::Transport("down".to_string()));
            }
            Ok(self.rows.get(entity).cloned().unwrap_or_default())
        }
    }

    fn controller(transport: CannedTransport) -> SuggestController<CannedTransport> {
        SuggestController::new(transport, "/typeahead", SelectionMode::HashRoute)
    }

    #[test]
    fn test_six_sources() {
        let controller = controller(CannedTransport::default());
        assert_eq!(controller.sources().len(), 6);
        assert_eq!(
            controller.sources()[0].remote_template(),
            "/typeahead?q=%QUERY&type=Work"
        );
    }

    #[test]
    fn test_remote_url_encodes_query() {
        let source = SuggestionSource::new(EntityType::Person, "/typeahead");
        assert_eq!(
            source.remote_url("moby dick"),
            "/typeahead?q=moby%20dick&type=Person"
        );
    }

    #[test]
    fn test_nonword_tokenizer() {
        assert_eq!(
            Tokenizer::NonWord.tokenize("Whaling--History, 19th"),
            vec!["whaling", "history", "19th"]
        );
        assert_eq!(
            Tokenizer::Whitespace.tokenize("Whaling--History"),
            vec!["whaling--history"]
        );
    }

    #[test]
    fn test_source_prefix_match() {
        let mut source = SuggestionSource::new(EntityType::Work, "/typeahead");
        source.add(vec![
            SuggestionDatum::new("work", "Moby Dick", "w1"),
            SuggestionDatum::new("work", "Billy Budd", "w2"),
        ]);
        let hits = source.search("mob di");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), Some("w1"));
        assert!(source.search("   ").is_empty());
    }

    #[test]
    fn test_source_skips_known_ids_and_rows_without_text() {
        let mut source = SuggestionSource::new(EntityType::Work, "/typeahead");
        source.add(vec![
            SuggestionDatum::new("work", "Moby Dick", "w1"),
            SuggestionDatum::new("work", "Moby Dick", "w1"),
            SuggestionDatum::new("topic", "Whales", "t1"),
        ]);
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_source_limits_results() {
        let mut source = SuggestionSource::new(EntityType::Work, "/typeahead");
        source.add(
            (0..10)
                .map(|i| SuggestionDatum::new("work", &format!("Jazz {}", i), &format!("w{}", i)))
                .collect(),
        );
        assert_eq!(source.search("jazz").len(), MAX_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_suggest_groups_by_source() {
        let mut transport = CannedTransport::default();
        transport
            .rows
            .insert("Work", vec![SuggestionDatum::new("work", "Moby Dick", "w1")]);
        transport.rows.insert(
            "Topic",
            vec![SuggestionDatum::new("topic", "Moby-Dick (Fictitious character)", "t1")],
        );
        let mut controller = controller(transport);

        let groups = controller.suggest("moby").await;

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].entity, EntityType::Work);
        assert_eq!(groups[0].header, "Works");
        assert_eq!(groups[1].entity, EntityType::Topic);
        assert_eq!(controller.transport().paths.borrow().len(), 6);
    }

    #[tokio::test]
    async fn test_failing_source_keeps_local_index() {
        let mut transport = CannedTransport::default();
        transport
            .rows
            .insert("Work", vec![SuggestionDatum::new("work", "Moby Dick", "w1")]);
        let mut controller = controller(transport);
        controller.suggest("moby").await;

        controller.transport.failing.push("Work");
        let groups = controller.suggest("moby").await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].id(), Some("w1"));
    }

    #[tokio::test]
    async fn test_topic_rows_from_remote_are_shown() {
        let mut transport = CannedTransport::default();
        transport.rows.insert(
            "Topic",
            vec![SuggestionDatum::new("topic", "Whaling--History", "t1")],
        );
        let mut controller = controller(transport);

        let groups = controller.suggest("whaling--h").await;

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entity, EntityType::Topic);
        assert_eq!(groups[0].items[0].id(), Some("t1"));
    }

    #[tokio::test]
    async fn test_remote_rows_shown_before_local_matches() {
        let mut transport = CannedTransport::default();
        transport
            .rows
            .insert("Work", vec![SuggestionDatum::new("work", "Moby Dick", "w1")]);
        let mut controller = controller(transport);
        controller.suggest("moby").await;

        // Server matched on a field the local index does not see
        controller.transport.rows.insert(
            "Work",
            vec![
                SuggestionDatum::new("work", "The Whale", "w2"),
                SuggestionDatum::new("work", "Moby Dick", "w1"),
            ],
        );
        let groups = controller.suggest("moby").await;

        let ids: Vec<_> = groups[0].items.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![Some("w2"), Some("w1")]);
    }

    #[test]
    fn test_topic_query_uses_source_tokenizer() {
        let mut source = SuggestionSource::new(EntityType::Topic, "/typeahead");
        source.add(vec![SuggestionDatum::new("topic", "Whaling--History", "t1")]);
        assert_eq!(source.search("whaling--hist").len(), 1);
    }

    #[test]
    fn test_index_evicts_oldest_when_full() {
        let mut source = SuggestionSource::new(EntityType::Work, "/typeahead");
        source.add(
            (0..MAX_INDEXED + 10)
                .map(|i| SuggestionDatum::new("work", &format!("Jazz {}", i), &format!("w{}", i)))
                .collect(),
        );
        assert_eq!(source.len(), MAX_INDEXED);

        source.add(vec![SuggestionDatum::new("work", "Jazz 0", "w0")]);
        assert_eq!(source.len(), MAX_INDEXED);
        assert!(source.search("jazz 0").iter().any(|d| d.id() == Some("w0")));
    }

    #[tokio::test]
    async fn test_blank_query_does_no_lookup() {
        let mut controller = controller(CannedTransport::default());
        assert!(controller.suggest("  ").await.is_empty());
        assert!(controller.transport().paths.borrow().is_empty());
    }

    #[test]
    fn test_select_hash_route() {
        let controller = controller(CannedTransport::default());
        let datum = SuggestionDatum::new("work", "Moby Dick", "w1");
        assert_eq!(
            controller.select(&datum).unwrap(),
            Navigation::HashRoute("#item/work/w1".to_string())
        );
    }

    #[test]
    fn test_select_redirect() {
        let controller =
            SuggestController::new(CannedTransport::default(), "/typeahead", SelectionMode::Redirect);
        let datum = SuggestionDatum::new("agent", "Melville, Herman", "a7");
        assert_eq!(
            controller.select(&datum).unwrap(),
            Navigation::Redirect("/a7".to_string())
        );
    }

    #[test]
    fn test_select_without_id_fails() {
        let controller = controller(CannedTransport::default());
        let datum: SuggestionDatum =
            serde_json::from_value(serde_json::json!({"work": "Moby Dick"})).unwrap();
        assert!(controller.select(&datum).is_err());
    }
}
