// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search state, the paginated request/response state machine, and the HTTP
//! transport that talks to the catalog search endpoint.

use crate::error::{CatalogError, Result};
use crate::models::search::{ResultRecord, SearchRequest, SearchResponse, DEFAULT_PAGE_SIZE};
use crate::models::settings::ClientConfig;
use crate::services::logging::mask_token;
use crate::services::mapper::map_hit;
use crate::services::seen_store::SeenStore;
use anyhow::Context;
use tracing::{debug, info, warn};

/// Observable search state rendered by the results toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query_phrase: String,
    pub from_offset: u64,
    pub page_size: u64,
    pub total_results: u64,
    pub last_error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchState {
    pub fn new(page_size: u64) -> Self {
        Self {
            query_phrase: String::new(),
            from_offset: 0,
            page_size: page_size.max(1),
            total_results: 0,
            last_error: None,
        }
    }

    /// Summary line: the error when one is set, else "{from} of {total} for {phrase}"
    pub fn result_summary_text(&self) -> String {
        match &self.last_error {
            Some(error) => error.clone(),
            None => format!(
                "{} of {} for {}",
                self.from_offset, self.total_results, self.query_phrase
            ),
        }
    }

    /// Returns whether the total changed
    fn update_total(&mut self, total: u64) -> bool {
        if self.total_results == total {
            return false;
        }
        self.total_results = total;
        true
    }

    fn set_offset(&mut self, offset: u64) {
        self.from_offset = offset.min(self.total_results);
    }

    pub fn has_more(&self) -> bool {
        self.from_offset < self.total_results
    }
}

/// Sends search requests to the backend
#[allow(async_fn_in_trait)]
pub trait SearchTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// A request that has been issued but not yet completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub request: SearchRequest,
}

/// What completing a request did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Response applied; `appended` records were added to the result list
    Applied { appended: usize },
    /// Application or transport error recorded in `last_error`
    Failed,
    /// A newer request was issued after this one; nothing changed
    Stale,
}

/// Issues paginated searches and applies their responses
pub struct SearchController<T> {
    transport: T,
    state: SearchState,
    results: Vec<ResultRecord>,
    seen: Option<Box<dyn SeenStore>>,
    csrf_token: String,
    search_type: String,
    next_seq: u64,
    latest_seq: Option<u64>,
    pending: Option<u64>,
}

impl<T: SearchTransport> SearchController<T> {
    pub fn new(transport: T, page_size: u64) -> Self {
        Self {
            transport,
            state: SearchState::new(page_size),
            results: Vec::new(),
            seen: None,
            csrf_token: String::new(),
            search_type: "kw".to_string(),
            next_seq: 0,
            latest_seq: None,
            pending: None,
        }
    }

    /// Build a controller from client configuration
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        let mut controller = Self::new(transport, config.page_size);
        controller.csrf_token = config.csrf_token.clone();
        controller.search_type = config.search_type.clone();
        controller
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = token.into();
        self
    }

    /// Enable de-duplication of hits by id
    pub fn with_seen_store(mut self, store: Box<dyn SeenStore>) -> Self {
        self.seen = Some(store);
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True while the most recently issued request has not completed
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue a search and apply its response
    pub async fn submit_query(&mut self, phrase: &str, offset: u64, size: u64) -> ApplyOutcome {
        let ticket = self.begin_request(phrase, offset, size);
        let outcome = self.transport.search(&ticket.request).await;
        self.complete_request(&ticket, outcome)
    }

    /// Start a fresh query: clears the result list and pagination, then
    /// searches from offset 0
    pub async fn new_search(&mut self, phrase: &str) -> ApplyOutcome {
        self.results.clear();
        self.state.from_offset = 0;
        self.state.total_results = 0;
        self.state.last_error = None;
        let size = self.state.page_size;
        self.submit_query(phrase, 0, size).await
    }

    /// Fetch the next page when more results remain.
    /// Callers must not invoke this while a request is in flight.
    pub async fn load_more(&mut self) -> Option<ApplyOutcome> {
        if !self.state.has_more() {
            debug!(
                from = self.state.from_offset,
                total = self.state.total_results,
                "No more results to load"
            );
            return None;
        }
        let phrase = self.state.query_phrase.clone();
        let (offset, size) = (self.state.from_offset, self.state.page_size);
        Some(self.submit_query(&phrase, offset, size).await)
    }

    /// Allocate a sequence number and build the request
    pub fn begin_request(&mut self, phrase: &str, offset: u64, size: u64) -> SearchTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = Some(seq);
        self.pending = Some(seq);

        self.state.query_phrase = phrase.to_string();
        self.state.page_size = size.max(1);

        let request = SearchRequest {
            csrf_token: self.csrf_token.clone(),
            phrase: phrase.to_string(),
            from: offset,
            size: self.state.page_size,
            search_type: self.search_type.clone(),
        };

        info!(
            seq,
            phrase,
            from = offset,
            size = request.size,
            csrf = %mask_token(&request.csrf_token),
            "Issuing search request"
        );

        SearchTicket { seq, request }
    }

    /// Apply the outcome of a request, discarding it if it has been superseded
    pub fn complete_request(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResponse>,
    ) -> ApplyOutcome {
        if self.latest_seq != Some(ticket.seq) {
            warn!(
                seq = ticket.seq,
                latest = ?self.latest_seq,
                "Discarding stale search response"
            );
            return ApplyOutcome::Stale;
        }
        self.pending = None;

        match outcome {
            Ok(SearchResponse::Failure { message }) => {
                warn!(seq = ticket.seq, %message, "Search returned an application error");
                self.state.last_error = Some(message);
                ApplyOutcome::Failed
            }
            Ok(SearchResponse::Page { from, total, hits }) => {
                if self.state.update_total(total) {
                    debug!(total, "Total results changed");
                }
                self.state.set_offset(from);
                self.state.last_error = None;
                let appended = self.append_hits(hits.iter().map(map_hit));
                self.log_applied(ticket.seq, appended);
                ApplyOutcome::Applied { appended }
            }
            Ok(SearchResponse::Envelope { total, hits }) => {
                let offset = ticket.request.from + hits.len() as u64;
                let total = total.unwrap_or_else(|| {
                    estimated_total(offset, hits.len() as u64, ticket.request.size)
                });
                self.state.update_total(total);
                self.state.set_offset(offset);
                self.state.last_error = None;
                let appended = self.append_hits(hits.iter().map(map_hit));
                self.log_applied(ticket.seq, appended);
                ApplyOutcome::Applied { appended }
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "Search request failed");
                self.state.last_error = Some(e.user_message());
                ApplyOutcome::Failed
            }
        }
    }

    fn log_applied(&self, seq: u64, appended: usize) {
        info!(
            seq,
            appended,
            from = self.state.from_offset,
            total = self.state.total_results,
            "Applied search response"
        );
    }

    fn append_hits(&mut self, records: impl Iterator<Item = ResultRecord>) -> usize {
        let mut appended = 0;
        for record in records {
            if !self.admit(&record) {
                debug!(id = %record.id, "Skipping already displayed result");
                continue;
            }
            self.results.push(record);
            appended += 1;
        }
        appended
    }

    // Without a store every record is admitted. Store failures never drop a
    // record from the page.
    fn admit(&mut self, record: &ResultRecord) -> bool {
        let Some(store) = self.seen.as_mut() else {
            return true;
        };
        if record.id.is_empty() {
            return true;
        }
        if store.has(&record.id) {
            return false;
        }
        if let Err(e) = store
            .next_ordinal()
            .and_then(|_| store.put(&record.id, record))
        {
            warn!(id = %record.id, error = %e, "Failed to record seen result");
        }
        true
    }
}

// An index envelope without a total: a full page means another page may
// follow, a short page marks the end.
fn estimated_total(offset: u64, returned: u64, requested: u64) -> u64 {
    if returned > 0 && returned >= requested {
        offset + requested
    } else {
        offset
    }
}

/// Posts search forms to the catalog over HTTP
pub struct HttpSearchTransport {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpSearchTransport {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let endpoint = config.endpoint(&config.search_path)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!(%endpoint, "Configured search endpoint");

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

impl SearchTransport for HttpSearchTransport {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Transport(format!(
                "search endpoint returned {}",
                status
            )));
        }

        SearchResponse::from_json(&body)
    }
}
