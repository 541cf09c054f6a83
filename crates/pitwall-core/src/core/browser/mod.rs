//! Paginated, searchable table browser.
//!
//! [`TableBrowser`] owns the query state of the Tables view and decides when
//! to talk to a [`RemoteTableSource`]. Requests run on spawned tokio tasks
//! and report back over a channel; the owner applies completions with
//! [`TableBrowser::next_event`] (awaiting) or [`TableBrowser::process_pending`]
//! (non-blocking, for render loops). Every page request is stamped with a
//! generation, and only the completion carrying the current generation is
//! applied, so the last dispatched request always wins.
//!
//! All intent methods spawn tasks and therefore must be called from within
//! a tokio runtime.

pub mod debounce;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};

use crate::api::models::{Page, PageRequest, Row, TableList, TableName, total_pages};
use crate::core::Phase;
use crate::core::source::RemoteTableSource;
use crate::error::TransportError;

use debounce::{Debouncer, Generation, SEARCH_DEBOUNCE};

/// Rows per page used by the dashboard.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Session-level browser settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserConfig {
    pub page_size: u32,
    pub debounce: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// What the user asked to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub table: Option<TableName>,
    pub page: u32,
    pub page_size: u32,
    /// Search text as typed, echoed back to the input immediately
    pub raw_search: String,
    /// Search text the current fetch is filtered by
    pub effective_search: String,
}

impl QueryState {
    fn new(page_size: u32) -> Self {
        Self {
            table: None,
            page: 1,
            page_size: page_size.max(1),
            raw_search: String::new(),
            effective_search: String::new(),
        }
    }

    /// Parameters for the fetch this state calls for, if a table is chosen.
    fn fetch_key(&self) -> Option<FetchKey> {
        self.table.as_ref().map(|table| FetchKey {
            table: table.clone(),
            request: PageRequest {
                page: self.page,
                page_size: self.page_size,
                search: self.effective_search.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    table: TableName,
    request: PageRequest,
}

#[derive(Debug)]
enum BrowserEvent {
    TablesLoaded {
        generation: u64,
        result: Result<TableList, TransportError>,
    },
    PageLoaded {
        generation: u64,
        key: FetchKey,
        result: Result<Page, TransportError>,
    },
}

/// State machine behind the Tables view.
pub struct TableBrowser {
    source: Arc<dyn RemoteTableSource>,
    query: QueryState,

    tables: Vec<TableName>,
    tables_loaded: bool,
    tables_loading: bool,

    /// Last page applied; kept on screen through later failures
    data: Page,
    data_loading: bool,
    error: Option<String>,

    search: Debouncer<String>,
    fetch_generation: Generation,
    tables_generation: Generation,
    /// Parameters of the fetch whose result is still wanted
    inflight: Option<FetchKey>,
    /// Parameters of the page currently on screen
    displayed: Option<FetchKey>,

    event_tx: mpsc::UnboundedSender<BrowserEvent>,
    event_rx: mpsc::UnboundedReceiver<BrowserEvent>,
}

impl TableBrowser {
    pub fn new(source: Arc<dyn RemoteTableSource>, config: BrowserConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            source,
            query: QueryState::new(config.page_size),
            tables: Vec::new(),
            tables_loaded: false,
            tables_loading: false,
            data: Page::default(),
            data_loading: false,
            error: None,
            search: Debouncer::new(config.debounce),
            fetch_generation: Generation::default(),
            tables_generation: Generation::default(),
            inflight: None,
            displayed: None,
            event_tx,
            event_rx,
        }
    }

    // =========================================================================
    // Read access for the view layer
    // =========================================================================

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.query.table.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.query.page_size
    }

    pub fn tables(&self) -> &[TableName] {
        &self.tables
    }

    pub fn columns(&self) -> &[String] {
        &self.data.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.data.rows
    }

    pub fn total_rows(&self) -> u64 {
        self.data.total_rows
    }

    /// `max(1, ceil(total_rows / page_size))`
    pub fn total_pages(&self) -> u32 {
        total_pages(self.data.total_rows, self.query.page_size)
    }

    pub fn is_tables_loading(&self) -> bool {
        self.tables_loading
    }

    pub fn is_data_loading(&self) -> bool {
        self.data_loading
    }

    /// True while a search edit is waiting out the debounce window.
    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.query.table.is_none() {
            Phase::Empty
        } else if self.error.is_some() {
            Phase::Degraded
        } else if self.data_loading || self.displayed.is_none() {
            Phase::Loading
        } else {
            Phase::Ready
        }
    }

    /// Displayed rows projected onto the displayed columns.
    pub fn projected_rows(&self) -> Vec<Vec<String>> {
        self.data.projected_rows()
    }

    /// 1-based position of the first displayed row across all pages.
    pub fn first_position(&self) -> u64 {
        let page = self
            .displayed
            .as_ref()
            .map(|key| key.request.page)
            .unwrap_or(self.query.page);
        u64::from(page.saturating_sub(1)) * u64::from(self.query.page_size) + 1
    }

    /// Nothing in flight and no search waiting to commit.
    pub fn is_idle(&self) -> bool {
        !self.tables_loading && self.inflight.is_none() && !self.search.is_pending()
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Load the table list; the first table is selected when it arrives.
    pub fn initialize(&mut self) {
        let generation = self.tables_generation.advance();
        self.tables_loading = true;
        self.error = None;

        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();

        log::debug!("Loading table list (generation {})", generation);

        tokio::spawn(async move {
            let result = source.list_tables().await;
            let _ = tx.send(BrowserEvent::TablesLoaded { generation, result });
        });
    }

    /// Switch tables. Page and both search values are reset.
    pub fn select_table(&mut self, name: impl Into<TableName>) {
        self.search.cancel();
        self.query.table = Some(name.into());
        self.query.page = 1;
        self.query.raw_search.clear();
        self.query.effective_search.clear();
        self.sync();
    }

    /// Record a keystroke in the search box.
    ///
    /// The page goes back to 1 right away; the filter itself is committed
    /// once the input has been quiet for the debounce window.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.query.raw_search {
            return;
        }

        self.query.raw_search = text.clone();
        self.query.page = 1;
        self.search.schedule(text, Instant::now());

        // Page 1 under the current filter; the new filter follows on commit.
        self.sync();
    }

    /// Go to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: u32) {
        let clamped = n.clamp(1, self.total_pages());
        if clamped != self.query.page {
            self.query.page = clamped;
            self.sync();
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.query.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.query.page.saturating_sub(1));
    }

    /// Re-issue the request for the current state after a failure.
    pub fn retry(&mut self) {
        if !self.tables_loaded {
            self.initialize();
            return;
        }

        if let Some(key) = self.query.fetch_key() {
            self.dispatch(key);
        }
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Wait for the next completion or debounce deadline and apply it.
    ///
    /// Never returns while [`is_idle`](Self::is_idle) holds and no stale
    /// completions are queued; callers should check first.
    pub async fn next_event(&mut self) {
        let deadline = self.search.deadline();

        tokio::select! {
            Some(event) = self.event_rx.recv() => self.apply(event),
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                self.commit_search(Instant::now());
            }
            else => {}
        }
    }

    /// Apply until nothing is in flight or pending.
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            self.next_event().await;
        }
    }

    /// Apply everything that is ready without waiting. Returns the number
    /// of state changes applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;

        if self.commit_search(Instant::now()) {
            applied += 1;
        }

        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }

        applied
    }

    fn commit_search(&mut self, now: Instant) -> bool {
        let Some(text) = self.search.take_due(now) else {
            return false;
        };

        let committed = text.trim().to_string();
        if committed != self.query.effective_search {
            log::debug!("Search committed: {:?}", committed);
            self.query.effective_search = committed;
            self.query.page = 1;
        }
        self.sync();
        true
    }

    fn apply(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::TablesLoaded { generation, result } => {
                if !self.tables_generation.is_current(generation) {
                    log::debug!("Discarding stale table list (generation {})", generation);
                    return;
                }
                self.tables_loading = false;
                self.handle_tables_loaded(result);
            }
            BrowserEvent::PageLoaded {
                generation,
                key,
                result,
            } => {
                if !self.fetch_generation.is_current(generation) {
                    log::debug!(
                        "Discarding stale page {} of '{}' (generation {})",
                        key.request.page,
                        key.table,
                        generation
                    );
                    return;
                }
                self.inflight = None;
                self.data_loading = false;
                self.handle_page_loaded(key, result);
            }
        }
    }

    fn handle_tables_loaded(&mut self, result: Result<TableList, TransportError>) {
        match result {
            Ok(list) => {
                self.tables = list.tables;
                self.tables_loaded = true;

                let keep_current = self
                    .query
                    .table
                    .as_ref()
                    .is_some_and(|current| self.tables.contains(current));

                if !keep_current {
                    if let Some(first) = self.tables.first().cloned() {
                        self.select_table(first);
                    }
                }
            }
            Err(e) => {
                log::warn!("Failed to load tables: {}", e);
                self.tables.clear();
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    fn handle_page_loaded(&mut self, key: FetchKey, result: Result<Page, TransportError>) {
        match result {
            Ok(page) => {
                self.data = page;
                self.displayed = Some(key);
                self.error = None;

                // The filtered set may have shrunk below the requested page.
                let last = self.total_pages();
                if self.query.page > last {
                    self.query.page = last;
                    self.sync();
                }
            }
            Err(e) => {
                log::warn!("Failed to load page of '{}': {}", key.table, e);
                self.error = Some(e.user_message().to_string());
            }
        }
    }

    /// Dispatch a fetch if the wanted parameters are neither in flight nor
    /// already on screen.
    fn sync(&mut self) {
        let Some(key) = self.query.fetch_key() else {
            return;
        };

        if self.inflight.as_ref() == Some(&key) {
            return;
        }
        if self.inflight.is_none() && self.error.is_none() && self.displayed.as_ref() == Some(&key)
        {
            return;
        }

        self.dispatch(key);
    }

    fn dispatch(&mut self, key: FetchKey) {
        let generation = self.fetch_generation.advance();
        self.inflight = Some(key.clone());
        self.data_loading = true;
        self.error = None;

        log::debug!(
            "Fetching '{}' page {} search {:?} (generation {})",
            key.table,
            key.request.page,
            key.request.search,
            generation
        );

        let source = Arc::clone(&self.source);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch_page(&key.table, &key.request).await;
            let _ = tx.send(BrowserEvent::PageLoaded {
                generation,
                key,
                result,
            });
        });
    }
}
