//! Scripted in-memory [`RemoteTableSource`] for controller tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::api::models::{Page, PageRequest, Row, TableList};
use crate::core::source::RemoteTableSource;
use crate::error::TransportError;

/// A recorded `fetch_page` call.
#[derive(Debug, Clone)]
pub(crate) struct FetchCall {
    pub table: String,
    pub request: PageRequest,
    pub at: Instant,
}

type PageResult = Result<Page, TransportError>;

/// Answers from fixed data, or holds each page request until released.
pub(crate) struct ScriptedSource {
    tables: Mutex<Result<TableList, TransportError>>,
    table_rows: HashMap<String, Vec<Row>>,
    failure: Mutex<Option<TransportError>>,
    gated: bool,
    gates: Mutex<Vec<Option<oneshot::Sender<PageResult>>>>,
    calls: Mutex<Vec<FetchCall>>,
    list_calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(tables: &[&str]) -> Self {
        Self {
            tables: Mutex::new(Ok(TableList {
                tables: tables.iter().map(|t| t.to_string()).collect(),
            })),
            table_rows: HashMap::new(),
            failure: Mutex::new(None),
            gated: false,
            gates: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    /// Give `table` `count` rows of the shape `{id, name}`.
    pub fn with_rows(mut self, table: &str, count: usize) -> Self {
        let rows = (1..=count)
            .map(|i| row(json!({"id": i, "name": format!("{}-{}", table, i)})))
            .collect();
        self.table_rows.insert(table.to_string(), rows);
        self
    }

    /// Hold every page request until [`release`](Self::release) is called.
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn fail_tables(&self, error: TransportError) {
        *self.tables.lock().expect("lock") = Err(error);
    }

    /// Make subsequent un-gated page requests fail (or succeed again with `None`).
    pub fn fail_pages(&self, error: Option<TransportError>) {
        *self.failure.lock().expect("lock") = error;
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().expect("lock")
    }

    pub fn pending_gates(&self) -> usize {
        self.gates
            .lock()
            .expect("lock")
            .iter()
            .filter(|g| g.is_some())
            .count()
    }

    /// Answer the `index`-th page request (0-based, in call order).
    pub fn release(&self, index: usize, result: PageResult) {
        let sender = self.gates.lock().expect("lock")[index]
            .take()
            .expect("gate already released");
        let _ = sender.send(result);
    }

    /// Compute the answer an un-gated source would give.
    pub fn answer(&self, table: &str, request: &PageRequest) -> PageResult {
        if let Some(error) = self.failure.lock().expect("lock").clone() {
            return Err(error);
        }

        let all = self.table_rows.get(table).cloned().unwrap_or_default();
        let matching: Vec<Row> = all
            .into_iter()
            .filter(|r| {
                request.search.is_empty()
                    || r.values()
                        .any(|v| v.to_string().to_lowercase().contains(&request.search.to_lowercase()))
            })
            .collect();

        let size = request.page_size.max(1) as usize;
        let start = (request.page.max(1) as usize - 1) * size;
        let rows = matching.iter().skip(start).take(size).cloned().collect();

        Ok(Page {
            columns: vec!["id".to_string(), "name".to_string()],
            rows,
            total_rows: matching.len() as u64,
        })
    }
}

#[async_trait]
impl RemoteTableSource for ScriptedSource {
    async fn list_tables(&self) -> Result<TableList, TransportError> {
        *self.list_calls.lock().expect("lock") += 1;
        self.tables.lock().expect("lock").clone()
    }

    async fn fetch_page(&self, table: &str, request: &PageRequest) -> Result<Page, TransportError> {
        self.calls.lock().expect("lock").push(FetchCall {
            table: table.to_string(),
            request: request.clone(),
            at: Instant::now(),
        });

        if !self.gated {
            return self.answer(table, request);
        }

        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("lock").push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(TransportError::network("test", "gate dropped")))
    }
}

pub(crate) fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be an object, got {}", other),
    }
}

/// Yield until the source has seen `count` page requests.
pub(crate) async fn wait_for_calls(source: &ScriptedSource, count: usize) {
    for _ in 0..1000 {
        if source.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {} page requests, saw {}",
        count,
        source.calls().len()
    );
}
