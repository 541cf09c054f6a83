//! Single-request views (leaderboard, constructors, driver stats).
//!
//! A [`RecordViewer`] holds one query and the last result for it. Like the
//! table browser, only the completion of the most recent load is applied.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::core::Phase;
use crate::core::browser::debounce::Generation;
use crate::error::TransportError;

/// Async loader for a viewer's query.
pub type Fetcher<Q, T> =
    Arc<dyn Fn(Q) -> BoxFuture<'static, Result<T, TransportError>> + Send + Sync>;

struct Completion<T> {
    generation: u64,
    result: Result<T, TransportError>,
}

pub struct RecordViewer<Q, T> {
    fetcher: Fetcher<Q, T>,
    query: Q,
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
    tx: mpsc::UnboundedSender<Completion<T>>,
    rx: mpsc::UnboundedReceiver<Completion<T>>,
}

impl<Q, T> RecordViewer<Q, T>
where
    Q: Clone + Send + 'static,
    T: Send + 'static,
{
    pub fn new(query: Q, fetcher: Fetcher<Q, T>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            query,
            data: None,
            loading: false,
            error: None,
            generation: Generation::default(),
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Degraded
        } else if self.loading {
            Phase::Loading
        } else if self.data.is_some() {
            Phase::Ready
        } else {
            Phase::Empty
        }
    }

    /// Replace the query and load it.
    pub fn set_query(&mut self, query: Q) {
        self.query = query;
        self.load();
    }

    /// Load the current query, superseding any load in flight.
    pub fn load(&mut self) {
        let generation = self.generation.advance();
        self.loading = true;
        self.error = None;

        let future = (self.fetcher)(self.query.clone());
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = future.await;
            let _ = tx.send(Completion { generation, result });
        });
    }

    /// Apply finished loads without waiting. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it.
    pub async fn next_event(&mut self) {
        if let Some(completion) = self.rx.recv().await {
            self.apply(completion);
        }
    }

    /// Wait until the current load has finished.
    pub async fn settle(&mut self) {
        while self.loading {
            self.next_event().await;
        }
    }

    fn apply(&mut self, completion: Completion<T>) -> bool {
        if !self.generation.is_current(completion.generation) {
            return false;
        }

        self.loading = false;
        match completion.result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                log::warn!("{}", e);
                self.error = Some(e.user_message().to_string());
            }
        }
        true
    }
}
