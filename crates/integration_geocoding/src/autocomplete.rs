//! Debounced autocomplete session
//!
//! An [`AutocompleteSession`] sits between a text input and the
//! autocomplete endpoint. Every call to [`query`](AutocompleteSession::query)
//! restarts the debounce timer, so only the last input of a burst is sent.
//! Responses are cached per query signature, and only the response to the
//! most recently fired query reaches the results handler.
//!
//! ```text
//! idle --query()--> debounce-pending --timer--> in-flight --response--> idle
//!                     ^       |
//!                     +-query-+   (timer restarted)
//! ```
//!
//! Superseded requests are never cancelled. They run to completion and prime
//! the cache, but their results are not delivered.

use std::fmt;
use std::sync::Arc;

use moka::future::Cache;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use crate::client::{GeocodingClient, Operation};
use crate::config::AutocompleteConfig;
use crate::error::GeocodingError;
use crate::format::GeocodeResult;
use crate::options::AutocompleteQuery;
use crate::transport::RequestOptions;

/// Receiver of autocomplete results
pub trait ResultsHandler: Send + Sync {
    /// Called with the results of the latest query
    fn handle(&self, results: GeocodeResult);
}

impl<F> ResultsHandler for F
where
    F: Fn(GeocodeResult) + Send + Sync,
{
    fn handle(&self, results: GeocodeResult) {
        self(results);
    }
}

/// Observable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing scheduled or outstanding
    Idle,
    /// A query is waiting for the debounce interval to elapse
    DebouncePending,
    /// At least one fired query is still being resolved
    InFlight,
}

/// Debounced, cached autocomplete bound to one API key
///
/// Must be used from within a tokio runtime. Dropping the session cancels a
/// pending debounce timer; requests already in flight still complete.
pub struct AutocompleteSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: GeocodingClient,
    api_key: String,
    config: AutocompleteConfig,
    handler: Box<dyn ResultsHandler>,
    cache: Cache<String, GeocodeResult>,
    tracking: Mutex<Tracking>,
}

#[derive(Default)]
struct Tracking {
    /// Incremented by every `query()`; a timer only fires if it still holds
    /// the latest token
    debounce_token: u64,
    pending: Option<JoinHandle<()>>,
    /// Signature of the most recently fired query awaiting its response
    current_signature: Option<String>,
    in_flight: usize,
}

impl fmt::Debug for AutocompleteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteSession")
            .field("config", &self.inner.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AutocompleteSession {
    /// Create a session delivering results to `handler`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        client: GeocodingClient,
        api_key: impl Into<String>,
        config: AutocompleteConfig,
        handler: impl ResultsHandler + 'static,
    ) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(GeocodingError::ConfigurationError)?;

        let mut cache = Cache::builder();
        if let Some(max_entries) = config.cache_max_entries {
            cache = cache.max_capacity(max_entries);
        }

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                api_key: api_key.into(),
                config,
                handler: Box::new(handler),
                cache: cache.build(),
                tracking: Mutex::new(Tracking::default()),
            }),
        })
    }

    /// Schedule a query, replacing any query still waiting on the timer
    pub fn query(&self, input: AutocompleteQuery) {
        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.debounce();

        let mut tracking = self.inner.tracking.lock();
        tracking.debounce_token = tracking.debounce_token.wrapping_add(1);
        let token = tracking.debounce_token;

        if let Some(pending) = tracking.pending.take() {
            pending.abort();
        }

        tracking.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire(token, input).await;
        }));
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        let tracking = self.inner.tracking.lock();
        if tracking.pending.is_some() {
            SessionState::DebouncePending
        } else if tracking.in_flight > 0 {
            SessionState::InFlight
        } else {
            SessionState::Idle
        }
    }

    /// Number of cached responses
    pub async fn cached_entries(&self) -> u64 {
        self.inner.cache.run_pending_tasks().await;
        self.inner.cache.entry_count()
    }
}

impl Drop for AutocompleteSession {
    fn drop(&mut self) {
        if let Some(pending) = self.inner.tracking.lock().pending.take() {
            pending.abort();
        }
    }
}

impl SessionInner {
    #[instrument(skip(self, input), fields(text = %input.text))]
    async fn fire(&self, token: u64, input: AutocompleteQuery) {
        {
            let mut tracking = self.tracking.lock();
            if tracking.debounce_token != token {
                return;
            }
            tracking.pending = None;
            tracking.in_flight += 1;
        }

        self.resolve(input).await;

        self.tracking.lock().in_flight -= 1;
    }

    async fn resolve(&self, input: AutocompleteQuery) {
        if input.text.chars().count() < self.config.min_text_length {
            debug!(
                min_text_length = self.config.min_text_length,
                "Autocomplete text too short, dropping query"
            );
            return;
        }

        let query = input.to_query(&self.api_key, self.client.config());
        let signature = query.signature();

        if let Some(cached) = self.cache.get(&signature).await {
            debug!("Autocomplete cache hit");
            // Supersedes older in-flight queries.
            self.tracking.lock().current_signature = None;
            self.handler.handle(cached);
            return;
        }

        self.tracking.lock().current_signature = Some(signature.clone());

        let endpoint = self.client.endpoint(Operation::Autocomplete);
        let result = self
            .client
            .execute(
                &endpoint,
                &query,
                &RequestOptions::default(),
                self.config.format_results,
            )
            .await;

        match result {
            Ok(result) => {
                self.cache.insert(signature.clone(), result.clone()).await;

                let is_latest = {
                    let mut tracking = self.tracking.lock();
                    if tracking.current_signature.as_deref() == Some(signature.as_str()) {
                        tracking.current_signature = None;
                        true
                    } else {
                        false
                    }
                };

                if is_latest {
                    self.handler.handle(result);
                } else {
                    debug!("Discarding results of superseded autocomplete query");
                }
            },
            Err(e) => error!(error = %e, "Autocomplete request failed"),
        }
    }
}
