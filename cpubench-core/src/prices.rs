//! Per-item marketplace price aggregation.
//!
//! Lookups run one at a time, in identifier order. A failed lookup is skipped,
//! never surfaced as an error; the caller only sees which identifiers produced a
//! quote.

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable};
use serde::Serialize;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::schemas::money::{Currency, Price};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single lookup produced no quote.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup returned status {0}")]
    Status(u16),
    #[error("lookup returned no listings")]
    Empty,
    #[error("malformed lookup response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An external service that knows the current price of one marketplace listing.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// The amount of the first listing found for `market_item_id` in `region`.
    async fn lookup(&self, market_item_id: &str, region: &str) -> Result<f64, LookupError>;
}

#[async_trait]
impl<L: PriceLookup + ?Sized> PriceLookup for Arc<L> {
    async fn lookup(&self, market_item_id: &str, region: &str) -> Result<f64, LookupError> {
        (**self).lookup(market_item_id, region).await
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub marketplace_item_id: String,
    pub price: Price,
}

/// What happened to one identifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LookupOutcome {
    NotAttempted,
    Quote(PriceQuote),
    NoQuote { reason: String },
}

impl LookupOutcome {
    pub fn quote(&self) -> Option<&PriceQuote> {
        match self {
            Self::Quote(quote) => Some(quote),
            _ => None,
        }
    }
}

/// What a price widget shows for one item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PriceState {
    Loading,
    Available {
        primary: PriceQuote,
        secondary: Vec<PriceQuote>,
    },
    /// Every lookup finished and none produced a quote.
    Unavailable,
}

impl PriceState {
    pub fn from_quotes(quotes: Vec<PriceQuote>) -> Self {
        let mut quotes = quotes.into_iter();
        match quotes.next() {
            Some(primary) => Self::Available {
                primary,
                secondary: quotes.collect(),
            },
            None => Self::Unavailable,
        }
    }

    pub fn primary(&self) -> Option<&PriceQuote> {
        match self {
            Self::Available { primary, .. } => Some(primary),
            _ => None,
        }
    }
}

pub struct PriceAggregator<L> {
    lookup: L,
    timeout: Duration,
}

impl<L: PriceLookup> PriceAggregator<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One bounded lookup, with every failure folded into [`LookupOutcome::NoQuote`].
    pub async fn lookup_one(&self, market_item_id: &str, region: &str) -> LookupOutcome {
        let result = match tokio::time::timeout(
            self.timeout,
            self.lookup.lookup(market_item_id, region),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        };

        match result {
            Ok(amount) => LookupOutcome::Quote(PriceQuote {
                marketplace_item_id: market_item_id.to_string(),
                price: Price::new(
                    Currency::for_region(region).unwrap_or(Currency::USD),
                    amount,
                ),
            }),
            Err(err) => {
                debug!(market_item_id, region, error = %err, "skipping price lookup");
                LookupOutcome::NoQuote {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Look every identifier up, sequentially, reporting each outcome in input order.
    pub async fn fetch_outcomes(
        &self,
        market_item_ids: &[String],
        region: &str,
    ) -> Vec<(String, LookupOutcome)> {
        let mut outcomes = Vec::with_capacity(market_item_ids.len());
        for id in market_item_ids {
            let outcome = self.lookup_one(id, region).await;
            outcomes.push((id.clone(), outcome));
        }
        outcomes
    }

    /// The successful quotes, in input order. Failed identifiers are simply absent.
    pub async fn fetch_prices(&self, market_item_ids: &[String], region: &str) -> Vec<PriceQuote> {
        let quotes: Vec<PriceQuote> = self
            .fetch_outcomes(market_item_ids, region)
            .await
            .into_iter()
            .filter_map(|(_, outcome)| match outcome {
                LookupOutcome::Quote(quote) => Some(quote),
                _ => None,
            })
            .collect();
        info!(
            region,
            requested = market_item_ids.len(),
            quoted = quotes.len(),
            "price lookups finished"
        );
        quotes
    }
}

/// A background price fetch owned by one view.
///
/// Dropping or cancelling the task stops the lookup loop and guarantees that no
/// result is written to the view's [`PriceState`] afterwards.
pub struct PriceTask {
    abort: AbortHandle,
    sink: Arc<Mutex<Option<watch::Sender<PriceState>>>>,
    join: Option<JoinHandle<()>>,
}

impl PriceTask {
    /// Start fetching on the current tokio runtime. The returned receiver reads
    /// [`PriceState::Loading`] until the loop finishes.
    pub fn spawn<L>(
        aggregator: Arc<PriceAggregator<L>>,
        market_item_ids: Vec<String>,
        region: String,
    ) -> (Self, watch::Receiver<PriceState>)
    where
        L: PriceLookup + 'static,
    {
        let (tx, rx) = watch::channel(PriceState::Loading);
        let sink = Arc::new(Mutex::new(Some(tx)));
        let (abort, registration) = AbortHandle::new_pair();

        let writer = Arc::clone(&sink);
        let work = async move {
            let quotes = aggregator.fetch_prices(&market_item_ids, &region).await;
            let guard = match writer.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(tx) = guard.as_ref() {
                // the view may already be gone; nothing to do then
                let _ = tx.send(PriceState::from_quotes(quotes));
            }
        };
        let join = tokio::spawn(async move {
            let _ = Abortable::new(work, registration).await;
        });

        (
            Self {
                abort,
                sink,
                join: Some(join),
            },
            rx,
        )
    }

    /// Detach the view: pending and later lookups are dropped unseen.
    pub fn cancel(&self) {
        let mut guard = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.take();
        self.abort.abort();
    }

    /// Wait for the loop to finish (or to be aborted). Dropping this future
    /// part-way through tears the task down like [`PriceTask::cancel`].
    pub async fn finished(mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for PriceTask {
    fn drop(&mut self) {
        // a finished loop has already published; this only detaches late writers
        self.cancel();
    }
}
