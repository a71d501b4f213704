//! Resolves a product and fans out to the resources it references.
//!
//! Enrichment always works on a plan: the ordered list of sub-fetches
//! `[seller, brand, categories.., images..]`. Slot `i` of the result holds the
//! outcome of plan entry `i` no matter which strategy ran it or in which
//! order the calls completed.

use crate::assembler::{self, CompositeResponse};
use crate::errors::{AggregateError, FetchError};
use crate::fetch::{FetchClient, Lookup};
use crate::metrics_defs::SUBFETCH_ABSENT;
use crate::records::{Product, Record};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// One sub-fetch at a time, in plan order
    Sequential,
    /// One task per sub-fetch, joined by a completion barrier
    Parallel,
}

impl Strategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel => "parallel",
        }
    }
}

/// Outcome of one planned sub-fetch. `None` marks a reference that could not be resolved.
pub type Slot = Option<Record>;

/// Plan-ordered enrichment outcomes for one product.
#[derive(Clone, Debug, PartialEq)]
pub struct Enrichment {
    pub slots: Vec<Slot>,
}

/// Lists the sub-fetches needed to enrich `product`, in plan order.
pub fn plan(product: &Product) -> Vec<Lookup> {
    let mut plan = Vec::with_capacity(2 + product.categories.len() + product.images.len());
    plan.push(Lookup::Seller(product.seller_id));
    plan.push(Lookup::Brand(product.brand_id));
    plan.extend(product.categories.iter().copied().map(Lookup::Category));
    plan.extend(product.images.iter().copied().map(Lookup::Image));
    plan
}

/// Per-request aggregation over a shared backend client.
///
/// Holds no request state; one instance serves every request for the life
/// of the process.
pub struct Aggregator {
    client: Arc<dyn FetchClient>,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(client: Arc<dyn FetchClient>, fetch_timeout: Duration) -> Self {
        Self {
            client,
            fetch_timeout,
        }
    }

    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    pub async fn aggregate(
        &self,
        slug: &str,
        strategy: Strategy,
    ) -> Result<CompositeResponse, AggregateError> {
        let product = self.resolve(slug).await?;
        let enrichment = self.enrich(&product, strategy).await;
        Ok(assembler::compose(product, enrichment))
    }

    /// Fetches the product. Any failure here aborts the request.
    pub async fn resolve(&self, slug: &str) -> Result<Product, AggregateError> {
        let lookup = Lookup::ProductBySlug(slug.to_lowercase());

        match fetch_with_timeout(self.client.as_ref(), &lookup, self.fetch_timeout).await {
            Ok(Record::Product(product)) => Ok(product),
            Ok(other) => Err(AggregateError::Upstream(FetchError::Decode(format!(
                "expected a product, got {}",
                other.kind()
            )))),
            Err(FetchError::NotFound) => Err(AggregateError::NotFound(slug.to_string())),
            Err(error) => {
                tracing::error!(%lookup, %error, "Product fetch failed");
                Err(AggregateError::Upstream(error))
            }
        }
    }

    /// Resolves every reference of `product`. Never fails; unresolved references become `None`.
    pub async fn enrich(&self, product: &Product, strategy: Strategy) -> Enrichment {
        let plan = plan(product);
        let slots = match strategy {
            Strategy::Sequential => self.fetch_sequential(plan).await,
            Strategy::Parallel => self.fetch_parallel(plan).await,
        };
        Enrichment { slots }
    }

    async fn fetch_sequential(&self, plan: Vec<Lookup>) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(plan.len());
        for lookup in &plan {
            slots.push(fetch_secondary(self.client.as_ref(), lookup, self.fetch_timeout).await);
        }
        slots
    }

    async fn fetch_parallel(&self, plan: Vec<Lookup>) -> Vec<Slot> {
        let mut slots: Vec<Slot> = vec![None; plan.len()];
        let mut finished = vec![false; plan.len()];
        let mut join_set = JoinSet::new();

        // The slot index is fixed here, before any task runs
        for (index, lookup) in plan.iter().cloned().enumerate() {
            let client = self.client.clone();
            let fetch_timeout = self.fetch_timeout;

            join_set.spawn(async move {
                let slot = fetch_secondary(client.as_ref(), &lookup, fetch_timeout).await;
                (index, slot)
            });
        }

        // Barrier: wait for every task, whatever its outcome
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, slot)) => {
                    slots[index] = slot;
                    finished[index] = true;
                }
                // The slot keeps its `None`
                Err(e) => tracing::error!("Sub-fetch task panicked: {}", e),
            }
        }

        for (lookup, _) in plan.iter().zip(&finished).filter(|(_, done)| !**done) {
            record_absent(lookup);
        }

        slots
    }
}

async fn fetch_with_timeout(
    client: &dyn FetchClient,
    lookup: &Lookup,
    fetch_timeout: Duration,
) -> Result<Record, FetchError> {
    tokio::time::timeout(fetch_timeout, client.fetch(lookup))
        .await
        .map_err(|_| FetchError::Timeout)?
}

/// Best-effort fetch: every failure is logged and turned into an empty slot.
async fn fetch_secondary(client: &dyn FetchClient, lookup: &Lookup, fetch_timeout: Duration) -> Slot {
    let result = fetch_with_timeout(client, lookup, fetch_timeout)
        .await
        .and_then(|record| match record.kind() == lookup.kind() {
            true => Ok(record),
            false => Err(FetchError::Decode(format!(
                "expected {}, got {}",
                lookup.kind(),
                record.kind()
            ))),
        });

    match result {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::warn!(%lookup, %error, "Sub-fetch failed, recording as absent");
            record_absent(lookup);
            None
        }
    }
}

fn record_absent(lookup: &Lookup) {
    shared::counter!(SUBFETCH_ABSENT, "kind" => lookup.kind().as_str()).increment(1);
}
