use super::resolver::AffectedPoolResolver;
use crate::bus::{Event, EventBus, EventHandler, Topic};
use crate::ingest::TransactionRecord;
use crate::logic::path_finder::PathFinder;
use crate::logic::strategy::StrategyAggregator;
use crate::utils::PriceCache;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// End-to-end batch pipeline: transactions in, opportunities out.
///
/// Subscribed to `receive_transactions`; every batch runs resolve ->
/// cache invalidation -> path search -> strategy aggregation. The
/// aggregator publishes opportunities itself, so the pipeline's only output
/// is the bus. An empty batch at any stage is a normal outcome, never an
/// error.
pub struct ArbPipeline {
    path_finder: PathFinder,
    aggregator: StrategyAggregator,
    resolver: Arc<dyn AffectedPoolResolver>,
    price_cache: Arc<PriceCache>,
}

impl ArbPipeline {
    pub fn new(
        path_finder: PathFinder,
        aggregator: StrategyAggregator,
        resolver: Arc<dyn AffectedPoolResolver>,
        price_cache: Arc<PriceCache>,
    ) -> Self {
        Self { path_finder, aggregator, resolver, price_cache }
    }

    /// Attach the pipeline to the bus it consumes from.
    pub fn subscribe(self: Arc<Self>, bus: &EventBus) {
        info!("pipeline subscribed to receive_transactions");
        bus.subscribe(Topic::ReceiveTransactions, self);
    }

    /// Process one transaction batch. Returns the number of opportunities
    /// published.
    pub async fn process_batch(&self, records: &[TransactionRecord]) -> usize {
        if records.is_empty() {
            return 0;
        }

        let affected = self.resolver.resolve(records);
        if affected.is_empty() {
            debug!(records = records.len(), "batch touched no known pools");
            return 0;
        }

        // Reserves moved, cached pair prices for these pools are stale.
        for pool in &affected {
            self.price_cache.invalidate_pair(pool.token0(), pool.token1());
        }

        let paths = self.path_finder.find_paths(&affected);
        if paths.is_empty() {
            debug!(affected = affected.len(), "no candidate paths for batch");
            return 0;
        }

        let published = self.aggregator.run(&paths).await;
        debug!(
            records = records.len(),
            affected = affected.len(),
            paths = paths.len(),
            published,
            "batch processed"
        );
        published
    }
}

#[async_trait]
impl EventHandler for ArbPipeline {
    async fn handle(&self, event: Event) {
        if let Event::ReceiveTransactions(records) = event {
            self.process_batch(&records).await;
        }
    }
}
