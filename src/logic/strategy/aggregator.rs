use super::Strategy;
use crate::bus::{Event, EventBus, Topic};
use crate::logic::graph::TradePath;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs every registered strategy over the same batch of candidate paths and
/// publishes each resulting opportunity individually on the bus.
///
/// Strategies run in registration order; one strategy coming back empty never
/// blocks the others.
pub struct StrategyAggregator {
    strategies: Vec<Arc<dyn Strategy>>,
    bus: Arc<EventBus>,
}

impl StrategyAggregator {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { strategies: vec![], bus }
    }

    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        info!(strategy = strategy.name(), "registered strategy");
        self.strategies.push(strategy);
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Evaluate all strategies against the batch. Returns the number of
    /// opportunities published.
    pub async fn run(&self, paths: &[TradePath]) -> usize {
        if paths.is_empty() {
            return 0;
        }

        let mut published = 0;
        for strategy in &self.strategies {
            let opportunities = strategy.find_arbitrage_opportunity(paths).await;
            debug!(
                strategy = strategy.name(),
                paths = paths.len(),
                opportunities = opportunities.len(),
                "strategy run finished"
            );
            for opportunity in opportunities {
                info!(%opportunity, "arbitrage opportunity found");
                self.bus.publish(Topic::ArbitrageOpportunity, Event::ArbitrageOpportunity(Arc::new(opportunity)));
                published += 1;
            }
        }
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventHandler;
    use crate::logic::pools::TokenId;
    use crate::logic::types::Opportunity;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use tokio::time::{Duration, sleep};

    struct FixedStrategy {
        name: &'static str,
        per_path: usize,
    }

    #[async_trait]
    impl Strategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn find_arbitrage_opportunity(&self, paths: &[TradePath]) -> Vec<Opportunity> {
            paths
                .iter()
                .flat_map(|path| {
                    (0..self.per_path).map(|_| {
                        Opportunity::new(
                            path.clone(),
                            dec!(1),
                            dec!(0.5),
                            TokenId::new("USDC"),
                            self.name,
                        )
                    })
                })
                .collect()
        }
    }

    struct Recorder {
        strategies: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: Event) {
            if let Event::ArbitrageOpportunity(opp) = event {
                self.strategies.lock().unwrap().push(opp.strategy);
            }
        }
    }

    #[tokio::test]
    async fn test_each_opportunity_is_published_individually() {
        let bus = Arc::new(EventBus::new());
        let recorder = Arc::new(Recorder { strategies: Mutex::new(vec![]) });
        bus.subscribe(Topic::ArbitrageOpportunity, recorder.clone());

        let mut aggregator = StrategyAggregator::new(bus);
        aggregator.register(Arc::new(FixedStrategy { name: "first", per_path: 2 }));
        aggregator.register(Arc::new(FixedStrategy { name: "empty", per_path: 0 }));
        aggregator.register(Arc::new(FixedStrategy { name: "second", per_path: 1 }));

        let paths = vec![TradePath::default()];
        let published = aggregator.run(&paths).await;
        assert_eq!(published, 3);

        sleep(Duration::from_millis(100)).await;
        let seen = recorder.strategies.lock().unwrap();
        assert_eq!(seen.len(), 3);
        // An empty strategy between two producing ones blocks nothing.
        assert!(seen.contains(&"first"));
        assert!(seen.contains(&"second"));
    }

    #[tokio::test]
    async fn test_empty_batch_publishes_nothing() {
        let bus = Arc::new(EventBus::new());
        let mut aggregator = StrategyAggregator::new(bus);
        aggregator.register(Arc::new(FixedStrategy { name: "first", per_path: 2 }));

        assert_eq!(aggregator.run(&[]).await, 0);
    }
}
