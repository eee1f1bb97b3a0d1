use crate::ingest::TransactionRecord;
use crate::logic::types::Opportunity;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::trace;

/// Topics the pipeline communicates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    ReceiveTransactions,
    ArbitrageOpportunity,
}

/// Typed payloads carried on the bus. Payloads are shared via Arc so that
/// fan-out to many subscribers never clones the underlying data.
#[derive(Debug, Clone)]
pub enum Event {
    ReceiveTransactions(Arc<Vec<TransactionRecord>>),
    ArbitrageOpportunity(Arc<Opportunity>),
}

/// Async subscriber, scheduled with `tokio::spawn`.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event);
}

/// Synchronous subscriber for CPU-bound or otherwise blocking work,
/// scheduled with `tokio::task::spawn_blocking`.
pub trait BlockingEventHandler: Send + Sync {
    fn handle(&self, event: Event);
}

enum SubscriberEntry {
    Async(Arc<dyn EventHandler>),
    Blocking(Arc<dyn BlockingEventHandler>),
}

/// In-process topic-based publish/subscribe bus.
///
/// Publishing is fire-and-forget: each subscriber runs on its own task, no
/// delivery order is guaranteed across subscribers and a failing subscriber
/// never propagates back to the publisher.
#[derive(Default)]
pub struct EventBus {
    subscribers: DashMap<Topic, Vec<SubscriberEntry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic, handler: Arc<dyn EventHandler>) {
        self.subscribers.entry(topic).or_default().push(SubscriberEntry::Async(handler));
    }

    pub fn subscribe_blocking(&self, topic: Topic, handler: Arc<dyn BlockingEventHandler>) {
        self.subscribers.entry(topic).or_default().push(SubscriberEntry::Blocking(handler));
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers.get(&topic).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Deliver an event to every subscriber of the topic. Must be called
    /// from within a tokio runtime.
    pub fn publish(&self, topic: Topic, event: Event) {
        let Some(entries) = self.subscribers.get(&topic) else {
            trace!(%topic, "no subscribers for topic");
            return;
        };
        for entry in entries.iter() {
            match entry {
                SubscriberEntry::Async(handler) => {
                    let handler = handler.clone();
                    let event = event.clone();
                    tokio::spawn(async move {
                        handler.handle(event).await;
                    });
                }
                SubscriberEntry::Blocking(handler) => {
                    let handler = handler.clone();
                    let event = event.clone();
                    tokio::task::spawn_blocking(move || {
                        handler.handle(event);
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::graph::TradePath;
    use crate::logic::pools::TokenId;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Duration, sleep};

    struct CountingHandler {
        count: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: Event) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct BlockingCounter {
        count: AtomicUsize,
    }

    impl BlockingEventHandler for BlockingCounter {
        fn handle(&self, _event: Event) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn opportunity_event() -> Event {
        let opp = Opportunity::new(
            TradePath::default(),
            dec!(1),
            dec!(0.5),
            TokenId::new("USDC"),
            "two_pool",
        );
        Event::ArbitrageOpportunity(Arc::new(opp))
    }

    #[tokio::test]
    async fn test_async_and_blocking_subscribers_both_receive() {
        let bus = EventBus::new();
        let async_handler = Arc::new(CountingHandler { count: AtomicUsize::new(0) });
        let blocking_handler = Arc::new(BlockingCounter { count: AtomicUsize::new(0) });

        bus.subscribe(Topic::ArbitrageOpportunity, async_handler.clone());
        bus.subscribe_blocking(Topic::ArbitrageOpportunity, blocking_handler.clone());
        assert_eq!(bus.subscriber_count(Topic::ArbitrageOpportunity), 2);

        bus.publish(Topic::ArbitrageOpportunity, opportunity_event());
        bus.publish(Topic::ArbitrageOpportunity, opportunity_event());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(async_handler.count.load(Ordering::SeqCst), 2);
        assert_eq!(blocking_handler.count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(Topic::ReceiveTransactions, opportunity_event());
        assert_eq!(bus.subscriber_count(Topic::ReceiveTransactions), 0);
    }

    #[tokio::test]
    async fn test_subscribers_are_topic_scoped() {
        let bus = EventBus::new();
        let handler = Arc::new(CountingHandler { count: AtomicUsize::new(0) });
        bus.subscribe(Topic::ReceiveTransactions, handler.clone());

        bus.publish(Topic::ArbitrageOpportunity, opportunity_event());

        sleep(Duration::from_millis(50)).await;
        assert_eq!(handler.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_affect_publisher() {
        struct PanickingHandler;

        #[async_trait]
        impl EventHandler for PanickingHandler {
            async fn handle(&self, _event: Event) {
                panic!("subscriber failure");
            }
        }

        let bus = EventBus::new();
        let counter = Arc::new(CountingHandler { count: AtomicUsize::new(0) });
        bus.subscribe(Topic::ArbitrageOpportunity, Arc::new(PanickingHandler));
        bus.subscribe(Topic::ArbitrageOpportunity, counter.clone());

        bus.publish(Topic::ArbitrageOpportunity, opportunity_event());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_topic_snake_case_names() {
        assert_eq!(Topic::ReceiveTransactions.to_string(), "receive_transactions");
        assert_eq!(Topic::ArbitrageOpportunity.to_string(), "arbitrage_opportunity");
    }
}
