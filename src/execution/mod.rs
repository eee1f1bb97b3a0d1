use crate::bus::{Event, EventBus, EventHandler, Topic};
use crate::logic::types::Opportunity;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::info;

/// Execution boundary: consumes opportunities one at a time off the bus.
///
/// Trade construction, signing and submission are collaborator territory;
/// this sink records what it sees so downstream wiring has something real
/// to attach to.
#[derive(Default)]
pub struct OpportunitySink {
    received: Mutex<Vec<Arc<Opportunity>>>,
}

impl OpportunitySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the sink to the opportunity topic.
    pub fn subscribe(self: Arc<Self>, bus: &EventBus) {
        bus.subscribe(Topic::ArbitrageOpportunity, self);
    }

    pub fn received(&self) -> Vec<Arc<Opportunity>> {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn received_count(&self) -> usize {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl EventHandler for OpportunitySink {
    async fn handle(&self, event: Event) {
        if let Event::ArbitrageOpportunity(opportunity) = event {
            info!(%opportunity, "opportunity received for execution");
            self.received.lock().unwrap_or_else(|e| e.into_inner()).push(opportunity);
        }
    }
}
