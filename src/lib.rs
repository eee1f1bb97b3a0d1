// Three-Layer Architecture
pub mod ingest;     // Ingestion Layer: transaction/auction feed boundary
pub mod logic;      // Logic Layer: pool graph, path finding, profit strategies
pub mod execution;  // Execution Layer: opportunity sink boundary

// Pipeline wiring and the in-process event bus
pub mod bus;
pub mod pipeline;
pub mod store;

// Common utilities and types
pub mod utils;

// Re-export key components from each layer
pub use bus::{BlockingEventHandler, Event, EventBus, EventHandler, Topic};
pub use execution::OpportunitySink;
pub use ingest::{AuctionFeedConfig, AuctionFeedMonitor, TransactionRecord};
pub use logic::{
    ConfigError, ConstantProductDex, CurveKind, Dex, GradientConfig, GradientSearchStrategy,
    MockDex, Opportunity, PathConfig, PathConfigBuilder, PathFinder, Pool, PoolError, PoolGraph,
    PoolId, QuoteError, SharedPoolGraph, Strategy, StrategyAggregator, TokenId, TradePath,
    TradePathHash, TwoPoolStrategy,
};
pub use pipeline::{
    AffectedPoolResolver, ArbConfig, ArbPipeline, GraphPoolResolver, refresh_graph,
};
pub use store::{InMemoryPoolStore, PoolStore};
pub use utils::{PriceCache, PriceCacheStats};
