pub mod graph;
pub mod path_finder;
pub mod pools;
pub mod strategy;
pub mod types;

pub use graph::{PoolGraph, SharedPoolGraph, TradePath, TradePathHash};
pub use path_finder::{ConfigError, PathConfig, PathConfigBuilder, PathFinder};
pub use pools::{
    ConstantProductDex, CurveKind, Dex, MockDex, Pool, PoolError, PoolId, QuoteError, TokenId,
};
pub use strategy::{
    GradientConfig, GradientSearchStrategy, Strategy, StrategyAggregator, TwoPoolStrategy,
};
pub use types::Opportunity;
