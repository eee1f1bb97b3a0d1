pub mod path_hash;
pub mod pool_graph;
pub mod trade_path;

pub use path_hash::TradePathHash;
pub use pool_graph::{FastHashMap, FastHasher, PoolGraph, SharedPoolGraph, TokenNode};
pub use trade_path::{TradePath, generate_trade_path_hash};
