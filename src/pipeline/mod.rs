pub mod config;
pub mod resolver;
pub mod service;

pub use config::ArbConfig;
pub use resolver::{AffectedPoolResolver, GraphPoolResolver};
pub use service::ArbPipeline;

use crate::logic::graph::SharedPoolGraph;
use crate::store::PoolStore;

/// Refresh the shared graph from the store's current pool universe. The
/// rebuild is atomic; searches already running keep their old snapshot.
pub fn refresh_graph(store: &dyn PoolStore, graph: &SharedPoolGraph) {
    graph.rebuild(store.get_all_pools());
}
