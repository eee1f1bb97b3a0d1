use crate::logic::pools::{Pool, PoolId, TokenId};
use ahash::RandomState;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};

pub type FastHasher = RandomState;
/// FastHashMap using ahash
pub type FastHashMap<K, V> = HashMap<K, V, FastHasher>;

/// Undirected multigraph of tokens (nodes) and pools (edges).
///
/// Each edge weight is a map of pool id to pool, so parallel pools between the
/// same token pair stay distinct and are never merged. We never delete nodes
/// or edges; updates happen by rebuilding a fresh graph (see [`SharedPoolGraph`]).
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    graph: UnGraph<TokenNode, FastHashMap<PoolId, Arc<Pool>>, usize>,
    // pool id -> pool
    pools: FastHashMap<PoolId, Arc<Pool>>,
    // token -> node index
    token_index: FastHashMap<TokenId, NodeIndex<usize>>,
    // pool -> edge index (an edge is a hashmap of pools where the pool is part of)
    pool_index: FastHashMap<PoolId, EdgeIndex<usize>>,
}

impl PoolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pools<I>(pools: I) -> Self
    where
        I: IntoIterator<Item = Arc<Pool>>,
    {
        let mut graph = Self::new();
        for pool in pools {
            graph.add_pool(pool);
        }
        graph
    }

    fn add_or_get_token_idx(&mut self, token: &TokenId) -> NodeIndex<usize> {
        if let Some(&idx) = self.token_index.get(token) {
            return idx;
        }
        let idx = self.graph.add_node(TokenNode::new(token.clone()));
        self.token_index.insert(token.clone(), idx);
        idx
    }

    /// Add a new pool as an edge to the graph. Token nodes are inserted on
    /// demand; adding the same pool id twice is a no-op.
    pub fn add_pool(&mut self, pool: Arc<Pool>) {
        if self.pools.contains_key(pool.id()) {
            return;
        }

        let node0 = self.add_or_get_token_idx(pool.token0());
        let node1 = self.add_or_get_token_idx(pool.token1());

        let edge_index = match self.graph.find_edge(node0, node1) {
            Some(edge_index) => {
                let pools = self
                    .graph
                    .edge_weight_mut(edge_index)
                    .unwrap_or_else(|| unreachable!("edge index came from find_edge"));
                pools.insert(pool.id().clone(), pool.clone());
                edge_index
            }
            None => {
                let mut pools = FastHashMap::default();
                pools.insert(pool.id().clone(), pool.clone());
                self.graph.add_edge(node0, node1, pools)
            }
        };

        self.pool_index.insert(pool.id().clone(), edge_index);
        self.pools.insert(pool.id().clone(), pool);
    }

    pub fn pool(&self, pool_id: &PoolId) -> Option<&Arc<Pool>> {
        self.pools.get(pool_id)
    }

    pub fn all_pools(&self) -> impl Iterator<Item = &Arc<Pool>> {
        self.pools.values()
    }

    pub fn contains_token(&self, token: &TokenId) -> bool {
        self.token_index.contains_key(token)
    }

    pub fn token_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Neighbor tokens of `token` with the parallel pools on each edge.
    pub fn neighbors(
        &self,
        token: &TokenId,
    ) -> Vec<(&TokenId, &FastHashMap<PoolId, Arc<Pool>>)> {
        let Some(&idx) = self.token_index.get(token) else {
            return vec![];
        };
        self.graph
            .edges(idx)
            .map(|edge| (&self.graph[edge.target()].token, edge.weight()))
            .collect()
    }

    /// All pools directly connecting two tokens.
    pub fn pools_between(&self, token_a: &TokenId, token_b: &TokenId) -> Vec<Arc<Pool>> {
        let (Some(&idx_a), Some(&idx_b)) =
            (self.token_index.get(token_a), self.token_index.get(token_b))
        else {
            return vec![];
        };
        match self.graph.find_edge(idx_a, idx_b) {
            Some(edge_index) => self
                .graph
                .edge_weight(edge_index)
                .map(|pools| pools.values().cloned().collect())
                .unwrap_or_default(),
            None => vec![],
        }
    }

    /// The deepest pool (by total reserve) connecting two tokens.
    pub fn deepest_pool_between(&self, token_a: &TokenId, token_b: &TokenId) -> Option<Arc<Pool>> {
        self.pools_between(token_a, token_b)
            .into_iter()
            .max_by(|a, b| a.total_reserve().cmp(&b.total_reserve()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenNode {
    pub token: TokenId,
}

impl Display for TokenNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token)
    }
}

impl TokenNode {
    pub fn new(token: TokenId) -> Self {
        Self { token }
    }
}

/// Swap-on-rebuild handle around a [`PoolGraph`].
///
/// `rebuild` constructs a fresh graph from a full pool snapshot and swaps the
/// inner Arc. In-flight searches keep the snapshot they started with; the
/// graph is never mutated destructively in place.
#[derive(Debug, Default)]
pub struct SharedPoolGraph {
    inner: RwLock<Arc<PoolGraph>>,
}

impl SharedPoolGraph {
    pub fn new(graph: PoolGraph) -> Self {
        Self { inner: RwLock::new(Arc::new(graph)) }
    }

    /// The current graph snapshot.
    pub fn snapshot(&self) -> Arc<PoolGraph> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Rebuild the graph from a full pool snapshot and publish it atomically.
    pub fn rebuild<I>(&self, pools: I)
    where
        I: IntoIterator<Item = Arc<Pool>>,
    {
        let fresh = Arc::new(PoolGraph::from_pools(pools));
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
    }
}
