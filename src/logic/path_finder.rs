use crate::logic::graph::{PoolGraph, SharedPoolGraph, TradePath};
use crate::logic::pools::{Pool, PoolId, TokenId};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("max_path_length must be at least 2, got {0}")]
    MaxPathLengthTooSmall(usize),
    #[error("min_liquidity must not be negative, got {0}")]
    NegativeMinLiquidity(Decimal),
    #[error("custom path {0} has fewer than 2 tokens")]
    CustomPathTooShort(usize),
    #[error("custom path {0} contains blacklisted token {1}")]
    CustomPathBlacklistedToken(usize, TokenId),
}

/// Search configuration for [`PathFinder`]. Validated at construction and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct PathConfig {
    max_path_length: usize,
    min_liquidity: Decimal,
    custom_paths: Vec<Vec<TokenId>>,
    start_tokens: Option<HashSet<TokenId>>,
    blacklist_tokens: HashSet<TokenId>,
    blacklist_dexes: HashSet<String>,
    prefer_custom_paths_exclusively: bool,
}

impl PathConfig {
    pub fn builder() -> PathConfigBuilder {
        PathConfigBuilder::default()
    }

    pub fn max_path_length(&self) -> usize {
        self.max_path_length
    }

    pub fn min_liquidity(&self) -> Decimal {
        self.min_liquidity
    }

    pub fn custom_paths(&self) -> &[Vec<TokenId>] {
        &self.custom_paths
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_path_length: 3,
            min_liquidity: Decimal::ZERO,
            custom_paths: vec![],
            start_tokens: None,
            blacklist_tokens: HashSet::new(),
            blacklist_dexes: HashSet::new(),
            prefer_custom_paths_exclusively: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathConfigBuilder {
    max_path_length: Option<usize>,
    min_liquidity: Option<Decimal>,
    custom_paths: Vec<Vec<TokenId>>,
    start_tokens: Option<HashSet<TokenId>>,
    blacklist_tokens: HashSet<TokenId>,
    blacklist_dexes: HashSet<String>,
    prefer_custom_paths_exclusively: Option<bool>,
}

impl PathConfigBuilder {
    pub fn max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = Some(max_path_length);
        self
    }

    pub fn min_liquidity(mut self, min_liquidity: Decimal) -> Self {
        self.min_liquidity = Some(min_liquidity);
        self
    }

    pub fn custom_path(mut self, tokens: Vec<TokenId>) -> Self {
        self.custom_paths.push(tokens);
        self
    }

    pub fn start_tokens<I: IntoIterator<Item = TokenId>>(mut self, tokens: I) -> Self {
        self.start_tokens = Some(tokens.into_iter().collect());
        self
    }

    pub fn blacklist_token(mut self, token: TokenId) -> Self {
        self.blacklist_tokens.insert(token);
        self
    }

    pub fn blacklist_dex(mut self, dex: impl Into<String>) -> Self {
        self.blacklist_dexes.insert(dex.into());
        self
    }

    pub fn prefer_custom_paths_exclusively(mut self, exclusive: bool) -> Self {
        self.prefer_custom_paths_exclusively = Some(exclusive);
        self
    }

    pub fn build(self) -> Result<PathConfig, ConfigError> {
        let max_path_length = self.max_path_length.unwrap_or(3);
        if max_path_length < 2 {
            return Err(ConfigError::MaxPathLengthTooSmall(max_path_length));
        }
        let min_liquidity = self.min_liquidity.unwrap_or(Decimal::ZERO);
        if min_liquidity < Decimal::ZERO {
            return Err(ConfigError::NegativeMinLiquidity(min_liquidity));
        }
        for (i, tokens) in self.custom_paths.iter().enumerate() {
            if tokens.len() < 2 {
                return Err(ConfigError::CustomPathTooShort(i));
            }
            // Materialization never re-checks the blacklist, so a sequence
            // through a blacklisted token must not make it into the config.
            if let Some(token) = tokens.iter().find(|t| self.blacklist_tokens.contains(*t)) {
                return Err(ConfigError::CustomPathBlacklistedToken(i, token.clone()));
            }
            if tokens.first() != tokens.last() {
                warn!(index = i, "custom path does not close back on its start token");
            }
        }
        Ok(PathConfig {
            max_path_length,
            min_liquidity,
            custom_paths: self.custom_paths,
            start_tokens: self.start_tokens,
            blacklist_tokens: self.blacklist_tokens,
            blacklist_dexes: self.blacklist_dexes,
            prefer_custom_paths_exclusively: self.prefer_custom_paths_exclusively.unwrap_or(true),
        })
    }
}

/// Bounded DFS cycle search over the pool graph, seeded by the tokens of a
/// batch of affected pools.
pub struct PathFinder {
    config: PathConfig,
    graph: Arc<SharedPoolGraph>,
}

impl PathFinder {
    pub fn new(config: PathConfig, graph: Arc<SharedPoolGraph>) -> Self {
        Self { config, graph }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Find candidate arbitrage cycles touching the given affected pools.
    ///
    /// Custom paths that share a token with the affected set are materialized
    /// first; when `prefer_custom_paths_exclusively` is set and at least one
    /// materializes, the organic search is skipped entirely. Every organic
    /// cycle starts and ends on an affected token and contains at least one
    /// affected pool.
    pub fn find_paths(&self, affected_pools: &[Arc<Pool>]) -> Vec<TradePath> {
        if affected_pools.is_empty() {
            return vec![];
        }

        let graph = self.graph.snapshot();

        let mut affected_tokens: HashSet<TokenId> = HashSet::new();
        let mut affected_pool_ids: HashSet<PoolId> = HashSet::new();
        for pool in affected_pools {
            affected_tokens.insert(pool.token0().clone());
            affected_tokens.insert(pool.token1().clone());
            affected_pool_ids.insert(pool.id().clone());
        }

        let custom = self.materialize_custom_paths(&graph, &affected_tokens);
        if !custom.is_empty() && self.config.prefer_custom_paths_exclusively {
            debug!(count = custom.len(), "returning custom paths exclusively");
            return custom;
        }

        let mut paths = custom;
        for start in &affected_tokens {
            if self.config.blacklist_tokens.contains(start) {
                continue;
            }
            if let Some(start_tokens) = &self.config.start_tokens {
                if !start_tokens.contains(start) {
                    continue;
                }
            }
            self.search_from(&graph, start, &affected_pool_ids, &mut paths);
        }

        debug!(
            affected_pools = affected_pools.len(),
            paths = paths.len(),
            "path search finished"
        );
        paths
    }

    /// Materialize configured token sequences into concrete paths, picking the
    /// deepest pool for every hop. A sequence is skipped when it shares no
    /// token with the affected set or any hop has no pool.
    fn materialize_custom_paths(
        &self,
        graph: &PoolGraph,
        affected_tokens: &HashSet<TokenId>,
    ) -> Vec<TradePath> {
        let mut paths = vec![];
        'sequences: for sequence in &self.config.custom_paths {
            if !sequence.iter().any(|token| affected_tokens.contains(token)) {
                continue;
            }

            let mut pools = Vec::with_capacity(sequence.len() - 1);
            for pair in sequence.windows(2) {
                match graph.deepest_pool_between(&pair[0], &pair[1]) {
                    Some(pool) => pools.push(pool),
                    None => {
                        warn!(from = %pair[0], to = %pair[1], "custom path hop has no pool, skipping sequence");
                        continue 'sequences;
                    }
                }
            }
            paths.push(TradePath::new(sequence.clone(), pools));
        }
        paths
    }

    fn search_from(
        &self,
        graph: &PoolGraph,
        start: &TokenId,
        affected_pool_ids: &HashSet<PoolId>,
        results: &mut Vec<TradePath>,
    ) {
        let mut tokens = vec![start.clone()];
        let mut pools: Vec<Arc<Pool>> = vec![];
        let mut used_pools: HashSet<PoolId> = HashSet::new();
        let mut visited: HashSet<TokenId> = HashSet::from([start.clone()]);

        self.dfs(
            graph,
            start,
            start,
            affected_pool_ids,
            &mut tokens,
            &mut pools,
            &mut used_pools,
            &mut visited,
            results,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs(
        &self,
        graph: &PoolGraph,
        start: &TokenId,
        current: &TokenId,
        affected_pool_ids: &HashSet<PoolId>,
        tokens: &mut Vec<TokenId>,
        pools: &mut Vec<Arc<Pool>>,
        used_pools: &mut HashSet<PoolId>,
        visited: &mut HashSet<TokenId>,
        results: &mut Vec<TradePath>,
    ) {
        for (neighbor, edge_pools) in graph.neighbors(current) {
            if self.config.blacklist_tokens.contains(neighbor) {
                continue;
            }
            let closes_cycle = neighbor == start;
            if !closes_cycle && visited.contains(neighbor) {
                continue;
            }

            // Affected pools first, then by id for a stable order.
            let mut candidates: Vec<&Arc<Pool>> = edge_pools.values().collect();
            candidates.sort_by_key(|pool| (!affected_pool_ids.contains(pool.id()), pool.id().clone()));

            for pool in candidates {
                if self.config.blacklist_dexes.contains(pool.dex_name()) {
                    continue;
                }
                if pool.total_reserve() < self.config.min_liquidity {
                    continue;
                }
                if used_pools.contains(pool.id()) {
                    continue;
                }

                if closes_cycle {
                    // Cycles only count when anchored to the triggering batch.
                    let anchored = affected_pool_ids.contains(pool.id())
                        || pools.iter().any(|p| affected_pool_ids.contains(p.id()));
                    if pools.is_empty() || !anchored {
                        continue;
                    }
                    let mut cycle_tokens = tokens.clone();
                    cycle_tokens.push(start.clone());
                    let mut cycle_pools = pools.clone();
                    cycle_pools.push(pool.clone());
                    results.push(TradePath::new(cycle_tokens, cycle_pools));
                    continue;
                }

                // Leave room for the closing hop back to the start token.
                if pools.len() + 1 >= self.config.max_path_length {
                    continue;
                }

                tokens.push(neighbor.clone());
                pools.push(pool.clone());
                used_pools.insert(pool.id().clone());
                visited.insert(neighbor.clone());

                self.dfs(
                    graph,
                    start,
                    neighbor,
                    affected_pool_ids,
                    tokens,
                    pools,
                    used_pools,
                    visited,
                    results,
                );

                visited.remove(neighbor);
                used_pools.remove(pool.id());
                pools.pop();
                tokens.pop();
            }
        }
    }
}
