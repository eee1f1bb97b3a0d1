use crate::logic::pools::{Pool, PoolId, TokenId};
use dashmap::DashMap;
use std::sync::Arc;

/// Read access to the known pool universe. Persistence, RPC sync and any
/// other way of keeping the set fresh live behind this seam.
pub trait PoolStore: Send + Sync {
    fn get_all_pools(&self) -> Vec<Arc<Pool>>;

    fn get_pool(&self, pool_id: &PoolId) -> Option<Arc<Pool>>;

    fn get_pool_by_token(&self, token: &TokenId) -> Vec<Arc<Pool>>;
}

/// DashMap-backed store for wiring and tests.
#[derive(Default)]
pub struct InMemoryPoolStore {
    pools: DashMap<PoolId, Arc<Pool>>,
}

impl InMemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pool: Arc<Pool>) {
        self.pools.insert(pool.id().clone(), pool);
    }

    pub fn remove(&self, pool_id: &PoolId) -> Option<Arc<Pool>> {
        self.pools.remove(pool_id).map(|(_, pool)| pool)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolStore for InMemoryPoolStore {
    fn get_all_pools(&self) -> Vec<Arc<Pool>> {
        self.pools.iter().map(|entry| entry.value().clone()).collect()
    }

    fn get_pool(&self, pool_id: &PoolId) -> Option<Arc<Pool>> {
        self.pools.get(pool_id).map(|entry| entry.value().clone())
    }

    fn get_pool_by_token(&self, token: &TokenId) -> Vec<Arc<Pool>> {
        self.pools
            .iter()
            .filter(|entry| entry.value().contains_token(token))
            .map(|entry| entry.value().clone())
            .collect()
    }
}
