use super::path_hash::TradePathHash;
use crate::logic::pools::{Pool, PoolId, TokenId};

use sha2::digest::Update;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug, Default, Eq)]
pub struct TradePath {
    // stable hash of the path, used for set comparisons and logging
    pub path_hash: TradePathHash,
    // internal lookup for faster contains_pool
    pub pools_map: HashSet<PoolId>,
    // The tokens of the path e.g. token0 -> token1 -> token0
    pub tokens: Vec<TokenId>,
    // The pools of the path e.g. pool0 -> pool1
    pub pools: Vec<Arc<Pool>>,
}

impl Display for TradePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TradePath(pools={:?}, tokens={:?})",
            self.pools.iter().map(|p| p.id().to_string()).collect::<Vec<String>>(),
            self.tokens.iter().map(|t| t.to_string()).collect::<Vec<String>>()
        )
    }
}

impl TradePath {
    /// Create a new trade path for a list of tokens and pools
    pub fn new(tokens: Vec<TokenId>, pools: Vec<Arc<Pool>>) -> Self {
        let mut pools_map = HashSet::new();
        for pool in &pools {
            pools_map.insert(pool.id().clone());
        }
        let path_hash = generate_trade_path_hash(&tokens, &pools);

        TradePath { path_hash, tokens, pools, pools_map }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.pools.is_empty()
    }

    pub fn tokens_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the trade path contains a pool
    pub fn contains_pool(&self, pool_id: &PoolId) -> bool {
        self.pools_map.contains(pool_id)
    }

    /// The start token of the path, if any.
    pub fn start_token(&self) -> Option<&TokenId> {
        self.tokens.first()
    }

    /// A path is a closed cycle when it ends on its start token.
    pub fn is_cycle(&self) -> bool {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => !self.pools.is_empty() && first == last,
            _ => false,
        }
    }

    /// The hop count of the trade path
    pub fn len(&self) -> usize {
        self.pools.len()
    }
}

impl Hash for TradePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
        self.pools.hash(state);
    }
}

impl PartialEq for TradePath {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens && self.pools == other.pools
    }
}

/// Hash all the token and pool ids of the path to a sha256 hash.
/// Stable and reproducible across runs and processes.
pub fn generate_trade_path_hash(tokens: &[TokenId], pools: &[Arc<Pool>]) -> TradePathHash {
    let mut hasher = Sha256::new();

    for token in tokens.iter() {
        Update::update(&mut hasher, token.as_str().as_bytes());
    }
    for pool in pools.iter() {
        Update::update(&mut hasher, pool.id().as_str().as_bytes());
    }

    let hash_slice: [u8; 32] = hasher.finalize().into();
    TradePathHash(hash_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::pools::{MockDex, PoolId};
    use rust_decimal_macros::dec;

    fn pool(id: &str, token0: &str, token1: &str) -> Arc<Pool> {
        Arc::new(
            Pool::new(
                PoolId::new(id),
                TokenId::new(token0),
                TokenId::new(token1),
                Arc::new(MockDex::new("mock_dex", dec!(1))),
                dec!(1000),
                dec!(1000),
                dec!(0.003),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_trade_path() {
        let pool_1_2 = pool("0x1", "USDC", "ETH");
        let pool_2_3 = pool("0x2", "ETH", "USDT");
        let pool_3_1 = pool("0x3", "USDT", "USDC");

        let path = TradePath::new(
            vec![TokenId::new("USDC"), TokenId::new("ETH"), TokenId::new("USDT"), TokenId::new("USDC")],
            vec![pool_1_2.clone(), pool_2_3.clone(), pool_3_1.clone()],
        );

        assert!(!path.is_empty());
        assert!(path.is_cycle());
        assert_eq!(path.tokens_count(), 4);
        assert_eq!(path.len(), 3);
        assert_eq!(path.path_hash, generate_trade_path_hash(&path.tokens, &path.pools));

        assert!(path.contains_pool(pool_1_2.id()));
        assert!(path.contains_pool(pool_2_3.id()));
        assert!(path.contains_pool(pool_3_1.id()));
        assert!(!path.contains_pool(&PoolId::new("0x99")));
    }

    #[test]
    fn test_single_hop_path_is_not_a_cycle() {
        let pool_1_2 = pool("0x1", "USDC", "ETH");

        let path = TradePath::new(
            vec![TokenId::new("USDC"), TokenId::new("ETH")],
            vec![pool_1_2.clone()],
        );

        assert!(!path.is_empty());
        assert!(!path.is_cycle());
        assert_eq!(path.tokens_count(), 2);
        assert_eq!(path.len(), 1);
        assert_eq!(path.start_token(), Some(&TokenId::new("USDC")));
        assert!(path.contains_pool(pool_1_2.id()));
    }

    #[test]
    fn test_trade_path_hash_is_order_sensitive() {
        let pool_1_2 = pool("0x1", "USDC", "ETH");
        let pool_2_1 = pool("0x2", "ETH", "USDC");

        let forward = TradePath::new(
            vec![TokenId::new("USDC"), TokenId::new("ETH"), TokenId::new("USDC")],
            vec![pool_1_2.clone(), pool_2_1.clone()],
        );
        let backward = TradePath::new(
            vec![TokenId::new("USDC"), TokenId::new("ETH"), TokenId::new("USDC")],
            vec![pool_2_1, pool_1_2],
        );

        assert_ne!(forward.path_hash, backward.path_hash);
    }
}
