use crate::ingest::TransactionRecord;
use crate::logic::graph::SharedPoolGraph;
use crate::logic::pools::{Pool, PoolId};
use std::collections::HashSet;
use std::sync::Arc;

/// Boundary for mapping observed transactions to the pools they touched.
/// How precisely that mapping happens (calldata decoding, log parsing) is
/// collaborator territory; the pipeline only needs the resulting pools.
pub trait AffectedPoolResolver: Send + Sync {
    fn resolve(&self, records: &[TransactionRecord]) -> Vec<Arc<Pool>>;
}

/// Graph-backed resolver: a record affects every pool of the named dex that
/// directly connects its token pair.
pub struct GraphPoolResolver {
    graph: Arc<SharedPoolGraph>,
}

impl GraphPoolResolver {
    pub fn new(graph: Arc<SharedPoolGraph>) -> Self {
        Self { graph }
    }
}

impl AffectedPoolResolver for GraphPoolResolver {
    fn resolve(&self, records: &[TransactionRecord]) -> Vec<Arc<Pool>> {
        let graph = self.graph.snapshot();
        let mut seen: HashSet<PoolId> = HashSet::new();
        let mut affected = vec![];

        for record in records {
            for pool in graph.pools_between(&record.token_in, &record.token_out) {
                if pool.dex_name() == record.dex && seen.insert(pool.id().clone()) {
                    affected.push(pool);
                }
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::graph::PoolGraph;
    use crate::logic::pools::{ConstantProductDex, TokenId};
    use rust_decimal_macros::dec;

    fn pool(id: &str, token0: &str, token1: &str, dex: &str) -> Arc<Pool> {
        Arc::new(
            Pool::new(
                PoolId::new(id),
                TokenId::new(token0),
                TokenId::new(token1),
                Arc::new(ConstantProductDex::new(dex)),
                dec!(1000),
                dec!(1000),
                dec!(0.003),
            )
            .unwrap(),
        )
    }

    fn record(dex: &str, token_in: &str, token_out: &str) -> TransactionRecord {
        TransactionRecord {
            hash: "0xdeadbeef".to_string(),
            dex: dex.to_string(),
            function: "swap".to_string(),
            token_in: TokenId::new(token_in),
            token_out: TokenId::new(token_out),
            amount_in: dec!(100),
            amount_out: dec!(99),
            timestamp: 1724457600,
        }
    }

    #[test]
    fn test_resolver_matches_pair_and_dex() {
        let graph = Arc::new(SharedPoolGraph::new(PoolGraph::from_pools(vec![
            pool("0x1", "USDC", "ETH", "uniswap_v2"),
            pool("0x2", "USDC", "ETH", "sushiswap"),
            pool("0x3", "ETH", "USDT", "uniswap_v2"),
        ])));
        let resolver = GraphPoolResolver::new(graph);

        let affected = resolver.resolve(&[record("uniswap_v2", "USDC", "ETH")]);
        assert_eq!(affected.len(), 1);
        assert_eq!(affected[0].id(), &PoolId::new("0x1"));

        // Unknown pair or dex resolves to nothing.
        assert!(resolver.resolve(&[record("uniswap_v2", "USDC", "BTC")]).is_empty());
        assert!(resolver.resolve(&[record("pancake", "USDC", "ETH")]).is_empty());
    }

    #[test]
    fn test_resolver_deduplicates_across_records() {
        let graph = Arc::new(SharedPoolGraph::new(PoolGraph::from_pools(vec![pool(
            "0x1",
            "USDC",
            "ETH",
            "uniswap_v2",
        )])));
        let resolver = GraphPoolResolver::new(graph);

        let affected = resolver.resolve(&[
            record("uniswap_v2", "USDC", "ETH"),
            record("uniswap_v2", "ETH", "USDC"),
        ]);
        assert_eq!(affected.len(), 1);
    }
}
