pub mod aggregator;
pub mod gradient;
pub mod two_pool;

pub use aggregator::StrategyAggregator;
pub use gradient::{GradientConfig, GradientSearchStrategy, InitialGuessFn};
pub use two_pool::TwoPoolStrategy;

use crate::logic::graph::TradePath;
use crate::logic::pools::QuoteError;
use crate::logic::types::Opportunity;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// A profit strategy. Implementations evaluate a batch of candidate paths
/// and size the profitable ones; they never raise, a path that cannot be
/// evaluated simply contributes nothing.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn find_arbitrage_opportunity(&self, paths: &[TradePath]) -> Vec<Opportunity>;
}

/// Walk the path hop by hop through each pool's dex quote and return the
/// final output amount.
pub(crate) fn quote_path_output(
    path: &TradePath,
    amount_in: Decimal,
) -> Result<Decimal, QuoteError> {
    let mut amount = amount_in;
    for (i, pool) in path.pools.iter().enumerate() {
        amount = pool.quote_amount_out(amount, &path.tokens[i], &path.tokens[i + 1])?;
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::pools::{MockDex, Pool, PoolId, TokenId};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_quote_path_output_chains_hops() {
        let dex = Arc::new(MockDex::new("mock_dex", dec!(2)));
        let pool_1 = Arc::new(
            Pool::new(
                PoolId::new("0x1"),
                TokenId::new("USDC"),
                TokenId::new("ETH"),
                dex.clone(),
                dec!(1000),
                dec!(1000),
                dec!(0),
            )
            .unwrap(),
        );
        let pool_2 = Arc::new(
            Pool::new(
                PoolId::new("0x2"),
                TokenId::new("ETH"),
                TokenId::new("USDC"),
                dex,
                dec!(1000),
                dec!(1000),
                dec!(0),
            )
            .unwrap(),
        );

        let path = TradePath::new(
            vec![TokenId::new("USDC"), TokenId::new("ETH"), TokenId::new("USDC")],
            vec![pool_1, pool_2],
        );

        // Each hop doubles the amount.
        assert_eq!(quote_path_output(&path, dec!(10)).unwrap(), dec!(40));
    }
}
