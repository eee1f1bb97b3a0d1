use super::{Strategy, quote_path_output};
use crate::logic::graph::TradePath;
use crate::logic::pools::CurveKind;
use crate::logic::types::Opportunity;
use async_trait::async_trait;
use rust_decimal::{Decimal, MathematicalOps};
use tracing::{debug, warn};

/// Closed-form sizing for two-pool cycles across constant-product pools.
///
/// The optimal input is `sqrt((x1*x2*y1*f1*f2)/y2) - x1` with (x, y) the
/// direction-oriented reserves of each hop and f = 1 - fee. The closed form
/// is an approximation of the chained quote, so the profit is recomputed
/// through the pools' actual dex quotes before anything is emitted.
pub struct TwoPoolStrategy {
    profit_threshold: Decimal,
}

impl TwoPoolStrategy {
    pub fn new(profit_threshold: Decimal) -> Self {
        let profit_threshold = if profit_threshold < Decimal::ZERO {
            warn!(%profit_threshold, "negative profit threshold, clamping to zero");
            Decimal::ZERO
        } else {
            profit_threshold
        };
        Self { profit_threshold }
    }

    fn evaluate(&self, path: &TradePath) -> Option<Opportunity> {
        if path.len() != 2 || !path.is_cycle() {
            return None;
        }
        if path.pools.iter().any(|p| p.curve_kind() != CurveKind::ConstantProduct) {
            return None;
        }

        let (x1, y1) = path.pools[0].oriented_reserves(&path.tokens[0]).ok()?;
        let (x2, y2) = path.pools[1].oriented_reserves(&path.tokens[1]).ok()?;
        let f1 = Decimal::ONE - path.pools[0].fee();
        let f2 = Decimal::ONE - path.pools[1].fee();

        // Zero reserves make the radicand undefined; checked_div covers it.
        let radicand = x1
            .checked_mul(x2)?
            .checked_mul(y1)?
            .checked_mul(f1)?
            .checked_mul(f2)?
            .checked_div(y2)?;
        let optimal = radicand.sqrt()?.checked_sub(x1)?.max(Decimal::ZERO);
        if optimal <= Decimal::ZERO {
            return None;
        }

        let output = match quote_path_output(path, optimal) {
            Ok(output) => output,
            Err(err) => {
                debug!(%path, %err, "quote failed while sizing two-pool cycle");
                return None;
            }
        };
        let profit = output - optimal;
        if profit <= self.profit_threshold {
            return None;
        }

        Some(Opportunity::new(
            path.clone(),
            optimal,
            profit,
            path.tokens[0].clone(),
            "two_pool",
        ))
    }
}

#[async_trait]
impl Strategy for TwoPoolStrategy {
    fn name(&self) -> &'static str {
        "two_pool"
    }

    async fn find_arbitrage_opportunity(&self, paths: &[TradePath]) -> Vec<Opportunity> {
        paths.iter().filter_map(|path| self.evaluate(path)).collect()
    }
}
