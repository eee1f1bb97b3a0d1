use super::{Strategy, quote_path_output};
use crate::logic::graph::TradePath;
use crate::logic::types::Opportunity;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, trace};

pub type InitialGuessFn = Arc<dyn Fn(&TradePath) -> Decimal + Send + Sync>;

/// Tunables for [`GradientSearchStrategy`].
#[derive(Clone)]
pub struct GradientConfig {
    pub learning_rate: Decimal,
    pub max_iterations: u32,
    pub profit_threshold: Decimal,
    pub min_gradient: Decimal,
    pub delta: Decimal,
    pub initial_guess: InitialGuessFn,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            learning_rate: Decimal::new(1, 1),   // 0.1
            max_iterations: 100,
            profit_threshold: Decimal::ZERO,
            min_gradient: Decimal::new(1, 6),    // 0.000001
            delta: Decimal::new(1, 2),           // 0.01
            initial_guess: Arc::new(default_initial_guess),
        }
    }
}

impl std::fmt::Debug for GradientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientConfig")
            .field("learning_rate", &self.learning_rate)
            .field("max_iterations", &self.max_iterations)
            .field("profit_threshold", &self.profit_threshold)
            .field("min_gradient", &self.min_gradient)
            .field("delta", &self.delta)
            .finish_non_exhaustive()
    }
}

/// One percent of the smallest direction-oriented input reserve along the
/// path. Small enough to stay inside the linear region of every hop.
pub fn default_initial_guess(path: &TradePath) -> Decimal {
    let one_percent = Decimal::new(1, 2);
    path.pools
        .iter()
        .enumerate()
        .filter_map(|(i, pool)| pool.oriented_reserves(&path.tokens[i]).ok())
        .map(|(reserve_in, _)| reserve_in)
        .filter(|reserve_in| *reserve_in > Decimal::ZERO)
        .min()
        .map(|smallest| smallest * one_percent)
        .unwrap_or(Decimal::ONE)
}

/// Iterative input sizing via gradient ascent on the path profit function.
///
/// Works for any path length and any curve kind since it only needs the dex
/// quotes. Tracks the best input seen across all iterations; the emitted
/// opportunity is the best one, not the last iterate.
pub struct GradientSearchStrategy {
    config: GradientConfig,
}

impl GradientSearchStrategy {
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    /// Path profit at a given input. Quote failures degrade to zero profit
    /// for that evaluation.
    fn profit_at(path: &TradePath, amount_in: Decimal) -> Decimal {
        if amount_in <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match quote_path_output(path, amount_in) {
            Ok(output) => output - amount_in,
            Err(err) => {
                trace!(%path, %amount_in, %err, "quote failed, treating profit as zero");
                Decimal::ZERO
            }
        }
    }

    fn optimize(&self, path: &TradePath) -> Option<Opportunity> {
        if path.len() < 2 || !path.is_cycle() {
            return None;
        }

        let mut amount = (self.config.initial_guess)(path);
        if amount <= Decimal::ZERO {
            return None;
        }

        let mut best_amount = amount;
        let mut best_profit = Decimal::MIN;
        let two_delta = self.config.delta * Decimal::TWO;

        for iteration in 0..self.config.max_iterations {
            let profit = Self::profit_at(path, amount);
            if profit > best_profit {
                best_profit = profit;
                best_amount = amount;
            }
            if profit >= self.config.profit_threshold && profit > Decimal::ZERO {
                debug!(%path, iteration, %profit, "profit threshold reached");
                break;
            }

            let upper = Self::profit_at(path, amount + self.config.delta);
            let lower = Self::profit_at(path, amount - self.config.delta);
            let Some(gradient) = (upper - lower).checked_div(two_delta) else {
                break;
            };
            if gradient.abs() < self.config.min_gradient {
                break;
            }

            amount = (amount + self.config.learning_rate * gradient).max(Decimal::ZERO);
            if amount.is_zero() {
                break;
            }
        }

        if best_profit <= Decimal::ZERO {
            return None;
        }
        Some(Opportunity::new(
            path.clone(),
            best_amount,
            best_profit,
            path.tokens[0].clone(),
            "gradient_search",
        ))
    }
}

#[async_trait]
impl Strategy for GradientSearchStrategy {
    fn name(&self) -> &'static str {
        "gradient_search"
    }

    async fn find_arbitrage_opportunity(&self, paths: &[TradePath]) -> Vec<Opportunity> {
        paths.iter().filter_map(|path| self.optimize(path)).collect()
    }
}
