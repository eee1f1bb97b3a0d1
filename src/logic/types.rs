use crate::logic::graph::TradePath;
use crate::logic::pools::TokenId;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::time::SystemTime;

/// A sized arbitrage candidate produced by a strategy. Immutable after
/// creation; execution consumes it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub path: TradePath,
    pub input_amount: Decimal,
    pub expected_profit: Decimal,
    pub profit_token: TokenId,
    pub strategy: &'static str,
    pub discovered_at: SystemTime,
}

impl Opportunity {
    pub fn new(
        path: TradePath,
        input_amount: Decimal,
        expected_profit: Decimal,
        profit_token: TokenId,
        strategy: &'static str,
    ) -> Self {
        Self {
            path,
            input_amount,
            expected_profit,
            profit_token,
            strategy,
            discovered_at: SystemTime::now(),
        }
    }
}

impl Display for Opportunity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Opportunity(strategy={}, profit={} {}, input={}, path={})",
            self.strategy, self.expected_profit, self.profit_token, self.input_amount, self.path
        )
    }
}
