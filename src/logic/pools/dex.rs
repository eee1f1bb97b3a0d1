use super::pool::{Pool, PoolId, TokenId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Pricing curve family a dex implements. Strategies that rely on
/// curve-specific closed forms gate on this instead of assuming the math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum CurveKind {
    ConstantProduct,
    OrderBook,
    Unknown,
}

#[derive(thiserror::Error, Debug)]
pub enum QuoteError {
    #[error("pool {0} does not hold token {1}")]
    UnknownToken(PoolId, TokenId),
    #[error("pool {0} cannot quote {1} -> {2}")]
    InvalidDirection(PoolId, TokenId, TokenId),
    #[error("pool {0} has no liquidity for this quote")]
    InsufficientLiquidity(PoolId),
    #[error("amount {0} is not a valid quote input")]
    InvalidAmount(Decimal),
    #[error("quote arithmetic overflowed for pool {0}")]
    Overflow(PoolId),
}

/// A swap venue. One `Dex` instance is shared by every pool listed on that
/// venue; quoting takes the pool and the swap direction explicitly so the
/// pool itself stays immutable.
pub trait Dex: Send + Sync {
    fn name(&self) -> &str;

    fn curve_kind(&self) -> CurveKind;

    /// Output amount for an exact-input swap of `amount_in` `token_in`.
    fn amount_out(
        &self,
        pool: &Pool,
        amount_in: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError>;

    /// Input amount required for an exact-output swap of `amount_out` `token_out`.
    fn amount_in(
        &self,
        pool: &Pool,
        amount_out: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError>;
}
