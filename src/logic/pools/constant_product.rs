use super::dex::{CurveKind, Dex, QuoteError};
use super::pool::{Pool, TokenId};
use rust_decimal::Decimal;

/// Constant-product (x*y=k) AMM venue with a proportional input fee.
#[derive(Debug, Clone)]
pub struct ConstantProductDex {
    name: String,
}

impl ConstantProductDex {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Dex for ConstantProductDex {
    fn name(&self) -> &str {
        &self.name
    }

    fn curve_kind(&self) -> CurveKind {
        CurveKind::ConstantProduct
    }

    /// out = reserve_out * in * (1 - fee) / (reserve_in + in * (1 - fee))
    fn amount_out(
        &self,
        pool: &Pool,
        amount_in: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        if amount_in <= Decimal::ZERO {
            return Err(QuoteError::InvalidAmount(amount_in));
        }
        if pool.other_token(token_in) != Some(token_out) {
            return Err(QuoteError::InvalidDirection(
                pool.id().clone(),
                token_in.clone(),
                token_out.clone(),
            ));
        }
        let (reserve_in, reserve_out) = pool.oriented_reserves(token_in)?;
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }

        let effective_in = amount_in
            .checked_mul(Decimal::ONE - pool.fee())
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))?;
        let numerator = reserve_out
            .checked_mul(effective_in)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))?;
        let denominator = reserve_in
            .checked_add(effective_in)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))?;
        numerator
            .checked_div(denominator)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))
    }

    /// in = reserve_in * out / ((reserve_out - out) * (1 - fee))
    fn amount_in(
        &self,
        pool: &Pool,
        amount_out: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        if amount_out <= Decimal::ZERO {
            return Err(QuoteError::InvalidAmount(amount_out));
        }
        if pool.other_token(token_in) != Some(token_out) {
            return Err(QuoteError::InvalidDirection(
                pool.id().clone(),
                token_in.clone(),
                token_out.clone(),
            ));
        }
        let (reserve_in, reserve_out) = pool.oriented_reserves(token_in)?;
        if amount_out >= reserve_out {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }

        let numerator = reserve_in
            .checked_mul(amount_out)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))?;
        let denominator = (reserve_out - amount_out)
            .checked_mul(Decimal::ONE - pool.fee())
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))?;
        if denominator.is_zero() {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }
        numerator
            .checked_div(denominator)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))
    }
}
