use super::dex::{CurveKind, Dex, QuoteError};
use super::pool::{Pool, TokenId};
use rust_decimal::Decimal;

/// Fixed-rate dex for tests: every swap pays `rate` output per unit input,
/// ignoring reserves. `failing()` builds a variant whose quotes always error,
/// for exercising fail-soft behavior.
#[derive(Debug, Clone)]
pub struct MockDex {
    name: String,
    rate: Decimal,
    curve_kind: CurveKind,
    failing: bool,
}

impl MockDex {
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        Self { name: name.into(), rate, curve_kind: CurveKind::Unknown, failing: false }
    }

    pub fn with_curve_kind(mut self, curve_kind: CurveKind) -> Self {
        self.curve_kind = curve_kind;
        self
    }

    pub fn failing(name: impl Into<String>) -> Self {
        Self { name: name.into(), rate: Decimal::ZERO, curve_kind: CurveKind::Unknown, failing: true }
    }
}

impl Dex for MockDex {
    fn name(&self) -> &str {
        &self.name
    }

    fn curve_kind(&self) -> CurveKind {
        self.curve_kind
    }

    fn amount_out(
        &self,
        pool: &Pool,
        amount_in: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        if self.failing {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }
        if pool.other_token(token_in) != Some(token_out) {
            return Err(QuoteError::InvalidDirection(
                pool.id().clone(),
                token_in.clone(),
                token_out.clone(),
            ));
        }
        amount_in
            .checked_mul(self.rate)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))
    }

    fn amount_in(
        &self,
        pool: &Pool,
        amount_out: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        if self.failing {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }
        if pool.other_token(token_in) != Some(token_out) {
            return Err(QuoteError::InvalidDirection(
                pool.id().clone(),
                token_in.clone(),
                token_out.clone(),
            ));
        }
        if self.rate.is_zero() {
            return Err(QuoteError::InsufficientLiquidity(pool.id().clone()));
        }
        amount_out
            .checked_div(self.rate)
            .ok_or_else(|| QuoteError::Overflow(pool.id().clone()))
    }
}
