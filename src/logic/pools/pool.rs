use super::dex::{CurveKind, Dex, QuoteError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque token identifier. Tokens carry no state of their own, they are
/// only used as keys in the pool graph and in path token sequences.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(Arc<str>);

impl TokenId {
    pub fn new(id: impl AsRef<str>) -> Self {
        TokenId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for TokenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        TokenId::new(id)
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        TokenId(Arc::from(id))
    }
}

impl Serialize for TokenId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TokenId::from(s))
    }
}

/// Unique pool identifier (the venue address).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(Arc<str>);

impl PoolId {
    pub fn new(id: impl AsRef<str>) -> Self {
        PoolId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PoolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for PoolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PoolId({})", self.0)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        PoolId::new(id)
    }
}

impl Serialize for PoolId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PoolId(Arc::from(s)))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    #[error("pool {0} connects a token to itself")]
    IdenticalTokens(PoolId),
    #[error("pool {0} has a negative reserve")]
    NegativeReserve(PoolId),
    #[error("pool {0} fee {1} is outside [0, 1)")]
    FeeOutOfRange(PoolId, Decimal),
}

/// A liquidity pool, an edge in the pool graph.
///
/// Pools are shared read-only between the graph and every path referencing
/// them. The swap direction of a pool inside a concrete path is carried by
/// the path's token sequence, never by mutating the pool itself. The owning
/// `Dex` is shared across every pool of that venue and outlives all of them.
pub struct Pool {
    id: PoolId,
    token0: TokenId,
    token1: TokenId,
    dex: Arc<dyn Dex>,
    amount0: Decimal,
    amount1: Decimal,
    fee: Decimal,
}

impl Pool {
    pub fn new(
        id: PoolId,
        token0: TokenId,
        token1: TokenId,
        dex: Arc<dyn Dex>,
        amount0: Decimal,
        amount1: Decimal,
        fee: Decimal,
    ) -> Result<Self, PoolError> {
        if token0 == token1 {
            return Err(PoolError::IdenticalTokens(id));
        }
        if amount0 < Decimal::ZERO || amount1 < Decimal::ZERO {
            return Err(PoolError::NegativeReserve(id));
        }
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(PoolError::FeeOutOfRange(id, fee));
        }
        Ok(Self { id, token0, token1, dex, amount0, amount1, fee })
    }

    pub fn id(&self) -> &PoolId {
        &self.id
    }

    pub fn token0(&self) -> &TokenId {
        &self.token0
    }

    pub fn token1(&self) -> &TokenId {
        &self.token1
    }

    pub fn dex(&self) -> &Arc<dyn Dex> {
        &self.dex
    }

    pub fn dex_name(&self) -> &str {
        self.dex.name()
    }

    pub fn curve_kind(&self) -> CurveKind {
        self.dex.curve_kind()
    }

    pub fn amount0(&self) -> Decimal {
        self.amount0
    }

    pub fn amount1(&self) -> Decimal {
        self.amount1
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// Total reserve, the liquidity measure used by the path finder.
    pub fn total_reserve(&self) -> Decimal {
        self.amount0 + self.amount1
    }

    pub fn contains_token(&self, token: &TokenId) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// The opposite side of the pool for a given token.
    pub fn other_token(&self, token: &TokenId) -> Option<&TokenId> {
        if self.token0 == *token {
            Some(&self.token1)
        } else if self.token1 == *token {
            Some(&self.token0)
        } else {
            None
        }
    }

    /// Reserves oriented for a swap entering the pool with `token_in`:
    /// `(reserve_in, reserve_out)`.
    pub fn oriented_reserves(&self, token_in: &TokenId) -> Result<(Decimal, Decimal), QuoteError> {
        if self.token0 == *token_in {
            Ok((self.amount0, self.amount1))
        } else if self.token1 == *token_in {
            Ok((self.amount1, self.amount0))
        } else {
            Err(QuoteError::UnknownToken(self.id.clone(), token_in.clone()))
        }
    }

    /// Quote this pool's dex for an exact-input swap in the given direction.
    pub fn quote_amount_out(
        &self,
        amount_in: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        self.dex.amount_out(self, amount_in, token_in, token_out)
    }

    /// Quote this pool's dex for an exact-output swap in the given direction.
    pub fn quote_amount_in(
        &self,
        amount_out: Decimal,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<Decimal, QuoteError> {
        self.dex.amount_in(self, amount_out, token_in, token_out)
    }
}

impl Display for Pool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(fee={})@{}", self.dex.name(), self.fee, self.id)
    }
}

impl Debug for Pool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool({} {}={} {}={} fee={} dex={})",
            self.id, self.token0, self.amount0, self.token1, self.amount1, self.fee,
            self.dex.name()
        )
    }
}

impl Hash for Pool {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pool {}

impl Ord for Pool {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Pool {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::pools::ConstantProductDex;
    use rust_decimal_macros::dec;

    fn cp_dex() -> Arc<dyn Dex> {
        Arc::new(ConstantProductDex::new("mock_dex"))
    }

    #[test]
    fn test_pool_validation() {
        let dex = cp_dex();

        let same_tokens = Pool::new(
            PoolId::new("0x1"),
            TokenId::new("USDC"),
            TokenId::new("USDC"),
            dex.clone(),
            dec!(1000),
            dec!(1000),
            dec!(0.003),
        );
        assert!(matches!(same_tokens, Err(PoolError::IdenticalTokens(_))));

        let bad_fee = Pool::new(
            PoolId::new("0x1"),
            TokenId::new("USDC"),
            TokenId::new("ETH"),
            dex.clone(),
            dec!(1000),
            dec!(1),
            dec!(1),
        );
        assert!(matches!(bad_fee, Err(PoolError::FeeOutOfRange(_, _))));

        let negative = Pool::new(
            PoolId::new("0x1"),
            TokenId::new("USDC"),
            TokenId::new("ETH"),
            dex.clone(),
            dec!(-1),
            dec!(1),
            dec!(0),
        );
        assert!(matches!(negative, Err(PoolError::NegativeReserve(_))));

        let ok = Pool::new(
            PoolId::new("0x1"),
            TokenId::new("USDC"),
            TokenId::new("ETH"),
            dex,
            dec!(1000),
            dec!(1),
            dec!(0.003),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_oriented_reserves() {
        let pool = Pool::new(
            PoolId::new("0x1"),
            TokenId::new("USDC"),
            TokenId::new("ETH"),
            cp_dex(),
            dec!(1000),
            dec!(2),
            dec!(0),
        )
        .unwrap();

        assert_eq!(pool.oriented_reserves(&TokenId::new("USDC")).unwrap(), (dec!(1000), dec!(2)));
        assert_eq!(pool.oriented_reserves(&TokenId::new("ETH")).unwrap(), (dec!(2), dec!(1000)));
        assert!(pool.oriented_reserves(&TokenId::new("BTC")).is_err());
        assert_eq!(pool.total_reserve(), dec!(1002));
    }

    #[test]
    fn test_token_id_roundtrip() {
        let token = TokenId::new("USDC");
        let serialized = serde_json::to_string(&token).unwrap();
        assert_eq!(serialized, "\"USDC\"");
        let deserialized: TokenId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(token, deserialized);
    }
}
