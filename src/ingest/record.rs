use crate::logic::pools::TokenId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized shape of an observed swap transaction, the payload of the
/// `receive_transactions` topic. Every upstream source (mempool watcher,
/// auction feed) converts into this before touching the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub dex: String,
    pub function: String,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_record_roundtrip() {
        let record = TransactionRecord {
            hash: "0xdeadbeef".to_string(),
            dex: "uniswap_v2".to_string(),
            function: "swap_exact_tokens_for_tokens".to_string(),
            token_in: TokenId::new("USDC"),
            token_out: TokenId::new("ETH"),
            amount_in: dec!(1000),
            amount_out: dec!(0.5),
            timestamp: 1724457600,
        };

        let serialized = serde_json::to_string(&record).unwrap();
        let deserialized: TransactionRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(record, deserialized);
    }
}
