use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Write};

#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct TradePathHash(pub [u8; 32]);

fn encode_prefixed(bytes: &[u8; 32]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("0x");
    for byte in bytes {
        write!(s, "{byte:02x}").expect("writing to a String never fails");
    }
    s
}

impl Display for TradePathHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", encode_prefixed(&self.0))
    }
}

impl Debug for TradePathHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TradePathHash({})", encode_prefixed(&self.0))
    }
}

impl From<[u8; 32]> for TradePathHash {
    fn from(hash: [u8; 32]) -> Self {
        TradePathHash(hash)
    }
}

impl Serialize for TradePathHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&encode_prefixed(&self.0))
    }
}

impl<'de> Deserialize<'de> for TradePathHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        if stripped.len() != 64 {
            return Err(serde::de::Error::custom("expected a 32-byte hex hash"));
        }
        let mut hash = [0u8; 32];
        for (i, chunk) in stripped.as_bytes().chunks(2).enumerate() {
            let hex = std::str::from_utf8(chunk).map_err(serde::de::Error::custom)?;
            hash[i] = u8::from_str_radix(hex, 16).map_err(serde::de::Error::custom)?;
        }
        Ok(TradePathHash(hash))
    }
}
