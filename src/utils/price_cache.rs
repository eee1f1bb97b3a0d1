use crate::logic::pools::TokenId;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct CacheItem {
    price: Decimal,
    timestamp: Instant,
    ttl: Duration,
}

impl CacheItem {
    fn new(price: Decimal, ttl: Duration) -> Self {
        Self { price, timestamp: Instant::now(), ttl }
    }

    fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > self.ttl
    }
}

#[derive(Debug, Default)]
pub struct PriceCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
}

impl PriceCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 { 0.0 } else { hits as f64 / total as f64 }
    }
}

/// TTL cache for pair prices, keyed by the directed (token_in, token_out)
/// pair. Invalidation is event driven: the pipeline drops the pairs touched
/// by each transaction batch instead of waiting for expiry.
#[derive(Debug)]
pub struct PriceCache {
    prices: DashMap<(TokenId, TokenId), CacheItem>,
    pub stats: PriceCacheStats,
    default_ttl: Duration,
}

impl PriceCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self { prices: DashMap::new(), stats: PriceCacheStats::default(), default_ttl }
    }

    /// Default instance with a 5 minute TTL.
    pub fn new_default() -> Self {
        Self::new(Duration::from_secs(300))
    }

    pub fn get(&self, token_in: &TokenId, token_out: &TokenId) -> Option<Decimal> {
        let key = (token_in.clone(), token_out.clone());
        if let Some(item) = self.prices.get(&key) {
            if !item.is_expired() {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(item.price);
            }
            drop(item);
            self.prices.remove(&key);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn set(&self, token_in: TokenId, token_out: TokenId, price: Decimal) {
        let item = CacheItem::new(price, self.default_ttl);
        self.prices.insert((token_in, token_out), item);
    }

    /// Drop both directions of a pair.
    pub fn invalidate_pair(&self, token_a: &TokenId, token_b: &TokenId) {
        self.prices.remove(&(token_a.clone(), token_b.clone()));
        self.prices.remove(&(token_b.clone(), token_a.clone()));
    }

    /// Drop every entry a token participates in.
    pub fn invalidate_token(&self, token: &TokenId) {
        self.prices.retain(|(token_in, token_out), _| token_in != token && token_out != token);
    }

    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.prices.retain(|_, item| {
            let expired = now.duration_since(item.timestamp) > item.ttl;
            if expired {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
            !expired
        });
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn clear(&self) {
        self.prices.clear();
    }
}
