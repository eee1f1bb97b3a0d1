pub mod feed;
pub mod record;

pub use feed::{AuctionFeedConfig, AuctionFeedMonitor};
pub use record::TransactionRecord;
