use super::record::TransactionRecord;
use crate::bus::{Event, EventBus, Topic};
use eyre::{Result, eyre};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct AuctionFeedConfig {
    pub url: String,
    pub connection_timeout: Duration,
    pub max_reconnect_attempts: u32,
    pub reconnect_delay: Duration,
}

impl Default for AuctionFeedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connection_timeout: Duration::from_secs(30),
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

/// One auction event from the feed. The feed interleaves JSON keep-alive
/// pings with auction notifications carrying observed transactions.
#[derive(Debug, Deserialize)]
struct AuctionEvent {
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
}

/// Reconnection attempt budget. A successful connection starts the budget
/// over, so only consecutive failures count against it.
#[derive(Debug)]
struct ReconnectPolicy {
    attempts: u32,
    max_attempts: u32,
}

impl ReconnectPolicy {
    fn new(max_attempts: u32) -> Self {
        Self { attempts: 0, max_attempts }
    }

    fn connected(&mut self) {
        self.attempts = 0;
    }

    /// Record a failed connection. Returns false once the budget is spent.
    fn retry(&mut self) -> bool {
        self.attempts += 1;
        self.attempts < self.max_attempts
    }
}

/// What to do with a received feed frame.
#[derive(Debug, PartialEq)]
pub(crate) enum FeedAction {
    /// Keep-alive, answer with a JSON pong.
    Pong,
    /// Transactions to publish on the bus.
    Publish(Vec<TransactionRecord>),
    /// Frame types we do not care about.
    Ignore,
}

pub(crate) fn parse_feed_message(text: &str) -> Result<FeedAction> {
    let message: Value = serde_json::from_str(text)?;
    match message.get("type").and_then(Value::as_str) {
        Some("ping") => Ok(FeedAction::Pong),
        Some("auction_started") | Some("auction_update") => {
            let Some(auction) = message.get("auction") else {
                return Ok(FeedAction::Ignore);
            };
            let event: AuctionEvent = serde_json::from_value(auction.clone())?;
            if event.transactions.is_empty() {
                Ok(FeedAction::Ignore)
            } else {
                Ok(FeedAction::Publish(event.transactions))
            }
        }
        _ => Ok(FeedAction::Ignore),
    }
}

/// Websocket client for the auction feed.
///
/// Converts auction events into `TransactionRecord` batches and publishes
/// them on the `receive_transactions` topic. Lives entirely outside the
/// optimization core; the bus is its only downstream.
pub struct AuctionFeedMonitor {
    config: AuctionFeedConfig,
    bus: Arc<EventBus>,
}

impl AuctionFeedMonitor {
    pub fn new(config: AuctionFeedConfig, bus: Arc<EventBus>) -> Self {
        Self { config, bus }
    }

    /// Start the feed loop. Returns a shutdown sender; dropping it or
    /// sending on it stops the loop.
    pub fn start(&self) -> mpsc::Sender<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let config = self.config.clone();
        let bus = self.bus.clone();

        tokio::spawn(async move {
            let mut policy = ReconnectPolicy::new(config.max_reconnect_attempts);

            loop {
                match Self::connect_and_listen(&config, &bus, &mut shutdown_rx, &mut policy).await {
                    Ok(()) => {
                        info!("auction feed ended normally");
                        break;
                    }
                    Err(e) => {
                        error!("auction feed connection error: {}", e);

                        if !policy.retry() {
                            error!("max reconnection attempts reached, giving up");
                            break;
                        }

                        warn!(
                            "attempting reconnection #{} in {:?}",
                            policy.attempts, config.reconnect_delay
                        );
                        sleep(config.reconnect_delay).await;
                    }
                }
            }
        });

        shutdown_tx
    }

    async fn connect_and_listen(
        config: &AuctionFeedConfig,
        bus: &Arc<EventBus>,
        shutdown_rx: &mut mpsc::Receiver<()>,
        policy: &mut ReconnectPolicy,
    ) -> Result<()> {
        info!("connecting to auction feed: {}", config.url);

        let (ws_stream, _) = timeout(config.connection_timeout, connect_async(config.url.as_str()))
            .await
            .map_err(|_| eyre!("auction feed connection timeout"))?
            .map_err(|e| eyre!("auction feed connection failed: {}", e))?;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        policy.connected();
        info!("auction feed connected");

        loop {
            tokio::select! {
                ws_msg = ws_receiver.next() => {
                    match ws_msg {
                        Some(Ok(Message::Text(text))) => {
                            match parse_feed_message(text.as_str()) {
                                Ok(FeedAction::Pong) => {
                                    let pong = serde_json::json!({"type": "pong"});
                                    if let Err(e) = ws_sender.send(Message::Text(pong.to_string().into())).await {
                                        error!("failed to send keep-alive pong: {}", e);
                                        break;
                                    }
                                }
                                Ok(FeedAction::Publish(records)) => {
                                    debug!(count = records.len(), "publishing auction transactions");
                                    bus.publish(
                                        Topic::ReceiveTransactions,
                                        Event::ReceiveTransactions(Arc::new(records)),
                                    );
                                }
                                Ok(FeedAction::Ignore) => {}
                                Err(e) => {
                                    warn!("failed to parse feed message: {}", e);
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_sender.send(Message::Pong(data)).await {
                                error!("failed to send pong: {}", e);
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("auction feed closed by server");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ignore other message types
                        }
                        Some(Err(e)) => {
                            error!("auction feed error: {}", e);
                            break;
                        }
                        None => {
                            info!("auction feed stream ended");
                            break;
                        }
                    }
                }

                _ = shutdown_rx.recv() => {
                    info!("received shutdown signal");
                    return Ok(());
                }
            }
        }

        Err(eyre!("auction feed connection lost"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_frame_requests_pong() {
        let action = parse_feed_message(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(action, FeedAction::Pong);
    }

    #[test]
    fn test_auction_event_converts_to_records() {
        let frame = r#"{
            "type": "auction_started",
            "auction": {
                "id": "a-1",
                "transactions": [{
                    "hash": "0xdeadbeef",
                    "dex": "uniswap_v2",
                    "function": "swap_exact_tokens_for_tokens",
                    "token_in": "USDC",
                    "token_out": "ETH",
                    "amount_in": "1000",
                    "amount_out": "0.5",
                    "timestamp": 1724457600
                }]
            }
        }"#;

        let action = parse_feed_message(frame).unwrap();
        match action {
            FeedAction::Publish(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].hash, "0xdeadbeef");
                assert_eq!(records[0].dex, "uniswap_v2");
            }
            other => panic!("expected Publish, got {other:?}"),
        }
    }

    #[test]
    fn test_auction_event_without_transactions_is_ignored() {
        let frame = r#"{"type":"auction_started","auction":{"id":"a-1"}}"#;
        assert_eq!(parse_feed_message(frame).unwrap(), FeedAction::Ignore);
    }

    #[test]
    fn test_unknown_frame_is_ignored() {
        let frame = r#"{"type":"heartbeat","seq":42}"#;
        assert_eq!(parse_feed_message(frame).unwrap(), FeedAction::Ignore);
    }

    #[test]
    fn test_malformed_frame_errors() {
        assert!(parse_feed_message("not json").is_err());
    }

    #[test]
    fn test_reconnect_budget_resets_after_successful_connection() {
        let mut policy = ReconnectPolicy::new(3);
        assert!(policy.retry());
        assert!(policy.retry());

        // A successful connection in between restores the full budget.
        policy.connected();
        assert!(policy.retry());
        assert!(policy.retry());
        assert!(!policy.retry());
    }

    #[test]
    fn test_reconnect_budget_exhausts_on_consecutive_failures() {
        let mut policy = ReconnectPolicy::new(2);
        assert!(policy.retry());
        assert!(!policy.retry());
    }

    #[test]
    fn test_config_defaults() {
        let config = AuctionFeedConfig::default();
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_delay, Duration::from_secs(2));
    }
}
