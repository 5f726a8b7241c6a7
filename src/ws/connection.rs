//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::parse_asset;
use crate::domain::{AssetId, LedgerEvent};
use crate::error::GatewayError;
use crate::service::ExchangeService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<LedgerEvent>,
    exchange: Arc<ExchangeService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &exchange).await;
                        if let Ok(json) = serde_json::to_string(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(ledger_event) => {
                        if subs.matches(&ledger_event) {
                            let msg = WsMessage::event(
                                serde_json::to_value(&ledger_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client and builds the reply.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    exchange: &ExchangeService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 1001, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 1001, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 1001, "unknown command");
    };

    match handle_command(command, subs, exchange).await {
        Ok(payload) => WsMessage::response(msg.id, payload),
        Err(err) => WsMessage::gateway_error(msg.id, &err),
    }
}

async fn handle_command(
    command: WsCommand,
    subs: &mut SubscriptionManager,
    exchange: &ExchangeService,
) -> Result<serde_json::Value, GatewayError> {
    match command {
        WsCommand::Subscribe { assets } => {
            let (assets, wildcard) = parse_asset_list(&assets)?;
            subs.subscribe(&assets, wildcard);
            Ok(serde_json::json!({
                "subscribed": assets.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            }))
        }
        WsCommand::Unsubscribe { assets } => {
            let (assets, wildcard) = parse_asset_list(&assets)?;
            subs.unsubscribe(&assets, wildcard);
            Ok(serde_json::json!({
                "unsubscribed": assets.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "remaining_count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            }))
        }
        WsCommand::GetRate {
            asset_in,
            asset_out,
        } => {
            let asset_in = parse_asset("asset_in", &asset_in)?;
            let asset_out = parse_asset("asset_out", &asset_out)?;
            let rate = exchange.get_rate(asset_in, asset_out).await;
            Ok(serde_json::json!({
                "asset_in": asset_in,
                "asset_out": asset_out,
                "rate": rate,
            }))
        }
        WsCommand::GetPool { asset } => {
            let asset = parse_asset("asset", &asset)?;
            let balance = exchange.pool_balance(asset).await;
            Ok(serde_json::json!({
                "asset": asset,
                "balance": balance.to_string(),
            }))
        }
    }
}

/// Splits a subscription list into concrete assets and the wildcard flag.
fn parse_asset_list(values: &[String]) -> Result<(Vec<AssetId>, bool), GatewayError> {
    let mut assets = Vec::with_capacity(values.len());
    let mut wildcard = false;
    for value in values {
        if value == "*" {
            wildcard = true;
        } else {
            assets.push(parse_asset("assets", value)?);
        }
    }
    Ok((assets, wildcard))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Address, EventBus, Ledger, Rate};

    const NATIVE: &str = "0x0000000000000000000000000000000000000000";

    fn make_service() -> ExchangeService {
        let Ok(ledger) = Ledger::new(
            Address::from_bytes([1; 20]),
            Address::from_bytes([0xcc; 20]),
        ) else {
            panic!("valid ledger");
        };
        ExchangeService::new(ledger, EventBus::new(16))
    }

    fn command(payload: serde_json::Value) -> String {
        serde_json::json!({
            "id": "req-1",
            "type": "command",
            "timestamp": "2026-01-01T00:00:00Z",
            "payload": payload,
        })
        .to_string()
    }

    #[tokio::test]
    async fn subscribe_wildcard_and_asset() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "subscribe",
            "assets": ["*", NATIVE],
        }));
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.id, "req-1");
        assert!(subs.is_subscribed_all());
        assert_eq!(subs.count(), 1);
    }

    #[tokio::test]
    async fn malformed_asset_is_error() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({ "command": "subscribe", "assets": ["0x12"] }));
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(reply.payload.get("code").and_then(|c| c.as_u64()), Some(1001));
    }

    #[tokio::test]
    async fn get_rate_reads_registry() {
        let service = make_service();
        let token = AssetId::Token(Address::from_bytes([7; 20]));
        assert!(
            service
                .set_rate(Address::from_bytes([1; 20]), token, AssetId::Native, Rate::new(60))
                .await
                .is_ok()
        );
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "get_rate",
            "asset_in": token.to_string(),
            "asset_out": NATIVE,
        }));
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.payload.get("rate").and_then(|r| r.as_str()), Some("60"));
    }

    #[tokio::test]
    async fn unknown_command_and_bad_json() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message("{", &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);

        let text = command(serde_json::json!({ "command": "swap" }));
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(reply.id, "req-1");
    }
}
