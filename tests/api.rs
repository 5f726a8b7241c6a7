//! End-to-end tests against a served exchange over real sockets.

#![allow(clippy::panic)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hydra_amm::domain::Amount;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use multiswap_gateway::app_state::AppState;
use multiswap_gateway::domain::{Address, EventBus, Ledger};
use multiswap_gateway::router::build_app;
use multiswap_gateway::service::ExchangeService;

const WEI: u128 = 1_000_000_000_000_000_000;
const NATIVE: &str = "0x0000000000000000000000000000000000000000";

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

struct TestApp {
    base: String,
    ws_url: String,
    client: reqwest::Client,
    admin: Address,
    user: Address,
}

impl TestApp {
    async fn spawn() -> Self {
        let admin = addr(1);
        let user = addr(2);
        let Ok(mut ledger) = Ledger::new(admin, addr(0xcc)) else {
            panic!("valid ledger");
        };
        assert!(ledger.credit_native(admin, Amount::new(1_000 * WEI)).is_ok());
        assert!(ledger.credit_native(user, Amount::new(1_000 * WEI)).is_ok());

        let state = AppState::new(ExchangeService::new(ledger, EventBus::new(64)));
        let app = build_app(state, Duration::from_secs(10));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind test listener");
        };
        let Ok(local) = listener.local_addr() else {
            panic!("listener address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{local}"),
            ws_url: format!("ws://{local}/ws"),
            client: reqwest::Client::new(),
            admin,
            user,
        }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        caller: Option<Address>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.client.request(method, format!("{}{path}", self.base));
        if let Some(caller) = caller {
            request = request.header("x-caller", caller.to_string());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let Ok(response) = request.send().await else {
            panic!("request to {path} failed");
        };
        let status = response.status();
        let value = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, value)
    }

    async fn deploy(&self, owner: Address, name: &str, symbol: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/tokens",
                Some(owner),
                Some(json!({
                    "name": name,
                    "symbol": symbol,
                    "initial_supply": (500_000 * WEI).to_string(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        str_field(&body, "address")
    }

    async fn set_rate(&self, caller: Address, asset_in: &str, asset_out: &str, rate: &str) -> StatusCode {
        let (status, _) = self
            .call(
                Method::PUT,
                "/api/v1/rates",
                Some(caller),
                Some(json!({ "asset_in": asset_in, "asset_out": asset_out, "rate": rate })),
            )
            .await;
        status
    }

    /// Deploys two tokens, funds and approves, sets rates and fills every
    /// pool with 100 units.
    async fn funded_market(&self) -> (String, String) {
        let (_, admin_body) = self.call(Method::GET, "/api/v1/admin", None, None).await;
        let custody = str_field(&admin_body, "custody");

        let infi = self.deploy(self.user, "infi", "IF").await;
        let curve = self.deploy(self.user, "curve", "CR").await;
        for token in [&infi, &curve] {
            let (status, _) = self
                .call(
                    Method::POST,
                    &format!("/api/v1/tokens/{token}/approve"),
                    Some(self.user),
                    Some(json!({ "spender": custody, "amount": (500_000 * WEI).to_string() })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(self.set_rate(self.admin, &infi, &curve, "50").await, StatusCode::OK);
        assert_eq!(self.set_rate(self.admin, &infi, NATIVE, "60").await, StatusCode::OK);

        let hundred = (100 * WEI).to_string();
        for asset in [&infi, &curve] {
            let (status, _) = self
                .call(
                    Method::POST,
                    "/api/v1/pools/deposit",
                    Some(self.user),
                    Some(json!({ "asset": asset, "amount": hundred })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, _) = self
            .call(
                Method::POST,
                "/api/v1/pools/deposit",
                Some(self.admin),
                Some(json!({ "asset": NATIVE, "amount": hundred, "value": hundred })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        (infi, curve)
    }
}

fn str_field(body: &Value, key: &str) -> String {
    let Some(value) = body.get(key).and_then(Value::as_str) else {
        panic!("missing {key} in {body}");
    };
    value.to_string()
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn health_and_admin() {
    let app = TestApp::spawn().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("healthy"));

    let (status, body) = app.call(Method::GET, "/api/v1/admin", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&body, "admin"), app.admin.to_string());
}

#[tokio::test]
async fn only_admin_sets_rates() {
    let app = TestApp::spawn().await;
    let token = app.deploy(app.user, "infi", "IF").await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/v1/rates",
            Some(app.user),
            Some(json!({ "asset_in": token, "asset_out": NATIVE, "rate": "60" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "Ownable: caller is not the owner");

    assert_eq!(app.set_rate(app.admin, &token, NATIVE, "60").await, StatusCode::OK);
    let (status, body) = app
        .call(Method::GET, &format!("/api/v1/rates/{token}/{NATIVE}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&body, "rate"), "60");
}

#[tokio::test]
async fn token_swap_releases_quoted_output() {
    let app = TestApp::spawn().await;
    let (infi, curve) = app.funded_market().await;
    let amount_in = (10 * WEI).to_string();

    let (status, quote) = app
        .call(
            Method::POST,
            "/api/v1/quote",
            None,
            Some(json!({ "asset_in": infi, "asset_out": curve, "amount_in": amount_in })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&quote, "amount_out"), "500");

    let (status, swap) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": infi, "asset_out": curve, "amount_in": amount_in })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&swap, "amount_out"), "500");

    let (_, balance) = app
        .call(
            Method::GET,
            &format!("/api/v1/tokens/{curve}/balances/{}", app.user),
            None,
            None,
        )
        .await;
    // 500_000 supply - 100 deposited + 500 base units received
    assert_eq!(
        str_field(&balance, "balance"),
        (499_900 * WEI + 500).to_string()
    );

    let (_, pool) = app
        .call(Method::GET, &format!("/api/v1/pools/{infi}"), None, None)
        .await;
    assert_eq!(str_field(&pool, "balance"), (110 * WEI).to_string());
}

#[tokio::test]
async fn token_to_native_swap_pays_native() {
    let app = TestApp::spawn().await;
    let (infi, _) = app.funded_market().await;

    let (status, swap) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": infi, "asset_out": NATIVE, "amount_in": (10 * WEI).to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&swap, "amount_out"), "600");

    let (_, balance) = app
        .call(
            Method::GET,
            &format!("/api/v1/native/balances/{}", app.user),
            None,
            None,
        )
        .await;
    assert_eq!(str_field(&balance, "balance"), (1_000 * WEI + 600).to_string());
}

#[tokio::test]
async fn zero_amounts_are_rejected_with_contract_messages() {
    let app = TestApp::spawn().await;
    let (infi, curve) = app.funded_market().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": infi, "asset_out": curve, "amount_in": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Invalid amount");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": NATIVE, "asset_out": infi, "amount_in": "0", "value": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Amount must be greater than 0");
}

#[tokio::test]
async fn swap_beyond_liquidity_changes_nothing() {
    let app = TestApp::spawn().await;
    let (infi, curve) = app.funded_market().await;

    // 6 IF at 20 CR per IF asks for 120 CR against a pool of 100
    assert_eq!(
        app.set_rate(app.admin, &infi, &curve, &(20 * WEI).to_string()).await,
        StatusCode::OK
    );
    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": infi, "asset_out": curve, "amount_in": (6 * WEI).to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body.get("error").and_then(|e| e.get("code")).and_then(Value::as_u64),
        Some(4001)
    );

    let (_, pool) = app
        .call(Method::GET, &format!("/api/v1/pools/{curve}"), None, None)
        .await;
    assert_eq!(str_field(&pool, "balance"), (100 * WEI).to_string());
}

#[tokio::test]
async fn custody_account_cannot_spend_pooled_funds() {
    let app = TestApp::spawn().await;
    let (infi, _) = app.funded_market().await;
    let custody = addr(0xcc);

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/tokens/{infi}/transfer"),
            Some(custody),
            Some(json!({ "to": app.user.to_string(), "amount": (100 * WEI).to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body.get("error").and_then(|e| e.get("code")).and_then(Value::as_u64),
        Some(1202)
    );

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/native/transfer",
            Some(custody),
            Some(json!({ "to": app.user.to_string(), "amount": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, pool) = app
        .call(Method::GET, &format!("/api/v1/pools/{infi}"), None, None)
        .await;
    assert_eq!(str_field(&pool, "balance"), (100 * WEI).to_string());
}

#[tokio::test]
async fn missing_caller_header_is_bad_request() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/native/transfer",
            None,
            Some(json!({ "to": addr(3).to_string(), "amount": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("x-caller"));
}

#[tokio::test]
async fn websocket_receives_swap_events() {
    let app = TestApp::spawn().await;
    let (infi, curve) = app.funded_market().await;

    let Ok((mut ws, _)) = tokio_tungstenite::connect_async(app.ws_url.as_str()).await else {
        panic!("websocket connect");
    };
    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": "2026-01-01T00:00:00Z",
        "payload": { "command": "subscribe", "assets": [curve] },
    });
    assert!(ws.send(Message::text(subscribe.to_string())).await.is_ok());

    let reply = next_json(&mut ws).await;
    assert_eq!(reply.get("type").and_then(Value::as_str), Some("response"));
    assert_eq!(reply.get("id").and_then(Value::as_str), Some("sub-1"));

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/swap",
            Some(app.user),
            Some(json!({ "asset_in": infi, "asset_out": curve, "amount_in": (10 * WEI).to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let event = next_json(&mut ws).await;
    assert_eq!(event.get("type").and_then(Value::as_str), Some("event"));
    let payload = event.get("payload").cloned().unwrap_or(Value::Null);
    assert_eq!(
        payload.get("event_type").and_then(Value::as_str),
        Some("swap_executed")
    );
    assert_eq!(payload.get("amount_out").and_then(Value::as_str), Some("500"));
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), ws.next()).await;
        let Ok(Some(Ok(message))) = next else {
            panic!("no websocket message");
        };
        if let Message::Text(text) = message {
            let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                panic!("websocket message is not JSON");
            };
            return value;
        }
    }
}
