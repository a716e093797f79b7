mod common;

use common::{btc_usd, mock_config, ticker_response};
use lotusx_liqui::core::errors::ErrorKind;
use lotusx_liqui::core::kernel::ReqwestRest;
use lotusx_liqui::core::traits::{AccountInfo, MarketDataSource, OrderPlacer};
use lotusx_liqui::core::types::{OrderSide, OrderStatus, OrderType};
use lotusx_liqui::exchanges::liqui::{self, LiquiConnector};
use lotusx_liqui::ExchangeRegistry;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> LiquiConnector<ReqwestRest> {
    liqui::build_connector(&mock_config(server, true)).unwrap()
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

async fn mount_private(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .and(body_string_contains(format!("method={}", endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_liqui_ticker_keeps_sides() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ticker_response("btc_usd", 1_500_000_000))
        .mount(&server)
        .await;

    let ticker = connector(&server).fetch_ticker(&btc_usd()).await.unwrap();
    assert_eq!(ticker.bid, Some(dec("4101")));
    assert_eq!(ticker.ask, Some(dec("4099")));
    assert_eq!(ticker.close, ticker.last);
}

#[tokio::test]
async fn test_error_code_classification() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "Trade",
        json!({"success": 0, "code": 832, "error": "Not enougth BTC to create sell order."}),
    )
    .await;

    let err = connector(&server)
        .create_order(
            &btc_usd(),
            OrderType::Limit,
            OrderSide::Sell,
            dec("1"),
            Some(dec("4000")),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InsufficientFunds));
}

#[tokio::test]
async fn test_invalid_nonce_is_retryable() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "getInfo",
        json!({"success": 0, "error": "invalid nonce (has already been used)"}),
    )
    .await;

    let err = connector(&server).fetch_balance().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidNonce));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_order() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "OrderInfo",
        json!({
            "success": 1,
            "return": {
                "343152": {
                    "pair": "btc_usd", "type": "sell", "start_amount": 13.345,
                    "amount": 12.345, "rate": 485, "timestamp_created": 1_342_448_420,
                    "status": 1
                }
            }
        }),
    )
    .await;

    let market = btc_usd();
    let order = connector(&server)
        .fetch_order("343152", Some(&market))
        .await
        .unwrap();
    assert_eq!(order.status, Some(OrderStatus::Closed));
    assert_eq!(order.filled, Some(dec("1")));
    assert_eq!(order.symbol.as_deref(), Some("BTC/USD"));
}

#[tokio::test]
async fn test_fetch_my_trades_uses_keys_as_ids() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "TradeHistory",
        json!({
            "success": 1,
            "return": {
                "166830": {
                    "pair": "btc_usd", "type": "sell", "amount": 1, "rate": 450,
                    "order_id": 343148, "is_your_order": 1, "timestamp": 1_342_445_793
                }
            }
        }),
    )
    .await;

    let trades = connector(&server).fetch_my_trades(None, Some(10)).await.unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].id.as_deref(), Some("166830"));
    assert_eq!(trades[0].order.as_deref(), Some("343148"));
    assert_eq!(trades[0].cost, Some(dec("450")));
}

#[tokio::test]
async fn test_fetch_trades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/trades/btc_usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "btc_usd": [
                {"type": "bid", "price": 4100, "amount": 0.1, "tid": 2, "timestamp": 1_500_000_001},
                {"type": "ask", "price": 4099, "amount": 0.2, "tid": 1, "timestamp": 1_500_000_000}
            ]
        })))
        .mount(&server)
        .await;

    let trades = connector(&server)
        .fetch_trades(&btc_usd(), None)
        .await
        .unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].side, Some(OrderSide::Buy));
    assert_eq!(trades[1].side, Some(OrderSide::Sell));
}

#[tokio::test]
async fn test_cancel_and_withdraw() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "CancelOrder",
        json!({"success": 1, "return": {"order_id": 343154, "funds": {"btc": 1}}}),
    )
    .await;
    mount_private(
        &server,
        "WithdrawCoin",
        json!({"success": 1, "return": {"tId": 37832629, "amountSent": 0.009, "funds": {}}}),
    )
    .await;
    mount_private(
        &server,
        "CoinDepositAddress",
        json!({"success": 1, "return": {"address": "1UHAnAWvxDB9XXETsi7z483zRRBmcUZxb3"}}),
    )
    .await;

    let connector = connector(&server);

    let cancelled = connector.cancel_order("343154").await.unwrap();
    assert_eq!(cancelled["order_id"], 343_154);

    let withdrawal = connector
        .withdraw("BTC", dec("0.01"), "1UHAnAWvxDB9XXETsi7z483zRRBmcUZxb3")
        .await
        .unwrap();
    assert_eq!(withdrawal.id.as_deref(), Some("37832629"));

    let address = connector.fetch_deposit_address("BTC").await.unwrap();
    assert_eq!(address.address, "1UHAnAWvxDB9XXETsi7z483zRRBmcUZxb3");
    assert_eq!(address.currency, "BTC");
}

#[tokio::test]
async fn test_registry_builds_connectors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ticker_response("btc_usd", 1_500_000_000))
        .expect(2)
        .mount(&server)
        .await;

    let registry = ExchangeRegistry::with_defaults();
    let config = mock_config(&server, false);
    let liqui = registry.build_connector("liqui", &config).unwrap();
    let wex = registry.build_connector("wex", &config).unwrap();

    let from_liqui = liqui.fetch_ticker(&btc_usd()).await.unwrap();
    let from_wex = wex.fetch_ticker(&btc_usd()).await.unwrap();
    assert_eq!(from_liqui.bid, from_wex.ask);
    assert_eq!(from_liqui.ask, from_wex.bid);
}
