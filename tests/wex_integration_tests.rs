mod common;

use common::{btc_usd, ltc_btc, mock_config, ticker_payload, ticker_response};
use lotusx_liqui::core::errors::{ErrorKind, ExchangeError};
use lotusx_liqui::core::kernel::ReqwestRest;
use lotusx_liqui::core::traits::{AccountInfo, MarketDataSource, OrderPlacer};
use lotusx_liqui::core::types::{Market, OrderSide, OrderStatus, OrderType};
use lotusx_liqui::exchanges::wex::{self, WexConnector};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{
    body_string_contains, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> WexConnector<ReqwestRest> {
    wex::build_connector(&mock_config(server, true)).unwrap()
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
async fn test_fetch_ticker_swaps_sides() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ticker_response("btc_usd", 1_500_000_000))
        .expect(1)
        .mount(&server)
        .await;

    let ticker = connector(&server).fetch_ticker(&btc_usd()).await.unwrap();

    assert_eq!(ticker.symbol.as_deref(), Some("BTC/USD"));
    assert_eq!(ticker.timestamp, 1_500_000_000_000);
    assert_eq!(ticker.bid, Some(dec("4099")));
    assert_eq!(ticker.ask, Some(dec("4101")));
    assert_eq!(ticker.average, Some(dec("4050.25")));
    assert_eq!(ticker.base_volume, Some(dec("300.25")));
    assert!(ticker.close.is_none());
}

#[tokio::test]
async fn test_fetch_tickers_joins_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd-ltc_btc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "btc_usd": ticker_payload(1_500_000_000),
            "ltc_btc": ticker_payload(1_500_000_060)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tickers = connector(&server)
        .fetch_tickers(&[btc_usd(), ltc_btc()])
        .await
        .unwrap();

    assert_eq!(tickers.len(), 2);
    assert_eq!(tickers["LTC/BTC"].timestamp, 1_500_000_060_000);
    assert_eq!(tickers["BTC/USD"].symbol.as_deref(), Some("BTC/USD"));
}

#[tokio::test]
async fn test_fetch_tickers_rejects_overlong_pair_list() {
    let server = MockServer::start().await;
    let markets = (0..300)
        .map(|i| Market::new(format!("c{:03}_btc", i), format!("C{:03}", i), "BTC"))
        .collect::<Vec<_>>();

    let err = connector(&server).fetch_tickers(&markets).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ExchangeError));
    assert!(err.to_string().contains("exceeding max URL length"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_fetch_markets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server_time": 1_500_000_000,
            "pairs": {
                "btc_usd": {
                    "decimal_places": 3, "min_price": 0.1, "max_price": 400000,
                    "min_amount": 0.001, "hidden": 0, "fee": 0.2
                },
                "dsh_btc": {"decimal_places": 5, "min_amount": 0.1, "hidden": 0, "fee": 0.2}
            }
        })))
        .mount(&server)
        .await;

    let markets = connector(&server).fetch_markets().await.unwrap();
    let symbols = markets.iter().map(|m| m.symbol.as_str()).collect::<Vec<_>>();
    assert_eq!(symbols, vec!["BTC/USD", "DASH/BTC"]);
    assert_eq!(markets[0].taker, Some(dec("0.002")));
    assert_eq!(markets[0].maker, Some(dec("0.002")));
}

#[tokio::test]
async fn test_fetch_order_book_passes_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/depth/btc_usd"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "btc_usd": {"asks": [[4101, 0.5], [4102, 1]], "bids": [[4099, 2], [4098, 1]]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let book = connector(&server)
        .fetch_order_book(&btc_usd(), Some(5))
        .await
        .unwrap();
    assert_eq!(book.asks[0].price, dec("4101"));
    assert_eq!(book.bids[0].price, dec("4099"));
    assert_eq!(book.symbol.as_deref(), Some("BTC/USD"));
}

#[tokio::test]
async fn test_fetch_balance_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .and(header("Key", "test_api_key"))
        .and(header_exists("Sign"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("method=getInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "return": {
                "funds": {"usd": 325, "btc": 23.998, "dsh": 0},
                "rights": {"info": 1, "trade": 0, "withdraw": 0},
                "transaction_count": 0,
                "open_orders": 0,
                "server_time": 1_500_000_000
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let balances = connector(&server).fetch_balance().await.unwrap();
    let btc = balances.get("BTC").unwrap();
    assert_eq!(btc.free, Some(dec("23.998")));
    assert_eq!(btc.total, Some(dec("23.998")));
    assert!(balances.get("DASH").is_some());
}

#[tokio::test]
async fn test_no_open_orders_is_empty() {
    let server = MockServer::start().await;
    mount_private(&server, "ActiveOrders", json!({"success": 0, "error": "no orders"})).await;

    let orders = connector(&server).fetch_open_orders(None).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_open_orders() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "ActiveOrders",
        json!({
            "success": 1,
            "return": {
                "343152": {
                    "pair": "btc_usd", "type": "sell", "amount": 12.345, "rate": 485,
                    "timestamp_created": 1_342_448_420, "status": 0
                }
            }
        }),
    )
    .await;

    let market = btc_usd();
    let orders = connector(&server)
        .fetch_open_orders(Some(&market))
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "343152");
    assert_eq!(orders[0].status, Some(OrderStatus::Open));
    assert_eq!(orders[0].side, Some(OrderSide::Sell));
}

#[tokio::test]
async fn test_rate_limit_message_is_ddos() {
    let server = MockServer::start().await;
    mount_private(&server, "getInfo", json!({"success": 0, "error": "Requests too often"})).await;

    let err = connector(&server).fetch_balance().await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::DDoSProtection));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("wex"));
    assert!(err.to_string().contains("Requests too often"));
}

#[tokio::test]
async fn test_create_order_insufficient_funds() {
    let server = MockServer::start().await;
    mount_private(
        &server,
        "Trade",
        json!({"success": 0, "error": "It is not enough BTC in the account for sale."}),
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
async fn test_create_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .and(body_string_contains("method=Trade"))
        .and(body_string_contains("pair=btc_usd"))
        .and(body_string_contains("type=buy"))
        .and(body_string_contains("rate=4000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "return": {"received": 0, "remains": 0.5, "order_id": 1_234_567, "funds": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = connector(&server)
        .create_order(
            &btc_usd(),
            OrderType::Limit,
            OrderSide::Buy,
            dec("0.5"),
            Some(dec("4000")),
        )
        .await
        .unwrap();
    assert_eq!(order.id, "1234567");
    assert_eq!(order.status, Some(OrderStatus::Open));
    assert_eq!(order.remaining, Some(dec("0.5")));
}

#[tokio::test]
async fn test_market_orders_not_supported() {
    let server = MockServer::start().await;
    let err = connector(&server)
        .create_order(&btc_usd(), OrderType::Market, OrderSide::Buy, dec("1"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::NotSupported(_)));
}

#[tokio::test]
async fn test_malformed_error_payload() {
    let server = MockServer::start().await;
    mount_private(&server, "getInfo", json!({"success": 0})).await;

    let err = connector(&server).fetch_balance().await.unwrap_err();
    match err {
        ExchangeError::MalformedResponse { exchange, body } => {
            assert_eq!(exchange, "wex");
            assert!(body.contains("success"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_goes_to_default_handler() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = connector(&server).fetch_ticker(&btc_usd()).await.unwrap_err();
    match &err {
        ExchangeError::HttpStatus { status, kind, .. } => {
            assert_eq!(*status, 503);
            assert_eq!(*kind, ErrorKind::ExchangeNotAvailable);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_html_body_is_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = connector(&server).fetch_ticker(&btc_usd()).await.unwrap_err();
    assert!(matches!(err, ExchangeError::BadResponse { .. }));
}

#[tokio::test]
async fn test_private_call_requires_credentials() {
    let server = MockServer::start().await;
    let connector = wex::build_connector(&mock_config(&server, false)).unwrap();

    let err = connector.fetch_balance().await.unwrap_err();
    assert!(matches!(err, ExchangeError::AuthError(_)));
}

#[tokio::test]
async fn test_concurrent_tickers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/btc_usd"))
        .respond_with(ticker_response("btc_usd", 1_500_000_000))
        .expect(5)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let market = btc_usd();
    let results =
        futures::future::join_all((0..5).map(|_| connector.fetch_ticker(&market))).await;

    assert_eq!(results.len(), 5);
    for ticker in results {
        assert_eq!(ticker.unwrap().bid, Some(dec("4099")));
    }
}
