#![allow(dead_code)]

use lotusx_liqui::core::config::ExchangeConfig;
use lotusx_liqui::core::types::Market;
use serde_json::json;
use wiremock::MockServer;

/// Config pointing both tiers at the mock server, without transport retries
pub fn mock_config(server: &MockServer, credentials: bool) -> ExchangeConfig {
    let config = if credentials {
        ExchangeConfig::new("test_api_key".to_string(), "test_secret_key".to_string())
    } else {
        ExchangeConfig::read_only()
    };
    config
        .max_retries(0)
        .timeout(5)
        .descriptor_overrides(json!({
            "urls": {
                "api": {
                    "public": format!("{}/api", server.uri()),
                    "private": format!("{}/tapi", server.uri())
                }
            }
        }))
}

pub fn btc_usd() -> Market {
    Market::new("btc_usd", "BTC", "USD")
}

pub fn ltc_btc() -> Market {
    Market::new("ltc_btc", "LTC", "BTC")
}

pub fn ticker_payload(updated: i64) -> serde_json::Value {
    json!({
        "high": 4200.5,
        "low": 3900,
        "avg": 4050.25,
        "vol": 1_234_567.5,
        "vol_cur": 300.25,
        "last": 4100,
        "buy": 4101,
        "sell": 4099,
        "updated": updated
    })
}

pub fn ticker_response(pair: &str, updated: i64) -> wiremock::ResponseTemplate {
    wiremock::ResponseTemplate::new(200).set_body_json(json!({ pair: ticker_payload(updated) }))
}
