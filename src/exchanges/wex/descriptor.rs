use serde_json::{json, Value};

/// Wex's layer over liqui. Lists replace the parent's wholesale, so the
/// endpoint lists and the substring rules are complete here.
pub fn wex_descriptor() -> Value {
    json!({
        "id": "wex",
        "name": "WEX",
        "countries": "NZ",
        "version": "3",
        "has": {
            "CORS": false,
            "fetchTickers": true
        },
        "urls": {
            "logo": "https://user-images.githubusercontent.com/1294454/30652751-d74ec8f8-9e31-11e7-98c5-71469fcef03e.jpg",
            "api": {
                "public": "https://wex.nz/api",
                "private": "https://wex.nz/tapi"
            },
            "www": "https://wex.nz",
            "doc": [
                "https://wex.nz/api/3/docs",
                "https://wex.nz/tapi/docs"
            ],
            "fees": "https://wex.nz/fees"
        },
        "api": {
            "public": {
                "get": [
                    "info",
                    "ticker/{pair}",
                    "depth/{pair}",
                    "trades/{pair}"
                ]
            },
            "private": {
                "post": [
                    "getInfo",
                    "Trade",
                    "ActiveOrders",
                    "OrderInfo",
                    "CancelOrder",
                    "TradeHistory",
                    "TransHistory",
                    "CoinDepositAddress",
                    "WithdrawCoin",
                    "CreateCoupon",
                    "RedeemCoupon"
                ]
            }
        },
        "fees": {
            "trading": {
                "maker": 0.002,
                "taker": 0.002
            },
            "funding": {
                "withdraw": {
                    "BTC": 0.001,
                    "LTC": 0.001,
                    "NMC": 0.1,
                    "NVC": 0.1,
                    "PPC": 0.1,
                    "DASH": 0.001,
                    "ETH": 0.003,
                    "BCH": 0.001,
                    "ZEC": 0.001
                }
            }
        },
        "exceptions": {
            "messages": {
                "bad status": "OrderNotFound",
                "Requests too often": "DDoSProtection",
                "not available": "DDoSProtection",
                "external service unavailable": "DDoSProtection"
            },
            "broad": [
                ["It is not enough", "InsufficientFunds"]
            ]
        }
    })
}
