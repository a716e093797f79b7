use serde_json::{json, Value};

/// Liqui's own layer, merged over the base defaults
pub fn liqui_descriptor() -> Value {
    json!({
        "id": "liqui",
        "name": "Liqui",
        "countries": "UA",
        "rateLimit": 3000,
        "version": "3",
        "has": {
            "CORS": false,
            "createMarketOrder": false,
            "fetchOrderBooks": true,
            "fetchOrder": true,
            "fetchOrders": "emulated",
            "fetchOpenOrders": true,
            "fetchClosedOrders": "emulated",
            "fetchTickers": true,
            "fetchMyTrades": true,
            "fetchDepositAddress": true,
            "withdraw": true
        },
        "urls": {
            "logo": "https://user-images.githubusercontent.com/1294454/27982022-75aea828-63a0-11e7-9511-ca584a8edd74.jpg",
            "api": {
                "public": "https://api.liqui.io/api",
                "private": "https://api.liqui.io/tapi"
            },
            "www": "https://liqui.io",
            "doc": "https://liqui.io/api",
            "fees": "https://liqui.io/fee"
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
                    "CancelOrder",
                    "OrderInfo",
                    "ActiveOrders",
                    "TradeHistory",
                    "CoinDepositAddress",
                    "WithdrawCoin",
                    "CreateCoupon",
                    "RedeemCoupon"
                ]
            }
        },
        "fees": {
            "trading": {
                "maker": 0.001,
                "taker": 0.0025
            },
            "funding": {
                "tierBased": false,
                "percentage": false,
                "withdraw": {}
            }
        },
        "commonCurrencies": {
            "DSH": "DASH"
        },
        "exceptions": {
            "codes": {
                "803": "InvalidOrder",
                "804": "InvalidOrder",
                "805": "InvalidOrder",
                "806": "InvalidOrder",
                "807": "InvalidOrder",
                "831": "InsufficientFunds",
                "832": "InsufficientFunds",
                "833": "OrderNotFound"
            },
            "messages": {
                "invalid api key": "AuthenticationError",
                "invalid sign": "AuthenticationError",
                "api key dont have trade permission": "PermissionDenied",
                "invalid parameter": "InvalidOrder",
                "invalid order": "InvalidOrder",
                "Requests too often": "DDoSProtection",
                "not available": "DDoSProtection",
                "data unavailable": "DDoSProtection",
                "external service unavailable": "DDoSProtection"
            },
            "broad": [
                ["Not enougth", "InsufficientFunds"],
                ["invalid nonce", "InvalidNonce"]
            ]
        }
    })
}
