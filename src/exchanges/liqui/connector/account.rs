use crate::core::errors::{ErrorKind, ExchangeError};
use crate::core::kernel::{Params, RestClient};
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, DepositAddress, Market, Order, Trade, Withdrawal};
use crate::exchanges::liqui::connector::trading::order_id_param;
use crate::exchanges::liqui::{conversions, rest::LiquiRest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::instrument;

/// Liqui-family account endpoints
pub struct Account<R: RestClient> {
    rest: LiquiRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &LiquiRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

fn pair_filter(market: Option<&Market>) -> Params {
    let mut params = Params::new();
    if let Some(market) = market {
        params.insert("pair".to_string(), json!(market.id));
    }
    params
}

/// Entries of an id-keyed mapping; `Null` (nothing returned) is empty
fn keyed_entries(payload: &Value) -> impl Iterator<Item = (&String, &Value)> {
    payload.as_object().into_iter().flatten()
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = %self.rest.id()))]
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError> {
        let info = self.rest.private_post("getInfo", Params::new()).await?;
        self.rest.exchange().parse_balance(&info)
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id()))]
    async fn fetch_order(
        &self,
        id: &str,
        market: Option<&Market>,
    ) -> Result<Order, ExchangeError> {
        self.rest.require("fetchOrder")?;
        let mut params = Params::new();
        params.insert("order_id".to_string(), order_id_param(id));

        let orders = self.rest.private_post("OrderInfo", params).await?;
        let raw = orders.get(id).ok_or_else(|| {
            ExchangeError::classified(
                ErrorKind::OrderNotFound,
                format!("{} order {} not found: {}", self.rest.id(), id, orders),
            )
        })?;
        self.rest.exchange().parse_order(id, raw, market)
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id()))]
    async fn fetch_open_orders(
        &self,
        market: Option<&Market>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.rest.require("fetchOpenOrders")?;
        let orders = self
            .rest
            .private_post("ActiveOrders", pair_filter(market))
            .await?;

        keyed_entries(&orders)
            .map(|(id, raw)| self.rest.exchange().parse_order(id, raw, market))
            .collect()
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id()))]
    async fn fetch_my_trades(
        &self,
        market: Option<&Market>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.rest.require("fetchMyTrades")?;
        let mut params = pair_filter(market);
        if let Some(limit) = limit {
            params.insert("count".to_string(), json!(limit));
        }

        let trades = self.rest.private_post("TradeHistory", params).await?;
        keyed_entries(&trades)
            .map(|(id, raw)| {
                let mut raw = raw.clone();
                if let Some(fields) = raw.as_object_mut() {
                    fields.insert("trade_id".to_string(), json!(id));
                }
                self.rest.exchange().parse_trade(&raw, market)
            })
            .collect()
    }

    #[instrument(skip(self), fields(exchange = %self.rest.id()))]
    async fn fetch_deposit_address(&self, code: &str) -> Result<DepositAddress, ExchangeError> {
        self.rest.require("fetchDepositAddress")?;
        let mut params = Params::new();
        params.insert("coinName".to_string(), json!(code));

        let address = self.rest.private_post("CoinDepositAddress", params).await?;
        conversions::parse_deposit_address(self.rest.id(), code, &address)
    }

    #[instrument(skip(self, address), fields(exchange = %self.rest.id()))]
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
    ) -> Result<Withdrawal, ExchangeError> {
        self.rest.require("withdraw")?;
        let mut params = Params::new();
        params.insert("coinName".to_string(), json!(code));
        params.insert("amount".to_string(), json!(amount.to_string()));
        params.insert("address".to_string(), json!(address));

        let withdrawal = self.rest.private_post("WithdrawCoin", params).await?;
        Ok(conversions::parse_withdrawal(&withdrawal))
    }
}
