use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, Exchange, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{
    Balances, DepositAddress, Market, Order, OrderBook, OrderSide, OrderType, Ticker, Trade,
    Withdrawal,
};
use crate::exchanges::liqui::rest::LiquiRest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Connector for any liqui-family exchange, composed of the three sub-traits
pub struct LiquiConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
    rest: LiquiRest<R>,
}

impl<R: RestClient + Clone> LiquiConnector<R> {
    pub fn new(exchange: Arc<dyn Exchange>, rest_client: R) -> Self {
        let rest = LiquiRest::new(exchange, rest_client);
        Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest),
            account: Account::new(&rest),
            rest,
        }
    }

    pub fn exchange(&self) -> &dyn Exchange {
        self.rest.exchange()
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for LiquiConnector<R> {
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.market.fetch_markets().await
    }

    async fn fetch_ticker(&self, market: &Market) -> Result<Ticker, ExchangeError> {
        self.market.fetch_ticker(market).await
    }

    async fn fetch_tickers(
        &self,
        markets: &[Market],
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError> {
        self.market.fetch_tickers(markets).await
    }

    async fn fetch_order_book(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        self.market.fetch_order_book(market, limit).await
    }

    async fn fetch_trades(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.fetch_trades(market, limit).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for LiquiConnector<R> {
    async fn create_order(
        &self,
        market: &Market,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Result<Order, ExchangeError> {
        self.trading
            .create_order(market, order_type, side, amount, price)
            .await
    }

    async fn cancel_order(&self, id: &str) -> Result<Value, ExchangeError> {
        self.trading.cancel_order(id).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for LiquiConnector<R> {
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError> {
        self.account.fetch_balance().await
    }

    async fn fetch_order(
        &self,
        id: &str,
        market: Option<&Market>,
    ) -> Result<Order, ExchangeError> {
        self.account.fetch_order(id, market).await
    }

    async fn fetch_open_orders(
        &self,
        market: Option<&Market>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.account.fetch_open_orders(market).await
    }

    async fn fetch_my_trades(
        &self,
        market: Option<&Market>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.account.fetch_my_trades(market, limit).await
    }

    async fn fetch_deposit_address(&self, code: &str) -> Result<DepositAddress, ExchangeError> {
        self.account.fetch_deposit_address(code).await
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
    ) -> Result<Withdrawal, ExchangeError> {
        self.account.withdraw(code, amount, address).await
    }
}

impl<R: RestClient> ExchangeConnector for LiquiConnector<R> {}
