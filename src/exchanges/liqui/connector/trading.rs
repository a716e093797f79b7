use crate::core::errors::ExchangeError;
use crate::core::kernel::{Params, RestClient};
use crate::core::traits::OrderPlacer;
use crate::core::types::{Market, Order, OrderSide, OrderType};
use crate::exchanges::liqui::{conversions, rest::LiquiRest};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Liqui-family order placement
pub struct Trading<R: RestClient> {
    rest: LiquiRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &LiquiRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

/// Amounts are truncated to the market's precision, never rounded up
pub fn amount_to_precision(market: &Market, amount: Decimal) -> Decimal {
    match market.precision.amount {
        Some(dp) => amount.round_dp_with_strategy(dp, RoundingStrategy::ToZero),
        None => amount,
    }
}

pub fn price_to_precision(market: &Market, price: Decimal) -> Decimal {
    match market.precision.price {
        Some(dp) => price.round_dp(dp),
        None => price,
    }
}

/// Numeric ids go out as numbers, anything else verbatim
pub(crate) fn order_id_param(id: &str) -> Value {
    id.parse::<u64>().map_or_else(|_| json!(id), |n| json!(n))
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self, market), fields(exchange = %self.rest.id(), symbol = %market.symbol))]
    async fn create_order(
        &self,
        market: &Market,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Result<Order, ExchangeError> {
        if order_type == OrderType::Market {
            return Err(ExchangeError::NotSupported(format!(
                "{} allows limit orders only",
                self.rest.id()
            )));
        }
        let price = price.ok_or_else(|| {
            ExchangeError::InvalidParameters("limit orders require a price".to_string())
        })?;
        let amount = amount_to_precision(market, amount);
        let price = price_to_precision(market, price);

        let mut params = Params::new();
        params.insert("pair".to_string(), json!(market.id));
        params.insert("type".to_string(), json!(side.as_str()));
        params.insert("amount".to_string(), json!(amount.to_string()));
        params.insert("rate".to_string(), json!(price.to_string()));

        let placed = self.rest.private_post("Trade", params).await?;
        let order = conversions::parse_created_order(
            self.rest.id(),
            &placed,
            market,
            side,
            amount,
            price,
            Utc::now().timestamp_millis(),
        )?;

        info!(order_id = %order.id, "order placed");
        Ok(order)
    }

    #[instrument(skip(self), fields(exchange = %self.rest.id()))]
    async fn cancel_order(&self, id: &str) -> Result<Value, ExchangeError> {
        let mut params = Params::new();
        params.insert("order_id".to_string(), order_id_param(id));
        self.rest.private_post("CancelOrder", params).await
    }
}
