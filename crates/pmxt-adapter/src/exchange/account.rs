/*
[INPUT]:  Order parameters and identifiers, venue credentials
[OUTPUT]: Orders, positions and balances
[POS]:    Facade layer - trading and account operations (credentials required by venues)
[UPDATE]: When adding trading operations or changing argument layout
*/

use serde_json::Value;

use super::Exchange;
use crate::http::Result;
use crate::types::{Balance, CreateOrderParams, Order, Position};

impl Exchange {
    /// createOrder, args `[params]`
    pub async fn create_order(&self, params: &CreateOrderParams) -> Result<Order> {
        const OP: &str = "create order";
        let args = vec![Self::encode(params, OP)?];
        self.invoke("createOrder", OP, args).await
    }

    /// cancelOrder, args `[order_id]`
    pub async fn cancel_order(&self, order_id: &str) -> Result<Order> {
        self.invoke("cancelOrder", "cancel order", vec![Value::from(order_id)])
            .await
    }

    /// fetchOrder, args `[order_id]`
    pub async fn fetch_order(&self, order_id: &str) -> Result<Order> {
        self.invoke("fetchOrder", "fetch order", vec![Value::from(order_id)])
            .await
    }

    /// fetchOpenOrders, args `[market_id]` or `[]`
    pub async fn fetch_open_orders(&self, market_id: Option<&str>) -> Result<Vec<Order>> {
        let args = market_id
            .filter(|id| !id.is_empty())
            .map(Value::from)
            .into_iter()
            .collect();
        self.invoke("fetchOpenOrders", "fetch open orders", args).await
    }

    /// fetchPositions, args `[]`
    pub async fn fetch_positions(&self) -> Result<Vec<Position>> {
        self.invoke("fetchPositions", "fetch positions", Vec::new()).await
    }

    /// fetchBalance, args `[]`
    pub async fn fetch_balance(&self) -> Result<Vec<Balance>> {
        self.invoke("fetchBalance", "fetch balance", Vec::new()).await
    }

    /// watchUserPositions, args `[]`. Resolves on the next position update.
    pub async fn watch_user_positions(&self) -> Result<Vec<Position>> {
        self.invoke("watchUserPositions", "watch user positions", Vec::new())
            .await
    }

    /// watchUserTransactions, args `[]`. The payload shape is venue specific.
    pub async fn watch_user_transactions(&self) -> Result<Value> {
        self.invoke("watchUserTransactions", "watch user transactions", Vec::new())
            .await
    }
}
