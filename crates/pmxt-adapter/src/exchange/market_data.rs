/*
[INPUT]:  Search parameters and outcome identifiers
[OUTPUT]: Markets, events, candles, order books, trades and price updates
[POS]:    Facade layer - market data operations (credentials optional)
[UPDATE]: When adding market data operations or changing argument layout
*/

use serde_json::Value;

use super::{Exchange, normalize_market};
use crate::http::Result;
use crate::types::{
    HistoryParams, MarketSearchParams, OrderBook, PriceCandle, Trade, TradeParams, UnifiedEvent,
    UnifiedMarket,
};

impl Exchange {
    /// fetchMarkets, args `[params]` or `[]`
    pub async fn fetch_markets(&self, params: &MarketSearchParams) -> Result<Vec<UnifiedMarket>> {
        const OP: &str = "fetch markets";
        let args = if params.is_empty() {
            Vec::new()
        } else {
            vec![Self::encode(params, OP)?]
        };

        let mut markets: Vec<UnifiedMarket> = self.invoke("fetchMarkets", OP, args).await?;
        markets.iter_mut().for_each(normalize_market);
        Ok(markets)
    }

    /// fetchEvents, args `[params]` or `[]`
    pub async fn fetch_events(&self, params: &MarketSearchParams) -> Result<Vec<UnifiedEvent>> {
        const OP: &str = "fetch events";
        let args = if params.is_empty() {
            Vec::new()
        } else {
            vec![Self::encode(params, OP)?]
        };

        let mut events: Vec<UnifiedEvent> = self.invoke("fetchEvents", OP, args).await?;
        events
            .iter_mut()
            .flat_map(|event| event.markets.iter_mut())
            .for_each(normalize_market);
        Ok(events)
    }

    /// fetchOHLCV, args `[outcome_id, params]`
    pub async fn fetch_ohlcv(
        &self,
        outcome_id: &str,
        params: &HistoryParams,
    ) -> Result<Vec<PriceCandle>> {
        const OP: &str = "fetch OHLCV";
        let args = vec![Value::from(outcome_id), Self::encode(params, OP)?];
        self.invoke("fetchOHLCV", OP, args).await
    }

    /// fetchOrderBook, args `[outcome_id]`
    pub async fn fetch_order_book(&self, outcome_id: &str) -> Result<OrderBook> {
        self.invoke("fetchOrderBook", "fetch order book", vec![Value::from(outcome_id)])
            .await
    }

    /// fetchTrades, args `[outcome_id, params]`
    pub async fn fetch_trades(&self, outcome_id: &str, params: &TradeParams) -> Result<Vec<Trade>> {
        const OP: &str = "fetch trades";
        let args = vec![Value::from(outcome_id), Self::encode(params, OP)?];
        self.invoke("fetchTrades", OP, args).await
    }

    /// watchOrderBook, args `[outcome_id, limit?]`. Resolves on the next book update.
    pub async fn watch_order_book(&self, outcome_id: &str, limit: Option<u32>) -> Result<OrderBook> {
        let mut args = vec![Value::from(outcome_id)];
        if let Some(limit) = limit {
            args.push(Value::from(limit));
        }
        self.invoke("watchOrderBook", "watch order book", args).await
    }

    /// watchTrades, args `[outcome_id, since?, limit?]`
    ///
    /// A `limit` without `since` sends `null` in the `since` position.
    pub async fn watch_trades(
        &self,
        outcome_id: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>> {
        let mut args = vec![Value::from(outcome_id)];
        match (since, limit) {
            (Some(since), Some(limit)) => args.extend([Value::from(since), Value::from(limit)]),
            (Some(since), None) => args.push(Value::from(since)),
            (None, Some(limit)) => args.extend([Value::Null, Value::from(limit)]),
            (None, None) => {}
        }
        self.invoke("watchTrades", "watch trades", args).await
    }

    /// watchPrices, args `[market_address]`. Resolves on the next AMM price update.
    pub async fn watch_prices(&self, market_address: &str) -> Result<Value> {
        self.invoke("watchPrices", "watch prices", vec![Value::from(market_address)])
            .await
    }
}
