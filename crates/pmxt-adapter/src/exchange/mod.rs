/*
[INPUT]:  Venue selection, credentials, sidecar connection options
[OUTPUT]: Exchange facade: remote venue calls plus local filter and pricing helpers
[POS]:    Facade layer - the caller-facing API over the sidecar
[UPDATE]: When facade operations or credential handling change
*/

mod account;
mod market_data;

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::execution;
use crate::filter::{self, EventFilter, MarketFilter};
use crate::http::{ClientConfig, DEFAULT_BASE_URL, PmxtError, Result, SidecarClient};
use crate::server::ServerManager;
use crate::types::{
    CredentialsPayload, ExecutionPriceResult, OrderBook, Side, SidecarRequest, SignatureType,
    UnifiedEvent, UnifiedMarket, Venue,
};

/// Venue credentials forwarded with every sidecar call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeCredentials {
    pub api_key: Option<String>,
    pub private_key: Option<String>,
    /// Polymarket proxy or smart-wallet address, sent as `funderAddress`.
    pub proxy_address: Option<String>,
    pub signature_type: Option<SignatureType>,
}

impl ExchangeCredentials {
    /// Nothing is sent unless an API key or private key is present.
    pub fn payload(&self) -> Option<CredentialsPayload> {
        if self.api_key.is_none() && self.private_key.is_none() {
            return None;
        }
        Some(CredentialsPayload {
            api_key: self.api_key.clone(),
            private_key: self.private_key.clone(),
            funder_address: self.proxy_address.clone(),
            signature_type: self.signature_type,
        })
    }
}

/// How an [`Exchange`] finds its sidecar
#[derive(Debug, Clone)]
pub struct ExchangeOptions {
    pub base_url: String,
    /// Launch the sidecar when the health probe fails.
    pub auto_start_server: bool,
    pub client_config: ClientConfig,
    pub credentials: ExchangeCredentials,
    /// Overrides `~/.pmxt/server.lock`.
    pub lock_path: Option<PathBuf>,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auto_start_server: true,
            client_config: ClientConfig::default(),
            credentials: ExchangeCredentials::default(),
            lock_path: None,
        }
    }
}

/// Unified client for one prediction-market venue
#[derive(Debug, Clone)]
pub struct Exchange {
    venue: Venue,
    client: SidecarClient,
    credentials: ExchangeCredentials,
}

impl Exchange {
    /// Resolve the sidecar (starting it if allowed) and bind to `venue`.
    pub async fn connect(venue: Venue, options: ExchangeOptions) -> Result<Self> {
        let mut manager = ServerManager::new(&options.base_url)?
            .with_client_config(options.client_config.clone());
        if let Some(path) = &options.lock_path {
            manager = manager.with_lock_path(path);
        }

        let client = if options.auto_start_server {
            manager.ensure_running().await?;
            manager.connect().await?
        } else {
            SidecarClient::with_config_and_base_url(options.client_config, &options.base_url)?
                .with_access_token(manager.access_token().await)
        };

        Ok(Self::with_client(venue, client, options.credentials))
    }

    /// Bind to an already configured client.
    pub fn with_client(venue: Venue, client: SidecarClient, mut credentials: ExchangeCredentials) -> Self {
        if venue == Venue::Polymarket && credentials.signature_type.is_none() {
            credentials.signature_type = Some(SignatureType::GnosisSafe);
        }
        Self {
            venue,
            client,
            credentials,
        }
    }

    pub async fn polymarket(options: ExchangeOptions) -> Result<Self> {
        Self::connect(Venue::Polymarket, options).await
    }

    pub async fn kalshi(options: ExchangeOptions) -> Result<Self> {
        Self::connect(Venue::Kalshi, options).await
    }

    pub async fn limitless(options: ExchangeOptions) -> Result<Self> {
        Self::connect(Venue::Limitless, options).await
    }

    pub fn venue(&self) -> Venue {
        self.venue
    }

    pub fn client(&self) -> &SidecarClient {
        &self.client
    }

    pub fn credentials(&self) -> &ExchangeCredentials {
        &self.credentials
    }

    /// Call a sidecar method and decode its payload. Every failure is
    /// reported as `Failed to {operation}: ...`.
    async fn invoke<T: DeserializeOwned>(
        &self,
        method: &str,
        operation: &str,
        args: Vec<Value>,
    ) -> Result<T> {
        let request = SidecarRequest::new(args).with_credentials(self.credentials.payload());
        let data = self
            .client
            .call(self.venue.as_str(), method, &request)
            .await
            .map_err(|err| err.into_operation(operation))?;

        serde_json::from_value(data).map_err(|err| PmxtError::from(err).into_operation(operation))
    }

    fn encode<T: Serialize>(value: &T, operation: &str) -> Result<Value> {
        serde_json::to_value(value).map_err(|err| PmxtError::from(err).into_operation(operation))
    }

    pub fn filter_markets<'a>(
        &self,
        markets: &'a [UnifiedMarket],
        criteria: &MarketFilter<'_>,
    ) -> Vec<&'a UnifiedMarket> {
        filter::filter_markets(markets, criteria)
    }

    pub fn filter_events<'a>(
        &self,
        events: &'a [UnifiedEvent],
        criteria: &EventFilter<'_>,
    ) -> Vec<&'a UnifiedEvent> {
        filter::filter_events(events, criteria)
    }

    pub fn get_execution_price(&self, book: &OrderBook, side: Side, amount: Decimal) -> Decimal {
        execution::get_execution_price(book, side, amount)
    }

    pub fn get_execution_price_detailed(
        &self,
        book: &OrderBook,
        side: Side,
        amount: Decimal,
    ) -> ExecutionPriceResult {
        execution::get_execution_price_detailed(book, side, amount)
    }
}

/// Fill binary slots the sidecar left empty.
fn normalize_market(market: &mut UnifiedMarket) {
    if !market.has_slots() {
        market.assign_binary_outcomes();
    }
}
