/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public pmxt adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod exchange;
pub mod execution;
pub mod filter;
pub mod http;
pub mod server;
pub mod types;

// Re-export the facade
pub use exchange::{Exchange, ExchangeCredentials, ExchangeOptions};

// Re-export local pricing and filtering
pub use execution::{get_execution_price, get_execution_price_detailed};
pub use filter::{
    EventCriteria, EventFilter, MarketCriteria, MarketFilter, Matcher, filter_events,
    filter_markets,
};

// Re-export commonly used types from http
pub use http::{ClientConfig, PmxtError, Result, SidecarClient};

pub use server::ServerManager;

// Re-export all types
pub use types::*;
