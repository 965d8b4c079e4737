/*
[INPUT]:  Parsed CLI arguments and loaded configuration
[OUTPUT]: Facade calls, local filtering/pricing, rendered output
[POS]:    Command layer - dispatch for every pmxt subcommand
[UPDATE]: When adding subcommands or changing their flags
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pmxt_adapter::{
    EventCriteria, EventFilter, Exchange, MarketCriteria, MarketFilter, MarketSearchParams,
    ServerManager, Side, TradeParams, Venue,
    filter::Range,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::render;

const BOOK_DEPTH: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "pmxt", version, about = "Prediction market data and trading through the pmxt sidecar")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = "pmxt.yaml", global = true)]
    pub config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
    #[arg(long, value_name = "VENUE", default_value = "polymarket", global = true)]
    pub venue: Venue,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search markets, then narrow them locally
    Markets {
        /// Server-side search keyword
        query: Option<String>,
        /// Local criteria as JSON, e.g. '{"volume_24h":{"min":1000}}'
        #[arg(long, value_name = "JSON", conflicts_with_all = ["category", "tags", "min_volume"])]
        filter: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Repeatable; any tag may match
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        #[arg(long, value_name = "AMOUNT")]
        min_volume: Option<Decimal>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Search events
    Events {
        query: Option<String>,
        #[arg(long, value_name = "N")]
        min_markets: Option<usize>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Show an outcome's order book
    Book { outcome_id: String },
    /// Estimate the average fill price of a market order
    Quote {
        outcome_id: String,
        side: Side,
        amount: Decimal,
    },
    /// Recent trades for an outcome
    Trades {
        outcome_id: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Balance,
    Positions,
    /// Open orders, optionally for one market
    Orders {
        #[arg(long, value_name = "MARKET_ID")]
        market: Option<String>,
    },
    /// Manage the local sidecar
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    Status,
    Start,
    Stop,
    Restart,
}

/// Local market criteria from either `--filter` JSON or the shorthand flags.
pub fn market_criteria(
    filter: Option<&str>,
    category: Option<String>,
    tags: Vec<String>,
    min_volume: Option<Decimal>,
) -> Result<Option<MarketCriteria>> {
    if let Some(json) = filter {
        let criteria: MarketCriteria =
            serde_json::from_str(json).context("parse --filter as market criteria")?;
        return Ok(Some(criteria));
    }

    let criteria = MarketCriteria {
        category,
        tags: (!tags.is_empty()).then_some(tags),
        volume_24h: min_volume.map(Range::at_least),
        ..MarketCriteria::default()
    };
    Ok((criteria != MarketCriteria::default()).then_some(criteria))
}

pub fn event_criteria(min_markets: Option<usize>) -> Option<EventCriteria> {
    min_markets.map(|min| EventCriteria {
        market_count: Some(Range::at_least(min)),
        ..EventCriteria::default()
    })
}

fn search_params(query: Option<String>, limit: u32) -> MarketSearchParams {
    MarketSearchParams {
        query,
        limit: Some(limit),
        ..MarketSearchParams::default()
    }
}

async fn connect(config: &CliConfig, venue: Venue) -> Result<Exchange> {
    Exchange::connect(venue, config.exchange_options(venue))
        .await
        .with_context(|| format!("connect to sidecar for {venue}"))
}

pub async fn run(cli: Cli, config: CliConfig) -> Result<()> {
    match cli.command {
        Command::Server { action } => server(action, &config).await,
        command => {
            let exchange = connect(&config, cli.venue).await?;
            debug!(venue = %cli.venue, base_url = %exchange.client().base_url(), "exchange ready");
            execute(&exchange, command).await
        }
    }
}

async fn execute(exchange: &Exchange, command: Command) -> Result<()> {
    match command {
        Command::Markets {
            query,
            filter,
            category,
            tags,
            min_volume,
            limit,
        } => {
            let criteria = market_criteria(filter.as_deref(), category, tags, min_volume)?;
            let markets = exchange.fetch_markets(&search_params(query, limit)).await?;
            let selected = match criteria {
                Some(criteria) => exchange.filter_markets(&markets, &MarketFilter::from(criteria)),
                None => markets.iter().collect(),
            };
            println!("{}", render::markets(&selected));
        }
        Command::Events {
            query,
            min_markets,
            limit,
        } => {
            let events = exchange.fetch_events(&search_params(query, limit)).await?;
            let selected = match event_criteria(min_markets) {
                Some(criteria) => exchange.filter_events(&events, &EventFilter::from(criteria)),
                None => events.iter().collect(),
            };
            println!("{}", render::events(&selected));
        }
        Command::Book { outcome_id } => {
            let book = exchange.fetch_order_book(&outcome_id).await?;
            println!("{}", render::order_book(&book, BOOK_DEPTH));
        }
        Command::Quote {
            outcome_id,
            side,
            amount,
        } => {
            let book = exchange.fetch_order_book(&outcome_id).await?;
            let result = exchange.get_execution_price_detailed(&book, side, amount);
            println!("{}", render::quote(side, amount, &result));
        }
        Command::Trades { outcome_id, limit } => {
            let params = TradeParams {
                limit: Some(limit),
                since: None,
            };
            let trades = exchange.fetch_trades(&outcome_id, &params).await?;
            println!("{}", render::trades(&trades));
        }
        Command::Balance => {
            let balances = exchange.fetch_balance().await?;
            println!("{}", render::balances(&balances));
        }
        Command::Positions => {
            let positions = exchange.fetch_positions().await?;
            println!("{}", render::positions(&positions));
        }
        Command::Orders { market } => {
            let orders = exchange.fetch_open_orders(market.as_deref()).await?;
            println!("{}", render::orders(&orders));
        }
        Command::Server { .. } => bail!("server commands run without an exchange connection"),
    }

    Ok(())
}

async fn server(action: ServerAction, config: &CliConfig) -> Result<()> {
    let manager = ServerManager::new(&config.sidecar.base_url)
        .context("configure sidecar manager")?
        .with_client_config(config.client_config());

    match action {
        ServerAction::Status => {}
        ServerAction::Start => manager.ensure_running().await.context("start sidecar")?,
        ServerAction::Stop => manager.stop().await.context("stop sidecar")?,
        ServerAction::Restart => manager.restart().await.context("restart sidecar")?,
    }
    info!(?action, "server command complete");

    let running = manager.is_running().await;
    let lock = manager.server_info().await;
    println!(
        "{}",
        render::server_status(running, manager.base_url().as_str(), lock.as_ref())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_quote() {
        let cli = Cli::try_parse_from(["pmxt", "--venue", "kalshi", "quote", "FED-25DEC", "sell", "12.5"])
            .expect("parse");

        assert_eq!(cli.venue, Venue::Kalshi);
        match cli.command {
            Command::Quote {
                outcome_id,
                side,
                amount,
            } => {
                assert_eq!(outcome_id, "FED-25DEC");
                assert_eq!(side, Side::Sell);
                assert_eq!(amount, dec!(12.5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_venue() {
        assert!(Cli::try_parse_from(["pmxt", "--venue", "binance", "balance"]).is_err());
    }

    #[test]
    fn test_filter_conflicts_with_shorthand_flags() {
        let parsed = Cli::try_parse_from([
            "pmxt",
            "markets",
            "--filter",
            "{}",
            "--category",
            "Politics",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_server_action() {
        let cli = Cli::try_parse_from(["pmxt", "server", "restart"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Server {
                action: ServerAction::Restart
            }
        ));
        assert_eq!(cli.venue, Venue::Polymarket);
    }

    #[test]
    fn test_shorthand_flags_build_criteria() {
        let criteria = market_criteria(
            None,
            Some("Politics".to_string()),
            vec!["elections".to_string()],
            Some(dec!(1000)),
        )
        .expect("criteria")
        .expect("some criteria");

        assert_eq!(criteria.category.as_deref(), Some("Politics"));
        assert_eq!(criteria.tags, Some(vec!["elections".to_string()]));
        assert_eq!(criteria.volume_24h, Some(Range::at_least(dec!(1000))));
    }

    #[test]
    fn test_no_flags_means_no_local_filter() {
        assert!(market_criteria(None, None, Vec::new(), None).expect("criteria").is_none());
        assert!(event_criteria(None).is_none());
    }

    #[test]
    fn test_filter_json_is_parsed() {
        let criteria = market_criteria(Some(r#"{"text":"fed","search_in":["title","tags"]}"#), None, Vec::new(), None)
            .expect("criteria")
            .expect("some criteria");

        assert_eq!(criteria.text.as_deref(), Some("fed"));
        assert_eq!(criteria.search_in.map(|fields| fields.len()), Some(2));
        assert!(market_criteria(Some("not json"), None, Vec::new(), None).is_err());
    }
}
