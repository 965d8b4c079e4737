/*
[INPUT]:  Search keyword (e.g., "election")
[OUTPUT]: Filtered markets, an order book and an execution estimate
[POS]:    Examples - public market data queries through the sidecar
[UPDATE]: When adding new market data operations
*/

use pmxt_adapter::*;
use rust_decimal::Decimal;

/// Example: search markets, narrow them locally, then price a buy order
///
/// Market data needs no credentials. The sidecar is started if needed.
#[tokio::main]
async fn main() {
    println!("=== pmxt Market Data Example ===\n");

    let exchange = match Exchange::polymarket(ExchangeOptions::default()).await {
        Ok(exchange) => exchange,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return;
        }
    };
    println!("✓ Connected to sidecar at {}\n", exchange.client().base_url());

    println!("Searching markets for \"election\"...");
    let markets = match exchange
        .fetch_markets(&MarketSearchParams::query("election"))
        .await
    {
        Ok(markets) => markets,
        Err(e) => {
            println!("✗ Error: {}", e);
            return;
        }
    };

    let criteria = MarketCriteria {
        volume_24h: Some(filter::Range::at_least(Decimal::from(1000))),
        ..MarketCriteria::default()
    };
    let liquid = exchange.filter_markets(&markets, &MarketFilter::from(criteria));
    println!("✓ {} of {} markets traded over 1000 in 24h", liquid.len(), markets.len());

    let Some(outcome) = liquid
        .first()
        .and_then(|market| market.outcome(OutcomeSlot::Yes))
    else {
        println!("No binary market to price");
        return;
    };

    println!("\nFetching order book for {}...", outcome.label);
    match exchange.fetch_order_book(&outcome.outcome_id).await {
        Ok(book) => {
            let quote = exchange.get_execution_price_detailed(&book, Side::Buy, Decimal::from(100));
            println!(
                "✓ Buying 100 would average {} (filled {}, complete: {})",
                quote.price.round_dp(4),
                quote.filled_amount,
                quote.fully_filled
            );
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
