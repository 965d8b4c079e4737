/*
[INPUT]:  Value objects returned by the exchange facade
[OUTPUT]: Plain-text tables and summaries for stdout
[POS]:    Presentation layer - CLI output formatting
[UPDATE]: When command output columns change
*/

use std::fmt::Write;

use console::style;
use pmxt_adapter::{
    Balance, ExecutionPriceResult, Order, OrderBook, OutcomeSlot, Position, ServerLockInfo, Side,
    Trade, TradeSide, UnifiedEvent, UnifiedMarket,
};
use rust_decimal::Decimal;

const TITLE_WIDTH: usize = 48;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn heading(text: &str) -> String {
    style(text).bold().to_string()
}

fn price_or_dash(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.round_dp(4).to_string())
}

pub fn markets(markets: &[&UnifiedMarket]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!(
            "{:<20} {:<width$} {:>8} {:>14} {:>12}",
            "MARKET",
            "TITLE",
            "YES",
            "VOL 24H",
            "LIQUIDITY",
            width = TITLE_WIDTH
        ))
    );
    for market in markets {
        let yes = market.outcome(OutcomeSlot::Yes).map(|outcome| outcome.price);
        let _ = writeln!(
            out,
            "{:<20} {:<width$} {:>8} {:>14} {:>12}",
            truncate(&market.market_id, 20),
            truncate(&market.title, TITLE_WIDTH),
            price_or_dash(yes),
            market.volume_24h.round_dp(2),
            market.liquidity.round_dp(2),
            width = TITLE_WIDTH
        );
    }
    let _ = write!(out, "{} market(s)", markets.len());
    out
}

pub fn events(events: &[&UnifiedEvent]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!(
            "{:<20} {:<width$} {:>8} {:>14}",
            "EVENT",
            "TITLE",
            "MARKETS",
            "VOL 24H",
            width = TITLE_WIDTH
        ))
    );
    for event in events {
        let _ = writeln!(
            out,
            "{:<20} {:<width$} {:>8} {:>14}",
            truncate(&event.id, 20),
            truncate(&event.title, TITLE_WIDTH),
            event.markets.len(),
            event.total_volume().round_dp(2),
            width = TITLE_WIDTH
        );
    }
    let _ = write!(out, "{} event(s)", events.len());
    out
}

pub fn order_book(book: &OrderBook, depth: usize) -> String {
    let mut bids: Vec<_> = book.bids.iter().collect();
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    let mut asks: Vec<_> = book.asks.iter().collect();
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!("{:>10} {:>12} | {:>10} {:>12}", "BID", "SIZE", "ASK", "SIZE"))
    );
    for row in 0..depth.min(bids.len().max(asks.len())) {
        let (bid_price, bid_size) = bids
            .get(row)
            .map_or((String::new(), String::new()), |level| {
                (level.price.to_string(), level.size.to_string())
            });
        let (ask_price, ask_size) = asks
            .get(row)
            .map_or((String::new(), String::new()), |level| {
                (level.price.to_string(), level.size.to_string())
            });
        let _ = writeln!(
            out,
            "{:>10} {:>12} | {:>10} {:>12}",
            style(bid_price).green(),
            bid_size,
            style(ask_price).red(),
            ask_size
        );
    }
    let _ = write!(
        out,
        "spread {}  mid {}",
        price_or_dash(book.spread()),
        price_or_dash(book.mid_price())
    );
    out
}

pub fn quote(side: Side, amount: Decimal, result: &ExecutionPriceResult) -> String {
    let status = if result.fully_filled {
        style("fully fillable").green().to_string()
    } else {
        style("insufficient liquidity").yellow().to_string()
    };
    format!(
        "{side} {amount}: avg price {} filled {} ({status})",
        result.price.round_dp(6),
        result.filled_amount
    )
}

pub fn trades(trades: &[Trade]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!("{:<24} {:>16} {:>6} {:>10} {:>12}", "ID", "TIME (ms)", "SIDE", "PRICE", "AMOUNT"))
    );
    for trade in trades {
        let side = match trade.side {
            TradeSide::Buy => style("buy").green().to_string(),
            TradeSide::Sell => style("sell").red().to_string(),
            TradeSide::Unknown => "?".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<24} {:>16} {:>6} {:>10} {:>12}",
            truncate(&trade.id, 24),
            trade.timestamp,
            side,
            trade.price,
            trade.amount
        );
    }
    let _ = write!(out, "{} trade(s)", trades.len());
    out
}

pub fn balances(balances: &[Balance]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!("{:<8} {:>14} {:>14} {:>14}", "CCY", "TOTAL", "AVAILABLE", "LOCKED"))
    );
    for balance in balances {
        let _ = writeln!(
            out,
            "{:<8} {:>14} {:>14} {:>14}",
            balance.currency,
            balance.total.round_dp(2),
            balance.available.round_dp(2),
            balance.locked.round_dp(2)
        );
    }
    out.trim_end().to_string()
}

pub fn positions(positions: &[Position]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!(
            "{:<20} {:<10} {:>10} {:>8} {:>8} {:>10} {:>10}",
            "MARKET", "OUTCOME", "SIZE", "ENTRY", "MARK", "UPNL", "RPNL"
        ))
    );
    for position in positions {
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:>10} {:>8} {:>8} {:>10} {:>10}",
            truncate(&position.market_id, 20),
            truncate(&position.outcome_label, 10),
            position.size,
            position.entry_price.round_dp(4),
            position.current_price.round_dp(4),
            position.unrealized_pnl.round_dp(2),
            position.realized_pnl.round_dp(2)
        );
    }
    let _ = write!(out, "{} position(s)", positions.len());
    out
}

pub fn orders(orders: &[Order]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        heading(&format!(
            "{:<24} {:<20} {:>5} {:>8} {:>10} {:>10} {:>10}",
            "ID", "MARKET", "SIDE", "PRICE", "AMOUNT", "FILLED", "STATUS"
        ))
    );
    for order in orders {
        let _ = writeln!(
            out,
            "{:<24} {:<20} {:>5} {:>8} {:>10} {:>10} {:>10}",
            truncate(&order.id, 24),
            truncate(&order.market_id, 20),
            order.side,
            price_or_dash(order.price),
            order.amount,
            order.filled,
            order.status
        );
    }
    let _ = write!(out, "{} order(s)", orders.len());
    out
}

pub fn server_status(running: bool, base_url: &str, lock: Option<&ServerLockInfo>) -> String {
    let state = if running {
        style("● running").green().to_string()
    } else {
        style("○ stopped").red().to_string()
    };
    let mut out = format!("Sidecar:  {state} ({base_url})");
    if let Some(info) = lock {
        let _ = write!(
            out,
            "\nLock:     port {} pid {} version {}",
            info.port,
            info.pid,
            info.version.as_deref().unwrap_or("unknown")
        );
    }
    out
}
