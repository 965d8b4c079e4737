/*
[INPUT]:  Order book snapshot, trading side and requested quantity
[OUTPUT]: Volume-weighted fill price and fillability (ExecutionPriceResult)
[POS]:    Pricing layer - local, side-effect free execution estimates
[UPDATE]: When the matching walk or the partial-fill policy changes
*/

use rust_decimal::Decimal;

use crate::types::{ExecutionPriceResult, OrderBook, OrderLevel, Side};

/// Average price a market order of `amount` would realize against `book`.
///
/// Returns zero unless the whole amount can be matched: a partial quote is
/// not reported as an achievable price.
pub fn get_execution_price(book: &OrderBook, side: Side, amount: Decimal) -> Decimal {
    let result = get_execution_price_detailed(book, side, amount);
    if result.fully_filled {
        result.price
    } else {
        Decimal::ZERO
    }
}

/// Walk the opposing side of `book` best-first and report the fill.
///
/// A buy consumes asks from the lowest price up, a sell consumes bids from
/// the highest price down. Levels are copied and sorted here; the book itself
/// is never reordered. A non-positive `amount` is vacuously fully filled.
pub fn get_execution_price_detailed(
    book: &OrderBook,
    side: Side,
    amount: Decimal,
) -> ExecutionPriceResult {
    if amount <= Decimal::ZERO {
        return ExecutionPriceResult {
            price: Decimal::ZERO,
            filled_amount: Decimal::ZERO,
            fully_filled: true,
        };
    }

    let levels = sorted_levels(book, side);

    let mut remaining = amount;
    let mut notional = Decimal::ZERO;
    let mut filled_amount = Decimal::ZERO;

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }

        let fill = remaining.min(level.size);
        notional += fill * level.price;
        filled_amount += fill;
        remaining -= fill;
    }

    let price = if filled_amount > Decimal::ZERO {
        notional / filled_amount
    } else {
        Decimal::ZERO
    };

    ExecutionPriceResult {
        price,
        filled_amount,
        fully_filled: remaining <= Decimal::ZERO,
    }
}

fn sorted_levels(book: &OrderBook, side: Side) -> Vec<&OrderLevel> {
    let source = match side {
        Side::Buy => &book.asks,
        Side::Sell => &book.bids,
    };

    let mut levels: Vec<&OrderLevel> = source
        .iter()
        .filter(|level| level.size > Decimal::ZERO)
        .collect();

    match side {
        Side::Buy => levels.sort_by(|a, b| a.price.cmp(&b.price)),
        Side::Sell => levels.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    levels
}

impl OrderBook {
    pub fn execution_price(&self, side: Side, amount: Decimal) -> Decimal {
        get_execution_price(self, side, amount)
    }

    pub fn execution_price_detailed(&self, side: Side, amount: Decimal) -> ExecutionPriceResult {
        get_execution_price_detailed(self, side, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn book(bids: &[(Decimal, Decimal)], asks: &[(Decimal, Decimal)]) -> OrderBook {
        OrderBook {
            bids: bids.iter().map(|&(p, s)| OrderLevel::new(p, s)).collect(),
            asks: asks.iter().map(|&(p, s)| OrderLevel::new(p, s)).collect(),
            timestamp: Some(1_700_000_000_000),
        }
    }

    fn two_level_asks() -> OrderBook {
        book(&[], &[(dec!(0.40), dec!(10)), (dec!(0.45), dec!(20))])
    }

    #[test]
    fn buy_walks_asks_into_second_level() {
        let result = get_execution_price_detailed(&two_level_asks(), Side::Buy, dec!(15));

        assert_eq!(result.filled_amount, dec!(15));
        assert!(result.fully_filled);
        assert_eq!(result.price.round_dp(6), dec!(0.416667));
    }

    #[test]
    fn insufficient_liquidity_reports_partial_fill() {
        let book = two_level_asks();

        let result = get_execution_price_detailed(&book, Side::Buy, dec!(50));
        assert_eq!(result.filled_amount, dec!(30));
        assert!(!result.fully_filled);
        assert_eq!(result.price.round_dp(6), dec!(0.433333));

        assert_eq!(get_execution_price(&book, Side::Buy, dec!(50)), Decimal::ZERO);
    }

    #[test]
    fn empty_side_yields_nothing() {
        let result = get_execution_price_detailed(&OrderBook::default(), Side::Buy, dec!(5));

        assert_eq!(
            result,
            ExecutionPriceResult {
                price: Decimal::ZERO,
                filled_amount: Decimal::ZERO,
                fully_filled: false,
            }
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-3))]
    fn non_positive_amount_is_vacuously_filled(#[case] amount: Decimal) {
        let result = get_execution_price_detailed(&two_level_asks(), Side::Buy, amount);

        assert_eq!(result.filled_amount, Decimal::ZERO);
        assert_eq!(result.price, Decimal::ZERO);
        assert!(result.fully_filled);
    }

    #[test]
    fn sell_sorts_bids_best_first() {
        let book = book(
            &[(dec!(0.73), dec!(100)), (dec!(0.75), dec!(100)), (dec!(0.74), dec!(100))],
            &[],
        );

        let price = get_execution_price(&book, Side::Sell, dec!(200));

        assert_eq!(price, dec!(0.745));
    }

    #[test]
    fn buy_sorts_asks_and_skips_empty_levels() {
        let book = book(
            &[],
            &[(dec!(0.78), dec!(100)), (dec!(0.70), dec!(0)), (dec!(0.76), dec!(100))],
        );

        let result = book.execution_price_detailed(Side::Buy, dec!(150));

        assert!(result.fully_filled);
        assert_eq!(result.price.round_dp(6), dec!(0.766667));
    }

    #[test]
    fn exact_fill_consumes_whole_side() {
        let result = two_level_asks().execution_price_detailed(Side::Buy, dec!(30));

        assert!(result.fully_filled);
        assert_eq!(result.filled_amount, dec!(30));
    }

    #[test]
    fn estimate_leaves_book_untouched() {
        let original = book(
            &[(dec!(0.30), dec!(5)), (dec!(0.35), dec!(5))],
            &[(dec!(0.50), dec!(5)), (dec!(0.45), dec!(5))],
        );
        let snapshot = original.clone();

        let _ = original.execution_price_detailed(Side::Buy, dec!(7));
        let _ = original.execution_price_detailed(Side::Sell, dec!(7));

        assert_eq!(original, snapshot);
    }
}
