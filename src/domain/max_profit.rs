//! Profit window engine: best buy/sell pair over an ordered quote series.

use crate::domain::error::StockProfitError;
use crate::domain::quote::{MaxProfitPoints, StockQuote, TradePoint};

/// Compute the buy/sell pair with maximum margin in a single left-to-right
/// scan. O(n) time, O(1) extra space.
///
/// `history` must be ascending by datepoint; callers guarantee the order and
/// the engine does not re-verify it.
///
/// The comparisons are deliberately strict: a new running low is taken only
/// on `margin < 0`, and the best pair is replaced only on `margin > max`.
/// Among equal-margin candidates the earliest pair found therefore wins, and
/// a run of equal lows keeps its first occurrence as the buy candidate.
pub fn max_profit_for_period(
    history: &[StockQuote],
) -> Result<MaxProfitPoints, StockProfitError> {
    let Some(first) = history.first() else {
        return Err(StockProfitError::NoQuotes);
    };

    let mut max_margin = 0.0_f64;
    let mut lowest_price = first.price;

    let mut curr_low_idx = 0;
    let mut low_idx = 0;
    let mut high_idx = 0;

    for (i, quote) in history.iter().enumerate().skip(1) {
        let margin = quote.price - lowest_price;
        if margin < 0.0 {
            lowest_price = quote.price;
            curr_low_idx = i;
        } else if margin > max_margin {
            max_margin = margin;
            low_idx = curr_low_idx;
            high_idx = i;
        }
    }

    // A flat or non-increasing series never moves max_margin off zero.
    if max_margin == 0.0 {
        return Err(StockProfitError::NoProfit);
    }

    Ok(MaxProfitPoints {
        buy_point: TradePoint {
            price: history[low_idx].price,
            date: history[low_idx].datepoint,
        },
        sell_point: TradePoint {
            price: history[high_idx].price,
            date: history[high_idx].datepoint,
        },
    })
}
