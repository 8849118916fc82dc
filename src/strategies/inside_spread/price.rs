use rust_decimal::Decimal;

use crate::domain::enums::Side;

/// Price one tick inside the spread for the given side of the book.
///
/// The tick size is supplied as a positive magnitude; the side determines
/// the direction it is applied in.
pub fn quote_price(best_price: Decimal, side: Side, tick_size: Decimal) -> Decimal {
    match side {
        Side::Buy => best_price + tick_size,
        Side::Sell => best_price - tick_size,
    }
}
