// Instrument defaults applied when the config file does not override them.
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_INSTRUMENT_ID: u64 = 4012;
pub const DEFAULT_TICK_SIZE: Decimal = dec!(0.00001);
pub const DEFAULT_ORDER_QUANTITY: Decimal = dec!(1);
