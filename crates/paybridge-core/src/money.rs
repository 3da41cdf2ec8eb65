//! Conversion of decimal prices into currency minor units.
//!
//! Prices arrive as JSON numbers (`f64`). Multiplying the binary value by 100
//! directly gives surprises such as `19.995 * 100 == 1999.4999999999998`, so
//! the conversion works on the shortest decimal representation of the float
//! instead and rounds half-up at the hundredths place:
//!
//! | price    | minor units |
//! |----------|-------------|
//! | `19.995` | `2000`      |
//! | `1.005`  | `101`       |
//! | `0.125`  | `13`        |
//! | `10.5`   | `1050`      |

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::{Error, Result};

/// Convert a price to minor units using round-half-up.
///
/// `field` names the value in the error returned for negative, non-finite
/// or unrepresentable prices.
pub fn to_minor_units(price: f64, field: &str) -> Result<i64> {
    if !price.is_finite() {
        return Err(Error::invalid_request(field, "must be a finite number"));
    }
    if price < 0.0 {
        return Err(Error::invalid_request(field, "must not be negative"));
    }

    let out_of_range = || Error::invalid_request(field, "is out of range");

    // `Display` for f64 never uses exponent notation and yields the shortest
    // string that round-trips.
    let decimal = Decimal::from_str(&price.to_string()).map_err(|_| out_of_range())?;

    decimal
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(out_of_range)
}
