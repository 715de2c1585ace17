use crate::data::{Error, SIGNIFICANT_DIGITS};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

/// Dates move by at most this many days, either way.
pub const DATE_JITTER_DAYS: i64 = 30;

/// Amounts move by less than 5.0 either way. The offset is drawn as a whole number of
/// ten-thousandths so it stays exact once added to a `Decimal`.
const AMOUNT_JITTER_TICKS: i64 = 5 * 10_i64.pow(SIGNIFICANT_DIGITS);

/// Shift `date` by a uniform number of days in `[-30, 30]`.
pub(crate) fn perturb_date<R: Rng + ?Sized>(
    rng: &mut R,
    date: NaiveDate,
) -> Result<NaiveDate, Error> {
    let offset = rng.random_range(-DATE_JITTER_DAYS..=DATE_JITTER_DAYS);
    date.checked_add_signed(Duration::days(offset)).ok_or(Error::DateOutOfRange(date))
}

/// Add a uniform offset in `[-5.0, 5.0)` to `amount`.
pub(crate) fn perturb_amount<R: Rng + ?Sized>(
    rng: &mut R,
    amount: Decimal,
) -> Result<Decimal, Error> {
    let ticks = rng.random_range(-AMOUNT_JITTER_TICKS..AMOUNT_JITTER_TICKS);
    amount
        .checked_add(Decimal::new(ticks, SIGNIFICANT_DIGITS))
        .ok_or(Error::AmountOutOfRange(amount))
}
