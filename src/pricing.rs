//! Rental pricing calculator
//!
//! Computes the total cost of a rental over an inclusive date range, picking
//! the best applicable rate tier (monthly, then weekly, then daily) and adding
//! the delivery fee when requested. All arithmetic is exact decimal; a rental
//! is never silently priced at zero.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::equipment::Equipment;

/// Rate table for a piece of equipment. Weekly/monthly tiers are optional;
/// the daily rate is mandatory for pricing.
#[derive(Debug, Clone, Copy)]
pub struct RateTable {
    pub daily: Option<Decimal>,
    pub weekly: Option<Decimal>,
    pub monthly: Option<Decimal>,
}

impl From<&Equipment> for RateTable {
    fn from(equipment: &Equipment) -> Self {
        Self {
            daily: equipment.daily_rate,
            weekly: equipment.weekly_rate,
            monthly: equipment.monthly_rate,
        }
    }
}

/// Number of billable days in an inclusive [start, end] range
pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<i64> {
    if start_date > end_date {
        return Err(AppError::Validation(
            "Start date must not be after end date".to_string(),
        ));
    }
    Ok((end_date - start_date).num_days() + 1)
}

/// Compute the total rental amount for a date range.
///
/// Tier selection: 30+ days use the monthly rate for each whole 30-day block
/// with the remainder billed daily; 7+ days use the weekly rate the same way;
/// shorter rentals are billed daily. A missing tier falls through to the next
/// one. A missing daily rate is a configuration error.
pub fn compute_total(
    start_date: NaiveDate,
    end_date: NaiveDate,
    rates: &RateTable,
    requires_delivery: bool,
    delivery_fee: Option<Decimal>,
) -> AppResult<Decimal> {
    let days = rental_days(start_date, end_date)?;

    let daily = rates.daily.ok_or_else(|| {
        AppError::Validation("Equipment has no daily rate configured".to_string())
    })?;

    let mut amount = match (days, rates.monthly, rates.weekly) {
        (d, Some(monthly), _) if d >= 30 => {
            let months = Decimal::from(d / 30);
            let remainder = Decimal::from(d % 30);
            monthly * months + daily * remainder
        }
        (d, _, Some(weekly)) if d >= 7 => {
            let weeks = Decimal::from(d / 7);
            let remainder = Decimal::from(d % 7);
            weekly * weeks + daily * remainder
        }
        (d, _, _) => daily * Decimal::from(d),
    };

    if requires_delivery {
        if let Some(fee) = delivery_fee {
            amount += fee;
        }
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rates(daily: Decimal, weekly: Option<Decimal>, monthly: Option<Decimal>) -> RateTable {
        RateTable {
            daily: Some(daily),
            weekly,
            monthly,
        }
    }

    #[test]
    fn day_count_is_inclusive_on_both_ends() {
        assert_eq!(rental_days(date(2024, 1, 1), date(2024, 1, 1)).unwrap(), 1);
        assert_eq!(rental_days(date(2024, 1, 1), date(2024, 1, 5)).unwrap(), 5);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(rental_days(date(2024, 1, 5), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn ten_days_daily_only() {
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 1, 10),
            &rates(dec!(100), None, None),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(1000));
    }

    #[test]
    fn ten_days_uses_weekly_tier_plus_daily_remainder() {
        // 1 week at 600 + 3 days at 100
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 1, 10),
            &rates(dec!(100), Some(dec!(600)), None),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(900));
    }

    #[test]
    fn thirty_five_days_uses_monthly_tier_plus_daily_remainder() {
        // 1 month at 2500 + 5 days at 100
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 2, 4),
            &rates(dec!(100), Some(dec!(600)), Some(dec!(2500))),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(3000));
    }

    #[test]
    fn long_rental_without_monthly_tier_falls_back_to_weekly() {
        // 35 days = 5 weeks exactly
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 2, 4),
            &rates(dec!(100), Some(dec!(600)), None),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(3000));
    }

    #[test]
    fn five_inclusive_days_at_500() {
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 1, 5),
            &rates(dec!(500), None, None),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(2500));
    }

    #[test]
    fn delivery_fee_is_added_only_when_requested() {
        let r = rates(dec!(100), None, None);
        let with_delivery =
            compute_total(date(2024, 1, 1), date(2024, 1, 2), &r, true, Some(dec!(50))).unwrap();
        assert_eq!(with_delivery, dec!(250));

        let without =
            compute_total(date(2024, 1, 1), date(2024, 1, 2), &r, false, Some(dec!(50))).unwrap();
        assert_eq!(without, dec!(200));

        let requested_but_unset =
            compute_total(date(2024, 1, 1), date(2024, 1, 2), &r, true, None).unwrap();
        assert_eq!(requested_but_unset, dec!(200));
    }

    #[test]
    fn missing_daily_rate_is_a_configuration_error() {
        let r = RateTable {
            daily: None,
            weekly: Some(dec!(600)),
            monthly: None,
        };
        let err = compute_total(date(2024, 1, 1), date(2024, 1, 10), &r, false, None);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn decimal_rates_do_not_drift() {
        let total = compute_total(
            date(2024, 1, 1),
            date(2024, 1, 3),
            &rates(dec!(99.99), None, None),
            false,
            None,
        )
        .unwrap();
        assert_eq!(total, dec!(299.97));
    }
}
