//! # Coupon Validator
//!
//! Determines whether a coupon is currently usable and computes its
//! discount for a given order amount.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_coupon(coupon, order_amount, today)                           │
//! │                                                                         │
//! │  1. status == Active?          ── no ──► Inactive                       │
//! │  2. today >= start_date?       ── no ──► NotYetStarted                  │
//! │  3. today <= end_date?         ── no ──► Expired                        │
//! │  4. used_count < usage_limit?  ── no ──► UsageExhausted                 │
//! │  5. amount >= min_purchase?    ── no ──► BelowMinimumPurchase           │
//! │                                                                         │
//! │  All pass ──► compute discount:                                         │
//! │    Percentage: amount * bps / 10000 (half-up), clamped to max_discount  │
//! │    Fixed:      discount_value, clamped to the order amount              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing check wins, so callers always get one deterministic
//! reason. Validation is PURE: the usage-count increment happens only in
//! the order service, after the order is durably recorded, so a coupon
//! is never charged a use for an order that failed to persist.

use chrono::NaiveDate;

use crate::error::CouponRejection;
use crate::money::Money;
use crate::types::{Coupon, CouponStatus, DiscountKind};

/// Validates coupon eligibility and computes the discount for the given
/// order amount.
///
/// `today` is the injected reference date; nothing here reads the wall
/// clock.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use mercato_core::coupon::validate_coupon;
/// use mercato_core::error::CouponRejection;
/// use mercato_core::money::Money;
/// use mercato_core::types::{Coupon, CouponStatus, DiscountKind};
/// use chrono::Utc;
///
/// let coupon = Coupon {
///     id: "c-1".into(),
///     code: "TENOFF".into(),
///     kind: DiscountKind::Percentage,
///     discount_value: 1000, // 10%
///     min_purchase_cents: 0,
///     max_discount_cents: Some(200), // cap at $2.00
///     usage_limit: None,
///     used_count: 0,
///     start_date: None,
///     end_date: None,
///     status: CouponStatus::Active,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
///
/// let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
/// let discount = validate_coupon(&coupon, Money::from_cents(2500), today).unwrap();
/// // 10% of $25.00 is $2.50, clamped to the $2.00 cap
/// assert_eq!(discount.cents(), 200);
/// ```
pub fn validate_coupon(
    coupon: &Coupon,
    order_amount: Money,
    today: NaiveDate,
) -> Result<Money, CouponRejection> {
    if coupon.status != CouponStatus::Active {
        return Err(CouponRejection::Inactive);
    }

    if let Some(start) = coupon.start_date {
        if today < start {
            return Err(CouponRejection::NotYetStarted);
        }
    }

    if let Some(end) = coupon.end_date {
        if today > end {
            return Err(CouponRejection::Expired);
        }
    }

    if !coupon.has_uses_left() {
        return Err(CouponRejection::UsageExhausted);
    }

    if order_amount < coupon.min_purchase() {
        return Err(CouponRejection::BelowMinimumPurchase {
            amount: order_amount,
            min_purchase: coupon.min_purchase(),
        });
    }

    Ok(compute_discount(coupon, order_amount))
}

/// Computes the discount for an eligible coupon.
///
/// Both branches clamp so the discount can never exceed the order
/// amount, which in turn guarantees a non-negative final total.
fn compute_discount(coupon: &Coupon, order_amount: Money) -> Money {
    match coupon.kind {
        DiscountKind::Percentage => {
            let raw = order_amount.percentage_of(coupon.discount_value);
            match coupon.max_discount_cents {
                Some(cap) => raw.min(Money::from_cents(cap)),
                None => raw,
            }
        }
        DiscountKind::Fixed => Money::from_cents(coupon.discount_value).min(order_amount),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_coupon() -> Coupon {
        Coupon {
            id: "c-1".to_string(),
            code: "SAVE10".to_string(),
            kind: DiscountKind::Percentage,
            discount_value: 1000, // 10%
            min_purchase_cents: 0,
            max_discount_cents: None,
            usage_limit: None,
            used_count: 0,
            start_date: None,
            end_date: None,
            status: CouponStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inactive_coupon_rejected() {
        let mut coupon = active_coupon();
        coupon.status = CouponStatus::Inactive;
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::Inactive));

        coupon.status = CouponStatus::Expired;
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::Inactive));
    }

    #[test]
    fn test_not_yet_started() {
        let mut coupon = active_coupon();
        coupon.start_date = Some(day(2026, 9, 1));
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::NotYetStarted));

        // Start date itself is valid
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 9, 1));
        assert!(result.is_ok());
    }

    #[test]
    fn test_expired_by_end_date() {
        let mut coupon = active_coupon();
        coupon.end_date = Some(day(2026, 8, 29));
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::Expired));

        // End date itself is still valid (inclusive bound)
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 29));
        assert!(result.is_ok());
    }

    #[test]
    fn test_usage_exhausted() {
        let mut coupon = active_coupon();
        coupon.usage_limit = Some(3);
        coupon.used_count = 3;
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::UsageExhausted));

        coupon.used_count = 2;
        assert!(validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30)).is_ok());
    }

    #[test]
    fn test_below_minimum_purchase() {
        let mut coupon = active_coupon();
        coupon.min_purchase_cents = 3000;
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(
            result,
            Err(CouponRejection::BelowMinimumPurchase {
                amount: Money::from_cents(2500),
                min_purchase: Money::from_cents(3000),
            })
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // Inactive AND expired AND below minimum: Inactive is reported
        // because status is checked first.
        let mut coupon = active_coupon();
        coupon.status = CouponStatus::Inactive;
        coupon.end_date = Some(day(2026, 1, 1));
        coupon.min_purchase_cents = 100_000;
        let result = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(result, Err(CouponRejection::Inactive));
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = active_coupon();
        let discount = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(discount, Ok(Money::from_cents(250))); // 10% of $25.00
    }

    #[test]
    fn test_percentage_discount_clamped_to_cap() {
        let mut coupon = active_coupon();
        coupon.max_discount_cents = Some(200);
        // Raw 10% of $25.00 = $2.50, clamped to $2.00
        let discount = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(discount, Ok(Money::from_cents(200)));

        // Under the cap, the raw value survives
        let discount = validate_coupon(&coupon, Money::from_cents(1500), day(2026, 8, 30));
        assert_eq!(discount, Ok(Money::from_cents(150)));
    }

    #[test]
    fn test_fixed_discount_clamped_to_order_amount() {
        let mut coupon = active_coupon();
        coupon.kind = DiscountKind::Fixed;
        coupon.discount_value = 5000; // $50.00 off a $25.00 order
        let discount = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(discount, Ok(Money::from_cents(2500)));

        coupon.discount_value = 500;
        let discount = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(discount, Ok(Money::from_cents(500)));
    }

    #[test]
    fn test_validation_is_pure() {
        let coupon = active_coupon();
        let before = coupon.used_count;
        let _ = validate_coupon(&coupon, Money::from_cents(2500), day(2026, 8, 30));
        assert_eq!(coupon.used_count, before);
    }
}
