//! # Validation Module
//!
//! Input validation for orders and coupons.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Serving layer (out of scope)                                 │
//! │  ├── Basic format checks, deserialization                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - structural business rules                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (coupon code)                                  │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Coupon, DiscountKind};
use crate::{MAX_COUPON_CODE_LEN, MAX_ITEM_QUANTITY, MAX_PERCENTAGE_BPS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
/// - Case-sensitive: no normalization happens here or anywhere else
///
/// ## Example
/// ```rust
/// use mercato_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("SAVE10").is_ok());
/// assert!(validate_coupon_code("summer-2026").is_ok());
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("has space").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Coupon Validators
// =============================================================================

/// Validates a coupon definition before it is stored.
///
/// ## Rules
/// - Code passes [`validate_coupon_code`] (uniqueness is enforced by
///   the store's UNIQUE constraint, not here)
/// - Percentage value within 0-10000 basis points (0-100%)
/// - Fixed value non-negative
/// - Minimum purchase non-negative
/// - Maximum discount only on percentage coupons, and positive
/// - Usage limit positive when present
/// - `start_date <= end_date` when both are present
pub fn validate_new_coupon(coupon: &Coupon) -> ValidationResult<()> {
    validate_coupon_code(&coupon.code)?;

    match coupon.kind {
        DiscountKind::Percentage => {
            if !(0..=MAX_PERCENTAGE_BPS).contains(&coupon.discount_value) {
                return Err(ValidationError::OutOfRange {
                    field: "discount_value".to_string(),
                    min: 0,
                    max: MAX_PERCENTAGE_BPS,
                });
            }
            if let Some(cap) = coupon.max_discount_cents {
                if cap <= 0 {
                    return Err(ValidationError::MustBePositive {
                        field: "max_discount".to_string(),
                    });
                }
            }
        }
        DiscountKind::Fixed => {
            if coupon.discount_value < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "discount_value".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
            if coupon.max_discount_cents.is_some() {
                return Err(ValidationError::InvalidFormat {
                    field: "max_discount".to_string(),
                    reason: "applies only to percentage coupons".to_string(),
                });
            }
        }
    }

    if coupon.min_purchase_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "min_purchase".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if let Some(limit) = coupon.usage_limit {
        if limit <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "usage_limit".to_string(),
            });
        }
    }

    if let (Some(start), Some(end)) = (coupon.start_date, coupon.end_date) {
        if start > end {
            return Err(ValidationError::InvalidFormat {
                field: "validity window".to_string(),
                reason: "start_date is after end_date".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CouponStatus;
    use chrono::{NaiveDate, Utc};

    fn coupon(kind: DiscountKind, value: i64) -> Coupon {
        Coupon {
            id: "c-1".to_string(),
            code: "SAVE10".to_string(),
            kind,
            discount_value: value,
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
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("SAVE10").is_ok());
        assert!(validate_coupon_code("summer_sale-26").is_ok());

        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("   ").is_err());
        assert!(validate_coupon_code("has space").is_err());
        assert!(validate_coupon_code(&"A".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price_cents() {
        assert!(validate_unit_price_cents(0).is_ok());
        assert!(validate_unit_price_cents(1099).is_ok());
        assert!(validate_unit_price_cents(-100).is_err());
    }

    #[test]
    fn test_percentage_value_range() {
        assert!(validate_new_coupon(&coupon(DiscountKind::Percentage, 0)).is_ok());
        assert!(validate_new_coupon(&coupon(DiscountKind::Percentage, 10_000)).is_ok());
        assert!(validate_new_coupon(&coupon(DiscountKind::Percentage, 10_001)).is_err());
        assert!(validate_new_coupon(&coupon(DiscountKind::Percentage, -1)).is_err());
    }

    #[test]
    fn test_fixed_value_range() {
        assert!(validate_new_coupon(&coupon(DiscountKind::Fixed, 0)).is_ok());
        assert!(validate_new_coupon(&coupon(DiscountKind::Fixed, 500)).is_ok());
        assert!(validate_new_coupon(&coupon(DiscountKind::Fixed, -500)).is_err());
    }

    #[test]
    fn test_max_discount_only_for_percentage() {
        let mut c = coupon(DiscountKind::Fixed, 500);
        c.max_discount_cents = Some(200);
        assert!(validate_new_coupon(&c).is_err());

        let mut c = coupon(DiscountKind::Percentage, 1000);
        c.max_discount_cents = Some(200);
        assert!(validate_new_coupon(&c).is_ok());

        c.max_discount_cents = Some(0);
        assert!(validate_new_coupon(&c).is_err());
    }

    #[test]
    fn test_usage_limit_must_be_positive() {
        let mut c = coupon(DiscountKind::Percentage, 1000);
        c.usage_limit = Some(0);
        assert!(validate_new_coupon(&c).is_err());

        c.usage_limit = Some(100);
        assert!(validate_new_coupon(&c).is_ok());
    }

    #[test]
    fn test_date_window_order() {
        let mut c = coupon(DiscountKind::Percentage, 1000);
        c.start_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        c.end_date = NaiveDate::from_ymd_opt(2026, 8, 1);
        assert!(validate_new_coupon(&c).is_err());

        c.end_date = NaiveDate::from_ymd_opt(2026, 9, 30);
        assert!(validate_new_coupon(&c).is_ok());
    }
}
