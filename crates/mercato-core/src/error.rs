//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercato-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── CouponRejection  - Why a coupon cannot be applied                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mercato-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - CoreError | DbError at the service seam        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Serving layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, amounts, states)
//! 3. Errors are enum variants, never String
//! 4. Every coupon rejection keeps its specific reason; nothing is
//!    collapsed into a generic "invalid coupon"

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Coupon Rejection
// =============================================================================

/// Why a coupon cannot be applied to an order.
///
/// Surfaced verbatim to the caller; the specific reason is part of the
/// contract so UIs can tell a customer *why* their code did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// Coupon status is inactive or administratively expired.
    #[error("coupon is not active")]
    Inactive,

    /// Today is before the coupon's start date.
    #[error("coupon is not valid yet")]
    NotYetStarted,

    /// Today is after the coupon's end date.
    #[error("coupon has expired")]
    Expired,

    /// The usage limit has been reached.
    #[error("coupon usage limit reached")]
    UsageExhausted,

    /// The order subtotal is below the coupon's minimum purchase.
    #[error("order amount {amount} is below the minimum purchase {min_purchase}")]
    BelowMinimumPurchase { amount: Money, min_purchase: Money },

    /// No coupon exists with the given code.
    /// Produced by the service layer during code resolution; the pure
    /// validator always receives a resolved coupon.
    #[error("coupon not found: {code}")]
    NotFound { code: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet structural requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format or inconsistent combination of fields.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations or domain logic failures.
/// They should be caught and translated to user-facing messages by the
/// serving layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An order must contain at least one line item.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A line item failed structural checks (quantity, unit price).
    #[error("invalid line item for product {product_id}: {reason}")]
    InvalidItem { product_id: String, reason: String },

    /// A coupon could not be applied. Carries the specific reason.
    #[error(transparent)]
    Coupon(#[from] CouponRejection),

    /// A status change was requested that the state machine forbids.
    /// State is left unchanged.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// The 5-digit daily sequence space for order identifiers ran out.
    #[error("order id space exhausted for {day}")]
    IdSpaceExhausted { day: NaiveDate },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let err = CouponRejection::BelowMinimumPurchase {
            amount: Money::from_cents(2500),
            min_purchase: Money::from_cents(3000),
        };
        assert_eq!(
            err.to_string(),
            "order amount $25.00 is below the minimum purchase $30.00"
        );

        let err = CouponRejection::NotFound {
            code: "WELCOME5".to_string(),
        };
        assert_eq!(err.to_string(), "coupon not found: WELCOME5");
    }

    #[test]
    fn test_rejection_converts_to_core_error() {
        let core_err: CoreError = CouponRejection::Expired.into();
        assert!(matches!(core_err, CoreError::Coupon(CouponRejection::Expired)));
        // transparent: the message passes through unchanged
        assert_eq!(core_err.to_string(), "coupon has expired");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "code must be at most 50 characters");
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidTransition {
            from: "shipped".to_string(),
            to: "cancelled".to_string(),
        };
        assert_eq!(err.to_string(), "invalid transition: shipped -> cancelled");
    }
}
