//! # Domain Types
//!
//! Core domain types for Mercato's order and coupon subsystem.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Coupon      │   │      Order      │   │    OrderItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (business)  │   │  id (UUID)      │       │
//! │  │  code (unique)  │   │  subtotal_cents │   │  order_id (FK)  │       │
//! │  │  kind + value   │   │  discount_cents │   │  *_snapshot     │       │
//! │  │  validity       │   │  total_cents    │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountKind   │   │   OrderStatus   │   │  PaymentStatus  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Percentage     │   │  Pending        │   │  Pending        │       │
//! │  │  Fixed          │   │  Processing...  │   │  Paid, Refunded │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - Coupons: `id` (UUID, database relations) + `code` (business key,
//!   what customers type, case-sensitive, immutable)
//! - Orders: the business identifier IS the primary key
//!   (`ORD-YYMMDDNNNNN`, see [`crate::order_id`])

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Discount Kind
// =============================================================================

/// How a coupon's discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Rate of the order subtotal, stored in basis points (0-10000).
    /// Optionally capped by `max_discount_cents`.
    Percentage,
    /// Flat amount in cents, clamped at the order subtotal.
    Fixed,
}

// =============================================================================
// Coupon Status
// =============================================================================

/// Administrative status of a coupon.
///
/// `Expired` is an administrative flag; a coupon past its `end_date` is
/// rejected by the validator even while the flag still says `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Inactive,
    Expired,
}

// =============================================================================
// Coupon
// =============================================================================

/// A promotional code bounded by a validity window, usage limit, and
/// discount rule.
///
/// ## Mutation Rules
/// Created and edited by administrative tooling (out of scope here);
/// the core mutates it only via the usage-count increment inside the
/// order-creation transaction. `used_count` is monotonically increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Coupon {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Promotional code customers enter. Unique, case-sensitive,
    /// immutable after creation.
    pub code: String,

    /// Discount kind: percentage of subtotal or fixed amount.
    pub kind: DiscountKind,

    /// Discount value. Interpretation depends on `kind`:
    /// - Percentage: basis points (1000 = 10.00%), range 0-10000
    /// - Fixed: cents (>= 0)
    pub discount_value: i64,

    /// Minimum order subtotal required to use the coupon (cents).
    pub min_purchase_cents: i64,

    /// Upper bound on the computed discount (cents).
    /// Only meaningful for percentage coupons.
    pub max_discount_cents: Option<i64>,

    /// Maximum number of times this coupon may be applied.
    /// Unlimited when absent.
    pub usage_limit: Option<i64>,

    /// How many times this coupon has been applied so far.
    pub used_count: i64,

    /// First day (inclusive) the coupon is valid. Open when absent.
    pub start_date: Option<NaiveDate>,

    /// Last day (inclusive) the coupon is valid. Open when absent.
    pub end_date: Option<NaiveDate>,

    /// Administrative status.
    pub status: CouponStatus,

    /// When the coupon was created.
    pub created_at: DateTime<Utc>,

    /// When the coupon was last updated (including usage increments).
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Returns the minimum purchase as a Money type.
    #[inline]
    pub fn min_purchase(&self) -> Money {
        Money::from_cents(self.min_purchase_cents)
    }

    /// Checks whether the usage cap still has room.
    ///
    /// Pre-check only: the authoritative enforcement is the guarded
    /// increment inside the order-creation transaction.
    pub fn has_uses_left(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.used_count < limit,
            None => true,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfillment status of an order.
///
/// Allowed transitions are defined in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of an order. Transitions independently of the
/// fulfillment status (see [`crate::lifecycle`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A priced, recorded order.
///
/// Owned together with its [`OrderItem`]s as one aggregate: items are
/// written and deleted with their parent and have no life of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Business identifier, `ORD-YYMMDDNNNNN`. Immutable.
    pub id: String,

    /// Code of the coupon applied to this order, if any.
    pub coupon_code: Option<String>,

    /// Sum of item line totals (cents).
    pub subtotal_cents: i64,

    /// Discount applied (cents). Never exceeds the subtotal.
    pub discount_cents: i64,

    /// Final payable amount (cents). `subtotal - discount`, always >= 0.
    pub total_cents: i64,

    /// Fulfillment status.
    pub status: OrderStatus,

    /// Payment status.
    pub payment_status: PaymentStatus,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the final payable amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze product data at order time,
/// since catalog prices may change after the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    /// Product reference by identifier, never a live object reference.
    pub product_id: String,
    /// SKU at order time (frozen).
    pub sku_snapshot: String,
    /// Product name at order time (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered (positive).
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_display_matches_storage_form() {
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(PaymentStatus::Refunded.to_string(), "refunded");
    }

    #[test]
    fn test_coupon_has_uses_left() {
        let mut coupon = sample_coupon();
        assert!(coupon.has_uses_left()); // unlimited

        coupon.usage_limit = Some(2);
        coupon.used_count = 1;
        assert!(coupon.has_uses_left());

        coupon.used_count = 2;
        assert!(!coupon.has_uses_left());
    }

    fn sample_coupon() -> Coupon {
        Coupon {
            id: "c-1".to_string(),
            code: "SAVE10".to_string(),
            kind: DiscountKind::Percentage,
            discount_value: 1000,
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
}
