//! # Order Pricing Engine
//!
//! Aggregates line items into totals, applies a validated discount, and
//! derives the final payable amount.
//!
//! ## Flow
//! ```text
//! items ──► structural checks ──► subtotal = Σ line totals
//!                                      │
//!              coupon? ──► validate ──► discount (or rejection)
//!                                      │
//!                                      ▼
//!                         total = subtotal - discount  (always >= 0)
//! ```
//!
//! The engine does not decide currency conversion or tax; all arithmetic
//! is single-currency [`Money`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coupon::validate_coupon;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Coupon;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

// =============================================================================
// Line Item
// =============================================================================

/// An incoming line item: a product snapshot plus a quantity.
///
/// The snapshot fields (`sku`, `name`, `unit_price_cents`) are captured
/// by the caller at order time; catalog changes after this point do not
/// affect the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Priced Order
// =============================================================================

/// The result of pricing: totals ready to be recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedOrder {
    /// Sum of item line totals.
    pub subtotal: Money,
    /// Discount granted by the coupon (zero when none applied).
    pub discount: Money,
    /// Final payable amount. `subtotal - discount`, never negative.
    pub total: Money,
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices an order from its line items and an optional resolved coupon.
///
/// ## Checks (in order)
/// 1. Non-empty item list, at most [`MAX_ORDER_ITEMS`] entries
/// 2. Per item: positive quantity (capped at [`MAX_ITEM_QUANTITY`]),
///    non-negative unit price
/// 3. Coupon eligibility via [`validate_coupon`], when one is supplied
///
/// The returned `total` is guaranteed non-negative because both
/// discount branches clamp in the validator.
pub fn price_order(
    items: &[LineItem],
    coupon: Option<&Coupon>,
    today: NaiveDate,
) -> CoreResult<PricedOrder> {
    if items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    if items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        }
        .into());
    }

    let mut subtotal = Money::zero();
    for item in items {
        if item.quantity <= 0 {
            return Err(CoreError::InvalidItem {
                product_id: item.product_id.clone(),
                reason: "quantity must be positive".to_string(),
            });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::InvalidItem {
                product_id: item.product_id.clone(),
                reason: format!("quantity exceeds maximum of {}", MAX_ITEM_QUANTITY),
            });
        }
        if item.unit_price_cents < 0 {
            return Err(CoreError::InvalidItem {
                product_id: item.product_id.clone(),
                reason: "unit price cannot be negative".to_string(),
            });
        }
        subtotal += item.line_total();
    }

    let discount = match coupon {
        Some(c) => validate_coupon(c, subtotal, today)?,
        None => Money::zero(),
    };

    Ok(PricedOrder {
        subtotal,
        discount,
        total: subtotal - discount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
