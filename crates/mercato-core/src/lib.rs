//! # mercato-core: Pure Business Logic for Mercato
//!
//! This crate is the **heart** of Mercato's order and coupon pricing.
//! It contains all business rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                External Serving Layer (not here)                │   │
//! │  │        HTTP routing, JSON shapes, auth, product CRUD            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercato-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  coupon   │  │  pricing  │  │ lifecycle │  │   │
//! │  │   │   Money   │  │ validate  │  │ subtotal  │  │  status   │  │   │
//! │  │   │ cents i64 │  │ discount  │  │ discount  │  │  edges    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO AMBIENT CLOCK • PURE FUNCTIONS     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  mercato-db (Database Layer)                    │   │
//! │  │        SQLite repositories, transactions, order service         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Coupon, Order, OrderItem, status enums)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`coupon`] - Coupon eligibility checks and discount math
//! - [`pricing`] - Line item summation and total derivation
//! - [`order_id`] - Sortable, collision-free order identifiers
//! - [`lifecycle`] - Order/payment status state machines
//! - [`clock`] - Injected clock so "now" is always an argument
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod coupon;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod order_id;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercato_core::Money` instead of
// `use mercato_core::money::Money`

pub use clock::{Clock, FixedClock, SystemClock};
pub use coupon::validate_coupon;
pub use error::{CoreError, CoreResult, CouponRejection, ValidationError};
pub use money::Money;
pub use order_id::OrderIdGenerator;
pub use pricing::{price_order, LineItem, PricedOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway requests and ensures reasonable transaction sizes.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum coupon code length (matches the storage column width).
pub const MAX_COUPON_CODE_LEN: usize = 50;

/// Maximum percentage discount in basis points (10000 bps = 100%).
pub const MAX_PERCENTAGE_BPS: i64 = 10_000;
