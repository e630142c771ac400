//! # Order Service
//!
//! Composes the pure pricing core with storage: one call prices the
//! items, resolves and redeems the coupon, mints the identifier, and
//! records the order atomically.
//!
//! ## Order Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_order(request)                                │
//! │                                                                         │
//! │  1. price_order(items, None)        ← structural checks + subtotal     │
//! │  2. BEGIN                                                               │
//! │  3.   resolve coupon by code        ← NotFound / validate_coupon       │
//! │  4.   claim coupon use              ← guarded UPDATE, 0 rows = fail    │
//! │  5.   mint ORD-YYMMDDNNNNN          ← per-day counter                  │
//! │  6.   INSERT order, INSERT items                                       │
//! │  7. COMMIT                                                              │
//! │                                                                         │
//! │  Any failure between BEGIN and COMMIT rolls everything back: no        │
//! │  order row, no item rows, no usage increment. A coupon is never        │
//! │  charged a use for an order that was not recorded.                     │
//! │                                                                         │
//! │  Coupon failures honor the request's CouponPolicy:                     │
//! │    Require    → the whole request fails with the rejection reason      │
//! │    BestEffort → the order is recorded at full price, no coupon         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use mercato_core::pricing::price_order;
use mercato_core::{
    lifecycle, Clock, CoreError, Coupon, CouponRejection, LineItem, Money, Order, OrderIdGenerator,
    OrderItem, OrderStatus, PaymentStatus,
};

// =============================================================================
// Service Error
// =============================================================================

/// Errors surfaced by the order service: business rule violations from
/// the core, or storage failures from the database layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<CouponRejection> for ServiceError {
    fn from(rejection: CouponRejection) -> Self {
        ServiceError::Core(CoreError::Coupon(rejection))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Request Types
// =============================================================================

/// What to do when a supplied coupon code cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponPolicy {
    /// Reject the whole request with the rejection reason.
    #[default]
    Require,
    /// Record the order at full price, without the coupon.
    BestEffort,
}

/// An order creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Line items with product snapshots captured by the caller.
    pub items: Vec<LineItem>,

    /// Promotional code to apply, if any. Case-sensitive.
    pub coupon_code: Option<String>,

    /// What to do when the coupon cannot be applied.
    #[serde(default)]
    pub coupon_policy: CouponPolicy,
}

/// An order together with its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Order Service
// =============================================================================

/// Transactional order operations.
///
/// Cheap to clone; the identifier generator is shared so every clone
/// mints from the same per-day sequence.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
    clock: Arc<dyn Clock>,
    id_gen: Arc<OrderIdGenerator>,
}

impl OrderService {
    /// Creates an order service, seeding the identifier generator from
    /// the highest sequence already persisted for today.
    pub async fn new(db: Database, clock: Arc<dyn Clock>) -> ServiceResult<Self> {
        let id_gen = Arc::new(OrderIdGenerator::new());

        let today = clock.today();
        let last_seq = db.orders().last_sequence_for_day(today).await?;
        id_gen.restore(today, last_seq);

        debug!(%today, last_seq, "Order identifier generator seeded");

        Ok(OrderService { db, clock, id_gen })
    }

    /// Creates an order: prices the items, applies the coupon per the
    /// request's policy, and records everything in one transaction.
    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        let now = self.clock.now();
        let today = now.date_naive();

        // Structural failures (empty order, bad quantities) surface
        // before any coupon is even looked up.
        let base = price_order(&request.items, None, today)?;

        let coupons = self.db.coupons();
        let orders = self.db.orders();

        // Day rollover: re-seed the counter from storage before opening
        // the transaction (the seeding read needs its own connection).
        if self.id_gen.current_day() != Some(today) {
            let last_seq = orders.last_sequence_for_day(today).await?;
            self.id_gen.restore(today, last_seq);
        }

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        // Resolve the coupon and claim a use. Both live inside the
        // transaction so a later failure releases the claim.
        let mut applied: Option<(String, Money)> = None;
        if let Some(code) = &request.coupon_code {
            match self
                .resolve_coupon(&mut tx, code, base.subtotal, today)
                .await?
            {
                Ok(discount) => {
                    if coupons.increment_usage(&mut tx, code, now).await? {
                        applied = Some((code.clone(), discount));
                    } else if request.coupon_policy == CouponPolicy::Require {
                        // Raced: another order claimed the last use
                        // after our validation read.
                        return Err(CouponRejection::UsageExhausted.into());
                    } else {
                        warn!(code = %code, "Coupon use not claimable, recording order without it");
                    }
                }
                Err(rejection) => {
                    if request.coupon_policy == CouponPolicy::Require {
                        return Err(rejection.into());
                    }
                    warn!(code = %code, reason = %rejection, "Coupon rejected, recording order without it");
                }
            }
        }

        let (coupon_code, discount) = match applied {
            Some((code, discount)) => (Some(code), discount),
            None => (None, Money::zero()),
        };

        let order_id = self.id_gen.next_id(today)?;

        let order = Order {
            id: order_id.clone(),
            coupon_code,
            subtotal_cents: base.subtotal.cents(),
            discount_cents: discount.cents(),
            total_cents: (base.subtotal - discount).cents(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let items: Vec<OrderItem> = request
            .items
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                sku_snapshot: line.sku.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total().cents(),
                created_at: now,
            })
            .collect();

        orders.insert_order(&mut tx, &order).await?;
        orders.insert_items(&mut tx, &items).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            id = %order.id,
            total_cents = order.total_cents,
            discount_cents = order.discount_cents,
            coupon = order.coupon_code.as_deref().unwrap_or("-"),
            "Order created"
        );

        Ok(order)
    }

    /// Looks up a coupon by code and checks its eligibility against the
    /// order subtotal. Rejections come back in `Ok(Err(..))` so the
    /// caller can apply the request's coupon policy; only storage
    /// failures use the outer error.
    async fn resolve_coupon(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
        subtotal: Money,
        today: chrono::NaiveDate,
    ) -> ServiceResult<Result<Money, CouponRejection>> {
        let coupon: Option<Coupon> = self.db.coupons().get_by_code_tx(conn, code).await?;

        let Some(coupon) = coupon else {
            return Ok(Err(CouponRejection::NotFound {
                code: code.to_string(),
            }));
        };

        Ok(mercato_core::validate_coupon(&coupon, subtotal, today))
    }

    /// Moves an order to a new fulfillment status.
    ///
    /// Invalid edges fail with `CoreError::InvalidTransition` and leave
    /// the row untouched. Returns the refreshed order.
    pub async fn transition_status(&self, id: &str, new: OrderStatus) -> ServiceResult<Order> {
        let orders = self.db.orders();

        let current = orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        lifecycle::transition(current.status, new)?;

        let now = self.clock.now();
        let mut conn = self.db.pool().acquire().await.map_err(DbError::from)?;
        // Guarded on the status we just checked: a concurrent transition
        // in between makes this a no-match instead of a lost update.
        orders
            .update_status(&mut conn, id, current.status, new, now)
            .await?;
        drop(conn);

        info!(id = %id, from = %current.status, to = %new, "Order status updated");

        orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id).into())
    }

    /// Moves an order to a new payment status. Same contract as
    /// [`transition_status`](Self::transition_status).
    pub async fn transition_payment_status(
        &self,
        id: &str,
        new: PaymentStatus,
    ) -> ServiceResult<Order> {
        let orders = self.db.orders();

        let current = orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        lifecycle::transition_payment(current.payment_status, new)?;

        let now = self.clock.now();
        let mut conn = self.db.pool().acquire().await.map_err(DbError::from)?;
        orders
            .update_payment_status(&mut conn, id, current.payment_status, new, now)
            .await?;
        drop(conn);

        info!(id = %id, from = %current.payment_status, to = %new, "Payment status updated");

        orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id).into())
    }

    /// Fetches an order with its items.
    pub async fn get_order(&self, id: &str) -> ServiceResult<OrderDetails> {
        let orders = self.db.orders();

        let order = orders
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;
        let items = orders.get_items(id).await?;

        Ok(OrderDetails { order, items })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
