//! # Order Repository
//!
//! Database operations for orders and their items.
//!
//! ## Aggregate Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Aggregate                                      │
//! │                                                                         │
//! │  An order and its items are one unit:                                  │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    insert_order(order)         ← parent row first (FK target)          │
//! │    insert_items(items)         ← children reference order.id           │
//! │    increment coupon usage      ← CouponRepository, same transaction    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The write methods take an open connection so the order service        │
//! │  decides the transaction boundary; ON DELETE CASCADE keeps reads       │
//! │  from ever seeing an orphaned item.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::order_id::day_prefix;
use mercato_core::{Order, OrderItem, OrderStatus, PaymentStatus};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

const ORDER_COLUMNS: &str = r#"
    id, coupon_code,
    subtotal_cents, discount_cents, total_cents,
    status, payment_status,
    created_at, updated_at
"#;

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Writes (transaction-scoped)
    // =========================================================================

    /// Inserts an order row inside an open transaction.
    pub async fn insert_order(&self, conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, total_cents = order.total_cents, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, coupon_code,
                subtotal_cents, discount_cents, total_cents,
                status, payment_status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5,
                ?6, ?7,
                ?8, ?9
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.coupon_code)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts an order's items inside an open transaction.
    ///
    /// ## Snapshot Pattern
    /// SKU, name, and unit price were copied off the product at pricing
    /// time; catalog changes after this point do not rewrite history.
    pub async fn insert_items(
        &self,
        conn: &mut SqliteConnection,
        items: &[OrderItem],
    ) -> DbResult<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id,
                    sku_snapshot, name_snapshot, unit_price_cents,
                    quantity, line_total_cents, created_at
                ) VALUES (
                    ?1, ?2, ?3,
                    ?4, ?5, ?6,
                    ?7, ?8, ?9
                )
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.sku_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an order by its business identifier.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT
                id, order_id, product_id,
                sku_snapshot, name_snapshot, unit_price_cents,
                quantity, line_total_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists orders with a given fulfillment status, newest first.
    pub async fn list_by_status(&self, status: OrderStatus, limit: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE status = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists the most recently created orders.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            ORDER BY created_at DESC, id DESC
            LIMIT ?1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders with a given fulfillment status.
    pub async fn count_by_status(&self, status: OrderStatus) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Highest identifier sequence number already persisted for `day`.
    ///
    /// Used to re-seed the in-memory generator after a restart or at
    /// day rollover, so sequence numbers are never reused.
    pub async fn last_sequence_for_day(&self, day: NaiveDate) -> DbResult<u32> {
        let prefix = day_prefix(day);
        let pattern = format!("{prefix}%");

        // The sequence is the 5 digits after the 10-character prefix.
        let max: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX(CAST(substr(id, 11) AS INTEGER))
            FROM orders
            WHERE id LIKE ?1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0) as u32)
    }

    // =========================================================================
    // Guarded Status Updates
    // =========================================================================

    /// Updates an order's fulfillment status, guarded on the expected
    /// current status.
    ///
    /// The `status = expected` predicate means a concurrent transition
    /// between the service's read and this write matches zero rows
    /// instead of silently clobbering state.
    pub async fn update_status(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Updates an order's payment status, guarded on the expected
    /// current payment status.
    pub async fn update_payment_status(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        expected: PaymentStatus,
        new: PaymentStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET payment_status = ?3, updated_at = ?4
            WHERE id = ?1 AND payment_status = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .bind(now)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn order(id: &str, total_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            coupon_code: None,
            subtotal_cents: total_cents,
            discount_cents: 0,
            total_cents,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(order_id: &str, product_id: &str) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            sku_snapshot: format!("SKU-{product_id}"),
            name_snapshot: format!("Product {product_id}"),
            unit_price_cents: 1000,
            quantity: 1,
            line_total_cents: 1000,
            created_at: Utc::now(),
        }
    }

    async fn insert_order_with_items(db: &Database, o: &Order, items: &[OrderItem]) {
        let repo = db.orders();
        let mut tx = db.pool().begin().await.unwrap();
        repo.insert_order(&mut tx, o).await.unwrap();
        repo.insert_items(&mut tx, items).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_aggregate() {
        let db = test_db().await;
        let repo = db.orders();

        let o = order("ORD-26083000001", 2000);
        let items = vec![item(&o.id, "p1"), item(&o.id, "p2")];
        insert_order_with_items(&db, &o, &items).await;

        let found = repo.get_by_id(&o.id).await.unwrap().unwrap();
        assert_eq!(found.total_cents, 2000);
        assert_eq!(found.status, OrderStatus::Pending);

        let found_items = repo.get_items(&o.id).await.unwrap();
        assert_eq!(found_items.len(), 2);
        assert_eq!(found_items[0].product_id, "p1");
        assert_eq!(found_items[1].product_id, "p2");
    }

    #[tokio::test]
    async fn test_item_requires_existing_order() {
        let db = test_db().await;
        let repo = db.orders();

        let mut tx = db.pool().begin().await.unwrap();
        let err = repo
            .insert_items(&mut tx, &[item("ORD-26083099999", "p1")])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_guarded_status_update() {
        let db = test_db().await;
        let repo = db.orders();

        let o = order("ORD-26083000001", 2000);
        insert_order_with_items(&db, &o, &[item(&o.id, "p1")]).await;

        let now = Utc::now();
        let mut tx = db.pool().begin().await.unwrap();
        repo.update_status(&mut tx, &o.id, OrderStatus::Pending, OrderStatus::Processing, now)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let found = repo.get_by_id(&o.id).await.unwrap().unwrap();
        assert_eq!(found.status, OrderStatus::Processing);

        // Guard mismatch: order is no longer pending
        let mut tx = db.pool().begin().await.unwrap();
        let err = repo
            .update_status(&mut tx, &o.id, OrderStatus::Pending, OrderStatus::Cancelled, now)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_listings_and_counts() {
        let db = test_db().await;
        let repo = db.orders();

        for (i, total) in [1000i64, 2000, 3000].iter().enumerate() {
            let o = order(&format!("ORD-2608300000{}", i + 1), *total);
            insert_order_with_items(&db, &o, &[item(&o.id, "p1")]).await;
        }

        let now = Utc::now();
        let mut tx = db.pool().begin().await.unwrap();
        repo.update_status(
            &mut tx,
            "ORD-26083000002",
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            now,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(repo.count_by_status(OrderStatus::Pending).await.unwrap(), 2);
        assert_eq!(
            repo.count_by_status(OrderStatus::Cancelled).await.unwrap(),
            1
        );

        let pending = repo.list_by_status(OrderStatus::Pending, 10).await.unwrap();
        assert_eq!(pending.len(), 2);

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn test_last_sequence_for_day() {
        let db = test_db().await;
        let repo = db.orders();

        let day = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(repo.last_sequence_for_day(day).await.unwrap(), 0);

        for seq in [1, 2, 7] {
            let o = order(&format!("ORD-260830{seq:05}"), 1000);
            insert_order_with_items(&db, &o, &[item(&o.id, "p1")]).await;
        }
        // A different day must not count
        let o = order("ORD-26083100042", 1000);
        insert_order_with_items(&db, &o, &[item(&o.id, "p1")]).await;

        assert_eq!(repo.last_sequence_for_day(day).await.unwrap(), 7);
        let next_day = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert_eq!(repo.last_sequence_for_day(next_day).await.unwrap(), 42);
    }
}
