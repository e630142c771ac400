//! # Coupon Repository
//!
//! Database operations for coupons.
//!
//! ## Usage Counting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Guarded Usage Increment                                │
//! │                                                                         │
//! │  Two concurrent orders, coupon with usage_limit = 1:                   │
//! │                                                                         │
//! │  Tx A: UPDATE ... WHERE used_count < usage_limit  → 1 row  ✓           │
//! │  Tx B: UPDATE ... WHERE used_count < usage_limit  → 0 rows ✗           │
//! │                                                                         │
//! │  The WHERE clause makes the cap check and the increment one atomic     │
//! │  statement, so the limit can never be overshot no matter how the       │
//! │  transactions interleave. Tx B rolls back its whole order.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::{Coupon, CouponStatus};

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

const COUPON_COLUMNS: &str = r#"
    id, code, kind, discount_value,
    min_purchase_cents, max_discount_cents,
    usage_limit, used_count,
    start_date, end_date, status,
    created_at, updated_at
"#;

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Gets a coupon by its code (case-sensitive).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a coupon by its code inside an open transaction.
    ///
    /// Used by the order service so the coupon read and the later usage
    /// increment see the same snapshot.
    pub async fn get_by_code_tx(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
    ) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(conn)
        .await?;

        Ok(coupon)
    }

    /// Inserts a coupon.
    ///
    /// The UNIQUE constraint on `code` turns duplicates into
    /// [`DbError::UniqueViolation`].
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, kind, discount_value,
                min_purchase_cents, max_discount_cents,
                usage_limit, used_count,
                start_date, end_date, status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.kind)
        .bind(coupon.discount_value)
        .bind(coupon.min_purchase_cents)
        .bind(coupon.max_discount_cents)
        .bind(coupon.usage_limit)
        .bind(coupon.used_count)
        .bind(coupon.start_date)
        .bind(coupon.end_date)
        .bind(coupon.status)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically claims one use of a coupon inside an open transaction.
    ///
    /// ## Returns
    /// * `true` - A use was claimed (`used_count` incremented)
    /// * `false` - The coupon is missing, inactive, or out of uses
    ///
    /// The status and cap checks live in the WHERE clause so the
    /// increment can never overshoot `usage_limit`, even under
    /// concurrent order creation.
    pub async fn increment_usage(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
        now: chrono::DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                used_count = used_count + 1,
                updated_at = ?2
            WHERE code = ?1
              AND status = 'active'
              AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Lists coupons that are active and usable as of `today`:
    /// status `active` and not past their end date.
    pub async fn list_active(&self, today: NaiveDate) -> DbResult<Vec<Coupon>> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            SELECT {COUPON_COLUMNS}
            FROM coupons
            WHERE status = 'active'
              AND (end_date IS NULL OR end_date >= ?1)
            ORDER BY code
            "#
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons)
    }

    /// Sets a coupon's administrative status.
    pub async fn set_status(&self, code: &str, status: CouponStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE coupons SET status = ?2, updated_at = ?3
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", code));
        }

        Ok(())
    }

    /// Total number of coupons.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mercato_core::DiscountKind;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn coupon(code: &str, usage_limit: Option<i64>) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            kind: DiscountKind::Percentage,
            discount_value: 1000,
            min_purchase_cents: 0,
            max_discount_cents: None,
            usage_limit,
            used_count: 0,
            start_date: None,
            end_date: None,
            status: CouponStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_code() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&coupon("SAVE10", None)).await.unwrap();

        let found = repo.get_by_code("SAVE10").await.unwrap().unwrap();
        assert_eq!(found.code, "SAVE10");
        assert_eq!(found.kind, DiscountKind::Percentage);
        assert_eq!(found.discount_value, 1000);
        assert_eq!(found.status, CouponStatus::Active);

        // Codes are case-sensitive
        assert!(repo.get_by_code("save10").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        let repo = db.coupons();

        repo.insert(&coupon("SAVE10", None)).await.unwrap();
        let err = repo.insert(&coupon("SAVE10", None)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_increment_usage_respects_limit() {
        let db = test_db().await;
        let repo = db.coupons();
        repo.insert(&coupon("ONCE", Some(1))).await.unwrap();

        let now = Utc::now();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(repo.increment_usage(&mut tx, "ONCE", now).await.unwrap());
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(!repo.increment_usage(&mut tx, "ONCE", now).await.unwrap());
        tx.rollback().await.unwrap();

        let found = repo.get_by_code("ONCE").await.unwrap().unwrap();
        assert_eq!(found.used_count, 1);
    }

    #[tokio::test]
    async fn test_increment_usage_unlimited() {
        let db = test_db().await;
        let repo = db.coupons();
        repo.insert(&coupon("FOREVER", None)).await.unwrap();

        let now = Utc::now();
        for _ in 0..3 {
            let mut tx = db.pool().begin().await.unwrap();
            assert!(repo.increment_usage(&mut tx, "FOREVER", now).await.unwrap());
            tx.commit().await.unwrap();
        }

        let found = repo.get_by_code("FOREVER").await.unwrap().unwrap();
        assert_eq!(found.used_count, 3);
    }

    #[tokio::test]
    async fn test_increment_usage_inactive_coupon() {
        let db = test_db().await;
        let repo = db.coupons();
        repo.insert(&coupon("PAUSED", None)).await.unwrap();
        repo.set_status("PAUSED", CouponStatus::Inactive)
            .await
            .unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(!repo
            .increment_usage(&mut tx, "PAUSED", Utc::now())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_active_filters_status_and_end_date() {
        let db = test_db().await;
        let repo = db.coupons();

        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        repo.insert(&coupon("CURRENT", None)).await.unwrap();

        let mut ended = coupon("ENDED", None);
        ended.end_date = NaiveDate::from_ymd_opt(2026, 8, 1);
        repo.insert(&ended).await.unwrap();

        repo.insert(&coupon("PAUSED", None)).await.unwrap();
        repo.set_status("PAUSED", CouponStatus::Inactive)
            .await
            .unwrap();

        let active = repo.list_active(today).await.unwrap();
        let codes: Vec<&str> = active.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CURRENT"]);

        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_set_status_unknown_code() {
        let db = test_db().await;
        let repo = db.coupons();
        let err = repo
            .set_status("MISSING", CouponStatus::Inactive)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
