//! # mercato-db: Database Layer for Mercato
//!
//! This crate provides database access for Mercato's order and coupon
//! subsystem. It uses SQLite for local storage with sqlx for async
//! operations, and hosts the order service that ties pricing, coupon
//! validation, and persistence together in one transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Data Flow                                │
//! │                                                                         │
//! │  Serving layer (create_order request)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    mercato-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  OrderService │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (orders.rs)  │───►│ (coupon.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │  order.rs)    │    │              │  │   │
//! │  │   │ price + tx    │    │ CouponRepo    │    │ 001_init.sql │  │   │
//! │  │   │ orchestration │    │ OrderRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (coupons, orders, order_items)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (coupon, order)
//! - [`orders`] - Order service: pricing + coupon redemption + persistence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mercato_core::SystemClock;
//! use mercato_db::{CouponPolicy, CreateOrderRequest, Database, DbConfig, OrderService};
//!
//! let db = Database::new(DbConfig::new("path/to/mercato.db")).await?;
//! let service = OrderService::new(db.clone(), Arc::new(SystemClock)).await?;
//!
//! let order = service
//!     .create_order(CreateOrderRequest {
//!         items,
//!         coupon_code: Some("SAVE10".into()),
//!         coupon_policy: CouponPolicy::Require,
//!     })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod orders;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use orders::{CouponPolicy, CreateOrderRequest, OrderService, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::coupon::CouponRepository;
pub use repository::order::OrderRepository;
