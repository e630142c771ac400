//! # Repository Module
//!
//! Database repository implementations for Mercato.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Order Service / Serving Layer                                         │
//! │       │                                                                 │
//! │       │  db.coupons().get_by_code("SAVE10")                            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CouponRepository                                                      │
//! │  ├── get_by_code(&self, code)                                          │
//! │  ├── insert(&self, coupon)                                             │
//! │  ├── try_increment_usage(executor, code, now)                          │
//! │  └── list_active(&self, today)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Mutations that must be atomic take an executor, so they run         │
//! │    against the pool or inside a caller's transaction unchanged         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`coupon::CouponRepository`] - Coupon storage, lookup, guarded usage increment
//! - [`order::OrderRepository`] - Order + item aggregate operations

pub mod coupon;
pub mod order;
