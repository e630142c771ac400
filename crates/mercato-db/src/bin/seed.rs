//! # Seed Data Generator
//!
//! Populates the database with demo coupons and orders for development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults (20 orders)
//! cargo run -p mercato-db --bin seed
//!
//! # Generate a custom number of orders
//! cargo run -p mercato-db --bin seed -- --orders 100
//!
//! # Specify database path
//! cargo run -p mercato-db --bin seed -- --db ./data/mercato.db
//! ```
//!
//! ## Generated Data
//! - A fixed set of demo coupons covering both discount kinds, caps,
//!   usage limits, date windows, and an inactive code
//! - Orders with 1-4 line items drawn from a small demo catalog, some
//!   carrying a coupon, advanced through a mix of statuses

use std::env;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use mercato_core::validation::validate_new_coupon;
use mercato_core::{
    Coupon, CouponStatus, DiscountKind, LineItem, OrderStatus, PaymentStatus, SystemClock,
};
use mercato_db::{CouponPolicy, CreateOrderRequest, Database, DbConfig, OrderService};

/// Demo catalog: (product name, sku, unit price in cents).
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Espresso Beans 1kg", "COF-ESP-1000", 1899),
    ("Filter Coffee 500g", "COF-FIL-0500", 1099),
    ("Ceramic Mug", "MUG-CER-0001", 799),
    ("Travel Tumbler", "MUG-TRV-0002", 2499),
    ("Tea Sampler Box", "TEA-SMP-0012", 1549),
    ("Honey Jar 250g", "SWT-HON-0250", 649),
    ("Chocolate Biscotti", "SNK-BIS-0006", 449),
    ("Gift Card Sleeve", "GFT-SLV-0001", 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 20;
    let mut db_path = String::from("./mercato_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-n" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mercato Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --orders <N>   Number of orders to generate (default: 20)");
                println!("  -d, --db <PATH>    Database file path (default: ./mercato_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Mercato Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Orders:   {}", order_count);
    println!();

    // Connect to database
    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing coupons
    let existing = db.coupons().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} coupons", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Seed coupons
    println!();
    println!("Creating coupons...");

    let coupons = demo_coupons();
    for coupon in &coupons {
        validate_new_coupon(coupon)?;
        db.coupons().insert(coupon).await?;
        println!("  {} ({:?})", coupon.code, coupon.kind);
    }

    // Seed orders
    println!();
    println!("Creating orders...");

    let service = OrderService::new(db.clone(), Arc::new(SystemClock)).await?;
    let start = std::time::Instant::now();
    let mut created = 0usize;

    for seed in 0..order_count {
        let items = demo_items(seed);

        // Roughly every third order tries a coupon; BestEffort keeps
        // the run going once limited codes are used up.
        let coupon_code = match seed % 3 {
            0 => Some(coupons[seed / 3 % coupons.len()].code.clone()),
            _ => None,
        };

        let order = service
            .create_order(CreateOrderRequest {
                items,
                coupon_code,
                coupon_policy: CouponPolicy::BestEffort,
            })
            .await?;

        // Walk some orders forward so listings have variety
        match seed % 5 {
            1 => {
                service
                    .transition_status(&order.id, OrderStatus::Processing)
                    .await?;
            }
            2 => {
                service
                    .transition_status(&order.id, OrderStatus::Processing)
                    .await?;
                service
                    .transition_status(&order.id, OrderStatus::Shipped)
                    .await?;
                service
                    .transition_payment_status(&order.id, PaymentStatus::Paid)
                    .await?;
            }
            3 => {
                service
                    .transition_status(&order.id, OrderStatus::Cancelled)
                    .await?;
            }
            _ => {}
        }

        created += 1;
        if created % 50 == 0 {
            println!("  Generated {} orders...", created);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} orders in {:?}", created, elapsed);

    // Summary
    println!();
    println!("Summary:");
    let today = Utc::now().date_naive();
    let active = db.coupons().list_active(today).await?;
    println!(
        "  Active coupons: {}",
        serde_json::to_string(&active.iter().map(|c| c.code.as_str()).collect::<Vec<_>>())?
    );
    for status in [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
    ] {
        let count = db.orders().count_by_status(status).await?;
        println!("  Orders {}: {}", status, count);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// A fixed set of coupons covering the interesting shapes.
fn demo_coupons() -> Vec<Coupon> {
    let now = Utc::now();
    let today = now.date_naive();

    let base = |code: &str, kind: DiscountKind, value: i64| Coupon {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        kind,
        discount_value: value,
        min_purchase_cents: 0,
        max_discount_cents: None,
        usage_limit: None,
        used_count: 0,
        start_date: None,
        end_date: None,
        status: CouponStatus::Active,
        created_at: now,
        updated_at: now,
    };

    let mut capped = base("SAVE10", DiscountKind::Percentage, 1000);
    capped.max_discount_cents = Some(500);

    let mut welcome = base("WELCOME5", DiscountKind::Fixed, 500);
    welcome.min_purchase_cents = 2000;

    let mut limited = base("FLASH25", DiscountKind::Percentage, 2500);
    limited.usage_limit = Some(5);
    limited.end_date = Some(today + Duration::days(7));

    let mut seasonal = base("SUMMER-26", DiscountKind::Fixed, 300);
    seasonal.start_date = Some(today - Duration::days(30));
    seasonal.end_date = Some(today + Duration::days(30));

    let mut retired = base("LAUNCH", DiscountKind::Percentage, 1500);
    retired.status = CouponStatus::Inactive;

    vec![capped, welcome, limited, seasonal, retired]
}

/// Builds 1-4 line items from the demo catalog, varying by seed.
fn demo_items(seed: usize) -> Vec<LineItem> {
    let item_count = 1 + seed % 4;

    (0..item_count)
        .map(|offset| {
            let (name, sku, price) = PRODUCTS[(seed * 3 + offset * 5) % PRODUCTS.len()];
            LineItem {
                product_id: format!("prod-{:03}", (seed * 3 + offset * 5) % PRODUCTS.len()),
                sku: sku.to_string(),
                name: name.to_string(),
                unit_price_cents: price,
                quantity: 1 + ((seed + offset) % 3) as i64,
            }
        })
        .collect()
}
