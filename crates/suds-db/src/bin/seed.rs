//! # Seed Data Generator
//!
//! Populates the database with a laundry price list, a handful of
//! customers, and sample transactions for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p suds-db --bin seed
//!
//! # Specify database path and transaction count
//! cargo run -p suds-db --bin seed -- --db ./data/suds.db --count 200
//! ```

use chrono::{Duration, Utc};
use std::env;
use suds_core::{NewCustomer, NewLine, NewService, NewTransaction, ServiceUnit, TransactionStatus};
use suds_db::{Database, DbConfig};

/// The standard laundry price list, prices in minor units.
const SERVICES: &[(&str, i64, ServiceUnit)] = &[
    ("Wash & Fold", 7_000, ServiceUnit::Kg),
    ("Wash & Iron", 10_000, ServiceUnit::Kg),
    ("Iron Only", 5_000, ServiceUnit::Kg),
    ("Express Wash (same day)", 14_000, ServiceUnit::Kg),
    ("Bed Sheets", 12_000, ServiceUnit::Item),
    ("Duvet / Comforter", 35_000, ServiceUnit::Item),
    ("Curtains", 20_000, ServiceUnit::Item),
    ("Suit (2-piece)", 45_000, ServiceUnit::Item),
    ("Dress", 25_000, ServiceUnit::Item),
    ("Shoes (pair)", 30_000, ServiceUnit::Item),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Siti Rahma", "+62 812-3456-7890"),
    ("Budi Santoso", "+62 813-9876-5432"),
    ("Dewi Lestari", "+62 811-2233-4455"),
    ("Agus Wijaya", "+62 815-6677-8899"),
    ("Rina Kartika", "+62 818-1122-3344"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./suds_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
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
                println!("SudsPOS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of transactions to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./suds_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🧺 SudsPOS Seed Data Generator");
    println!("==============================");
    println!("Database:     {}", db_path);
    println!("Transactions: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !db.transactions().list_all().await?.is_empty() {
        println!("⚠ Database already has transactions");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Price list
    let mut services = Vec::new();
    for (name, price_cents, unit) in SERVICES {
        let service = db
            .services()
            .insert(NewService {
                name: name.to_string(),
                price_cents: *price_cents,
                unit: *unit,
            })
            .await?;
        services.push(service);
    }
    println!("✓ Seeded {} services", services.len());

    // Customers
    let mut customers = Vec::new();
    for (name, phone) in CUSTOMERS {
        let customer = db
            .customers()
            .insert(NewCustomer {
                name: name.to_string(),
                phone: Some(phone.to_string()),
                address: None,
            })
            .await?;
        customers.push(customer);
    }
    println!("✓ Seeded {} customers", customers.len());

    // Transactions spread over the last 60 days, in varying states of
    // progress and payment.
    println!();
    println!("Generating transactions...");
    let start = std::time::Instant::now();
    let now = Utc::now();

    for seed in 0..count {
        let days_ago = (seed * 60 / count.max(1)) as i64;
        let date_in = now - Duration::days(days_ago) - Duration::hours((seed % 9) as i64);

        // Every fourth order is a walk-in without a customer record.
        let customer = if seed % 4 == 3 {
            None
        } else {
            Some(&customers[seed % customers.len()])
        };

        let line_count = 1 + seed % 3;
        let lines: Vec<NewLine> = (0..line_count)
            .map(|n| {
                let service = &services[(seed + n * 3) % services.len()];
                let quantity = match service.unit {
                    ServiceUnit::Kg => 1.0 + ((seed + n) % 7) as f64 * 0.5,
                    ServiceUnit::Item => 1.0 + ((seed + n) % 3) as f64,
                };
                NewLine::for_service(service, quantity)
            })
            .collect();

        let created = db
            .transactions()
            .create_with_lines(
                NewTransaction {
                    customer_id: customer.map(|c| c.id.clone()),
                    customer_name: customer
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| format!("Walk-in #{}", seed + 1)),
                    date_in,
                    estimated_date: Some(date_in + Duration::days(2)),
                },
                lines,
            )
            .await?;
        let id = &created.transaction.id;
        let total = created.transaction.total();

        // Walk the order through its lifecycle: older orders are further
        // along, and roughly one in ten is cancelled.
        if seed % 10 == 9 {
            db.transactions()
                .update_status(id, TransactionStatus::Cancelled)
                .await?;
            continue;
        }
        if days_ago >= 1 {
            db.transactions()
                .update_status(id, TransactionStatus::Processing)
                .await?;
        }
        if days_ago >= 2 {
            db.transactions()
                .update_status(id, TransactionStatus::Ready)
                .await?;
        }
        if days_ago >= 3 {
            db.transactions()
                .update_status(id, TransactionStatus::Done)
                .await?;
        }

        // Payments: a third paid in full, a third half down, a third unpaid.
        match seed % 3 {
            0 => {
                db.transactions().add_payment(id, total).await?;
            }
            1 => {
                let half = suds_core::Money::from_cents(total.cents() / 2);
                if half.is_positive() {
                    db.transactions().add_payment(id, half).await?;
                }
            }
            _ => {}
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} transactions in {:?}", count, elapsed);

    let all = db.transactions().list_all().await?;
    let done = all
        .iter()
        .filter(|t| t.status == TransactionStatus::Done)
        .count();
    println!();
    println!("  Total:  {}", all.len());
    println!("  Done:   {}", done);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
