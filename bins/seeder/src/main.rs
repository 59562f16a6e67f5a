//! Database seeder for Cajero development and testing.
//!
//! Seeds demo clients and accounts for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use cajero_db::entities::{accounts, clients};

/// Demo client IDs (consistent for all seeds)
const JOSE_LEMA_ID: &str = "00000000-0000-0000-0000-000000000001";
const MARIANELA_MONTALVO_ID: &str = "00000000-0000-0000-0000-000000000002";
const JUAN_OSORIO_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = cajero_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo clients...");
    seed_client(
        &db,
        JOSE_LEMA_ID,
        "Jose Lema",
        "Otavalo sn y principal",
        "098254785",
    )
    .await;
    seed_client(
        &db,
        MARIANELA_MONTALVO_ID,
        "Marianela Montalvo",
        "Amazonas y NNUU",
        "097548965",
    )
    .await;
    seed_client(
        &db,
        JUAN_OSORIO_ID,
        "Juan Osorio",
        "13 junio y Equinoccial",
        "098874587",
    )
    .await;

    println!("Seeding demo accounts...");
    seed_account(&db, JOSE_LEMA_ID, "478758", "Ahorro", dec!(2000.00)).await;
    seed_account(&db, MARIANELA_MONTALVO_ID, "225487", "Corriente", dec!(100.00)).await;
    seed_account(&db, JUAN_OSORIO_ID, "495878", "Ahorro", dec!(0.00)).await;
    seed_account(&db, MARIANELA_MONTALVO_ID, "496825", "Ahorro", dec!(540.00)).await;
    seed_account(&db, JOSE_LEMA_ID, "585545", "Corriente", dec!(1000.00)).await;

    println!("Done.");
}

async fn seed_client(db: &DatabaseConnection, id: &str, name: &str, address: &str, phone: &str) {
    let now = Utc::now().into();
    let client = clients::ActiveModel {
        id: Set(parse_uuid(id)),
        name: Set(name.to_string()),
        address: Set(Some(address.to_string())),
        phone: Set(Some(phone.to_string())),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    client
        .insert(db)
        .await
        .unwrap_or_else(|e| panic!("Failed to seed client {name}: {e}"));
}

async fn seed_account(
    db: &DatabaseConnection,
    client_id: &str,
    account_number: &str,
    account_type: &str,
    balance: Decimal,
) {
    let now = Utc::now().into();
    let account = accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_number: Set(account_number.to_string()),
        account_type: Set(account_type.to_string()),
        balance: Set(balance),
        is_active: Set(true),
        client_id: Set(parse_uuid(client_id)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    account
        .insert(db)
        .await
        .unwrap_or_else(|e| panic!("Failed to seed account {account_number}: {e}"));
}

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("seed UUID literal is valid")
}
