//! Test utilities for homie.
//!
//! Shared helpers for setting up in-memory databases and seeding the fixtures
//! the service tests need. Only compiled for tests.

use crate::config::database::{create_connection, create_tables};
use crate::entities::{colocation, expense, member, payment};
use crate::errors::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables created.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = create_connection("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Inserts a colocation with a fixed invite code.
pub async fn create_test_colocation(
    db: &DatabaseConnection,
    name: &str,
) -> Result<colocation::Model> {
    let coloc = colocation::ActiveModel {
        name: Set(name.to_string()),
        address: Set(None),
        invite_code: Set("ABC123".to_string()),
        created_by: Set("u1@coloc.fr".to_string()),
        ..Default::default()
    };
    coloc.insert(db).await.map_err(Into::into)
}

/// Inserts a member attached to the given colocation.
pub async fn create_test_member(
    db: &DatabaseConnection,
    email: &str,
    colocation_id: Option<i64>,
) -> Result<member::Model> {
    let local_part = email.split('@').next().unwrap_or(email);
    let m = member::ActiveModel {
        email: Set(email.to_string()),
        full_name: Set(local_part.to_string()),
        first_name: Set(None),
        last_name: Set(None),
        colocation_id: Set(colocation_id),
        ..Default::default()
    };
    m.insert(db).await.map_err(Into::into)
}

/// Sets up a database with one colocation and three members
/// (`u1@coloc.fr`, `u2@coloc.fr`, `u3@coloc.fr`).
pub async fn setup_household() -> Result<(DatabaseConnection, colocation::Model)> {
    let db = setup_test_db().await?;
    let coloc = create_test_colocation(&db, "Test Coloc").await?;
    for email in ["u1@coloc.fr", "u2@coloc.fr", "u3@coloc.fr"] {
        create_test_member(&db, email, Some(coloc.id)).await?;
    }
    Ok((db, coloc))
}

/// Inserts an expense directly, bypassing validation.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    colocation_id: i64,
    amount: f64,
    paid_by: &str,
    month_year: &str,
) -> Result<expense::Model> {
    let exp = expense::ActiveModel {
        colocation_id: Set(colocation_id),
        title: Set("Test expense".to_string()),
        amount: Set(amount),
        category: Set("courses".to_string()),
        date: Set(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap_or_default()),
        month_year: Set(month_year.to_string()),
        paid_by: Set(paid_by.to_string()),
        receipt_url: Set(None),
        split_equally: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    exp.insert(db).await.map_err(Into::into)
}

/// Inserts a payment directly with the given status, bypassing validation.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    colocation_id: i64,
    from_user: &str,
    to_user: &str,
    amount: f64,
    month_year: &str,
    status: &str,
) -> Result<payment::Model> {
    let pay = payment::ActiveModel {
        colocation_id: Set(colocation_id),
        from_user: Set(from_user.to_string()),
        to_user: Set(to_user.to_string()),
        amount: Set(amount),
        month_year: Set(month_year.to_string()),
        status: Set(status.to_string()),
        created_date: Set(Utc::now()),
        confirmed_date: Set(None),
        ..Default::default()
    };
    pay.insert(db).await.map_err(Into::into)
}
