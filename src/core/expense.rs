//! Shared expense recording.
//!
//! An expense is money one member paid for the household. At creation the
//! equal split over the *then-current* roster is snapshotted into share rows,
//! one per member, with the payer's own share at zero. Balance computation
//! re-derives splits from the live roster; the snapshot is the historical
//! record of who was present when the expense was made.

use crate::{
    core::colocation::{get_colocation_member, list_members},
    entities::{Expense, ExpenseShare, expense, expense_share},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// Records a new expense and snapshots its per-member shares.
///
/// Validates that the amount is a positive finite number, the title is
/// non-empty, and the payer belongs to the colocation. The settlement month
/// is derived from the expense date.
#[allow(clippy::too_many_arguments)]
pub async fn create_expense(
    db: &DatabaseConnection,
    colocation_id: i64,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
    paid_by: &str,
    receipt_url: Option<String>,
) -> Result<expense::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Expense title cannot be empty".to_string(),
        });
    }
    get_colocation_member(db, colocation_id, paid_by)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: paid_by.to_string(),
        })?;

    let members = list_members(db, colocation_id).await?;
    #[allow(clippy::cast_precision_loss)] // household sizes are tiny
    let share = amount / members.len().max(1) as f64;

    let txn = db.begin().await?;

    let exp = expense::ActiveModel {
        colocation_id: Set(colocation_id),
        title: Set(title.trim().to_string()),
        amount: Set(amount),
        category: Set(category.to_string()),
        date: Set(date),
        month_year: Set(crate::core::balance::month_key(date)),
        paid_by: Set(paid_by.to_string()),
        receipt_url: Set(receipt_url),
        split_equally: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let exp = exp.insert(&txn).await?;

    for m in &members {
        let amount_owed = if m.email == paid_by { 0.0 } else { share };
        let row = expense_share::ActiveModel {
            expense_id: Set(exp.id),
            email: Set(m.email.clone()),
            amount_owed: Set(amount_owed),
            ..Default::default()
        };
        row.insert(&txn).await?;
    }

    txn.commit().await?;
    Ok(exp)
}

/// Retrieves an expense by ID.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all expenses for a colocation, newest first.
pub async fn list_expenses(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::ColocationId.eq(colocation_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists expenses for one settlement month, newest first.
pub async fn list_expenses_for_month(
    db: &DatabaseConnection,
    colocation_id: i64,
    month_year: &str,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::ColocationId.eq(colocation_id))
        .filter(expense::Column::MonthYear.eq(month_year))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the snapshotted share rows of an expense.
pub async fn list_shares(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Vec<expense_share::Model>> {
    ExpenseShare::find()
        .filter(expense_share::Column::ExpenseId.eq(expense_id))
        .order_by_asc(expense_share::Column::Email)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes an expense and its share snapshot.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let exp = get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let txn = db.begin().await?;
    ExpenseShare::delete_many()
        .filter(expense_share::Column::ExpenseId.eq(exp.id))
        .exec(&txn)
        .await?;
    Expense::delete_by_id(exp.id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Headline figures for one member's view of a month of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthStats {
    /// Sum of all expense amounts in the set
    pub total: f64,
    /// Number of expenses in the set
    pub count: usize,
    /// Sum of the amounts the given member paid
    pub my_total: f64,
}

/// Computes headline figures over an already-fetched expense set.
#[must_use]
pub fn month_stats(expenses: &[expense::Model], member_email: &str) -> MonthStats {
    let mut stats = MonthStats {
        count: expenses.len(),
        ..MonthStats::default()
    };
    for exp in expenses {
        stats.total += exp.amount;
        if exp.paid_by == member_email {
            stats.my_total += exp.amount;
        }
    }
    stats
}
