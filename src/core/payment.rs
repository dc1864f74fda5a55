//! Settlement payment logic.
//!
//! A payment is a member's declaration that they handed money to another
//! member to settle a debt. It starts pending and transitions exactly once,
//! to confirmed or rejected, by the recipient. Only confirmed payments ever
//! reduce computed balances; pending ones are a display overlay.

use crate::{
    core::colocation::get_colocation_member,
    entities::{Payment, payment},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// A declared payment awaiting the recipient's decision
pub const STATUS_PENDING: &str = "pending";
/// A payment the recipient acknowledged; it reduces debt
pub const STATUS_CONFIRMED: &str = "confirmed";
/// A payment the recipient refused; it never affects balances
pub const STATUS_REJECTED: &str = "rejected";

/// Declares a new pending payment from one member to another.
///
/// Validates that the amount is a positive finite number, that sender and
/// recipient differ, and that both are members of the colocation.
pub async fn create_payment(
    db: &DatabaseConnection,
    colocation_id: i64,
    from_user: &str,
    to_user: &str,
    amount: f64,
    month_year: &str,
) -> Result<payment::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if from_user == to_user {
        return Err(Error::Validation {
            message: "A payment cannot go from a member to themselves".to_string(),
        });
    }

    get_colocation_member(db, colocation_id, from_user)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: from_user.to_string(),
        })?;
    get_colocation_member(db, colocation_id, to_user)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: to_user.to_string(),
        })?;

    let pay = payment::ActiveModel {
        colocation_id: Set(colocation_id),
        from_user: Set(from_user.to_string()),
        to_user: Set(to_user.to_string()),
        amount: Set(amount),
        month_year: Set(month_year.to_string()),
        status: Set(STATUS_PENDING.to_string()),
        created_date: Set(Utc::now()),
        confirmed_date: Set(None),
        ..Default::default()
    };

    pay.insert(db).await.map_err(Into::into)
}

/// Retrieves a payment by ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all payments for a colocation, most recent first.
pub async fn list_payments(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::ColocationId.eq(colocation_id))
        .order_by_desc(payment::Column::CreatedDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists payments for one settlement month, most recent first.
pub async fn list_payments_for_month(
    db: &DatabaseConnection,
    colocation_id: i64,
    month_year: &str,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::ColocationId.eq(colocation_id))
        .filter(payment::Column::MonthYear.eq(month_year))
        .order_by_desc(payment::Column::CreatedDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists pending payments awaiting a given recipient's decision, oldest first.
pub async fn pending_payments_for(
    db: &DatabaseConnection,
    colocation_id: i64,
    to_user: &str,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::ColocationId.eq(colocation_id))
        .filter(payment::Column::ToUser.eq(to_user))
        .filter(payment::Column::Status.eq(STATUS_PENDING))
        .order_by_asc(payment::Column::CreatedDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Confirms a pending payment, stamping the decision time.
///
/// Only a pending payment can be confirmed; any other status yields
/// `InvalidPaymentStatus`.
pub async fn confirm_payment(db: &DatabaseConnection, payment_id: i64) -> Result<payment::Model> {
    resolve_payment(db, payment_id, STATUS_CONFIRMED).await
}

/// Rejects a pending payment, stamping the decision time.
///
/// A rejected payment keeps its row for history but never affects balances.
pub async fn reject_payment(db: &DatabaseConnection, payment_id: i64) -> Result<payment::Model> {
    resolve_payment(db, payment_id, STATUS_REJECTED).await
}

async fn resolve_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    new_status: &str,
) -> Result<payment::Model> {
    let pay = get_payment_by_id(db, payment_id)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?;

    if pay.status != STATUS_PENDING {
        return Err(Error::InvalidPaymentStatus {
            id: payment_id,
            status: pay.status,
        });
    }

    let mut active: payment::ActiveModel = pay.into();
    active.status = Set(new_status.to_string());
    // The decision timestamp is stamped on rejection too, as the record of
    // when the recipient acted
    active.confirmed_date = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_payment_starts_pending() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let pay = create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;
        assert_eq!(pay.status, STATUS_PENDING);
        assert_eq!(pay.amount, 10.0);
        assert!(pay.confirmed_date.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_rejects_bad_amounts() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result =
                create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", bad, "2024-05").await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_rejects_self_payment() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let result =
            create_payment(&db, coloc.id, "u1@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_requires_membership() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let result = create_payment(
            &db,
            coloc.id,
            "stranger@elsewhere.fr",
            "u1@coloc.fr",
            10.0,
            "2024-05",
        )
        .await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_payment() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let pay = create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;

        let confirmed = confirm_payment(&db, pay.id).await?;
        assert_eq!(confirmed.status, STATUS_CONFIRMED);
        assert!(confirmed.confirmed_date.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_payment_stamps_decision_time() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let pay = create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;

        let rejected = reject_payment(&db, pay.id).await?;
        assert_eq!(rejected.status, STATUS_REJECTED);
        assert!(rejected.confirmed_date.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolving_twice_fails() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let pay = create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;

        confirm_payment(&db, pay.id).await?;
        let again = reject_payment(&db, pay.id).await;
        assert!(matches!(again, Err(Error::InvalidPaymentStatus { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_missing_payment() -> Result<()> {
        let (db, _coloc) = setup_household().await?;

        let result = confirm_payment(&db, 999).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_payments_for_recipient() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let p1 = create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;
        create_payment(&db, coloc.id, "u3@coloc.fr", "u1@coloc.fr", 5.0, "2024-05").await?;
        create_payment(&db, coloc.id, "u1@coloc.fr", "u2@coloc.fr", 7.0, "2024-05").await?;
        confirm_payment(&db, p1.id).await?;

        let pending = pending_payments_for(&db, coloc.id, "u1@coloc.fr").await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].from_user, "u3@coloc.fr");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_payments_for_month() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 10.0, "2024-05").await?;
        create_payment(&db, coloc.id, "u2@coloc.fr", "u1@coloc.fr", 3.0, "2024-04").await?;

        let may = list_payments_for_month(&db, coloc.id, "2024-05").await?;
        assert_eq!(may.len(), 1);
        assert_eq!(may[0].amount, 10.0);

        let all = list_payments(&db, coloc.id).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }
}
