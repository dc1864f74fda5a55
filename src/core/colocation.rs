//! Colocation and member management.
//!
//! A colocation is a shared household identified by a six-character invite
//! code. Members are identified by email and belong to at most one colocation
//! at a time; joining another one moves them.

use crate::{
    entities::{Colocation, Member, colocation, member},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use uuid::Uuid;

/// Number of characters in an invite code
const INVITE_CODE_LEN: usize = 6;

/// Generates a random six-character uppercase invite code.
///
/// Collisions are not checked; at six hex characters over the handful of
/// households a deployment serves, they are not a practical concern.
#[must_use]
pub fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..INVITE_CODE_LEN].to_uppercase()
}

/// Creates a new colocation and enrolls its creator as the first member.
///
/// The creator's member record is created if they are not yet known, or moved
/// into the new colocation if they are.
pub async fn create_colocation(
    db: &DatabaseConnection,
    name: &str,
    address: Option<String>,
    created_by: &str,
) -> Result<colocation::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Colocation name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let coloc = colocation::ActiveModel {
        name: Set(name.trim().to_string()),
        address: Set(address),
        invite_code: Set(generate_invite_code()),
        created_by: Set(created_by.to_string()),
        ..Default::default()
    };
    let coloc = coloc.insert(&txn).await?;

    enroll_member(&txn, created_by, coloc.id).await?;

    txn.commit().await?;
    Ok(coloc)
}

/// Retrieves a colocation by ID.
pub async fn get_colocation_by_id(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Option<colocation::Model>> {
    Colocation::find_by_id(colocation_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a colocation by invite code.
///
/// The code is uppercased before lookup so users can type it in any case.
pub async fn find_by_invite_code(
    db: &DatabaseConnection,
    invite_code: &str,
) -> Result<colocation::Model> {
    let code = invite_code.trim().to_uppercase();
    Colocation::find()
        .filter(colocation::Column::InviteCode.eq(&code))
        .one(db)
        .await?
        .ok_or(Error::InviteCodeNotFound { code })
}

/// Joins a colocation via invite code, creating the member record on first
/// contact. A member already in another colocation is moved.
pub async fn join_colocation(
    db: &DatabaseConnection,
    invite_code: &str,
    email: &str,
) -> Result<member::Model> {
    let coloc = find_by_invite_code(db, invite_code).await?;

    let txn = db.begin().await?;
    let joined = enroll_member(&txn, email, coloc.id).await?;
    txn.commit().await?;
    Ok(joined)
}

/// Leaves the current colocation. The member record stays for history; only
/// the membership link is cleared.
pub async fn leave_colocation(db: &DatabaseConnection, email: &str) -> Result<member::Model> {
    let m = get_member_by_email(db, email)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: email.to_string(),
        })?;

    let mut active: member::ActiveModel = m.into();
    active.colocation_id = Set(None);
    active.update(db).await.map_err(Into::into)
}

async fn enroll_member<C>(db: &C, email: &str, colocation_id: i64) -> Result<member::Model>
where
    C: ConnectionTrait,
{
    let existing = Member::find()
        .filter(member::Column::Email.eq(email))
        .one(db)
        .await?;

    match existing {
        Some(m) => {
            let mut active: member::ActiveModel = m.into();
            active.colocation_id = Set(Some(colocation_id));
            active.update(db).await.map_err(Into::into)
        }
        None => {
            let m = member::ActiveModel {
                email: Set(email.to_string()),
                full_name: Set(default_full_name(email)),
                first_name: Set(None),
                last_name: Set(None),
                colocation_id: Set(Some(colocation_id)),
                ..Default::default()
            };
            m.insert(db).await.map_err(Into::into)
        }
    }
}

/// Registers a member profile without attaching it to a colocation.
///
/// Registering an email that already exists returns the existing record,
/// refreshing its full name when one is given.
pub async fn register_member(
    db: &DatabaseConnection,
    email: &str,
    full_name: Option<String>,
) -> Result<member::Model> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Error::Validation {
            message: format!("Invalid member email: {email}"),
        });
    }

    match get_member_by_email(db, email).await? {
        Some(m) => match full_name {
            Some(full_name) if full_name != m.full_name => {
                let mut active: member::ActiveModel = m.into();
                active.full_name = Set(full_name);
                active.update(db).await.map_err(Into::into)
            }
            _ => Ok(m),
        },
        None => {
            let m = member::ActiveModel {
                email: Set(email.to_string()),
                full_name: Set(full_name.unwrap_or_else(|| default_full_name(email))),
                first_name: Set(None),
                last_name: Set(None),
                colocation_id: Set(None),
                ..Default::default()
            };
            m.insert(db).await.map_err(Into::into)
        }
    }
}

/// Lists the members of a colocation, ordered by email.
pub async fn list_members(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<member::Model>> {
    Member::find()
        .filter(member::Column::ColocationId.eq(colocation_id))
        .order_by_asc(member::Column::Email)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a member by email regardless of membership.
pub async fn get_member_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<member::Model>> {
    Member::find()
        .filter(member::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a member by email within a specific colocation.
pub async fn get_colocation_member(
    db: &DatabaseConnection,
    colocation_id: i64,
    email: &str,
) -> Result<Option<member::Model>> {
    Member::find()
        .filter(member::Column::ColocationId.eq(colocation_id))
        .filter(member::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Updates a member's profile names.
pub async fn update_member_profile(
    db: &DatabaseConnection,
    email: &str,
    full_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<member::Model> {
    let m = get_member_by_email(db, email)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: email.to_string(),
        })?;

    let mut active: member::ActiveModel = m.into();
    if let Some(full_name) = full_name {
        active.full_name = Set(full_name);
    }
    if first_name.is_some() {
        active.first_name = Set(first_name);
    }
    if last_name.is_some() {
        active.last_name = Set(last_name);
    }
    active.update(db).await.map_err(Into::into)
}

/// Picks the friendliest display name available for a member: first name,
/// then the first word of the full name, then the email local part.
#[must_use]
pub fn display_name(m: &member::Model) -> String {
    if let Some(first) = m.first_name.as_deref() {
        if !first.trim().is_empty() {
            return first.trim().to_string();
        }
    }
    if let Some(word) = m.full_name.split_whitespace().next() {
        return word.to_string();
    }
    default_full_name(&m.email)
}

fn default_full_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_colocation_enrolls_creator() -> Result<()> {
        let db = setup_test_db().await?;

        let coloc = create_colocation(&db, "Rue des Lilas", None, "alice@coloc.fr").await?;
        assert_eq!(coloc.name, "Rue des Lilas");
        assert_eq!(coloc.invite_code.len(), 6);
        assert_eq!(coloc.invite_code, coloc.invite_code.to_uppercase());

        let members = list_members(&db, coloc.id).await?;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email, "alice@coloc.fr");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_colocation_rejects_empty_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_colocation(&db, "   ", None, "alice@coloc.fr").await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_join_via_invite_code_any_case() -> Result<()> {
        let db = setup_test_db().await?;
        let coloc = create_colocation(&db, "Rue des Lilas", None, "alice@coloc.fr").await?;

        let code = coloc.invite_code.to_lowercase();
        let joined = join_colocation(&db, &format!("  {code} "), "bob@coloc.fr").await?;
        assert_eq!(joined.colocation_id, Some(coloc.id));

        let members = list_members(&db, coloc.id).await?;
        assert_eq!(members.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_join_unknown_code() -> Result<()> {
        let db = setup_test_db().await?;

        let result = join_colocation(&db, "ZZZZZZ", "bob@coloc.fr").await;
        assert!(matches!(result, Err(Error::InviteCodeNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_joining_moves_member_between_colocations() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_colocation(&db, "First", None, "alice@coloc.fr").await?;
        let second = create_colocation(&db, "Second", None, "carol@coloc.fr").await?;

        join_colocation(&db, &first.invite_code, "bob@coloc.fr").await?;
        join_colocation(&db, &second.invite_code, "bob@coloc.fr").await?;

        let bob = get_member_by_email(&db, "bob@coloc.fr").await?.unwrap();
        assert_eq!(bob.colocation_id, Some(second.id));
        assert_eq!(list_members(&db, first.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_leave_colocation_keeps_member_record() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let left = leave_colocation(&db, "u2@coloc.fr").await?;
        assert!(left.colocation_id.is_none());

        let members = list_members(&db, coloc.id).await?;
        assert_eq!(members.len(), 2);
        assert!(get_member_by_email(&db, "u2@coloc.fr").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_leave_unknown_member() -> Result<()> {
        let db = setup_test_db().await?;

        let result = leave_colocation(&db, "ghost@coloc.fr").await;
        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_member_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = register_member(&db, "dan@coloc.fr", None).await?;
        assert_eq!(first.full_name, "dan");
        assert!(first.colocation_id.is_none());

        let renamed = register_member(&db, "dan@coloc.fr", Some("Dan Dupont".to_string())).await?;
        assert_eq!(renamed.id, first.id);
        assert_eq!(renamed.full_name, "Dan Dupont");

        let invalid = register_member(&db, "not-an-email", None).await;
        assert!(matches!(invalid, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_member_profile() -> Result<()> {
        let (db, _coloc) = setup_household().await?;

        let updated = update_member_profile(
            &db,
            "u1@coloc.fr",
            Some("Una Un".to_string()),
            Some("Una".to_string()),
            None,
        )
        .await?;
        assert_eq!(updated.full_name, "Una Un");
        assert_eq!(updated.first_name.as_deref(), Some("Una"));
        Ok(())
    }

    #[test]
    fn test_generate_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut m = member::Model {
            id: 1,
            email: "una.un@coloc.fr".to_string(),
            full_name: "Una Un".to_string(),
            first_name: Some("Una".to_string()),
            last_name: Some("Un".to_string()),
            colocation_id: None,
        };
        assert_eq!(display_name(&m), "Una");

        m.first_name = None;
        assert_eq!(display_name(&m), "Una");

        m.full_name = String::new();
        assert_eq!(display_name(&m), "una.un");
    }
}
