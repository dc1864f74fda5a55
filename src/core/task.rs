//! Household chore management.
//!
//! Tasks are assigned to a member, carry a due date, and move through a
//! three-state lifecycle. Unlike payments the lifecycle is not one-way; a
//! completed task can be reopened.

use crate::{
    core::colocation::get_colocation_member,
    entities::{Task, task},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Not started yet
pub const STATUS_TODO: &str = "todo";
/// Someone is on it
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Done
pub const STATUS_COMPLETED: &str = "completed";

const VALID_STATUSES: [&str; 3] = [STATUS_TODO, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// The ISO week bucket ("YYYY-Www") a date falls into.
#[must_use]
pub fn week_key(date: NaiveDate) -> String {
    date.format("%G-W%V").to_string()
}

/// Creates a new task assigned to a member.
///
/// The due date defaults to tomorrow when not given; the weekly bucket is
/// derived from it.
pub async fn create_task(
    db: &DatabaseConnection,
    colocation_id: i64,
    title: &str,
    description: Option<String>,
    assigned_to: &str,
    due_date: Option<NaiveDate>,
) -> Result<task::Model> {
    if title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Task title cannot be empty".to_string(),
        });
    }
    get_colocation_member(db, colocation_id, assigned_to)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: assigned_to.to_string(),
        })?;

    let due = due_date.unwrap_or_else(|| {
        Utc::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .unwrap_or_else(|| Utc::now().date_naive())
    });

    let t = task::ActiveModel {
        colocation_id: Set(colocation_id),
        title: Set(title.trim().to_string()),
        description: Set(description),
        assigned_to: Set(assigned_to.to_string()),
        due_date: Set(Some(due)),
        week_year: Set(Some(week_key(due))),
        status: Set(STATUS_TODO.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    t.insert(db).await.map_err(Into::into)
}

/// Retrieves a task by ID.
pub async fn get_task_by_id(db: &DatabaseConnection, task_id: i64) -> Result<Option<task::Model>> {
    Task::find_by_id(task_id).one(db).await.map_err(Into::into)
}

/// Lists tasks for a colocation ordered by due date, optionally hiding
/// completed ones.
pub async fn list_tasks(
    db: &DatabaseConnection,
    colocation_id: i64,
    include_completed: bool,
) -> Result<Vec<task::Model>> {
    let mut query = Task::find().filter(task::Column::ColocationId.eq(colocation_id));
    if !include_completed {
        query = query.filter(task::Column::Status.ne(STATUS_COMPLETED));
    }
    query
        .order_by_asc(task::Column::DueDate)
        .order_by_asc(task::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves a task to a new lifecycle status.
pub async fn update_task_status(
    db: &DatabaseConnection,
    task_id: i64,
    status: &str,
) -> Result<task::Model> {
    if !VALID_STATUSES.contains(&status) {
        return Err(Error::Validation {
            message: format!("Unknown task status: {status}"),
        });
    }
    let t = get_task_by_id(db, task_id)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;

    let mut active: task::ActiveModel = t.into();
    active.status = Set(status.to_string());
    active.update(db).await.map_err(Into::into)
}

/// Hands a task to another member of the same colocation.
pub async fn reassign_task(
    db: &DatabaseConnection,
    task_id: i64,
    assigned_to: &str,
) -> Result<task::Model> {
    let t = get_task_by_id(db, task_id)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;

    get_colocation_member(db, t.colocation_id, assigned_to)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: assigned_to.to_string(),
        })?;

    let mut active: task::ActiveModel = t.into();
    active.assigned_to = Set(assigned_to.to_string());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a task.
pub async fn delete_task(db: &DatabaseConnection, task_id: i64) -> Result<()> {
    let t = get_task_by_id(db, task_id)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;
    Task::delete_by_id(t.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_task_defaults() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let t = create_task(&db, coloc.id, "Sortir les poubelles", None, "u1@coloc.fr", None)
            .await?;
        assert_eq!(t.status, STATUS_TODO);
        let due = t.due_date.unwrap();
        assert_eq!(due, Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap());
        assert_eq!(t.week_year.as_deref(), Some(week_key(due).as_str()));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_task_requires_member_and_title() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let stranger =
            create_task(&db, coloc.id, "Vaisselle", None, "ghost@elsewhere.fr", None).await;
        assert!(matches!(stranger, Err(Error::MemberNotFound { .. })));

        let empty = create_task(&db, coloc.id, " ", None, "u1@coloc.fr", None).await;
        assert!(matches!(empty, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_tasks_hides_completed_by_default() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let early = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();

        let done =
            create_task(&db, coloc.id, "Vaisselle", None, "u1@coloc.fr", Some(late)).await?;
        create_task(&db, coloc.id, "Courses", None, "u2@coloc.fr", Some(early)).await?;
        update_task_status(&db, done.id, STATUS_COMPLETED).await?;

        let open = list_tasks(&db, coloc.id, false).await?;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "Courses");

        let all = list_tasks(&db, coloc.id, true).await?;
        assert_eq!(all.len(), 2);
        // Ordered by due date
        assert_eq!(all[0].title, "Courses");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_task_status_validates() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let t = create_task(&db, coloc.id, "Vaisselle", None, "u1@coloc.fr", None).await?;

        let moved = update_task_status(&db, t.id, STATUS_IN_PROGRESS).await?;
        assert_eq!(moved.status, STATUS_IN_PROGRESS);

        // Completed tasks can be reopened
        update_task_status(&db, t.id, STATUS_COMPLETED).await?;
        let reopened = update_task_status(&db, t.id, STATUS_TODO).await?;
        assert_eq!(reopened.status, STATUS_TODO);

        let bad = update_task_status(&db, t.id, "paused").await;
        assert!(matches!(bad, Err(Error::Validation { .. })));

        let missing = update_task_status(&db, 999, STATUS_TODO).await;
        assert!(matches!(missing, Err(Error::TaskNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_reassign_task() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let t = create_task(&db, coloc.id, "Vaisselle", None, "u1@coloc.fr", None).await?;

        let moved = reassign_task(&db, t.id, "u2@coloc.fr").await?;
        assert_eq!(moved.assigned_to, "u2@coloc.fr");

        let stranger = reassign_task(&db, t.id, "ghost@elsewhere.fr").await;
        assert!(matches!(stranger, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_task() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let t = create_task(&db, coloc.id, "Vaisselle", None, "u1@coloc.fr", None).await?;

        delete_task(&db, t.id).await?;
        assert!(get_task_by_id(&db, t.id).await?.is_none());

        let missing = delete_task(&db, t.id).await;
        assert!(matches!(missing, Err(Error::TaskNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_week_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(week_key(date), "2024-W19");
    }
}
