//! Shared calendar events.
//!
//! Events carry a start time, an optional end time and location, and a JSON
//! participant list seeded with the creator. Members can join an event after
//! the fact.

use crate::{
    core::colocation::get_colocation_member,
    entities::{Event, event},
    errors::{Error, Result},
};
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Event type applied when the caller gives none
pub const DEFAULT_EVENT_TYPE: &str = "autre";

/// Creates a calendar event, with the creator as the first participant.
#[allow(clippy::too_many_arguments)]
pub async fn create_event(
    db: &DatabaseConnection,
    colocation_id: i64,
    title: &str,
    description: Option<String>,
    date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    location: Option<String>,
    event_type: Option<String>,
    created_by: &str,
) -> Result<event::Model> {
    if title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Event title cannot be empty".to_string(),
        });
    }
    if let Some(end) = end_date {
        if end < date {
            return Err(Error::Validation {
                message: "Event end date cannot precede its start date".to_string(),
            });
        }
    }
    get_colocation_member(db, colocation_id, created_by)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: created_by.to_string(),
        })?;

    let e = event::ActiveModel {
        colocation_id: Set(colocation_id),
        title: Set(title.trim().to_string()),
        description: Set(description),
        date: Set(date),
        end_date: Set(end_date),
        location: Set(location),
        event_type: Set(event_type.unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string())),
        created_by: Set(created_by.to_string()),
        participants: Set(serde_json::to_string(&[created_by])?),
        ..Default::default()
    };
    e.insert(db).await.map_err(Into::into)
}

/// Retrieves an event by ID.
pub async fn get_event_by_id(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<event::Model>> {
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Lists all events of a colocation in chronological order.
pub async fn list_events(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::ColocationId.eq(colocation_id))
        .order_by_asc(event::Column::Date)
        .order_by_asc(event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists events starting within one calendar month ("YYYY-MM"), soonest
/// first. Multi-day events are bucketed by their start.
pub async fn list_events_for_month(
    db: &DatabaseConnection,
    colocation_id: i64,
    month_year: &str,
) -> Result<Vec<event::Model>> {
    let start = NaiveDate::parse_from_str(&format!("{month_year}-01"), "%Y-%m-%d")
        .map_err(|_| Error::Validation {
            message: format!("Invalid month: {month_year}"),
        })?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::Validation {
            message: format!("Invalid month: {month_year}"),
        })?;

    Event::find()
        .filter(event::Column::ColocationId.eq(colocation_id))
        .filter(event::Column::Date.gte(start.and_time(NaiveTime::MIN).and_utc()))
        .filter(event::Column::Date.lt(end.and_time(NaiveTime::MIN).and_utc()))
        .order_by_asc(event::Column::Date)
        .order_by_asc(event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists events starting now or later, soonest first.
pub async fn upcoming_events(
    db: &DatabaseConnection,
    colocation_id: i64,
) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::ColocationId.eq(colocation_id))
        .filter(event::Column::Date.gte(Utc::now()))
        .order_by_asc(event::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Decodes an event's participant list.
pub fn participants(e: &event::Model) -> Result<Vec<String>> {
    serde_json::from_str(&e.participants).map_err(Into::into)
}

/// Adds a member to an event's participant list. Joining twice is a no-op.
pub async fn join_event(
    db: &DatabaseConnection,
    event_id: i64,
    email: &str,
) -> Result<event::Model> {
    let e = get_event_by_id(db, event_id)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Event {event_id} does not exist"),
        })?;

    get_colocation_member(db, e.colocation_id, email)
        .await?
        .ok_or_else(|| Error::MemberNotFound {
            email: email.to_string(),
        })?;

    let mut list = participants(&e)?;
    if list.iter().any(|p| p == email) {
        return Ok(e);
    }
    list.push(email.to_string());

    let encoded = serde_json::to_string(&list)?;
    let mut active: event::ActiveModel = e.into();
    active.participants = Set(encoded);
    active.update(db).await.map_err(Into::into)
}

/// Deletes an event.
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let e = get_event_by_id(db, event_id)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Event {event_id} does not exist"),
        })?;
    Event::delete_by_id(e.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_event_seeds_creator_as_participant() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let e = create_event(
            &db,
            coloc.id,
            "Soiree jeux",
            None,
            at(19),
            Some(at(23)),
            Some("Salon".to_string()),
            None,
            "u1@coloc.fr",
        )
        .await?;
        assert_eq!(e.event_type, DEFAULT_EVENT_TYPE);
        assert_eq!(participants(&e)?, vec!["u1@coloc.fr".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_event_validation() -> Result<()> {
        let (db, coloc) = setup_household().await?;

        let backwards = create_event(
            &db, coloc.id, "Soiree", None, at(19), Some(at(18)), None, None, "u1@coloc.fr",
        )
        .await;
        assert!(matches!(backwards, Err(Error::Validation { .. })));

        let stranger = create_event(
            &db, coloc.id, "Soiree", None, at(19), None, None, None, "ghost@elsewhere.fr",
        )
        .await;
        assert!(matches!(stranger, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_join_event_is_idempotent() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let e = create_event(
            &db, coloc.id, "Soiree", None, at(19), None, None, None, "u1@coloc.fr",
        )
        .await?;

        join_event(&db, e.id, "u2@coloc.fr").await?;
        let twice = join_event(&db, e.id, "u2@coloc.fr").await?;
        assert_eq!(
            participants(&twice)?,
            vec!["u1@coloc.fr".to_string(), "u2@coloc.fr".to_string()]
        );

        let stranger = join_event(&db, e.id, "ghost@elsewhere.fr").await;
        assert!(matches!(stranger, Err(Error::MemberNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_events_chronological() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        create_event(&db, coloc.id, "Later", None, at(22), None, None, None, "u1@coloc.fr")
            .await?;
        create_event(&db, coloc.id, "Earlier", None, at(9), None, None, None, "u2@coloc.fr")
            .await?;

        let events = list_events(&db, coloc.id).await?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Earlier");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_events_for_month() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        create_event(&db, coloc.id, "In May", None, at(19), None, None, None, "u1@coloc.fr")
            .await?;
        create_event(
            &db,
            coloc.id,
            "Early June",
            None,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            None,
            None,
            None,
            "u2@coloc.fr",
        )
        .await?;

        let may = list_events_for_month(&db, coloc.id, "2024-05").await?;
        assert_eq!(may.len(), 1);
        assert_eq!(may[0].title, "In May");

        // Month boundary is exclusive: midnight June 1st belongs to June
        let june = list_events_for_month(&db, coloc.id, "2024-06").await?;
        assert_eq!(june.len(), 1);
        assert_eq!(june[0].title, "Early June");

        let bad = list_events_for_month(&db, coloc.id, "mai-2024").await;
        assert!(matches!(bad, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_events_excludes_past() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        create_event(
            &db,
            coloc.id,
            "Long gone",
            None,
            Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap(),
            None,
            None,
            None,
            "u1@coloc.fr",
        )
        .await?;
        create_event(
            &db,
            coloc.id,
            "Far future",
            None,
            Utc.with_ymd_and_hms(2099, 1, 1, 12, 0, 0).unwrap(),
            None,
            None,
            None,
            "u2@coloc.fr",
        )
        .await?;

        let upcoming = upcoming_events(&db, coloc.id).await?;
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Far future");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event() -> Result<()> {
        let (db, coloc) = setup_household().await?;
        let e = create_event(
            &db, coloc.id, "Soiree", None, at(19), None, None, None, "u1@coloc.fr",
        )
        .await?;

        delete_event(&db, e.id).await?;
        assert!(get_event_by_id(&db, e.id).await?.is_none());
        Ok(())
    }
}
