use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{run_action, ActionError, ActionResult};
use crate::auth::AuthContext;
use crate::database::models::{Event, EventWithVenues};
use crate::database::store::{EventChanges, EventStore, NewEvent, VenueStore};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchEvents {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub sport_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetEvent {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Event name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Sport type is required"))]
    pub sport_type: String,

    /// RFC 3339 timestamp; parsed inside the handler so an unparseable
    /// value fails the action, not the request decoding.
    #[serde(default)]
    #[validate(length(min = 1, message = "Date and time is required"))]
    pub date_time: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be less than 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "At least one venue is required"))]
    pub venue_ids: Vec<Uuid>,
}

/// Partial update: absent fields are left untouched. A present `venue_ids`
/// replaces the full link set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvent {
    pub id: Uuid,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Event name must be 1-255 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Sport type is required"))]
    pub sport_type: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Date and time is required"))]
    pub date_time: Option<String>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be less than 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "At least one venue is required"))]
    pub venue_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteEvent {
    pub id: Uuid,
}

/// Payload confirming a delete. Deletes are not existence-checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub success: bool,
}

fn parse_date_time(raw: &str) -> Result<DateTime<Utc>, ActionError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ActionError::invalid("Invalid date and time format"))
}

async fn with_venues<E, V>(
    events: &E,
    venues: &V,
    event: Event,
) -> Result<EventWithVenues, ActionError>
where
    E: EventStore,
    V: VenueStore,
{
    let ids = events.venue_ids(event.id).await?;
    let venues = if ids.is_empty() {
        Vec::new()
    } else {
        venues.get_many(&ids).await?
    };
    Ok(EventWithVenues { event, venues })
}

/// List the caller's events with optional name/sport filters, each joined
/// with its venues. Venue lookups run concurrently and are awaited jointly.
pub async fn list_events<E, V>(
    events: &E,
    venues: &V,
    ctx: &AuthContext,
    input: SearchEvents,
) -> ActionResult<Vec<EventWithVenues>>
where
    E: EventStore,
    V: VenueStore,
{
    run_action(ctx, input, |input, principal| async move {
        let rows = events
            .list(
                principal.0,
                input.query.as_deref(),
                input.sport_type.as_deref(),
            )
            .await?;

        let joined =
            try_join_all(rows.into_iter().map(|event| with_venues(events, venues, event))).await?;

        Ok(joined)
    })
    .await
}

/// Fetch one of the caller's events. Absence is a successful `None`, not a
/// failure.
pub async fn get_event<E, V>(
    events: &E,
    venues: &V,
    ctx: &AuthContext,
    input: GetEvent,
) -> ActionResult<Option<EventWithVenues>>
where
    E: EventStore,
    V: VenueStore,
{
    run_action(ctx, input, |input, principal| async move {
        let Some(event) = events.get(principal.0, input.id).await? else {
            return Ok(None);
        };
        Ok(Some(with_venues(events, venues, event).await?))
    })
    .await
}

/// Create an event owned by the caller, then link its venues. The two
/// writes are not atomic; a failed link insert leaves the event without
/// links.
pub async fn create_event<E>(
    events: &E,
    ctx: &AuthContext,
    input: CreateEvent,
) -> ActionResult<Event>
where
    E: EventStore,
{
    run_action(ctx, input, |input, principal| async move {
        let CreateEvent {
            name,
            sport_type,
            date_time,
            description,
            venue_ids,
        } = input;

        let event = events
            .insert(
                principal.0,
                NewEvent {
                    name,
                    sport_type,
                    date_time: parse_date_time(&date_time)?,
                    description,
                },
            )
            .await?;

        if !venue_ids.is_empty() {
            events.link_venues(event.id, &venue_ids).await?;
        }

        Ok(event)
    })
    .await
}

/// Partially update one of the caller's events. When `venue_ids` is
/// present the link set is fully replaced: delete all, then insert the new
/// set unless it is empty.
pub async fn update_event<E>(
    events: &E,
    ctx: &AuthContext,
    input: UpdateEvent,
) -> ActionResult<Event>
where
    E: EventStore,
{
    run_action(ctx, input, |input, principal| async move {
        let UpdateEvent {
            id,
            name,
            sport_type,
            date_time,
            description,
            venue_ids,
        } = input;

        let date_time = match date_time {
            Some(raw) => Some(parse_date_time(&raw)?),
            None => None,
        };

        let event = events
            .update(
                principal.0,
                id,
                EventChanges {
                    name,
                    sport_type,
                    date_time,
                    description,
                },
            )
            .await?
            .ok_or_else(|| ActionError::invalid("Event not found"))?;

        if let Some(ids) = venue_ids {
            events.clear_venue_links(id).await?;
            if !ids.is_empty() {
                events.link_venues(id, &ids).await?;
            }
        }

        Ok(event)
    })
    .await
}

/// Delete one of the caller's events. Succeeds whether or not a row
/// existed.
pub async fn delete_event<E>(
    events: &E,
    ctx: &AuthContext,
    input: DeleteEvent,
) -> ActionResult<Deleted>
where
    E: EventStore,
{
    run_action(ctx, input, |input, principal| async move {
        events.delete(principal.0, input.id).await?;
        Ok(Deleted { success: true })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use uuid::Uuid;

    fn create_input(name: &str, sport: &str, venue_ids: Vec<Uuid>) -> CreateEvent {
        CreateEvent {
            name: name.to_string(),
            sport_type: sport.to_string(),
            date_time: "2025-06-01T18:00:00Z".to_string(),
            description: None,
            venue_ids,
        }
    }

    fn update_input(id: Uuid) -> UpdateEvent {
        UpdateEvent {
            id,
            name: None,
            sport_type: None,
            date_time: None,
            description: None,
            venue_ids: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_ownership_and_generated_id() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let user_id = Uuid::new_v4();
        let ctx = testing::authed_ctx(user_id);

        let created = create_event(&events, &ctx, create_input("Finals", "Basketball", vec![venue.id]))
            .await
            .into_result()
            .unwrap();

        assert_eq!(created.user_id, user_id);
        assert_eq!(created.sport_type, "Basketball");
        assert!(!created.id.is_nil());

        // Id is immediately usable for a follow-up fetch by the same caller
        let fetched = get_event(&events, &venues, &ctx, GetEvent { id: created.id })
            .await
            .into_result()
            .unwrap()
            .expect("event should exist");
        assert_eq!(fetched.event.id, created.id);
        assert_eq!(fetched.venues.len(), 1);
        assert_eq!(fetched.venues[0].name, "Main Arena");
    }

    #[tokio::test]
    async fn list_matches_name_substring_case_insensitively() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let ctx = testing::authed_ctx(Uuid::new_v4());

        create_event(&events, &ctx, create_input("Finals", "Basketball", vec![venue.id]))
            .await
            .into_result()
            .unwrap();

        let found = list_events(
            &events,
            &venues,
            &ctx,
            SearchEvents {
                query: Some("fin".to_string()),
                sport_type: None,
            },
        )
        .await
        .into_result()
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].event.name, "Finals");

        let none = list_events(
            &events,
            &venues,
            &ctx,
            SearchEvents {
                query: Some("fin".to_string()),
                sport_type: Some("Tennis".to_string()),
            },
        )
        .await
        .into_result()
        .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn create_requires_at_least_one_venue() {
        let (events, _venues) = testing::stores();
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let result = create_event(&events, &ctx, create_input("Finals", "Basketball", vec![])).await;

        let error = result.into_result().unwrap_err();
        assert!(error.contains("At least one venue is required"), "got: {}", error);
    }

    #[tokio::test]
    async fn invalid_fields_report_all_messages() {
        let (events, _venues) = testing::stores();
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let input = CreateEvent {
            name: String::new(),
            sport_type: String::new(),
            date_time: String::new(),
            description: Some("x".repeat(1001)),
            venue_ids: vec![],
        };

        let error = create_event(&events, &ctx, input).await.into_result().unwrap_err();
        assert!(error.contains("Event name must be 1-255 characters"), "got: {}", error);
        assert!(error.contains("Sport type is required"), "got: {}", error);
        assert!(error.contains("Date and time is required"), "got: {}", error);
        assert!(
            error.contains("Description must be less than 1000 characters"),
            "got: {}",
            error
        );
        assert!(error.contains("At least one venue is required"), "got: {}", error);
    }

    #[tokio::test]
    async fn actions_require_a_principal() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let ctx = testing::anonymous_ctx();

        let result =
            create_event(&events, &ctx, create_input("Finals", "Basketball", vec![venue.id])).await;
        assert_eq!(result.into_result().unwrap_err(), "Unauthorized");

        let result = list_events(&events, &venues, &ctx, SearchEvents::default()).await;
        assert_eq!(result.into_result().unwrap_err(), "Unauthorized");
    }

    #[tokio::test]
    async fn events_are_invisible_to_other_principals() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let owner_ctx = testing::authed_ctx(Uuid::new_v4());
        let intruder_ctx = testing::authed_ctx(Uuid::new_v4());

        let created = create_event(
            &events,
            &owner_ctx,
            create_input("Finals", "Basketball", vec![venue.id]),
        )
        .await
        .into_result()
        .unwrap();

        // get: success-with-none, never the other user's data
        let fetched = get_event(&events, &venues, &intruder_ctx, GetEvent { id: created.id })
            .await
            .into_result()
            .unwrap();
        assert!(fetched.is_none());

        // update: failure
        let mut update = update_input(created.id);
        update.name = Some("Hijacked".to_string());
        let result = update_event(&events, &intruder_ctx, update).await;
        assert_eq!(result.into_result().unwrap_err(), "Event not found");

        // delete: reports success but leaves the record in place
        let deleted = delete_event(&events, &intruder_ctx, DeleteEvent { id: created.id })
            .await
            .into_result()
            .unwrap();
        assert_eq!(deleted, Deleted { success: true });

        let still_there = get_event(&events, &venues, &owner_ctx, GetEvent { id: created.id })
            .await
            .into_result()
            .unwrap();
        assert!(still_there.is_some());
        assert_eq!(still_there.unwrap().event.name, "Finals");
    }

    #[tokio::test]
    async fn partial_update_leaves_absent_fields_untouched() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let mut input = create_input("Finals", "Basketball", vec![venue.id]);
        input.description = Some("Championship game".to_string());
        let created = create_event(&events, &ctx, input).await.into_result().unwrap();

        let mut update = update_input(created.id);
        update.name = Some("Semifinals".to_string());
        let updated = update_event(&events, &ctx, update).await.into_result().unwrap();

        assert_eq!(updated.name, "Semifinals");
        assert_eq!(updated.sport_type, "Basketball");
        assert_eq!(updated.description.as_deref(), Some("Championship game"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn link_replacement_is_idempotent() {
        let (events, venues) = testing::stores();
        let a = testing::seed_venue(&venues, "Arena A").await;
        let b = testing::seed_venue(&venues, "Arena B").await;
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let created = create_event(&events, &ctx, create_input("Finals", "Basketball", vec![a.id]))
            .await
            .into_result()
            .unwrap();

        let mut update = update_input(created.id);
        update.venue_ids = Some(vec![a.id, b.id]);
        update_event(&events, &ctx, update.clone()).await.into_result().unwrap();
        update_event(&events, &ctx, update).await.into_result().unwrap();

        let fetched = get_event(&events, &venues, &ctx, GetEvent { id: created.id })
            .await
            .into_result()
            .unwrap()
            .unwrap();
        let mut names: Vec<_> = fetched.venues.iter().map(|v| v.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Arena A", "Arena B"]);
    }

    #[tokio::test]
    async fn update_rejects_an_empty_venue_list() {
        let (events, venues) = testing::stores();
        let venue = testing::seed_venue(&venues, "Main Arena").await;
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let created = create_event(&events, &ctx, create_input("Finals", "Basketball", vec![venue.id]))
            .await
            .into_result()
            .unwrap();

        // A present venue list must still carry at least one entry; omitting
        // the field is the way to leave links alone
        let mut update = update_input(created.id);
        update.venue_ids = Some(vec![]);
        let error = update_event(&events, &ctx, update).await.into_result().unwrap_err();
        assert!(error.contains("At least one venue is required"), "got: {}", error);

        let fetched = get_event(&events, &venues, &ctx, GetEvent { id: created.id })
            .await
            .into_result()
            .unwrap()
            .unwrap();
        assert_eq!(fetched.venues.len(), 1);
    }

    #[tokio::test]
    async fn delete_of_missing_event_still_succeeds() {
        let (events, _venues) = testing::stores();
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let result = delete_event(&events, &ctx, DeleteEvent { id: Uuid::new_v4() }).await;
        assert_eq!(result.into_result().unwrap(), Deleted { success: true });
    }

    #[tokio::test]
    async fn get_of_missing_event_is_success_with_none() {
        let (events, venues) = testing::stores();
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let result = get_event(&events, &venues, &ctx, GetEvent { id: Uuid::new_v4() }).await;
        assert_eq!(result.into_result().unwrap(), None);
    }

    #[tokio::test]
    async fn unparseable_date_time_fails_the_action() {
        let (events, _venues) = testing::stores();
        let ctx = testing::authed_ctx(Uuid::new_v4());

        let mut input = create_input("Finals", "Basketball", vec![Uuid::new_v4()]);
        input.date_time = "next tuesday".to_string();

        let error = create_event(&events, &ctx, input).await.into_result().unwrap_err();
        assert_eq!(error, "Invalid date and time format");
    }
}
