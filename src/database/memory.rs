use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Event, EventVenue, User, Venue};
use super::store::{EventChanges, EventStore, NewEvent, StoreError, UserStore, VenueStore};

/// In-memory implementation of EventStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
    links: Arc<RwLock<Vec<EventVenue>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list(
        &self,
        owner: Uuid,
        name_like: Option<&str>,
        sport_type: Option<&str>,
    ) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        let needle = name_like.map(|s| s.to_lowercase());

        let mut matched: Vec<Event> = events
            .values()
            .filter(|e| e.user_id == owner)
            .filter(|e| {
                needle
                    .as_deref()
                    .map_or(true, |n| e.name.to_lowercase().contains(n))
            })
            .filter(|e| sport_type.map_or(true, |s| e.sport_type == s))
            .cloned()
            .collect();

        matched.sort_by_key(|e| e.date_time);
        Ok(matched)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events.get(&id).filter(|e| e.user_id == owner).cloned())
    }

    async fn insert(&self, owner: Uuid, new: NewEvent) -> Result<Event, StoreError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            user_id: owner,
            name: new.name,
            sport_type: new.sport_type,
            date_time: new.date_time,
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EventChanges,
    ) -> Result<Option<Event>, StoreError> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&id).filter(|e| e.user_id == owner) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            event.name = name;
        }
        if let Some(sport_type) = changes.sport_type {
            event.sport_type = sport_type;
        }
        if let Some(date_time) = changes.date_time {
            event.date_time = date_time;
        }
        if let Some(description) = changes.description {
            event.description = Some(description);
        }
        event.updated_at = Utc::now();

        Ok(Some(event.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut events = self.events.write().await;
        if events.get(&id).is_some_and(|e| e.user_id == owner) {
            events.remove(&id);
            self.links.write().await.retain(|l| l.event_id != id);
        }
        Ok(())
    }

    async fn venue_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .filter(|l| l.event_id == event_id)
            .map(|l| l.venue_id)
            .collect())
    }

    async fn clear_venue_links(&self, event_id: Uuid) -> Result<(), StoreError> {
        self.links.write().await.retain(|l| l.event_id != event_id);
        Ok(())
    }

    async fn link_venues(&self, event_id: Uuid, venue_ids: &[Uuid]) -> Result<(), StoreError> {
        let mut links = self.links.write().await;
        for venue_id in venue_ids {
            links.push(EventVenue {
                id: Uuid::new_v4(),
                event_id,
                venue_id: *venue_id,
            });
        }
        Ok(())
    }
}

/// In-memory implementation of VenueStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryVenueStore {
    venues: Arc<RwLock<HashMap<Uuid, Venue>>>,
}

impl InMemoryVenueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VenueStore for InMemoryVenueStore {
    async fn list(&self) -> Result<Vec<Venue>, StoreError> {
        let venues = self.venues.read().await;
        let mut all: Vec<Venue> = venues.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Venue>, StoreError> {
        let venues = self.venues.read().await;
        Ok(ids.iter().filter_map(|id| venues.get(id).cloned()).collect())
    }

    async fn insert(&self, name: &str, address: Option<&str>) -> Result<Venue, StoreError> {
        let venue = Venue {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: address.map(str::to_string),
            created_at: Utc::now(),
        };

        self.venues.write().await.insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<Venue>, StoreError> {
        let mut venues = self.venues.write().await;
        let Some(venue) = venues.get_mut(&id) else {
            return Ok(None);
        };

        venue.name = name.to_string();
        venue.address = address.map(str::to_string);
        Ok(Some(venue.clone()))
    }
}

/// In-memory implementation of UserStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.to_lowercase() == email.to_lowercase());
        if email_exists {
            return Err(StoreError::Conflict("User already registered".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, email = %user.email, "created user");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_event(name: &str, sport: &str, offset_hours: i64) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            sport_type: sport.to_string(),
            date_time: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
                + chrono::Duration::hours(offset_hours),
            description: None,
        }
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_orders_by_time() {
        let store = InMemoryEventStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(alice, new_event("Later", "Tennis", 5)).await.unwrap();
        store.insert(alice, new_event("Sooner", "Tennis", 1)).await.unwrap();
        store.insert(bob, new_event("Other", "Tennis", 0)).await.unwrap();

        let events = store.list(alice, None, None).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Sooner");
        assert_eq!(events[1].name, "Later");
    }

    #[tokio::test]
    async fn list_substring_filter_is_case_insensitive() {
        let store = InMemoryEventStore::new();
        let owner = Uuid::new_v4();
        store.insert(owner, new_event("Finals", "Basketball", 0)).await.unwrap();
        store.insert(owner, new_event("Practice", "Basketball", 1)).await.unwrap();

        let events = store.list(owner, Some("FIN"), None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Finals");
    }

    #[tokio::test]
    async fn link_replacement_leaves_no_duplicates() {
        let store = InMemoryEventStore::new();
        let owner = Uuid::new_v4();
        let event = store.insert(owner, new_event("Finals", "Basketball", 0)).await.unwrap();
        let (v1, v2) = (Uuid::new_v4(), Uuid::new_v4());

        store.link_venues(event.id, &[v1, v2]).await.unwrap();
        store.clear_venue_links(event.id).await.unwrap();
        store.link_venues(event.id, &[v1, v2]).await.unwrap();

        let mut ids = store.venue_ids(event.id).await.unwrap();
        ids.sort();
        let mut expected = vec![v1, v2];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryUserStore::new();
        store.insert("pat@example.com", "hash").await.unwrap();

        let err = store.insert("PAT@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(err.to_string(), "User already registered");
    }

    #[tokio::test]
    async fn venues_list_ordered_by_name() {
        let store = InMemoryVenueStore::new();
        store.insert("Westside Gym", None).await.unwrap();
        store.insert("Arena One", Some("1 Main St")).await.unwrap();

        let venues = store.list().await.unwrap();
        assert_eq!(venues[0].name, "Arena One");
        assert_eq!(venues[1].name, "Westside Gym");
    }
}
