use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Event, User, Venue};
use super::store::{EventChanges, EventStore, NewEvent, StoreError, UserStore, VenueStore};

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(
        &self,
        owner: Uuid,
        name_like: Option<&str>,
        sport_type: Option<&str>,
    ) -> Result<Vec<Event>, StoreError> {
        let mut sql = String::from("SELECT * FROM events WHERE user_id = $1");
        let mut next = 2;
        if name_like.is_some() {
            sql.push_str(&format!(" AND name ILIKE ${}", next));
            next += 1;
        }
        if sport_type.is_some() {
            sql.push_str(&format!(" AND sport_type = ${}", next));
        }
        sql.push_str(" ORDER BY date_time ASC");

        let mut query = sqlx::query_as::<_, Event>(&sql).bind(owner);
        if let Some(pattern) = name_like {
            query = query.bind(format!("%{}%", pattern));
        }
        if let Some(sport) = sport_type {
            query = query.bind(sport.to_string());
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn insert(&self, owner: Uuid, new: NewEvent) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (user_id, name, sport_type, date_time, description) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(owner)
        .bind(new.name)
        .bind(new.sport_type)
        .bind(new.date_time)
        .bind(new.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EventChanges,
    ) -> Result<Option<Event>, StoreError> {
        let mut sql = String::from("UPDATE events SET updated_at = NOW()");
        let mut next = 1;
        if changes.name.is_some() {
            sql.push_str(&format!(", name = ${}", next));
            next += 1;
        }
        if changes.sport_type.is_some() {
            sql.push_str(&format!(", sport_type = ${}", next));
            next += 1;
        }
        if changes.date_time.is_some() {
            sql.push_str(&format!(", date_time = ${}", next));
            next += 1;
        }
        if changes.description.is_some() {
            sql.push_str(&format!(", description = ${}", next));
            next += 1;
        }
        sql.push_str(&format!(
            " WHERE id = ${} AND user_id = ${} RETURNING *",
            next,
            next + 1
        ));

        let mut query = sqlx::query_as::<_, Event>(&sql);
        if let Some(name) = changes.name {
            query = query.bind(name);
        }
        if let Some(sport_type) = changes.sport_type {
            query = query.bind(sport_type);
        }
        if let Some(date_time) = changes.date_time {
            query = query.bind(date_time);
        }
        if let Some(description) = changes.description {
            query = query.bind(description);
        }
        let event = query.bind(id).bind(owner).fetch_optional(&self.pool).await?;

        Ok(event)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn venue_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT venue_id FROM event_venues WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn clear_venue_links(&self, event_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM event_venues WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn link_venues(&self, event_id: Uuid, venue_ids: &[Uuid]) -> Result<(), StoreError> {
        if venue_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO event_venues (event_id, venue_id) SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(event_id)
        .bind(venue_ids.to_vec())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgVenueStore {
    pool: PgPool,
}

impl PgVenueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueStore for PgVenueStore {
    async fn list(&self) -> Result<Vec<Venue>, StoreError> {
        let venues = sqlx::query_as::<_, Venue>("SELECT * FROM venues ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(venues)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Venue>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let venues = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(venues)
    }

    async fn insert(&self, name: &str, address: Option<&str>) -> Result<Venue, StoreError> {
        let venue = sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (name, address) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(venue)
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<Venue>, StoreError> {
        let venue = sqlx::query_as::<_, Venue>(
            "UPDATE venues SET name = $1, address = $2 WHERE id = $3 RETURNING *",
        )
        .bind(name)
        .bind(address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(venue)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict("User already registered".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
