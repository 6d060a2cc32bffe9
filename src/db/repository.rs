// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries for places
// PURPOSE: Abstract database operations from business logic

use crate::errors::PlacesError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Postgres error code for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Columns shared by every place read. Creator columns come from a LEFT JOIN
/// so users that no longer exist show up as NULL.
const SELECT_PLACE: &str = r#"
    SELECT
        p.id, p.name, p.images, p.description,
        ST_X(p.location) as longitude, ST_Y(p.location) as latitude,
        p.creator_id, p.created_at, p.updated_at,
        u.id as creator_user_id, u.name as creator_name
    FROM places p
    LEFT JOIN users u ON u.id = p.creator_id
"#;

/// Internal struct for mapping database rows to Place struct
/// DOCUMENTATION: Handles PostGIS POINT extraction via ST_X() and ST_Y()
#[derive(Debug, FromRow)]
struct PlaceRow {
    pub id: Uuid,
    pub name: String,
    pub images: Option<String>,
    pub description: String,
    pub longitude: f64, // From ST_X(location)
    pub latitude: f64,  // From ST_Y(location)
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub creator_user_id: Option<Uuid>,
    #[sqlx(default)]
    pub creator_name: Option<String>,
}

impl PlaceRow {
    fn into_list_item(self) -> PlaceListItem {
        let creator = match (self.creator_user_id, self.creator_name) {
            (Some(id), Some(name)) => Some(User { id, name }),
            _ => None,
        };

        PlaceListItem {
            place: Place {
                id: self.id,
                name: self.name,
                images: self.images,
                description: self.description,
                coordinates: Coordinates::new(self.longitude, self.latitude),
                creator_id: self.creator_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            creator,
        }
    }
}

/// Turns a unique-index conflict on the name into AlreadyExists
fn map_write_error(e: sqlx::Error, name: &str) -> PlacesError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            log::warn!("Place name already taken: {}", name);
            return PlacesError::AlreadyExists(name.to_string());
        }
    }
    log::error!("Write failed for place {}: {}", name, e);
    PlacesError::DatabaseError(e.to_string())
}

/// PlaceRepository: All database operations for places
/// DOCUMENTATION: Uses query_as for type-safe SQL queries with PostGIS support
pub struct PlaceRepository;

impl PlaceRepository {
    /// Create new place in database
    /// DOCUMENTATION: The unique index on name makes the duplicate check
    /// part of the insert itself, so concurrent submissions cannot both win
    pub async fn create_place(pool: &PgPool, req: &NewPlace) -> Result<Place, PlacesError> {
        let [longitude, latitude] = req.coordinates.as_array();

        let row = sqlx::query_as::<_, PlaceRow>(
            r#"
            INSERT INTO places (
                name, images, description, location, creator_id,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3,
                ST_SetSRID(ST_MakePoint($4, $5), 4326),
                $6,
                NOW(), NOW()
            )
            ON CONFLICT (name) DO NOTHING
            RETURNING
                id, name, images, description,
                ST_X(location) as longitude, ST_Y(location) as latitude,
                creator_id, created_at, updated_at
            "#,
        )
        .bind(&req.name) // $1
        .bind(&req.images) // $2
        .bind(&req.description) // $3
        .bind(longitude) // $4
        .bind(latitude) // $5
        .bind(req.creator_id) // $6
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, &req.name))?
        .ok_or_else(|| {
            log::warn!("Place name already taken: {}", req.name);
            PlacesError::AlreadyExists(req.name.clone())
        })?;

        let place = row.into_list_item().place;
        log::info!("Created place with id: {}", place.id);
        Ok(place)
    }

    /// Retrieve place by ID with its creator
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PlaceListItem>, PlacesError> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PLACE);

        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching place {}: {}", id, e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(PlaceRow::into_list_item))
    }

    /// List every place for the list page
    pub async fn list_with_creators(pool: &PgPool) -> Result<Vec<PlaceListItem>, PlacesError> {
        let sql = format!("{} ORDER BY p.created_at DESC", SELECT_PLACE);

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("List places query error: {}", e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        log::debug!("Listed {} places", rows.len());
        Ok(rows.into_iter().map(PlaceRow::into_list_item).collect())
    }

    /// Update a place owned by `owner_id`
    /// DOCUMENTATION: The owner filter lives in the WHERE clause; a non-owner
    /// matches zero rows and nothing changes
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        changes: &PlaceChanges,
    ) -> Result<u64, PlacesError> {
        let [longitude, latitude] = changes.coordinates.as_array();

        let rows = sqlx::query(
            r#"
            UPDATE places
            SET name = $1,
                description = $2,
                location = ST_SetSRID(ST_MakePoint($3, $4), 4326),
                creator_id = $5,
                updated_at = NOW()
            WHERE id = $6 AND creator_id = $5
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(longitude)
        .bind(latitude)
        .bind(owner_id)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_write_error(e, &changes.name))?
        .rows_affected();

        if rows > 0 {
            log::info!("Updated place: {}", id);
        }
        Ok(rows)
    }

    /// Hard delete a place owned by `owner_id`; comments cascade
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<u64, PlacesError> {
        let rows = sqlx::query("DELETE FROM places WHERE id = $1 AND creator_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for place {}: {}", id, e);
                PlacesError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        Ok(rows)
    }
}
