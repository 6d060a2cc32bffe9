// src/db/store.rs
// DOCUMENTATION: Storage interface used by the service layer
// PURPOSE: One async trait over places, comments and their populated users

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{CommentRepository, PlaceRepository};
use crate::errors::PlacesError;
use crate::models::{CommentView, NewPlace, Place, PlaceChanges, PlaceListItem};

/// Document store for places
/// DOCUMENTATION: Shared across workers as `web::Data<dyn PlaceStore>`
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// All places, newest first, with creators populated
    async fn list_places(&self) -> Result<Vec<PlaceListItem>, PlacesError>;

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, PlacesError>;

    /// Place with its creator populated; the creator is None if it does not resolve
    async fn find_place_with_creator(&self, id: Uuid)
        -> Result<Option<PlaceListItem>, PlacesError>;

    /// Insert a place; a taken name yields `PlacesError::AlreadyExists`
    async fn create_place(&self, new_place: &NewPlace) -> Result<Place, PlacesError>;

    /// Update the place only if `owner_id` created it. Returns matched rows.
    async fn update_owned_place(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &PlaceChanges,
    ) -> Result<u64, PlacesError>;

    /// Delete the place only if `owner_id` created it. Returns removed rows.
    async fn delete_owned_place(&self, id: Uuid, owner_id: Uuid) -> Result<u64, PlacesError>;

    /// Comments of one place, oldest first, with creators populated
    async fn list_comments_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<CommentView>, PlacesError>;

    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<(), PlacesError>;
}

/// PostgreSQL implementation backed by the sqlx pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceStore for PgStore {
    async fn list_places(&self) -> Result<Vec<PlaceListItem>, PlacesError> {
        PlaceRepository::list_with_creators(&self.pool).await
    }

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, PlacesError> {
        Ok(PlaceRepository::find_by_id(&self.pool, id)
            .await?
            .map(|item| item.place))
    }

    async fn find_place_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<PlaceListItem>, PlacesError> {
        PlaceRepository::find_by_id(&self.pool, id).await
    }

    async fn create_place(&self, new_place: &NewPlace) -> Result<Place, PlacesError> {
        PlaceRepository::create_place(&self.pool, new_place).await
    }

    async fn update_owned_place(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &PlaceChanges,
    ) -> Result<u64, PlacesError> {
        PlaceRepository::update_owned(&self.pool, id, owner_id, changes).await
    }

    async fn delete_owned_place(&self, id: Uuid, owner_id: Uuid) -> Result<u64, PlacesError> {
        PlaceRepository::delete_owned(&self.pool, id, owner_id).await
    }

    async fn list_comments_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<CommentView>, PlacesError> {
        CommentRepository::list_by_place(&self.pool, place_id).await
    }

    async fn ping(&self) -> Result<(), PlacesError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
