// src/db/memory.rs
// DOCUMENTATION: In-memory PlaceStore for tests
// PURPOSE: Same semantics as PgStore (unique names, owner filters) without PostgreSQL

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::models::{Comment, CommentView, NewPlace, Place, PlaceChanges, PlaceListItem, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    places: Vec<Place>,
    comments: Vec<Comment>,
    unavailable: bool,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, name: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.tables.write().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn remove_user(&self, id: Uuid) {
        self.tables.write().await.users.remove(&id);
    }

    pub async fn add_comment(&self, place_id: Uuid, creator_id: Uuid, content: &str) -> Comment {
        let mut tables = self.tables.write().await;
        // Strictly increasing timestamps keep the oldest-first order deterministic
        let created_at = Utc::now() + Duration::milliseconds(tables.comments.len() as i64);
        let comment = Comment {
            id: Uuid::new_v4(),
            place_id,
            creator_id: Some(creator_id),
            content: content.to_string(),
            created_at,
        };
        tables.comments.push(comment.clone());
        comment
    }

    /// Make `ping` fail, as if the database went away
    pub async fn set_unavailable(&self) {
        self.tables.write().await.unavailable = true;
    }

    pub async fn places_named(&self, name: &str) -> Vec<Place> {
        self.tables
            .read()
            .await
            .places
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlaceStore for InMemoryStore {
    async fn list_places(&self) -> Result<Vec<PlaceListItem>, PlacesError> {
        let tables = self.tables.read().await;
        let mut items: Vec<PlaceListItem> = tables
            .places
            .iter()
            .map(|p| PlaceListItem {
                place: p.clone(),
                creator: tables.users.get(&p.creator_id).cloned(),
            })
            .collect();
        items.sort_by(|a, b| b.place.created_at.cmp(&a.place.created_at));
        Ok(items)
    }

    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, PlacesError> {
        let tables = self.tables.read().await;
        Ok(tables.places.iter().find(|p| p.id == id).cloned())
    }

    async fn find_place_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<PlaceListItem>, PlacesError> {
        let tables = self.tables.read().await;
        Ok(tables
            .places
            .iter()
            .find(|p| p.id == id)
            .map(|p| PlaceListItem {
                place: p.clone(),
                creator: tables.users.get(&p.creator_id).cloned(),
            }))
    }

    async fn create_place(&self, new_place: &NewPlace) -> Result<Place, PlacesError> {
        let mut tables = self.tables.write().await;
        if tables.places.iter().any(|p| p.name == new_place.name) {
            return Err(PlacesError::AlreadyExists(new_place.name.clone()));
        }

        let now = Utc::now() + Duration::milliseconds(tables.places.len() as i64);
        let place = Place {
            id: Uuid::new_v4(),
            name: new_place.name.clone(),
            images: new_place.images.clone(),
            description: new_place.description.clone(),
            coordinates: new_place.coordinates,
            creator_id: new_place.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.places.push(place.clone());
        Ok(place)
    }

    async fn update_owned_place(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &PlaceChanges,
    ) -> Result<u64, PlacesError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .places
            .iter()
            .position(|p| p.id == id && p.creator_id == owner_id)
        else {
            return Ok(0);
        };

        // The unique index only fires for a row the UPDATE actually touches
        if tables
            .places
            .iter()
            .any(|p| p.id != id && p.name == changes.name)
        {
            return Err(PlacesError::AlreadyExists(changes.name.clone()));
        }

        let place = &mut tables.places[index];
        place.name = changes.name.clone();
        place.description = changes.description.clone();
        place.coordinates = changes.coordinates;
        place.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete_owned_place(&self, id: Uuid, owner_id: Uuid) -> Result<u64, PlacesError> {
        let mut tables = self.tables.write().await;
        let before = tables.places.len();
        tables
            .places
            .retain(|p| !(p.id == id && p.creator_id == owner_id));
        let removed = (before - tables.places.len()) as u64;
        if removed > 0 {
            tables.comments.retain(|c| c.place_id != id);
        }
        Ok(removed)
    }

    async fn list_comments_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<CommentView>, PlacesError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<CommentView> = tables
            .comments
            .iter()
            .filter(|c| c.place_id == place_id)
            .map(|c| CommentView {
                comment: c.clone(),
                creator: c.creator_id.and_then(|id| tables.users.get(&id).cloned()),
            })
            .collect();
        comments.sort_by(|a, b| a.comment.created_at.cmp(&b.comment.created_at));
        Ok(comments)
    }

    async fn ping(&self) -> Result<(), PlacesError> {
        if self.tables.read().await.unavailable {
            return Err(PlacesError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}
