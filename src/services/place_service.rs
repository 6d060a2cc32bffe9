// src/services/place_service.rs
// DOCUMENTATION: Business logic for places
// PURPOSE: Intermediary between handlers and the store; ownership rules live here

use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::models::{
    Coordinates, CreatePlaceRequest, NewPlace, Place, PlaceChanges, PlaceDetail,
    PlaceListItem, UpdatePlaceRequest,
};
use uuid::Uuid;
use validator::Validate;

pub struct PlaceService;

impl PlaceService {
    /// All places for the list page
    pub async fn list_places(store: &dyn PlaceStore) -> Result<Vec<PlaceListItem>, PlacesError> {
        store.list_places().await
    }

    /// Field rules for a new place, without touching the store
    /// DOCUMENTATION: The create handler runs this before uploading the image
    pub fn check_create(req: &CreatePlaceRequest) -> Result<(), PlacesError> {
        check_input(req, req.coordinates())
    }

    /// Create a new place owned by `creator_id`
    /// DOCUMENTATION: `images` is the URL returned by the image host, if a
    /// file was attached
    pub async fn create_place(
        store: &dyn PlaceStore,
        req: CreatePlaceRequest,
        images: Option<String>,
        creator_id: Uuid,
    ) -> Result<Place, PlacesError> {
        let req = req.trimmed();
        Self::check_create(&req)?;

        let new_place = NewPlace {
            coordinates: req.coordinates(),
            name: req.name,
            images,
            description: req.description,
            creator_id,
        };

        store.create_place(&new_place).await
    }

    /// Place, creator and comments for the detail page
    /// DOCUMENTATION: A creator that does not resolve is an error, not a
    /// blank author
    pub async fn get_place_detail(
        store: &dyn PlaceStore,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<PlaceDetail, PlacesError> {
        let item = store.find_place_with_creator(id).await?.ok_or_else(|| {
            log::warn!("Place not found: {}", id);
            PlacesError::NotFound(id.to_string())
        })?;

        let creator = item.creator.ok_or_else(|| {
            log::error!(
                "Creator {} of place {} does not resolve",
                item.place.creator_id,
                id
            );
            PlacesError::CreatorNotFound(item.place.creator_id)
        })?;

        let is_owner = viewer.map_or(false, |user_id| creator.id == user_id);
        let comments = store.list_comments_for_place(id).await?;

        Ok(PlaceDetail {
            place: item.place,
            creator,
            is_owner,
            comments,
        })
    }

    /// Place for the edit form, or None when `viewer` does not own it
    pub async fn get_editable_place(
        store: &dyn PlaceStore,
        id: Uuid,
        viewer: Uuid,
    ) -> Result<Option<Place>, PlacesError> {
        let place = store.find_place(id).await?.ok_or_else(|| {
            log::warn!("Place not found: {}", id);
            PlacesError::NotFound(id.to_string())
        })?;

        if place.is_owned_by(viewer) {
            Ok(Some(place))
        } else {
            log::warn!("User {} tried to edit place {} they do not own", viewer, id);
            Ok(None)
        }
    }

    /// Update a place; returns false when nothing matched (missing or not owned)
    pub async fn update_place(
        store: &dyn PlaceStore,
        id: Uuid,
        owner_id: Uuid,
        req: UpdatePlaceRequest,
    ) -> Result<bool, PlacesError> {
        let req = req.trimmed();
        check_input(&req, req.coordinates())?;

        let changes = PlaceChanges {
            coordinates: req.coordinates(),
            name: req.name,
            description: req.description,
        };

        let matched = store.update_owned_place(id, owner_id, &changes).await?;
        if matched == 0 {
            log::info!("Edit of place {} by {} matched nothing", id, owner_id);
        }
        Ok(matched > 0)
    }

    /// Delete a place; returns false when nothing matched (missing or not owned)
    pub async fn delete_place(
        store: &dyn PlaceStore,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, PlacesError> {
        let removed = store.delete_owned_place(id, owner_id).await?;
        if removed > 0 {
            log::info!("Deleted place {}", id);
        } else {
            log::info!("Delete of place {} by {} matched nothing", id, owner_id);
        }
        Ok(removed > 0)
    }
}

fn check_input<T: Validate>(req: &T, coordinates: Coordinates) -> Result<(), PlacesError> {
    if !coordinates.is_finite() {
        return Err(PlacesError::ValidationError(
            "coordinates must be finite numbers".to_string(),
        ));
    }
    req.validate()
        .map_err(|e| PlacesError::ValidationError(e.to_string()))
}
