// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines the stored place record, form DTOs, and populated views

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{CommentView, User};

/// Geographic position of a place, always ordered [longitude, latitude]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Coordinates {
            longitude,
            latitude,
        }
    }

    /// [longitude, latitude], the order used in storage and GeoJSON
    pub fn as_array(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Range validators let NaN through, so this is checked separately
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Represents a complete place record from the database
/// DOCUMENTATION: Maps to the places table; location is a PostGIS POINT
/// that is read back through ST_X / ST_Y
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Place name - unique across all places
    pub name: String,

    /// Uploaded image URL on the image host
    pub images: Option<String>,

    pub description: String,

    pub coordinates: Coordinates,

    /// User that created (and owns) the place
    pub creator_id: Uuid,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Ownership is a plain id comparison against the session user
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    /// Point feature consumed by the map widget on the detail page
    pub fn to_geojson_feature(&self) -> geojson::Feature {
        let point = self.coordinates.to_point();

        let mut properties = geojson::JsonObject::new();
        properties.insert("id".to_string(), serde_json::json!(self.id));
        properties.insert("name".to_string(), serde_json::json!(self.name));

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&point))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Request DTO for creating a new place
/// DOCUMENTATION: Built from the multipart fields of POST /place/create
#[derive(Debug, Clone, Validate)]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: String,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl CreatePlaceRequest {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.longitude, self.latitude)
    }

    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

/// Request DTO for updating an existing place
/// DOCUMENTATION: urlencoded body of POST /place/{place_id}/edit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

impl UpdatePlaceRequest {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.longitude, self.latitude)
    }

    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

/// Insert payload handed to the store
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub images: Option<String>,
    pub description: String,
    pub coordinates: Coordinates,
    pub creator_id: Uuid,
}

/// Fields an owner may change through the edit form
#[derive(Debug, Clone)]
pub struct PlaceChanges {
    pub name: String,
    pub description: String,
    pub coordinates: Coordinates,
}

/// Place with its creator populated, as shown on the list page
/// DOCUMENTATION: creator is None when the user no longer exists
#[derive(Debug, Clone, Serialize)]
pub struct PlaceListItem {
    pub place: Place,
    pub creator: Option<User>,
}

/// Everything the detail page renders
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetail {
    pub place: Place,
    pub creator: User,
    pub is_owner: bool,
    pub comments: Vec<CommentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place() -> Place {
        Place {
            id: Uuid::new_v4(),
            name: "Cafe Lisboa".to_string(),
            images: None,
            description: "Fast wifi".to_string(),
            coordinates: Coordinates::new(-9.1393, 38.7223),
            creator_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_coordinates_order() {
        let coords = Coordinates::new(-9.1393, 38.7223);
        assert_eq!(coords.as_array(), [-9.1393, 38.7223]);

        let point = coords.to_point();
        assert_eq!(point.x(), -9.1393);
        assert_eq!(point.y(), 38.7223);
    }

    #[test]
    fn test_geojson_feature_is_lon_lat() {
        let place = sample_place();
        let feature = place.to_geojson_feature();

        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["geometry"]["type"], "Point");
        assert_eq!(json["geometry"]["coordinates"][0], -9.1393);
        assert_eq!(json["geometry"]["coordinates"][1], 38.7223);
        assert_eq!(json["properties"]["name"], "Cafe Lisboa");
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreatePlaceRequest {
            name: "Cowork Porto".to_string(),
            description: String::new(),
            longitude: -8.61,
            latitude: 41.15,
        };
        assert!(valid.validate().is_ok());

        let out_of_range = CreatePlaceRequest {
            latitude: 123.0,
            ..valid.clone()
        };
        assert!(out_of_range.validate().is_err());

        let unnamed = CreatePlaceRequest {
            name: String::new(),
            ..valid
        };
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_ownership() {
        let place = sample_place();
        assert!(place.is_owned_by(place.creator_id));
        assert!(!place.is_owned_by(Uuid::new_v4()));
    }
}
