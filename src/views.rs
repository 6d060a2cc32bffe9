// src/views.rs
// DOCUMENTATION: Server-rendered pages
// PURPOSE: askama templates (templates/) and the helper that turns them into responses

use actix_web::{http::header::ContentType, HttpResponse};
use askama::Template;

use crate::errors::PlacesError;
use crate::models::{Place, PlaceDetail, PlaceListItem};

#[derive(Template)]
#[template(path = "place/list.html")]
pub struct PlaceListTemplate {
    pub places: Vec<PlaceListItem>,
}

#[derive(Template)]
#[template(path = "place/create.html")]
pub struct PlaceCreateTemplate {}

#[derive(Template)]
#[template(path = "place/single.html")]
pub struct PlaceDetailTemplate {
    pub detail: PlaceDetail,
    /// Key for the embedded map widget
    pub api_key: String,
    /// GeoJSON point of the place, safe to inline in a <script> block
    pub place_geojson: String,
}

impl PlaceDetailTemplate {
    pub fn new(detail: PlaceDetail, api_key: String) -> Result<Self, PlacesError> {
        let feature = detail.place.to_geojson_feature();
        let place_geojson = serde_json::to_string(&feature)
            .map_err(|e| PlacesError::TemplateError(e.to_string()))?
            .replace("</", "<\\/");

        Ok(Self {
            detail,
            api_key,
            place_geojson,
        })
    }
}

#[derive(Template)]
#[template(path = "place/edit.html")]
pub struct PlaceEditTemplate {
    pub place: Place,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
    pub timestamp: String,
}

/// Render a page as a 200 HTML response
pub fn render<T: Template>(template: &T) -> Result<HttpResponse, PlacesError> {
    let html = template.render().map_err(|e| {
        log::error!("Template rendering failed: {}", e);
        PlacesError::TemplateError(e.to_string())
    })?;

    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}
