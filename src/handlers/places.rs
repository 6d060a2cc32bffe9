// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place pages
// PURPOSE: Parse requests, call services, render views or redirect

use crate::config::Config;
use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::handlers::place_form::CreatePlaceForm;
use crate::middleware::{CurrentUser, RouteGuard};
use crate::models::UpdatePlaceRequest;
use crate::services::{ImageUploader, PlaceService};
use crate::views::{
    self, PlaceCreateTemplate, PlaceDetailTemplate, PlaceEditTemplate, PlaceListTemplate,
};
use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse};
use uuid::Uuid;

/// Where every successful write lands
pub const LIST_PATH: &str = "/place/list";

fn redirect_to_list() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, LIST_PATH))
        .finish()
}

/// GET /place/list
pub async fn list_places(store: web::Data<dyn PlaceStore>) -> Result<HttpResponse, PlacesError> {
    let places = PlaceService::list_places(store.get_ref()).await?;
    views::render(&PlaceListTemplate { places })
}

/// GET /place/create
pub async fn create_form() -> Result<HttpResponse, PlacesError> {
    views::render(&PlaceCreateTemplate {})
}

/// POST /place/create
/// Multipart form; the optional `images` file is uploaded once the fields
/// pass validation, before the insert
pub async fn create_place(
    store: web::Data<dyn PlaceStore>,
    uploader: web::Data<dyn ImageUploader>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse, PlacesError> {
    let form = CreatePlaceForm::from_multipart(payload).await?;
    let (request, image) = form.into_request()?;
    PlaceService::check_create(&request)?;

    let images = match image {
        Some(file) => Some(uploader.upload(file).await?),
        None => None,
    };

    PlaceService::create_place(store.get_ref(), request, images, user.id()).await?;
    Ok(redirect_to_list())
}

/// GET /place/{place_id}
pub async fn place_detail(
    store: web::Data<dyn PlaceStore>,
    config: web::Data<Config>,
    user: Option<CurrentUser>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlacesError> {
    let place_id = path.into_inner();
    let viewer = user.map(|u| u.id());

    let detail = PlaceService::get_place_detail(store.get_ref(), place_id, viewer).await?;
    let page = PlaceDetailTemplate::new(detail, config.maps_api_key.clone())?;
    views::render(&page)
}

/// POST /place/{place_id}/delete
pub async fn delete_place(
    store: web::Data<dyn PlaceStore>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlacesError> {
    PlaceService::delete_place(store.get_ref(), path.into_inner(), user.id()).await?;
    Ok(redirect_to_list())
}

/// GET /place/{place_id}/edit
/// Non-owners are sent back to the list
pub async fn edit_form(
    store: web::Data<dyn PlaceStore>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, PlacesError> {
    match PlaceService::get_editable_place(store.get_ref(), path.into_inner(), user.id()).await? {
        Some(place) => views::render(&PlaceEditTemplate { place }),
        None => Ok(redirect_to_list()),
    }
}

/// POST /place/{place_id}/edit
pub async fn update_place(
    store: web::Data<dyn PlaceStore>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    form: web::Form<UpdatePlaceRequest>,
) -> Result<HttpResponse, PlacesError> {
    PlaceService::update_place(
        store.get_ref(),
        path.into_inner(),
        user.id(),
        form.into_inner(),
    )
    .await?;
    Ok(redirect_to_list())
}

/// Configuration for place routes
/// DOCUMENTATION: /list and /create are registered before /{place_id} so
/// they are not captured as ids
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/place")
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                PlacesError::NotFound(err.to_string()).into()
            }))
            .app_data(web::FormConfig::default().error_handler(|err, _req| {
                PlacesError::InvalidInput(err.to_string()).into()
            }))
            .route("/list", web::get().to(list_places))
            .service(
                web::resource("/create")
                    .wrap(RouteGuard)
                    .route(web::get().to(create_form))
                    .route(web::post().to(create_place)),
            )
            .service(
                web::resource("/{place_id}")
                    .wrap(RouteGuard)
                    .route(web::get().to(place_detail)),
            )
            .service(
                web::resource("/{place_id}/delete")
                    .wrap(RouteGuard)
                    .route(web::post().to(delete_place)),
            )
            .service(
                web::resource("/{place_id}/edit")
                    .wrap(RouteGuard)
                    .route(web::get().to(edit_form))
                    .route(web::post().to(update_place)),
            ),
    );
}
