// src/handlers/place_form.rs
// DOCUMENTATION: Multipart body of POST /place/create
// PURPOSE: Collect the text fields and the single `images` file

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;

use crate::errors::PlacesError;
use crate::models::CreatePlaceRequest;
use crate::services::UploadedFile;

/// Name of the file field, as in the create form
pub const IMAGE_FIELD: &str = "images";

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024; // 10MB
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Raw create form; numbers stay text until `into_request`
#[derive(Debug, Default)]
pub struct CreatePlaceForm {
    pub name: String,
    pub description: String,
    pub longitude: String,
    pub latitude: String,
    pub image: Option<UploadedFile>,
}

impl CreatePlaceForm {
    pub async fn from_multipart(mut payload: Multipart) -> Result<Self, PlacesError> {
        let mut form = CreatePlaceForm::default();

        while let Some(item) = payload.next().await {
            let mut field = item
                .map_err(|e| PlacesError::InvalidInput(format!("Multipart error: {}", e)))?;

            let disposition = field.content_disposition();
            let name = disposition.get_name().unwrap_or_default().to_string();
            let filename = disposition.get_filename().map(str::to_string);
            let content_type = field.content_type().map(|m| m.to_string());

            let limit = if name == IMAGE_FIELD {
                MAX_IMAGE_BYTES
            } else {
                MAX_TEXT_BYTES
            };
            let bytes = read_field(&mut field, &name, limit).await?;

            match name.as_str() {
                "name" => form.name = into_text(&name, bytes)?,
                "description" => form.description = into_text(&name, bytes)?,
                "longitude" => form.longitude = into_text(&name, bytes)?,
                "latitude" => form.latitude = into_text(&name, bytes)?,
                IMAGE_FIELD => {
                    // Browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        form.image = Some(UploadedFile {
                            filename: filename.unwrap_or_else(|| "upload".to_string()),
                            content_type,
                            bytes,
                        });
                    }
                }
                other => log::debug!("Ignoring multipart field {}", other),
            }
        }

        Ok(form)
    }

    /// Split into the validated-later request and the optional file
    pub fn into_request(self) -> Result<(CreatePlaceRequest, Option<UploadedFile>), PlacesError> {
        let request = CreatePlaceRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            longitude: parse_coordinate("longitude", &self.longitude)?,
            latitude: parse_coordinate("latitude", &self.latitude)?,
        };

        Ok((request, self.image))
    }
}

async fn read_field(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, PlacesError> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            log::error!("Error reading multipart field {}: {}", name, e);
            PlacesError::InvalidInput(format!("Failed to read field {}: {}", name, e))
        })?;

        if bytes.len() + chunk.len() > limit {
            return Err(PlacesError::InvalidInput(format!(
                "Field {} exceeds {} bytes",
                name, limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

fn into_text(name: &str, bytes: Vec<u8>) -> Result<String, PlacesError> {
    String::from_utf8(bytes)
        .map_err(|_| PlacesError::InvalidInput(format!("Field {} is not valid UTF-8", name)))
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64, PlacesError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PlacesError::InvalidInput(format!("{} must be a number, got '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(longitude: &str, latitude: &str) -> CreatePlaceForm {
        CreatePlaceForm {
            name: "  Heden  ".to_string(),
            description: "Terrace".to_string(),
            longitude: longitude.to_string(),
            latitude: latitude.to_string(),
            image: None,
        }
    }

    #[test]
    fn test_into_request_parses_coordinates() {
        let (request, image) = form("-9.1393", " 38.7223 ").into_request().unwrap();

        assert_eq!(request.name, "Heden");
        assert_eq!(request.coordinates().as_array(), [-9.1393, 38.7223]);
        assert!(image.is_none());
    }

    #[test]
    fn test_into_request_rejects_non_numbers() {
        assert!(matches!(
            form("west", "38.7").into_request(),
            Err(PlacesError::InvalidInput(_))
        ));
        assert!(matches!(
            form("-9.1", "").into_request(),
            Err(PlacesError::InvalidInput(_))
        ));
        assert!(matches!(
            form("NaN", "38.7").into_request(),
            Err(PlacesError::InvalidInput(_))
        ));
    }
}
