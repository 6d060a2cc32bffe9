// src/services/image_uploader.rs
// DOCUMENTATION: Cloudinary image host client
// PURPOSE: Upload the image attached to a new place and return its public URL

use crate::config::CloudinaryConfig;
use crate::errors::PlacesError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;

/// File taken from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Anything that can store an image and hand back a URL for it
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, file: UploadedFile) -> Result<String, PlacesError>;
}

/// Successful upload response (only the fields we read)
#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryErrorBody,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

/// Cloudinary upload client
/// DOCUMENTATION: Signed uploads against the Upload API; credentials come
/// from the CloudinaryConfig passed to `new`
pub struct CloudinaryUploader {
    /// HTTP client for making requests
    client: Client,
    config: CloudinaryConfig,
    /// Base URL for the Upload API
    base_url: String,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            config,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.config.cloud_name)
    }

    /// Sign upload parameters
    /// DOCUMENTATION: Parameters sorted by key, joined as `k=v` with `&`,
    /// the API secret appended, then SHA-1 hex encoded
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, file: UploadedFile) -> Result<String, PlacesError> {
        if !self.config.is_configured() {
            return Err(PlacesError::ExternalApiError(
                "Cloudinary credentials not configured".to_string(),
            ));
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = Self::sign(&params, &self.config.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.filename.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type).map_err(|e| {
                PlacesError::InvalidInput(format!("Invalid image content type: {}", e))
            })?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.config.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        log::debug!("Uploading image {} to Cloudinary", file.filename);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("Cloudinary request failed: {}", e);
                PlacesError::ExternalApiError(format!("Image upload failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PlacesError::ExternalApiError(format!("Failed to read upload response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<CloudinaryErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            log::error!("Cloudinary rejected upload ({}): {}", status, message);
            return Err(PlacesError::ExternalApiError(format!(
                "Image upload rejected: {}",
                message
            )));
        }

        let uploaded: CloudinaryUploadResponse = serde_json::from_str(&body).map_err(|e| {
            PlacesError::ExternalApiError(format!("Failed to parse upload response: {}", e))
        })?;

        let url = uploaded.secure_url.or(uploaded.url).ok_or_else(|| {
            PlacesError::ExternalApiError("Upload response carried no URL".to_string())
        })?;

        log::info!(
            "Uploaded image {} as {}",
            file.filename,
            uploaded.public_id.as_deref().unwrap_or("?")
        );
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_matches_documented_example() {
        let params = vec![
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ];

        assert_eq!(
            CloudinaryUploader::sign(&params, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_signature_ignores_param_order() {
        let a = vec![
            ("folder", "libon-remoters".to_string()),
            ("timestamp", "1700000000".to_string()),
        ];
        let b = vec![
            ("timestamp", "1700000000".to_string()),
            ("folder", "libon-remoters".to_string()),
        ];

        assert_eq!(
            CloudinaryUploader::sign(&a, "secret"),
            CloudinaryUploader::sign(&b, "secret")
        );
        assert_eq!(CloudinaryUploader::sign(&a, "secret").len(), 40);
    }

    #[test]
    fn test_upload_url_uses_cloud_name() {
        let uploader = CloudinaryUploader::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "libon-remoters".to_string(),
        });

        assert_eq!(
            uploader.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn test_upload_without_credentials_fails() {
        let uploader = CloudinaryUploader::new(CloudinaryConfig::default());
        let file = UploadedFile {
            filename: "desk.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xff, 0xd8, 0xff],
        };

        let result = uploader.upload(file).await;
        assert!(matches!(result, Err(PlacesError::ExternalApiError(_))));
    }
}
