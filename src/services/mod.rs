// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod image_uploader;
pub mod place_service;

pub use image_uploader::*;
pub use place_service::*;
