// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod comment;
pub mod place;
pub mod user;

pub use comment::*;
pub use place::*;
pub use user::*;
