// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod comment_repository;
#[cfg(test)]
pub mod memory;
pub mod repository;
pub mod store;

pub use comment_repository::*;
pub use repository::*;
pub use store::*;
