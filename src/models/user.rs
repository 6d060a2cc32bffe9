// src/models/user.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only projection of an account owned by the login service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}
