// src/models/comment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Comment left on a place; created elsewhere, only listed here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub place_id: Uuid,
    pub creator_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with its creator populated
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub creator: Option<User>,
}
