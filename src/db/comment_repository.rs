// src/db/comment_repository.rs
// DOCUMENTATION: Comment database operations
// PURPOSE: Read comments of a place together with their creators

use crate::errors::PlacesError;
use crate::models::{Comment, CommentView, User};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct CommentRow {
    pub id: Uuid,
    pub place_id: Uuid,
    pub creator_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub creator_user_id: Option<Uuid>,
    pub creator_name: Option<String>,
}

impl CommentRow {
    fn into_view(self) -> CommentView {
        let creator = match (self.creator_user_id, self.creator_name) {
            (Some(id), Some(name)) => Some(User { id, name }),
            _ => None,
        };

        CommentView {
            comment: Comment {
                id: self.id,
                place_id: self.place_id,
                creator_id: self.creator_id,
                content: self.content,
                created_at: self.created_at,
            },
            creator,
        }
    }
}

pub struct CommentRepository;

impl CommentRepository {
    /// Get comments for a place
    /// DOCUMENTATION: Oldest first, so the thread reads top to bottom
    pub async fn list_by_place(
        pool: &PgPool,
        place_id: Uuid,
    ) -> Result<Vec<CommentView>, PlacesError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.id, c.place_id, c.creator_id, c.content, c.created_at,
                u.id as creator_user_id, u.name as creator_name
            FROM comments c
            LEFT JOIN users u ON u.id = c.creator_id
            WHERE c.place_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(place_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch comments for place {}: {}", place_id, e);
            PlacesError::DatabaseError(format!("Fetch comments failed: {}", e))
        })?;

        Ok(rows.into_iter().map(CommentRow::into_view).collect())
    }
}
