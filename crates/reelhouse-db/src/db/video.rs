use chrono::Utc;
use reelhouse_core::models::Video;
use reelhouse_core::AppError;
use sqlx::SqlitePool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url";

#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let created = sqlx::query_as::<_, Video>(&format!(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(video.id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.user_id)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create video");
            AppError::Database(e)
        })?;

        tracing::info!(video_id = %created.id, user_id = %created.user_id, "Created video");
        Ok(created)
    }

    pub async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>, AppError> {
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1"
        ))
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, video_id = %video_id, "Failed to fetch video");
            AppError::Database(e)
        })
    }

    /// Record the public URL of a newly stored thumbnail. Only `thumbnail_url` and
    /// `updated_at` are written.
    pub async fn set_thumbnail_url(&self, video_id: Uuid, url: &str) -> Result<Video, AppError> {
        self.set_url_column(video_id, "thumbnail_url", url).await
    }

    /// Record the public URL of a newly stored video file. Only `video_url` and
    /// `updated_at` are written.
    pub async fn set_video_url(&self, video_id: Uuid, url: &str) -> Result<Video, AppError> {
        self.set_url_column(video_id, "video_url", url).await
    }

    // Concurrent uploads to the same video each own one column.
    async fn set_url_column(
        &self,
        video_id: Uuid,
        column: &'static str,
        url: &str,
    ) -> Result<Video, AppError> {
        let updated = sqlx::query_as::<_, Video>(&format!(
            r#"
            UPDATE videos
            SET {column} = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(video_id)
        .bind(url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, video_id = %video_id, column, "Failed to update video");
            AppError::Database(e)
        })?;

        updated.ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    /// List a user's videos, newest first
    pub async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        sqlx::query_as::<_, Video>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM videos
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to list videos");
            AppError::Database(e)
        })
    }

    /// Returns false when no such video existed.
    pub async fn delete_video(&self, video_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, video_id = %video_id, "Failed to delete video");
                AppError::Database(e)
            })?;

        if result.rows_affected() > 0 {
            tracing::info!(video_id = %video_id, "Deleted video");
        }
        Ok(result.rows_affected() > 0)
    }
}
