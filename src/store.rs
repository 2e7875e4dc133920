use std::future::Future;

use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::{
    hub::{RoomEvent, RoomHub},
    model::{Author, LikeId, NewLike, NewQuestion, Question, QuestionId, Room, RoomCode},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("question {0} isn't in this room")]
    QuestionNotFound(QuestionId),
    #[error("store unavailable: {0}")]
    Database(#[from] sqlx::Error),
}

/// What a room page may read and write.
pub trait QuestionStore {
    /// Snapshot of a room as `viewer_id` sees it, `None` if the room does not exist.
    fn room(
        &self,
        code: &RoomCode,
        viewer_id: Option<&str>,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    fn push_question(
        &self,
        code: &RoomCode,
        question: NewQuestion,
    ) -> impl Future<Output = Result<QuestionId, StoreError>> + Send;

    fn push_like(
        &self,
        code: &RoomCode,
        question_id: &QuestionId,
        like: NewLike,
    ) -> impl Future<Output = Result<LikeId, StoreError>> + Send;

    /// Removing a record that is already gone is not an error.
    fn remove_like(
        &self,
        code: &RoomCode,
        question_id: &QuestionId,
        like_id: &LikeId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
    hub: RoomHub,
}

type QuestionRow = (String, String, String, String, bool, bool, i64, Option<String>);

impl SqliteStore {
    pub fn new(db_pool: SqlitePool, hub: RoomHub) -> Self {
        Self { db_pool, hub }
    }

    pub async fn create_room(&self, title: &str, owner_id: &str) -> Result<RoomCode, StoreError> {
        let code = RoomCode::generate();
        sqlx::query("INSERT INTO rooms (code,title,author_id) VALUES (?,?,?)")
            .bind(code.as_str())
            .bind(title)
            .bind(owner_id)
            .execute(&self.db_pool)
            .await?;

        tracing::info!(room = %code, "room {title:?} created by {owner_id}");
        Ok(code)
    }

    pub async fn room_exists(&self, code: &RoomCode) -> Result<bool, StoreError> {
        Ok(sqlx::query("SELECT 1 FROM rooms WHERE code=?")
            .bind(code.as_str())
            .fetch_optional(&self.db_pool)
            .await?
            .is_some())
    }

    /// Receiver ends the subscription when dropped; call [`SqliteStore::unsubscribed`] after.
    pub async fn subscribe(&self, code: &RoomCode) -> broadcast::Receiver<RoomEvent> {
        self.hub.subscribe(code).await
    }

    pub async fn unsubscribed(&self) {
        self.hub.cleanup().await;
    }
}

impl QuestionStore for SqliteStore {
    async fn room(&self, code: &RoomCode, viewer_id: Option<&str>) -> Result<Option<Room>, StoreError> {
        let Some((title,)): Option<(String,)> = sqlx::query_as("SELECT title FROM rooms WHERE code=?")
            .bind(code.as_str())
            .fetch_optional(&self.db_pool)
            .await?
        else {
            return Ok(None);
        };

        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT q.id, q.content, q.author_name, q.author_avatar, q.is_highlighted, q.is_answered,
                (SELECT COUNT(*) FROM likes l WHERE l.room_code=q.room_code AND l.question_id=q.id),
                (SELECT l.id FROM likes l WHERE l.room_code=q.room_code AND l.question_id=q.id AND l.author_id=? ORDER BY l.id LIMIT 1)
            FROM questions q WHERE q.room_code=? ORDER BY q.id",
        )
        .bind(viewer_id)
        .bind(code.as_str())
        .fetch_all(&self.db_pool)
        .await?;

        let questions = rows
            .into_iter()
            .map(
                |(id, content, name, avatar, is_highlighted, is_answered, like_count, like_id)| Question {
                    id: QuestionId(id),
                    content,
                    author: Author { name, avatar },
                    is_highlighted,
                    is_answered,
                    like_count: like_count as usize,
                    like_id: like_id.map(LikeId),
                },
            )
            .collect();

        Ok(Some(Room {
            code: code.clone(),
            title,
            questions,
        }))
    }

    async fn push_question(&self, code: &RoomCode, question: NewQuestion) -> Result<QuestionId, StoreError> {
        let id = QuestionId::generate();
        sqlx::query(
            "INSERT INTO questions (id,room_code,content,author_name,author_avatar,is_highlighted,is_answered) VALUES (?,?,?,?,?,?,?)",
        )
        .bind(id.as_str())
        .bind(code.as_str())
        .bind(&question.content)
        .bind(&question.author.name)
        .bind(&question.author.avatar)
        .bind(question.is_highlighted)
        .bind(question.is_answered)
        .execute(&self.db_pool)
        .await?;

        tracing::debug!(room = %code, question = %id, "question pushed");
        self.hub
            .publish(code, RoomEvent::QuestionAsked { question_id: id.clone() })
            .await;
        Ok(id)
    }

    async fn push_like(&self, code: &RoomCode, question_id: &QuestionId, like: NewLike) -> Result<LikeId, StoreError> {
        let id = LikeId::generate();
        let inserted = sqlx::query(
            "INSERT INTO likes (id,room_code,question_id,author_id)
            SELECT ?,?,?,? WHERE EXISTS (SELECT 1 FROM questions WHERE id=? AND room_code=?)",
        )
        .bind(id.as_str())
        .bind(code.as_str())
        .bind(question_id.as_str())
        .bind(&like.author_id)
        .bind(question_id.as_str())
        .bind(code.as_str())
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::QuestionNotFound(question_id.clone()));
        }

        tracing::debug!(room = %code, question = %question_id, like = %id, "like pushed");
        self.hub
            .publish(
                code,
                RoomEvent::LikeAdded {
                    question_id: question_id.clone(),
                    like_id: id.clone(),
                },
            )
            .await;
        Ok(id)
    }

    async fn remove_like(&self, code: &RoomCode, question_id: &QuestionId, like_id: &LikeId) -> Result<(), StoreError> {
        let removed = sqlx::query("DELETE FROM likes WHERE id=? AND room_code=? AND question_id=?")
            .bind(like_id.as_str())
            .bind(code.as_str())
            .bind(question_id.as_str())
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        tracing::debug!(room = %code, question = %question_id, like = %like_id, removed, "like removed");
        if removed > 0 {
            self.hub
                .publish(
                    code,
                    RoomEvent::LikeRemoved {
                        question_id: question_id.clone(),
                        like_id: like_id.clone(),
                    },
                )
                .await;
        }
        Ok(())
    }
}
