use std::sync::Mutex;

use crate::{
    model::{LikeId, NewLike, NewQuestion, QuestionId, Room, RoomCode, User},
    store::{QuestionStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Write {
    Question(RoomCode, NewQuestion),
    Like(RoomCode, QuestionId, NewLike),
    Unlike(RoomCode, QuestionId, LikeId),
}

/// Store that remembers every write and serves a fixed snapshot.
#[derive(Default)]
pub(crate) struct RecordingStore {
    writes: Mutex<Vec<Write>>,
    snapshot: Option<Room>,
    fail: bool,
}

impl RecordingStore {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub(crate) fn with_room(room: Room) -> Self {
        Self {
            snapshot: Some(room),
            ..Default::default()
        }
    }

    pub(crate) fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, write: Write) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        self.writes.lock().unwrap().push(write);
        Ok(())
    }
}

impl QuestionStore for RecordingStore {
    async fn room(&self, _code: &RoomCode, _viewer_id: Option<&str>) -> Result<Option<Room>, StoreError> {
        Ok(self.snapshot.clone())
    }

    async fn push_question(&self, code: &RoomCode, question: NewQuestion) -> Result<QuestionId, StoreError> {
        self.record(Write::Question(code.clone(), question))?;
        Ok(QuestionId::generate())
    }

    async fn push_like(&self, code: &RoomCode, question_id: &QuestionId, like: NewLike) -> Result<LikeId, StoreError> {
        self.record(Write::Like(code.clone(), question_id.clone(), like))?;
        Ok(LikeId::generate())
    }

    async fn remove_like(&self, code: &RoomCode, question_id: &QuestionId, like_id: &LikeId) -> Result<(), StoreError> {
        self.record(Write::Unlike(code.clone(), question_id.clone(), like_id.clone()))
    }
}

pub(crate) fn ana() -> User {
    User {
        id: "u1".to_owned(),
        name: "Ana".to_owned(),
        avatar: "a.png".to_owned(),
    }
}
