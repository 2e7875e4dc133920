use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, RoomError, res, session,
    model::{LikeId, NewLike, QuestionId, RoomCode, User},
    store::{QuestionStore, SqliteStore, StoreError},
};

/// Removes `like_id` if the viewer already likes the question, otherwise adds a like.
///
/// `like_id` comes from the viewer's last snapshot, so two toggles before the
/// next snapshot arrives can add twice or remove twice.
pub async fn toggle_like<S: QuestionStore>(
    store: &S,
    code: &RoomCode,
    question_id: &QuestionId,
    like_id: Option<&LikeId>,
    user: Option<&User>,
) -> Result<Option<LikeId>, RoomError> {
    let Some(user) = user else {
        return Err(RoomError::NotSignedIn);
    };

    if let Some(like_id) = like_id {
        store.remove_like(code, question_id, like_id).await?;
        return Ok(None);
    }

    let like_id = store
        .push_like(code, question_id, NewLike { author_id: user.id.clone() })
        .await?;
    Ok(Some(like_id))
}

#[derive(Deserialize)]
pub(crate) struct LikeForm {
    like_id: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn like(
    Path((code, question_id)): Path<(RoomCode, String)>,
    State(store): State<SqliteStore>,
    session: Session,
    Form(LikeForm { like_id }): Form<LikeForm>,
) -> AppResult<Response> {
    if !store.room_exists(&code).await? {
        return Ok(res::sorry("room"));
    }

    let user = session::current_user(&session).await?;
    let like_id = like_id.filter(|id| !id.is_empty()).map(LikeId);
    match toggle_like(
        &store,
        &code,
        &QuestionId(question_id),
        like_id.as_ref(),
        user.as_ref(),
    )
    .await
    {
        Err(RoomError::Store(StoreError::QuestionNotFound(_))) => return Ok(res::sorry("question")),
        result => result?,
    };

    Ok(Redirect::to(&format!("/rooms/{code}")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::testing::{RecordingStore, Write, ana};

    fn code() -> RoomCode {
        "room1".parse().unwrap()
    }

    #[tokio::test]
    async fn test_like_without_like_id_appends() {
        let store = RecordingStore::default();
        let q = QuestionId::from("q1");

        let added = toggle_like(&store, &code(), &q, None, Some(&ana())).await.unwrap();

        assert!(added.is_some());
        assert_eq!(
            store.writes(),
            vec![Write::Like(code(), q, NewLike { author_id: "u1".to_owned() })]
        );
    }

    #[tokio::test]
    async fn test_like_with_like_id_removes() {
        let store = RecordingStore::default();
        let q = QuestionId::from("q1");
        let like = LikeId::from("like123");

        let added = toggle_like(&store, &code(), &q, Some(&like), Some(&ana())).await.unwrap();

        assert_eq!(added, None);
        assert_eq!(store.writes(), vec![Write::Unlike(code(), q, like)]);
    }

    #[tokio::test]
    async fn test_like_without_user_writes_nothing() {
        let store = RecordingStore::default();

        let err = toggle_like(&store, &code(), &QuestionId::from("q1"), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, RoomError::NotSignedIn));
        assert!(store.writes().is_empty());
    }
}
