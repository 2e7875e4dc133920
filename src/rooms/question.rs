use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, RoomError, res, session,
    model::{NewQuestion, QuestionId, RoomCode, User},
    store::{QuestionStore, SqliteStore},
};

/// Question text the viewer is still typing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft(String);

impl Draft {
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<String> for Draft {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Appends the draft to the room as `user`'s question.
///
/// A blank draft is ignored and left as typed. Otherwise the draft is cleared
/// once the write has been issued, whether or not the store accepted it.
pub async fn send_question<S: QuestionStore>(
    store: &S,
    code: &RoomCode,
    user: Option<&User>,
    draft: &mut Draft,
) -> Result<Option<QuestionId>, RoomError> {
    if draft.is_blank() {
        return Ok(None);
    }

    let Some(user) = user else {
        return Err(RoomError::NotSignedIn);
    };

    let question = NewQuestion {
        content: draft.as_str().to_owned(),
        author: user.author(),
        is_highlighted: false,
        is_answered: false,
    };

    let pushed = store.push_question(code, question).await;
    draft.clear();

    Ok(Some(pushed?))
}

#[derive(Deserialize)]
pub(crate) struct AskForm {
    content: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn ask(
    Path(code): Path<RoomCode>,
    State(store): State<SqliteStore>,
    session: Session,
    Form(AskForm { content }): Form<AskForm>,
) -> AppResult<Response> {
    if !store.room_exists(&code).await? {
        return Ok(res::sorry("room"));
    }

    let user = session::current_user(&session).await?;
    let mut draft = Draft::from(content);
    send_question(&store, &code, user.as_ref(), &mut draft).await?;

    Ok(Redirect::to(&format!("/rooms/{code}")).into_response())
}
