use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{
    AppResult, AppState, res, session,
    model::RoomCode,
    store::{QuestionStore, SqliteStore},
};

use super::render;

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    Path(code): Path<RoomCode>,
    State(store): State<SqliteStore>,
    session: Session,
) -> AppResult<Response> {
    let user = session::current_user(&session).await?;
    let theme = session::theme(&session).await?;

    let Some(room) = store
        .room(&code, user.as_ref().map(|user| user.id.as_str()))
        .await?
    else {
        return Ok(res::sorry("room"));
    };

    Ok(Html(render::room_page(&room, user.as_ref(), theme)).into_response())
}
