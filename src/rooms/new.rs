use axum::{
    Form, debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{AppResult, AppState, model::RoomCode, res, session, store::SqliteStore};

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomForm {
    title: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(store): State<SqliteStore>,
    session: Session,
    Form(NewRoomForm { title }): Form<NewRoomForm>,
) -> AppResult<Response> {
    let Some(user) = session::current_user(&session).await? else {
        return Ok(Redirect::to("/login?return_url=/").into_response());
    };

    let title = title.trim();
    if title.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let code = store.create_room(title, &user.id).await?;

    Ok(Redirect::to(&format!("/rooms/{code}")).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct JoinRoomForm {
    code: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn join_room(
    State(store): State<SqliteStore>,
    Form(JoinRoomForm { code }): Form<JoinRoomForm>,
) -> AppResult<Response> {
    let Ok(code) = code.trim().parse::<RoomCode>() else {
        return Ok(res::sorry("room"));
    };

    if !store.room_exists(&code).await? {
        return Ok(res::sorry("room"));
    }

    Ok(Redirect::to(&format!("/rooms/{code}")).into_response())
}
