use axum::{
    debug_handler,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::{IntoResponse, Response},
};
use futures_util::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_sessions::Session;

use crate::{
    AppResult, AppState, RoomError, session,
    hub::RoomEvent,
    model::{LikeId, QuestionId, RoomCode, User},
    store::{QuestionStore, SqliteStore},
};

use super::{
    like::toggle_like,
    question::{Draft, send_question},
    render,
};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum ClientAction {
    Ask {
        content: String,
    },
    Like {
        question_id: QuestionId,
        like_id: Option<LikeId>,
    },
}

/// What the page swaps in whenever the room changes.
#[derive(Debug, Serialize)]
pub(crate) struct LiveUpdate {
    count: String,
    questions: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn room_ws(
    Path(code): Path<RoomCode>,
    State(store): State<SqliteStore>,
    session: Session,

    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    if !store.room_exists(&code).await? {
        return Err(RoomError::RoomNotFound(code).into());
    }

    let user = session::current_user(&session).await?;

    Ok(ws
        .on_upgrade(move |stream| live_room(stream, store, code, user))
        .into_response())
}

async fn live_room(stream: WebSocket, store: SqliteStore, code: RoomCode, user: Option<User>) {
    let rx = store.subscribe(&code).await;
    let (mut sender, mut receiver) = stream.split();
    tracing::debug!(room = %code, "room subscribed");

    let mut push_task = tokio::spawn({
        let store = store.clone();
        let code = code.clone();
        let viewer_id = user.as_ref().map(|user| user.id.clone());
        async move { push_updates(&store, &code, viewer_id.as_deref(), rx, &mut sender).await }
    });

    let mut action_task = tokio::spawn({
        let store = store.clone();
        let code = code.clone();
        async move {
            let mut draft = Draft::default();
            while let Some(Ok(msg)) = receiver.next().await {
                let text = match msg {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let action = match serde_json::from_str::<ClientAction>(text.as_str()) {
                    Ok(action) => action,
                    Err(e) => {
                        tracing::warn!(room = %code, "bad action {:?}: {e}", text.as_str());
                        continue;
                    }
                };

                if let Err(e) = apply(&store, &code, user.as_ref(), &mut draft, action).await {
                    tracing::warn!(room = %code, "action failed: {e}");
                }
            }
        }
    });

    tokio::select! {
        _ = &mut push_task => action_task.abort(),
        _ = &mut action_task => push_task.abort(),
    };
    let _ = push_task.await;
    let _ = action_task.await;

    store.unsubscribed().await;
    tracing::debug!(room = %code, "room unsubscribed");
}

/// Sends the room once, then again after every change, until the room or the socket goes away.
async fn push_updates<W>(
    store: &SqliteStore,
    code: &RoomCode,
    viewer_id: Option<&str>,
    mut rx: broadcast::Receiver<RoomEvent>,
    sender: &mut W,
) where
    W: Sink<Message> + Unpin,
    W::Error: Into<anyhow::Error>,
{
    loop {
        if let Err(e) = push_snapshot(store, code, viewer_id, sender).await {
            tracing::debug!(room = %code, "stopped pushing: {e:#}");
            break;
        }

        match rx.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

async fn push_snapshot<W>(
    store: &SqliteStore,
    code: &RoomCode,
    viewer_id: Option<&str>,
    sender: &mut W,
) -> anyhow::Result<()>
where
    W: Sink<Message> + Unpin,
    W::Error: Into<anyhow::Error>,
{
    let Some(room) = store.room(code, viewer_id).await? else {
        anyhow::bail!("room {code} is gone");
    };

    let update = LiveUpdate {
        count: render::question_count(&room),
        questions: render::questions(&room),
    };
    sender
        .send(Message::Text(serde_json::to_string(&update)?.into()))
        .await
        .map_err(Into::<anyhow::Error>::into)?;
    Ok(())
}

async fn apply<S: QuestionStore>(
    store: &S,
    code: &RoomCode,
    user: Option<&User>,
    draft: &mut Draft,
    action: ClientAction,
) -> Result<(), RoomError> {
    match action {
        ClientAction::Ask { content } => {
            draft.set(content);
            send_question(store, code, user, draft).await?;
        }
        ClientAction::Like { question_id, like_id } => {
            toggle_like(store, code, &question_id, like_id.as_ref(), user).await?;
        }
    }
    Ok(())
}
