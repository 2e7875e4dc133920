use axum::{debug_handler, response::{Html, IntoResponse, Response}};
use tower_sessions::Session;

use crate::{include_res, res, session, AppResult};

#[debug_handler]
pub async fn index(
    session: Session
) -> AppResult<Response> {
    let theme = session::theme(&session).await?;

    let create_room = match session::current_user(&session).await? {
        Some(user) => format!(
            r#"<form method="post" action="/rooms/new">
            <p>Signed in as {} (<a href="/logout">sign out</a>)</p>
            <input type="text" name="title" placeholder="Room name" required>
            <button type="submit">Create room</button>
        </form>"#,
            res::text(&user.name),
        ),
        None => r#"<a class="button" href="/login?return_url=/">Sign in to create a room</a>"#.to_owned(),
    };

    Ok(
        Html(
            include_res!(str, "/pages/index.html")
                .replace("{theme}", theme.class())
                .replace("{logo}", theme.logo())
                .replace("{toggle_label}", theme.toggle_label())
                .replace("{create_room}", &create_room)
        ).into_response()
    )
}
