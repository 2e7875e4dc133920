mod like;
mod new;
mod question;
mod render;
mod room;
mod ws;

#[cfg(test)]
pub(crate) mod testing;

use axum::{Router, routing::{get, post}};

use crate::AppState;

pub use like::toggle_like;
pub use question::{Draft, send_question};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(new::new_room))
        .route("/join", post(new::join_room))
        .route("/{code}", get(room::room))
        .route("/{code}/ws", get(ws::room_ws))
        .route("/{code}/questions", post(question::ask))
        .route("/{code}/questions/{question_id}/like", post(like::like))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;
    use tower_sessions::Session;

    use super::{Router, get, testing::ana};
    use crate::{
        AppResult, AppState, auth::Clients, db, hub::RoomHub,
        model::{Author, NewQuestion, RoomCode},
        session,
        store::{QuestionStore, SqliteStore},
    };

    async fn sign_in_as_ana(session: Session) -> AppResult<()> {
        session.insert(session::USER, ana()).await?;
        Ok(())
    }

    async fn test_app() -> (Router, SqliteStore) {
        let store = SqliteStore::new(db::memory().await, RoomHub::new());
        let app_state = AppState {
            store: store.clone(),
            clients: Clients::from_json(serde_json::json!({}), "http://localhost:8080").unwrap(),
        };
        let routes = crate::routes().route("/test/sign-in", get(sign_in_as_ana));
        (crate::serve(routes, app_state, 60), store)
    }

    async fn cookie(app: &Router) -> String {
        let response = send(app, Request::get("/test/sign-in"), None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    async fn send(
        app: &Router,
        request: axum::http::request::Builder,
        cookie: Option<&str>,
        form: Option<&str>,
    ) -> Response {
        let mut request = request;
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_owned())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn ask(store: &SqliteStore, code: &RoomCode) {
        store
            .push_question(
                code,
                NewQuestion {
                    content: "What time?".to_owned(),
                    author: Author {
                        name: "Bea".to_owned(),
                        avatar: "b.png".to_owned(),
                    },
                    is_highlighted: false,
                    is_answered: false,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_room_page_is_404() {
        let (app, _) = test_app().await;

        let response = send(&app, Request::get("/rooms/nope"), None, None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("that room doesn't exist"));
    }

    #[tokio::test]
    async fn test_room_page_renders_questions() {
        let (app, store) = test_app().await;
        let code = store.create_room("Rust meetup", "u1").await.unwrap();
        ask(&store, &code).await;

        let response = send(&app, Request::get(format!("/rooms/{code}")), None, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Room Rust meetup"));
        assert!(html.contains("1 question(s)"));
    }

    #[tokio::test]
    async fn test_join_room() {
        let (app, store) = test_app().await;
        let code = store.create_room("Rust meetup", "u1").await.unwrap();

        let unknown = send(&app, Request::post("/rooms/join"), None, Some("code=nope")).await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let invalid = send(&app, Request::post("/rooms/join"), None, Some("code=a%2Fb")).await;
        assert_eq!(invalid.status(), StatusCode::NOT_FOUND);

        let joined = send(&app, Request::post("/rooms/join"), None, Some(&format!("code={code}"))).await;
        assert_eq!(joined.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&joined), format!("/rooms/{code}"));
    }

    #[tokio::test]
    async fn test_ask_question() {
        let (app, store) = test_app().await;
        let code = store.create_room("Rust meetup", "u1").await.unwrap();
        let path = format!("/rooms/{code}/questions");

        let signed_out = send(&app, Request::post(&path), None, Some("content=What+time%3F")).await;
        assert_eq!(signed_out.status(), StatusCode::UNAUTHORIZED);
        assert!(store.room(&code, None).await.unwrap().unwrap().questions.is_empty());

        let cookie = cookie(&app).await;
        let asked = send(&app, Request::post(&path), Some(&cookie), Some("content=What+time%3F")).await;
        assert_eq!(asked.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&asked), format!("/rooms/{code}"));

        let room = store.room(&code, None).await.unwrap().unwrap();
        assert_eq!(room.questions.len(), 1);
        assert_eq!(room.questions[0].content, "What time?");
        assert_eq!(room.questions[0].author.name, "Ana");
    }

    #[tokio::test]
    async fn test_like_toggles_with_hidden_like_id() {
        let (app, store) = test_app().await;
        let code = store.create_room("Rust meetup", "u1").await.unwrap();
        ask(&store, &code).await;
        let question_id = store.room(&code, None).await.unwrap().unwrap().questions[0].id.clone();
        let path = format!("/rooms/{code}/questions/{question_id}/like");
        let cookie = cookie(&app).await;

        let liked = send(&app, Request::post(&path), Some(&cookie), Some("")).await;
        assert_eq!(liked.status(), StatusCode::SEE_OTHER);
        let question = &store.room(&code, Some("u1")).await.unwrap().unwrap().questions[0];
        assert_eq!(question.like_count, 1);
        let like_id = question.like_id.clone().unwrap();

        let form = format!("like_id={like_id}");
        let unliked = send(&app, Request::post(&path), Some(&cookie), Some(&form)).await;
        assert_eq!(unliked.status(), StatusCode::SEE_OTHER);
        let question = &store.room(&code, Some("u1")).await.unwrap().unwrap().questions[0];
        assert_eq!(question.like_count, 0);
        assert_eq!(question.like_id, None);
    }

    #[tokio::test]
    async fn test_like_unknown_question_is_404() {
        let (app, store) = test_app().await;
        let code = store.create_room("Rust meetup", "u1").await.unwrap();
        let cookie = cookie(&app).await;

        let response = send(
            &app,
            Request::post(format!("/rooms/{code}/questions/missing/like")),
            Some(&cookie),
            Some(""),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("that question doesn't exist"));
    }
}
