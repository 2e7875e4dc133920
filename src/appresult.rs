use axum::{http::StatusCode, response::{IntoResponse, Response}};

use crate::{model::RoomCode, store::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("you must be signed in")]
    NotSignedIn,
    #[error("room {0} doesn't exist")]
    RoomNotFound(RoomCode),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RoomError>() {
            Some(RoomError::NotSignedIn) => StatusCode::UNAUTHORIZED,
            Some(RoomError::RoomNotFound(_))
            | Some(RoomError::Store(StoreError::QuestionNotFound(_))) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{:#}\n{}", self.0, self.0.backtrace());
        }
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
