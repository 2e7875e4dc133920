use std::{fmt, str::FromStr};

use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ROOM_CODE_LEN: usize = 8;
const ROOM_CODE_MAX: usize = 64;

/// Short shareable identifier of a room, taken from `/rooms/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid room code {0:?}")]
pub struct InvalidRoomCode(pub String);

impl RoomCode {
    pub fn generate() -> Self {
        Self(
            rand::rng()
                .sample_iter(&Alphanumeric)
                .take(ROOM_CODE_LEN)
                .map(char::from)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= ROOM_CODE_MAX
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(InvalidRoomCode(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for RoomCode {
    type Error = InvalidRoomCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! push_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

push_id!(
    /// Generated ids sort in creation order, so ordering by id is ordering by arrival.
    QuestionId
);
push_id!(LikeId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl User {
    pub fn author(&self) -> Author {
        Author {
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

/// A question as it is appended to a room, before any likes exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub content: String,
    pub author: Author,
    pub is_highlighted: bool,
    pub is_answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLike {
    pub author_id: String,
}

/// A question as seen by one viewer.
///
/// `like_id` is `Some` exactly when that viewer has a like record on the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub content: String,
    pub author: Author,
    pub is_highlighted: bool,
    pub is_answered: bool,
    pub like_count: usize,
    pub like_id: Option<LikeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub code: RoomCode,
    pub title: String,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_parse() {
        assert_eq!("-MXa_12".parse::<RoomCode>().unwrap().as_str(), "-MXa_12");
        assert!("".parse::<RoomCode>().is_err());
        assert!("a/b".parse::<RoomCode>().is_err());
        assert!("x".repeat(65).parse::<RoomCode>().is_err());
    }

    #[test]
    fn test_generated_room_code_is_valid() {
        let code = RoomCode::generate();
        assert_eq!(code.as_str().len(), 8);
        assert_eq!(code.as_str().parse::<RoomCode>().unwrap(), code);
    }

    #[test]
    fn test_push_ids_sort_by_creation() {
        let first = QuestionId::generate();
        let second = QuestionId::generate();
        assert!(first.as_str() < second.as_str());
    }
}
