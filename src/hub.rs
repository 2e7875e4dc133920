//! Room-keyed change notifications.
//!
//! Writes publish a [`RoomEvent`] for the room they touched; every open room
//! page holds a receiver and re-reads its snapshot when something arrives.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{RwLock, broadcast};

use crate::model::{LikeId, QuestionId, RoomCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    QuestionAsked { question_id: QuestionId },
    LikeAdded { question_id: QuestionId, like_id: LikeId },
    LikeRemoved { question_id: QuestionId, like_id: LikeId },
}

#[derive(Clone)]
pub struct RoomHub {
    channels: Arc<RwLock<HashMap<RoomCode, broadcast::Sender<RoomEvent>>>>,
    capacity: usize,
}

impl RoomHub {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: 64,
        }
    }

    /// No-op if nobody has the room open.
    pub async fn publish(&self, code: &RoomCode, event: RoomEvent) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(code) {
            let _ = tx.send(event);
        }
    }

    pub async fn subscribe(&self, code: &RoomCode) -> broadcast::Receiver<RoomEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drops channels whose last receiver went away.
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new()
    }
}
