//! In-process fan-out for live chat.
//!
//! Each connected websocket registers a bounded sender keyed by the
//! participant's id. Sending a message pushes the serialized payload to the
//! receiver's live sessions, if any; offline receivers simply pick the
//! message up from history. A session that cannot drain its buffer loses
//! pushes rather than stalling the sender.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use singleton_macro::service;
use tokio::sync::mpsc::{Sender, error::TrySendError};
use uuid::Uuid;

use crate::domain::dto::messaging::response::MessageResponse;

/// Per-session buffer. Chat payloads are small; a slow client only needs
/// enough slack to ride out a short stall.
pub const SESSION_BUFFER: usize = 32;

type SessionMap = HashMap<String, Vec<(Uuid, Sender<String>)>>;

// Guarded by a std Mutex: insertions and removals are rare and sends never
// block.
static SESSIONS: Lazy<Mutex<SessionMap>> = Lazy::new(|| Mutex::new(HashMap::new()));

#[service(name = "chathub")]
pub struct ChatHubService {
    // Session state lives in a process-wide map.
}

impl ChatHubService {
    /// Registers a live session for a participant. Returns the session id
    /// needed to unregister on disconnect.
    pub fn register(&self, participant_id: &str, sender: Sender<String>) -> Uuid {
        let session_id = Uuid::new_v4();
        let mut sessions = SESSIONS.lock().unwrap();
        sessions
            .entry(participant_id.to_string())
            .or_default()
            .push((session_id, sender));

        log::debug!("chat session {} opened for {}", session_id, participant_id);
        session_id
    }

    pub fn unregister(&self, participant_id: &str, session_id: Uuid) {
        let mut sessions = SESSIONS.lock().unwrap();
        if let Some(list) = sessions.get_mut(participant_id) {
            list.retain(|(id, _)| *id != session_id);
            if list.is_empty() {
                sessions.remove(participant_id);
            }
        }
    }

    /// Pushes a message to every live session of the receiver. Closed
    /// senders are pruned as they are found; a full buffer drops the push
    /// for that session only.
    pub fn push(&self, receiver_id: &str, message: &MessageResponse) {
        let payload = match serde_json::to_string(message) {
            Ok(p) => p,
            Err(e) => {
                log::error!("failed to serialize chat push: {}", e);
                return;
            }
        };

        let mut sessions = SESSIONS.lock().unwrap();
        if let Some(list) = sessions.get_mut(receiver_id) {
            list.retain(|(_, sender)| match sender.try_send(payload.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    log::warn!("chat session for {} is backed up, push dropped", receiver_id);
                    true
                }
                Err(TrySendError::Closed(_)) => false,
            });
            if list.is_empty() {
                sessions.remove(receiver_id);
            }
        }
    }

    pub fn online_count(&self) -> usize {
        SESSIONS.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;
    use tokio::sync::mpsc;

    use crate::domain::entities::messaging::message::ParticipantKind;

    fn message(receiver: &str) -> MessageResponse {
        MessageResponse {
            id: "m1".into(),
            chat_id: "c1".into(),
            sender_id: "tutor1".into(),
            sender_kind: ParticipantKind::Tutor,
            receiver_id: receiver.into(),
            receiver_kind: ParticipantKind::Student,
            course_id: None,
            body: "hello".into(),
            created_at: DateTime::now(),
        }
    }

    #[tokio::test]
    async fn push_reaches_registered_session() {
        let hub = ChatHubService {};
        let (tx, mut rx) = mpsc::channel(SESSION_BUFFER);
        let session = hub.register("push-target", tx);

        hub.push("push-target", &message("push-target"));

        let payload = rx.recv().await.unwrap();
        assert!(payload.contains("\"body\":\"hello\""));

        hub.unregister("push-target", session);
    }

    #[tokio::test]
    async fn unregister_removes_session() {
        let hub = ChatHubService {};
        let (tx, _rx) = mpsc::channel(SESSION_BUFFER);
        let session = hub.register("unregister-target", tx);

        hub.unregister("unregister-target", session);
        hub.push("unregister-target", &message("unregister-target"));

        assert!(!SESSIONS.lock().unwrap().contains_key("unregister-target"));
    }

    #[tokio::test]
    async fn full_buffer_drops_push_but_keeps_session() {
        let hub = ChatHubService {};
        let (tx, mut rx) = mpsc::channel(1);
        let session = hub.register("slow-target", tx);

        hub.push("slow-target", &message("slow-target"));
        hub.push("slow-target", &message("slow-target"));

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
        assert!(SESSIONS.lock().unwrap().contains_key("slow-target"));

        hub.unregister("slow-target", session);
    }

    #[tokio::test]
    async fn dead_sessions_are_pruned_on_push() {
        let hub = ChatHubService {};
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        hub.register("pruned-target", tx);
        drop(rx);

        hub.push("pruned-target", &message("pruned-target"));
        assert!(!SESSIONS.lock().unwrap().contains_key("pruned-target"));
    }
}
