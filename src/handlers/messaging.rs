//! Tutor-student messaging endpoints.
//!
//! REST covers contact discovery, thread management and history; the
//! websocket endpoint carries live traffic. A message sent over either
//! path is persisted first and then pushed to the receiver's open
//! sessions, so the two stay interchangeable.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use actix_ws::Message as WsMessage;
use tokio::sync::mpsc;
use validator::Validate;

use crate::domain::dto::courses::request::PageQuery;
use crate::domain::dto::messaging::request::{OpenChatRequest, SendMessageRequest, WsQuery};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::messaging::chat_hub_service::{ChatHubService, SESSION_BUFFER};
use crate::services::messaging::message_service::MessageService;

/// Chat partners for the caller: enrolled tutors for a student, enrolled
/// students for a tutor.
#[get("/contacts")]
pub async fn contacts(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let service = MessageService::instance();
    let contacts = if user.is_student() {
        service.all_tutors(&user.user_id).await?
    } else {
        service.all_students(&user.user_id).await?
    };
    Ok(ApiResponse::success("Contacts retrieved", contacts))
}

/// Get-or-create the thread with the given participant.
#[post("/chats")]
pub async fn open_chat(
    user: AuthenticatedUser,
    payload: web::Json<OpenChatRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let chat = MessageService::instance()
        .open_chat(&user.user_id, user.is_student(), &payload.participant_id)
        .await?;
    Ok(ApiResponse::success("Chat opened", chat))
}

#[get("/chats")]
pub async fn list_chats(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let chats = MessageService::instance()
        .list_chats(&user.user_id, !user.is_student())
        .await?;
    Ok(ApiResponse::success("Chats retrieved", chats))
}

/// Thread history, newest page first. Opening a page clears the caller's
/// unread counter.
#[get("/chats/{chat_id}/messages")]
pub async fn history(
    user: AuthenticatedUser,
    chat_id: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.pagination();
    let messages = MessageService::instance()
        .history(&user.user_id, !user.is_student(), &chat_id, skip, limit)
        .await?;
    Ok(ApiResponse::success("Messages retrieved", messages))
}

#[post("/send")]
pub async fn send_message(
    user: AuthenticatedUser,
    payload: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let message = MessageService::instance()
        .send(&user.user_id, user.is_student(), payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Message sent", message))
}

/// Live chat socket for one thread. Outbound frames are messages pushed by
/// the hub; inbound text frames are `{ "body": "...", "courseId": null }`
/// payloads addressed to the thread's other participant.
#[get("/ws")]
pub async fn chat_socket(
    req: HttpRequest,
    stream: web::Payload,
    user: AuthenticatedUser,
    query: web::Query<WsQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let is_student = user.is_student();
    let peer_id = MessageService::instance()
        .chat_peer(&user.user_id, !is_student, &query.chat_id)
        .await?;

    let (res, session, mut msg_stream) = actix_ws::handle(&req, stream)?;
    let (tx, mut rx) = mpsc::channel::<String>(SESSION_BUFFER);

    let hub = ChatHubService::instance();
    let session_id = hub.register(&user.user_id, tx);

    let mut outbound = session.clone();
    actix_web::rt::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if outbound.text(payload).await.is_err() {
                break;
            }
        }
    });

    let user_id = user.user_id.clone();
    let mut session = session;
    actix_web::rt::spawn(async move {
        while let Some(Ok(msg)) = msg_stream.recv().await {
            match msg {
                WsMessage::Text(text) => {
                    let parsed: serde_json::Value = match serde_json::from_str(&text) {
                        Ok(value) => value,
                        Err(_) => {
                            log::debug!("dropping malformed chat frame from {}", user_id);
                            continue;
                        }
                    };
                    let Some(body) = parsed["body"].as_str() else {
                        continue;
                    };

                    let request = SendMessageRequest {
                        receiver_id: peer_id.clone(),
                        body: body.to_string(),
                        course_id: parsed["courseId"].as_str().map(str::to_string),
                    };
                    if let Err(e) = MessageService::instance()
                        .send(&user_id, is_student, request)
                        .await
                    {
                        log::warn!("chat send over socket failed for {}: {}", user_id, e);
                    }
                }
                WsMessage::Ping(bytes) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }

        ChatHubService::instance().unregister(&user_id, session_id);
        let _ = session.close(None).await;
    });

    Ok(res)
}
