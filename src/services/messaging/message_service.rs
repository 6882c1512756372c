//! Tutor-student messaging.
//!
//! One chat thread per (tutor, student) pair, created lazily on first
//! message. Sends persist first and then fan out to live websocket sessions
//! through the chat hub.

use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::messaging::request::SendMessageRequest;
use crate::domain::dto::messaging::response::{ChatResponse, ContactResponse, MessageResponse};
use crate::domain::entities::messaging::chat::Chat;
use crate::domain::entities::messaging::message::{Message, ParticipantKind};
use crate::errors::errors::AppError;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::repositories::messaging::chat_repo::ChatRepository;
use crate::repositories::messaging::message_repo::MessageRepository;
use crate::repositories::students::student_repo::StudentRepository;
use crate::services::messaging::chat_hub_service::ChatHubService;

#[service(name = "message")]
pub struct MessageService {
    chat_repo: Arc<ChatRepository>,
    message_repo: Arc<MessageRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    course_repo: Arc<CourseRepository>,
    account_repo: Arc<AccountRepository>,
    student_repo: Arc<StudentRepository>,
}

impl MessageService {
    /// `sender_is_student` decides which side of the pair the caller is;
    /// the receiver must be the opposite kind.
    pub async fn send(
        &self,
        sender_id: &str,
        sender_is_student: bool,
        request: SendMessageRequest,
    ) -> Result<MessageResponse, AppError> {
        let sender_oid = ObjectId::parse_str(sender_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let receiver_oid = ObjectId::parse_str(&request.receiver_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let (tutor_oid, student_oid, sender_kind, receiver_kind) = if sender_is_student {
            (
                receiver_oid,
                sender_oid,
                ParticipantKind::Student,
                ParticipantKind::Tutor,
            )
        } else {
            (
                sender_oid,
                receiver_oid,
                ParticipantKind::Tutor,
                ParticipantKind::Student,
            )
        };

        let chat = match self.chat_repo.find_by_pair(&tutor_oid, &student_oid).await? {
            Some(chat) => chat,
            None => self.chat_repo.create(Chat::new(tutor_oid, student_oid)).await?,
        };

        let chat_oid = chat
            .id
            .ok_or_else(|| AppError::InternalError("Chat has no id".to_string()))?;

        let mut message = Message::new(
            chat_oid,
            sender_oid,
            sender_kind,
            receiver_oid,
            receiver_kind,
            request.body,
        );

        if let Some(ref course_id) = request.course_id {
            message.course_id = Some(
                ObjectId::parse_str(course_id)
                    .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?,
            );
        }

        let created = self.message_repo.create(message).await?;
        let message_oid = created
            .id
            .ok_or_else(|| AppError::InternalError("Message has no id".to_string()))?;

        // The receiver's unread counter is the one that gets bumped.
        let receiver_is_tutor = receiver_kind == ParticipantKind::Tutor;
        self.chat_repo
            .record_message(&chat_oid, &message_oid, receiver_is_tutor)
            .await?;

        let response = MessageResponse::from(created);
        ChatHubService::instance().push(&request.receiver_id, &response);

        Ok(response)
    }

    /// Chat partner discovery for students: the distinct tutors behind
    /// their purchased courses.
    pub async fn all_tutors(&self, student_id: &str) -> Result<Vec<ContactResponse>, AppError> {
        let student_oid = ObjectId::parse_str(student_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let enrollments = self.purchasedcourse_repo.find_by_student(&student_oid).await?;

        let mut tutor_ids: Vec<ObjectId> = Vec::new();
        for enrollment in &enrollments {
            if let Some(course) = self
                .course_repo
                .find_by_id(&enrollment.course_id.to_hex())
                .await?
            {
                if !tutor_ids.contains(&course.tutor_id) {
                    tutor_ids.push(course.tutor_id);
                }
            }
        }

        let mut contacts = Vec::with_capacity(tutor_ids.len());
        for tutor_id in &tutor_ids {
            if let Some(tutor) = self.account_repo.find_by_id(&tutor_id.to_hex()).await? {
                contacts.push(ContactResponse {
                    id: tutor_id.to_hex(),
                    name: tutor.full_name(),
                    email: tutor.email,
                    profile_picture: tutor.profile_picture,
                });
            }
        }

        Ok(contacts)
    }

    /// Chat partner discovery for tutors: every student who bought one of
    /// their courses.
    pub async fn all_students(&self, tutor_id: &str) -> Result<Vec<ContactResponse>, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let courses = self.course_repo.find_by_tutor(&tutor_oid).await?;
        let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();

        let enrollments = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, None)
            .await?;

        let mut student_ids: Vec<ObjectId> = Vec::new();
        for enrollment in &enrollments {
            if !student_ids.contains(&enrollment.student_id) {
                student_ids.push(enrollment.student_id);
            }
        }

        let students = self.student_repo.find_by_ids(&student_ids).await?;
        Ok(students
            .into_iter()
            .filter_map(|s| {
                s.id.map(|id| ContactResponse {
                    id: id.to_hex(),
                    name: format!("{} {}", s.first_name, s.last_name),
                    email: s.email,
                    profile_picture: s.profile_picture,
                })
            })
            .collect())
    }

    /// `POST /chat`: get-or-create the thread for a (student, tutor) pair.
    pub async fn open_chat(
        &self,
        caller_id: &str,
        caller_is_student: bool,
        other_id: &str,
    ) -> Result<ChatResponse, AppError> {
        let caller_oid = ObjectId::parse_str(caller_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        let other_oid = ObjectId::parse_str(other_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let (tutor_oid, student_oid) = if caller_is_student {
            (other_oid, caller_oid)
        } else {
            (caller_oid, other_oid)
        };

        let chat = match self.chat_repo.find_by_pair(&tutor_oid, &student_oid).await? {
            Some(chat) => chat,
            None => self.chat_repo.create(Chat::new(tutor_oid, student_oid)).await?,
        };

        Ok(ChatResponse::from(chat))
    }

    /// Resolves the other side of a chat the caller belongs to. Used by the
    /// websocket endpoint to address inbound frames.
    pub async fn chat_peer(
        &self,
        participant_id: &str,
        is_tutor: bool,
        chat_id: &str,
    ) -> Result<String, AppError> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

        let participant_oid = ObjectId::parse_str(participant_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let (own, peer) = if is_tutor {
            (chat.tutor_id, chat.student_id)
        } else {
            (chat.student_id, chat.tutor_id)
        };
        if own != participant_oid {
            return Err(AppError::AuthorizationError(
                "You are not part of this chat".to_string(),
            ));
        }

        Ok(peer.to_hex())
    }

    pub async fn list_chats(
        &self,
        participant_id: &str,
        is_tutor: bool,
    ) -> Result<Vec<ChatResponse>, AppError> {
        let participant_oid = ObjectId::parse_str(participant_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let chats = self
            .chat_repo
            .find_for_participant(&participant_oid, is_tutor)
            .await?;
        Ok(chats.into_iter().map(ChatResponse::from).collect())
    }

    /// Thread history; opening a chat clears the reader's unread counter.
    pub async fn history(
        &self,
        participant_id: &str,
        is_tutor: bool,
        chat_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<MessageResponse>, AppError> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

        let participant_oid = ObjectId::parse_str(participant_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let belongs = if is_tutor {
            chat.tutor_id == participant_oid
        } else {
            chat.student_id == participant_oid
        };
        if !belongs {
            return Err(AppError::AuthorizationError(
                "You are not part of this chat".to_string(),
            ));
        }

        let chat_oid = chat
            .id
            .ok_or_else(|| AppError::InternalError("Chat has no id".to_string()))?;

        self.chat_repo.clear_unread(&chat_oid, is_tutor).await?;

        let messages = self
            .message_repo
            .find_by_chat(&chat_oid, skip, limit)
            .await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }
}
