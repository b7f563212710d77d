//! Direct messages
//!
//! The [`DirectMessages`] manager covers the one-on-one thread with another
//! user. The thread resource pages backwards (`before_id`) or from the
//! newest end (`since_id`); unlike group messages it has no forward mode.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::attachments::Attachment;
use crate::error::{Error, Result};
use crate::likes::Likes;
use crate::session::Session;

const PATH: &str = "direct_messages";

/// Pagination window for a direct-message thread.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_id: Option<String>,
    /// Page size, service-side default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Wire shape of a direct message.
#[derive(Debug, Clone, Deserialize)]
struct DirectMessageData {
    id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    recipient_id: String,
    sender_id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    favorited_by: Vec<String>,
    #[serde(default)]
    attachments: Vec<Value>,
}

/// A message in a one-on-one conversation.
#[derive(Debug, Clone)]
pub struct DirectMessage {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub recipient_id: String,
    pub sender_id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub text: Option<String>,
    /// Ids of the participants who liked this message.
    pub favorited_by: Vec<String>,
    pub attachments: Vec<Attachment>,
    likes: Likes,
}

impl DirectMessage {
    fn from_data(session: &Session, data: DirectMessageData) -> Result<Self> {
        let attachments = Attachment::from_bulk_data(data.attachments)?;
        let conversation_id = join_conversation_id(&data.recipient_id, &data.sender_id);
        let likes = Likes::new(session.clone(), &conversation_id, &data.id);

        Ok(Self {
            id: data.id,
            created_at: data.created_at,
            recipient_id: data.recipient_id,
            sender_id: data.sender_id,
            user_id: data.user_id,
            name: data.name,
            avatar_url: data.avatar_url,
            text: data.text,
            favorited_by: data.favorited_by,
            attachments,
            likes,
        })
    }

    /// The conversation shared by the two participants, recipient first.
    ///
    /// Always recomputed from the participant ids.
    pub fn conversation_id(&self) -> String {
        join_conversation_id(&self.recipient_id, &self.sender_id)
    }

    /// Like this message.
    pub async fn like(&self) -> Result<()> {
        self.likes.like().await
    }

    /// Withdraw a like from this message.
    pub async fn unlike(&self) -> Result<()> {
        self.likes.unlike().await
    }
}

fn join_conversation_id(recipient_id: &str, sender_id: &str) -> String {
    format!("{}+{}", recipient_id, sender_id)
}

impl fmt::Display for DirectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DirectMessage(name={}, text={}, attachments={})",
            self.name.as_deref().unwrap_or(""),
            self.text.as_deref().unwrap_or(""),
            self.attachments.len()
        )
    }
}

/// Manager for the direct-message thread with one other user.
#[derive(Debug, Clone)]
pub struct DirectMessages {
    session: Session,
    other_user_id: String,
}

impl DirectMessages {
    /// Create a manager scoped to the thread with another user.
    pub fn new(session: Session, other_user_id: &str) -> Self {
        Self {
            session,
            other_user_id: other_user_id.to_string(),
        }
    }

    /// Fetch one page of the thread.
    async fn raw_list(&self, params: &DirectListParams) -> Result<Vec<DirectMessage>> {
        #[derive(Serialize)]
        struct ScopedQuery<'a> {
            other_user_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            before_id: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            since_id: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            limit: Option<u32>,
        }

        #[derive(Deserialize)]
        struct ListResponse {
            direct_messages: Vec<DirectMessageData>,
        }

        let query = ScopedQuery {
            other_user_id: &self.other_user_id,
            before_id: params.before_id.as_deref(),
            since_id: params.since_id.as_deref(),
            limit: params.limit,
        };

        let response = self.session.get(PATH, &query).await?;

        // Nothing new past the anchor.
        if response.status == StatusCode::NOT_MODIFIED {
            return Ok(Vec::new());
        }

        let data = response
            .data
            .ok_or(Error::MalformedResponse("direct_messages"))?;
        let list: ListResponse = serde_json::from_value(data)?;

        list.direct_messages
            .into_iter()
            .map(|message| DirectMessage::from_data(&self.session, message))
            .collect()
    }

    /// List messages in the thread.
    pub async fn list(&self, params: DirectListParams) -> Result<Vec<DirectMessage>> {
        debug!("Listing direct messages with user {}", self.other_user_id);
        self.raw_list(&params).await
    }

    /// List the messages created before the given message.
    pub async fn list_before(&self, message_id: &str) -> Result<Vec<DirectMessage>> {
        self.list(DirectListParams {
            before_id: Some(message_id.to_string()),
            ..DirectListParams::default()
        })
        .await
    }

    /// List the most recent messages created since the given message.
    pub async fn list_since(&self, message_id: &str) -> Result<Vec<DirectMessage>> {
        self.list(DirectListParams {
            since_id: Some(message_id.to_string()),
            ..DirectListParams::default()
        })
        .await
    }

    /// Send a direct message to the other user.
    ///
    /// A part that is not supplied stays out of the payload entirely; the
    /// service distinguishes an omitted field from an empty one.
    pub async fn create(
        &self,
        text: Option<&str>,
        attachments: Option<&[Attachment]>,
    ) -> Result<DirectMessage> {
        #[derive(Serialize)]
        struct NewDirectMessage<'a> {
            source_guid: String,
            recipient_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            attachments: Option<Vec<Value>>,
        }

        #[derive(Serialize)]
        struct CreateRequest<'a> {
            direct_message: NewDirectMessage<'a>,
        }

        #[derive(Deserialize)]
        struct CreateResponse {
            direct_message: DirectMessageData,
        }

        let attachments = attachments
            .map(|list| {
                list.iter()
                    .map(Attachment::to_json)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let body = CreateRequest {
            direct_message: NewDirectMessage {
                source_guid: Uuid::new_v4().to_string(),
                recipient_id: &self.other_user_id,
                text,
                attachments,
            },
        };

        debug!("Sending direct message to user {}", self.other_user_id);

        let response = self.session.post(PATH, &body).await?;
        let data = response
            .data
            .ok_or(Error::MalformedResponse("direct_message"))?;
        let created: CreateResponse = serde_json::from_value(data)?;

        let message = DirectMessage::from_data(&self.session, created.direct_message)?;
        info!("Sent direct message {} to user {}", message.id, self.other_user_id);

        Ok(message)
    }
}
