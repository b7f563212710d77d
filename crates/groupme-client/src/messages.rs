//! Group messages
//!
//! The [`Messages`] manager lists and creates the messages of one group.
//! Listing pages with a single anchor (`before_id`, `after_id`, `since_id`);
//! a 304 from the service means the window is exhausted and yields an empty
//! page rather than an error.

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

/// Pagination window for group message listings.
///
/// At most one anchor is meaningful per request; the `list_*` helpers set
/// exactly one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_id: Option<String>,
    /// Page size, service-side default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Wire shape of a group message.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageData {
    id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    group_id: String,
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

/// A message posted to a group.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub group_id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub text: Option<String>,
    /// Ids of the members who liked this message.
    pub favorited_by: Vec<String>,
    pub attachments: Vec<Attachment>,
    likes: Likes,
}

impl Message {
    pub(crate) fn from_data(session: &Session, data: MessageData) -> Result<Self> {
        let attachments = Attachment::from_bulk_data(data.attachments)?;
        let likes = Likes::new(session.clone(), &data.group_id, &data.id);

        Ok(Self {
            id: data.id,
            created_at: data.created_at,
            group_id: data.group_id,
            user_id: data.user_id,
            name: data.name,
            avatar_url: data.avatar_url,
            text: data.text,
            favorited_by: data.favorited_by,
            attachments,
            likes,
        })
    }

    /// The conversation this message belongs to: the group itself.
    pub fn conversation_id(&self) -> &str {
        &self.group_id
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

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message(name={}, text={}, attachments={})",
            self.name.as_deref().unwrap_or(""),
            self.text.as_deref().unwrap_or(""),
            self.attachments.len()
        )
    }
}

/// Manager for the messages of one group.
#[derive(Debug, Clone)]
pub struct Messages {
    session: Session,
    group_id: String,
}

impl Messages {
    /// Create a manager scoped to a group.
    pub fn new(session: Session, group_id: &str) -> Self {
        Self {
            session,
            group_id: group_id.to_string(),
        }
    }

    fn path(&self) -> String {
        format!("groups/{}/messages", self.group_id)
    }

    /// Fetch one page of messages.
    async fn raw_list(&self, params: &ListParams) -> Result<Vec<Message>> {
        #[derive(Deserialize)]
        struct ListResponse {
            messages: Vec<MessageData>,
        }

        let response = self.session.get(&self.path(), params).await?;

        // Nothing new past the anchor.
        if response.status == StatusCode::NOT_MODIFIED {
            return Ok(Vec::new());
        }

        let data = response.data.ok_or(Error::MalformedResponse("messages"))?;
        let list: ListResponse = serde_json::from_value(data)?;

        list.messages
            .into_iter()
            .map(|message| Message::from_data(&self.session, message))
            .collect()
    }

    /// List messages in the group.
    pub async fn list(&self, params: ListParams) -> Result<Vec<Message>> {
        debug!("Listing messages for group {}", self.group_id);
        self.raw_list(&params).await
    }

    /// List the messages created before the given message.
    pub async fn list_before(&self, message_id: &str) -> Result<Vec<Message>> {
        self.list(ListParams {
            before_id: Some(message_id.to_string()),
            ..ListParams::default()
        })
        .await
    }

    /// List the messages created immediately after the given message.
    pub async fn list_after(&self, message_id: &str) -> Result<Vec<Message>> {
        self.list(ListParams {
            after_id: Some(message_id.to_string()),
            ..ListParams::default()
        })
        .await
    }

    /// List the most recent messages created since the given message.
    pub async fn list_since(&self, message_id: &str) -> Result<Vec<Message>> {
        self.list(ListParams {
            since_id: Some(message_id.to_string()),
            ..ListParams::default()
        })
        .await
    }

    /// Post a new message to the group.
    ///
    /// A part that is not supplied stays out of the payload entirely; the
    /// service distinguishes an omitted field from an empty one.
    pub async fn create(
        &self,
        text: Option<&str>,
        attachments: Option<&[Attachment]>,
    ) -> Result<Message> {
        #[derive(Serialize)]
        struct NewMessage<'a> {
            source_guid: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            attachments: Option<Vec<Value>>,
        }

        #[derive(Serialize)]
        struct CreateRequest<'a> {
            message: NewMessage<'a>,
        }

        #[derive(Deserialize)]
        struct CreateResponse {
            message: MessageData,
        }

        let attachments = attachments
            .map(|list| {
                list.iter()
                    .map(Attachment::to_json)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let body = CreateRequest {
            message: NewMessage {
                source_guid: Uuid::new_v4().to_string(),
                text,
                attachments,
            },
        };

        debug!("Creating message in group {}", self.group_id);

        let response = self.session.post(&self.path(), &body).await?;
        let data = response.data.ok_or(Error::MalformedResponse("message"))?;
        let created: CreateResponse = serde_json::from_value(data)?;

        let message = Message::from_data(&self.session, created.message)?;
        info!("Created message {} in group {}", message.id, self.group_id);

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::Location;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message_data() -> Value {
        json!({
            "id": "foo",
            "created_at": 1302623328,
            "group_id": "bar",
        })
    }

    fn manager(server: &MockServer) -> Messages {
        let session = Session::with_base_url("token", server.uri()).unwrap();
        Messages::new(session, "bar")
    }

    #[tokio::test]
    async fn test_list_returns_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"messages": [message_data()]})),
            )
            .mount(&server)
            .await;

        let messages = manager(&server).list(ListParams::default()).await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "foo");
        assert_eq!(messages[0].group_id, "bar");
    }

    #[tokio::test]
    async fn test_not_modified_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .respond_with(
                ResponseTemplate::new(304).set_body_json(json!({"messages": [message_data()]})),
            )
            .mount(&server)
            .await;

        let messages = manager(&server).list(ListParams::default()).await.unwrap();

        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_list_before_sets_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .and(query_param("before_id", "qux"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        manager(&server).list_before("qux").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_after_sets_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .and(query_param("after_id", "qux"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        manager(&server).list_after("qux").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_since_sets_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .and(query_param("since_id", "qux"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .expect(1)
            .mount(&server)
            .await;

        manager(&server).list_since("qux").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_with_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/bar/messages"))
            .and(body_partial_json(json!({"message": {"text": "qux"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": message_data()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let message = manager(&server).create(Some("qux"), None).await.unwrap();

        assert_eq!(message.group_id, "bar");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["message"].get("attachments").is_none());
    }

    #[tokio::test]
    async fn test_create_with_attachments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/bar/messages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": message_data()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let pin = Attachment::Location(Location::new("Docks", "45.52", "-122.67"));
        manager(&server).create(None, Some(&[pin])).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["message"]["attachments"][0]["type"], "location");
        assert!(body["message"].get("text").is_none());
    }

    #[tokio::test]
    async fn test_conversation_id_is_group_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/bar/messages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"messages": [message_data()]})),
            )
            .mount(&server)
            .await;

        let messages = manager(&server).list(ListParams::default()).await.unwrap();

        assert_eq!(messages[0].conversation_id(), "bar");
    }

    #[test]
    fn test_display_shows_name_text_and_count() {
        let session = Session::with_base_url("token", "http://localhost").unwrap();
        let data: MessageData = serde_json::from_value(json!({
            "id": "foo",
            "created_at": 1302623328,
            "group_id": "bar",
            "name": "Alice",
            "text": "corge",
        }))
        .unwrap();

        let message = Message::from_data(&session, data).unwrap();

        assert_eq!(
            message.to_string(),
            "Message(name=Alice, text=corge, attachments=0)"
        );
    }
}
