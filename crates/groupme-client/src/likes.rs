//! Likes and the group leaderboard
//!
//! [`Likes`] is the per-message handle messages delegate their `like` and
//! `unlike` calls to; it carries only the session and the conversation and
//! message ids the endpoint is scoped by. [`Leaderboard`] is the read-only
//! view of the most-liked messages of a group.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::messages::{Message, MessageData};
use crate::session::Session;

const NO_PARAMS: &[(&str, &str)] = &[];

/// Like/unlike calls scoped to one message in one conversation.
#[derive(Debug, Clone)]
pub struct Likes {
    session: Session,
    conversation_id: String,
    message_id: String,
}

impl Likes {
    pub(crate) fn new(session: Session, conversation_id: &str, message_id: &str) -> Self {
        Self {
            session,
            conversation_id: conversation_id.to_string(),
            message_id: message_id.to_string(),
        }
    }

    fn path(&self, action: &str) -> String {
        format!(
            "messages/{}/{}/{}",
            self.conversation_id, self.message_id, action
        )
    }

    /// Like the message.
    pub async fn like(&self) -> Result<()> {
        debug!(
            "Liking message {} in conversation {}",
            self.message_id, self.conversation_id
        );
        self.session
            .post(&self.path("like"), &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// Withdraw a like from the message.
    pub async fn unlike(&self) -> Result<()> {
        debug!(
            "Unliking message {} in conversation {}",
            self.message_id, self.conversation_id
        );
        self.session
            .post(&self.path("unlike"), &serde_json::json!({}))
            .await?;
        Ok(())
    }
}

/// Time window for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// Wire value for the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

/// Read-only view of the most-liked messages of a group.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    session: Session,
    group_id: String,
}

impl Leaderboard {
    /// Create a leaderboard view for a group.
    pub fn new(session: Session, group_id: &str) -> Self {
        Self {
            session,
            group_id: group_id.to_string(),
        }
    }

    fn path(&self) -> String {
        format!("groups/{}/likes", self.group_id)
    }

    /// Fetch messages from a leaderboard sub-resource.
    async fn get_messages<P: Serialize + ?Sized>(
        &self,
        path: &str,
        params: &P,
    ) -> Result<Vec<Message>> {
        #[derive(Deserialize)]
        struct LeaderboardResponse {
            messages: Vec<MessageData>,
        }

        let response = self.session.get(path, params).await?;

        let data = response.data.ok_or(Error::MalformedResponse("messages"))?;
        let list: LeaderboardResponse = serde_json::from_value(data)?;

        list.messages
            .into_iter()
            .map(|message| Message::from_data(&self.session, message))
            .collect()
    }

    /// The most-liked messages of the group over a period.
    pub async fn list(&self, period: Period) -> Result<Vec<Message>> {
        debug!("Listing leaderboard for group {}", self.group_id);
        self.get_messages(&self.path(), &[("period", period.as_str())])
            .await
    }

    /// The group messages the authenticated user has liked.
    pub async fn my_likes(&self) -> Result<Vec<Message>> {
        self.get_messages(&format!("{}/mine", self.path()), NO_PARAMS)
            .await
    }

    /// The user's own messages that other members liked.
    pub async fn my_hits(&self) -> Result<Vec<Message>> {
        self.get_messages(&format!("{}/for_me", self.path()), NO_PARAMS)
            .await
    }
}
