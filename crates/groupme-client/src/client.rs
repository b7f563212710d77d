//! Top-level client facade
//!
//! Owns one [`Session`] and hands out managers scoped to a group or to the
//! thread with another user.

use crate::config::Config;
use crate::direct_messages::DirectMessages;
use crate::error::Result;
use crate::likes::Leaderboard;
use crate::messages::Messages;
use crate::session::Session;

/// Entry point to the API.
#[derive(Debug, Clone)]
pub struct Client {
    session: Session,
}

impl Client {
    /// Create a client from an access token.
    pub fn new(access_token: &str) -> Result<Self> {
        Ok(Self {
            session: Session::new(access_token)?,
        })
    }

    /// Create a client from a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            session: Session::with_base_url(&config.access_token, config.api_url.clone())?,
        })
    }

    /// Create a client from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// The messages of a group.
    pub fn messages(&self, group_id: &str) -> Messages {
        Messages::new(self.session.clone(), group_id)
    }

    /// The direct-message thread with another user.
    pub fn direct_messages(&self, other_user_id: &str) -> DirectMessages {
        DirectMessages::new(self.session.clone(), other_user_id)
    }

    /// The leaderboard of a group.
    pub fn leaderboard(&self, group_id: &str) -> Leaderboard {
        Leaderboard::new(self.session.clone(), group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new("test-token");
        assert!(client.is_ok());
    }
}
