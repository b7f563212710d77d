//! Configuration management
//!
//! Settings are read from the environment, with a `.env` file honored in
//! development. The access token is required; the API root can be overridden
//! for proxies and test servers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::DEFAULT_API_URL;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GroupMe API access token
    pub access_token: String,

    /// API root URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Reads `GROUPME_ACCESS_TOKEN` (required) and `GROUPME_API_URL`
    /// (optional, defaults to the production API root).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let access_token = std::env::var("GROUPME_ACCESS_TOKEN")
            .map_err(|_| Error::Config("GROUPME_ACCESS_TOKEN not set".to_string()))?;

        let api_url = std::env::var("GROUPME_API_URL").unwrap_or_else(|_| default_api_url());

        Ok(Self {
            access_token,
            api_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_loading() {
        // SAFETY: no other test reads or writes these variables.
        unsafe {
            std::env::set_var("GROUPME_ACCESS_TOKEN", "token-from-env");
            std::env::set_var("GROUPME_API_URL", "http://localhost:9999");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.access_token, "token-from-env");
        assert_eq!(config.api_url, "http://localhost:9999");

        unsafe {
            std::env::remove_var("GROUPME_ACCESS_TOKEN");
            std::env::remove_var("GROUPME_API_URL");
        }
    }
}
