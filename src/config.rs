use std::env;
use std::time::Duration;

use anyhow::Result;

use crate::classify::RuleSet;

/// Public client id of the registered Twitch application.
const DEFAULT_CLIENT_ID: &str = "4u90ix62rwav0debvu1qp2ldixu9ml";

/// Redirect URL registered with the application. The port must match the
/// local listener, so both come from the same config field.
const DEFAULT_REDIRECT_URL: &str = "http://localhost:3000/";

const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv/oauth2/authorize";
const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";
const DEFAULT_FOLLOWS_API_URL: &str = "https://tools.2807.eu/api";

/// Central configuration loaded from environment variables.
///
/// Every component takes what it needs from here at construction —
/// there are no module-level constants for ids, URLs, or keyword lists.
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    pub client_id: String,
    /// Implicit-grant access token (TWITCH_ACCESS_TOKEN). Empty until the
    /// user runs `varta login` and exports the captured token.
    pub access_token: String,
    pub auth_url: String,
    pub redirect_url: String,
    /// Fixed scope set: read the broadcaster's email-backed identity,
    /// read followers, manage blocked users.
    pub scopes: Vec<String>,
    pub helix_url: String,
    /// Base URL of the external "channels this user follows" collaborator.
    pub follows_api_url: String,
    /// How long the redirect listener waits for the browser handshake.
    pub capture_timeout: Duration,
    pub rules: RuleSet,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the access token, which only
    /// exists after an interactive login.
    pub fn load() -> Result<Self> {
        let capture_timeout = env::var("VARTA_AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));

        Ok(Self {
            client_id: env::var("VARTA_CLIENT_ID")
                .unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            access_token: env::var("TWITCH_ACCESS_TOKEN").unwrap_or_default(),
            auth_url: env::var("VARTA_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            redirect_url: env::var("VARTA_REDIRECT_URL")
                .unwrap_or_else(|_| DEFAULT_REDIRECT_URL.to_string()),
            scopes: vec![
                "user:read:email".to_string(),
                "moderator:read:followers".to_string(),
                "user:manage:blocked_users".to_string(),
            ],
            helix_url: env::var("VARTA_HELIX_URL")
                .unwrap_or_else(|_| DEFAULT_HELIX_URL.to_string()),
            follows_api_url: env::var("VARTA_FOLLOWS_API_URL")
                .unwrap_or_else(|_| DEFAULT_FOLLOWS_API_URL.to_string()),
            capture_timeout,
            rules: RuleSet::default(),
        })
    }

    /// Check that an access token is configured.
    /// Call this before any operation that talks to Helix.
    pub fn require_token(&self) -> Result<()> {
        if self.access_token.is_empty() {
            anyhow::bail!(
                "TWITCH_ACCESS_TOKEN not set. Run `varta login` and export the\n\
                 captured token (or add it to your .env file)."
            );
        }
        Ok(())
    }
}
