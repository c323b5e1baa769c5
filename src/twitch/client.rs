// Authenticated Helix client — a thin reqwest wrapper.
//
// Every request carries the Client-ID header and the bearer token from
// the implicit-grant capture. Non-2xx responses keep the body as the
// diagnostic; there is no retry at this layer.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;

pub struct HelixClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    token: String,
}

impl HelixClient {
    pub fn new(base_url: &str, client_id: &str, token: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("varta/0.1 (follower-audit)")
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Make a GET request to a Helix endpoint and deserialize the response.
    ///
    /// `params` are query string key-value pairs. Use repeated keys for
    /// array parameters (e.g. `[("broadcaster_id", "1"), ("broadcaster_id", "2")]`).
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.base_url, path);

        debug!(path = path, "Helix GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        response.json::<T>().await.map_err(Error::Parse)
    }

    /// Make a PUT request with no meaningful response body.
    pub async fn put(&self, path: &str, params: &[(&str, &str)]) -> Result<(), Error> {
        let url = format!("{}/{}", self.base_url, path);

        debug!(path = path, "Helix PUT request");

        let response = self
            .client
            .put(&url)
            .query(params)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        Ok(())
    }
}
