// OAuth implicit-grant capture over a one-shot loopback listener.
//
// The access token arrives in the redirect URL fragment, which the browser
// never sends to a server. The listener answers the first request with a
// small page whose script reads `window.location.hash` and re-submits the
// token as a query parameter; the second request delivers the token.
//
// The listener socket lives inside the blocking task and is dropped on
// every exit path, success or failure.

use std::time::{Duration, Instant};

use tiny_http::{Header, Response, Server};
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::error::Error;

/// Bridge page served on the first inbound request. The fragment is only
/// visible to the script running in the browser.
const BRIDGE_PAGE: &str = r#"<html><head><meta charset="utf-8"></head>
<body><script>
    const hash = window.location.hash.substring(1);
    const params = new URLSearchParams(hash);
    const token = params.get('access_token');
    fetch('/?token=' + token).then(() => window.close());
</script><p>Authorization complete. You can close this tab.</p></body></html>"#;

/// Build the authorization URL the browser is sent to.
pub fn authorize_url(config: &Config) -> Result<String, Error> {
    let mut url = Url::parse(&config.auth_url)
        .map_err(|e| Error::Authentication(format!("invalid authorization URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("response_type", "token")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_url)
        .append_pair("scope", &config.scopes.join(" "));
    Ok(url.to_string())
}

/// One-shot HTTP listener bound to the redirect URL's loopback address.
pub struct RedirectListener {
    server: Server,
}

impl RedirectListener {
    /// Bind exactly the host and port named by the redirect URL.
    /// Port 0 is allowed; `local_url` reports the actual bound address.
    pub fn bind(redirect_url: &str) -> Result<Self, Error> {
        let url = Url::parse(redirect_url)
            .map_err(|e| Error::Authentication(format!("invalid redirect URL: {e}")))?;
        let addr = format!(
            "{}:{}",
            url.host_str().unwrap_or("127.0.0.1"),
            url.port_or_known_default().unwrap_or(80)
        );
        let server = Server::http(&addr)
            .map_err(|e| Error::Authentication(format!("failed to bind {addr}: {e}")))?;
        Ok(Self { server })
    }

    pub fn local_url(&self) -> String {
        format!("http://{}/", self.server.server_addr())
    }

    /// Run the two-request handshake, resolving with the captured token.
    ///
    /// Requests without a `token` query parameter get the bridge page;
    /// the first request carrying one ends the handshake. The deadline
    /// bounds the whole exchange — the user closing the consent tab would
    /// otherwise leave the listener waiting forever.
    pub async fn wait_for_token(self, timeout: Duration) -> Result<String, Error> {
        let server = self.server;
        tokio::task::spawn_blocking(move || handshake(server, timeout))
            .await
            .map_err(|e| Error::Authentication(format!("listener task failed: {e}")))?
    }
}

fn handshake(server: Server, timeout: Duration) -> Result<String, Error> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .ok_or_else(|| {
                Error::Authentication("timed out waiting for the OAuth redirect".to_string())
            })?;

        let request = match server.recv_timeout(remaining) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => return Err(Error::Authentication(format!("listener error: {e}"))),
        };

        let query_url = Url::parse(&format!("http://localhost{}", request.url()))
            .map_err(|e| Error::Authentication(format!("malformed redirect request: {e}")))?;
        let token = query_url
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned());

        match token {
            // The bridge script sends the literal string "null" when the
            // fragment carried no access_token.
            Some(token) if !token.is_empty() && token != "null" => {
                let _ = request.respond(Response::from_string(""));
                return Ok(token);
            }
            Some(_) => {
                let _ = request.respond(Response::from_string(""));
                return Err(Error::Authentication(
                    "authorization response carried no access token".to_string(),
                ));
            }
            None => {
                debug!(path = request.url(), "Serving fragment bridge page");
                let response = Response::from_string(BRIDGE_PAGE).with_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                        .expect("static header is valid"),
                );
                let _ = request.respond(response);
            }
        }
    }
}

/// Full capture flow: bind the listener, launch the user's browser on the
/// authorization URL, then wait for the handshake.
pub async fn capture_token(config: &Config) -> Result<String, Error> {
    let listener = RedirectListener::bind(&config.redirect_url)?;
    let url = authorize_url(config)?;

    info!("Opening browser for Twitch authorization");
    webbrowser::open(&url)
        .map_err(|e| Error::Authentication(format!("failed to open browser: {e}")))?;

    listener.wait_for_token(config.capture_timeout).await
}
