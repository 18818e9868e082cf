//! Leaderboard Client
//!
//! HTTP client for the score backend. The simulation never calls this
//! directly; [`crate::network::session::GameSession`] issues fetches off the
//! tick path when a run ends.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::LeaderboardConfig;
use crate::network::protocol::{
    LeaderboardEntry, PlayerProfile, ProfileRequest, RegisterRequest, RegisterResponse,
};

/// Leaderboard errors.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    /// Transport failure (connect, TLS, timeout inside reqwest).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        body: String,
    },

    /// Body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Registration token was not a UUID.
    #[error("Invalid auth token: {0}")]
    InvalidToken(#[from] uuid::Error),

    /// Fetch did not finish in time.
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Anything that can produce a leaderboard.
///
/// The session only needs this one call, which keeps tests free of HTTP.
pub trait LeaderboardSource: Clone + Send + Sync + 'static {
    /// Fetch entries, highest score first.
    fn fetch_leaderboard(
        &self,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, LeaderboardError>> + Send;
}

/// reqwest-backed client for the score backend.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: Client,
    base_url: String,
}

impl LeaderboardClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: &LeaderboardConfig) -> Result<Self, LeaderboardError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /users/get`, sorted by high score descending.
    ///
    /// The sort is stable, so ties keep the backend's order.
    pub async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let url = join_url(&self.base_url, "/users/get");
        debug!("Fetching leaderboard from {}", url);

        let response = self.http.get(url).send().await?;
        let mut entries: Vec<LeaderboardEntry> = parse_response(response).await?;
        entries.sort_by(|a, b| b.high_score.cmp(&a.high_score));

        info!("Fetched {} leaderboard entries", entries.len());
        Ok(entries)
    }

    /// `POST /user/create`, returning the player's auth token.
    pub async fn register_player(&self, name: &str) -> Result<Uuid, LeaderboardError> {
        let url = join_url(&self.base_url, "/user/create");
        let request = RegisterRequest {
            name: name.to_string(),
        };

        let response = self.http.post(url).json(&request).send().await?;
        let body: RegisterResponse = parse_response(response).await?;
        let token = Uuid::parse_str(&body.token)?;

        info!("Registered '{}'", name);
        Ok(token)
    }

    /// `POST /user/get`, looking a player up by token.
    pub async fn fetch_profile(&self, token: &Uuid) -> Result<PlayerProfile, LeaderboardError> {
        let url = join_url(&self.base_url, "/user/get");
        let request = ProfileRequest {
            token: token.to_string(),
        };

        let response = self.http.post(url).json(&request).send().await?;
        parse_response(response).await
    }
}

impl LeaderboardSource for LeaderboardClient {
    fn fetch_leaderboard(
        &self,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, LeaderboardError>> + Send {
        LeaderboardClient::fetch_leaderboard(self)
    }
}

async fn parse_response<T>(response: reqwest::Response) -> Result<T, LeaderboardError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    } else {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unavailable>".to_string());
        Err(LeaderboardError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (format!("http://{addr}"), handle)
    }

    /// Read headers plus a Content-Length body.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn client_for(base_url: String) -> LeaderboardClient {
        LeaderboardClient::new(&LeaderboardConfig {
            enabled: true,
            base_url,
            timeout_ms: 2000,
        })
        .unwrap()
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h:8080/", "/users/get"), "http://h:8080/users/get");
        assert_eq!(join_url("http://h:8080", "users/get"), "http://h:8080/users/get");
    }

    #[tokio::test]
    async fn test_fetch_sorts_descending() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"name":"Low","highScore":3},{"name":"High","highScore":40},{"name":"Mid","highScore":12}]"#,
        )
        .await;

        let entries = client_for(base).fetch_leaderboard().await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /users/get "));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (base, _server) = serve_once("500 Internal Server Error", "db down").await;

        let err = client_for(base).fetch_leaderboard().await.unwrap_err();
        match err {
            LeaderboardError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "db down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (base, _server) = serve_once("200 OK", r#"{"not":"a list"}"#).await;
        let err = client_for(base).fetch_leaderboard().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Decode(_)));
    }

    #[tokio::test]
    async fn test_register_returns_token() {
        let (base, server) =
            serve_once("200 OK", r#"{"token":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#).await;

        let token = client_for(base).register_player("Ann").await.unwrap();
        assert_eq!(token.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /user/create "));
        assert!(request.contains(r#"{"name":"Ann"}"#));
    }

    #[tokio::test]
    async fn test_fetch_profile_by_token() {
        let (base, server) = serve_once("200 OK", r#"{"id":"u-1","name":"Ann","highScore":9}"#).await;
        let token = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        let profile = client_for(base).fetch_profile(&token).await.unwrap();
        assert_eq!(profile.high_score, 9);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /user/get "));
        assert!(request.contains("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    }

    #[tokio::test]
    async fn test_register_rejects_non_uuid_token() {
        let (base, _server) = serve_once("200 OK", r#"{"token":"nope"}"#).await;
        let err = client_for(base).register_player("Ann").await.unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}"))
            .fetch_leaderboard()
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Request(_)));
    }
}
