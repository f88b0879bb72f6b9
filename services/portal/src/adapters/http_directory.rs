//! services/portal/src/adapters/http_directory.rs
//!
//! The HTTP adapter for the remote visitor directory. It implements the
//! `VisitorDirectory` port from the core crate on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use visitor_portal_core::domain::VisitorEntry;
use visitor_portal_core::ports::{PortError, PortResult, VisitorDirectory};

use crate::web::protocol::{
    ClearLogResponse, PasswordRequest, RecordVisitorRequest, VisitorEntryRecord,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A directory client that implements the `VisitorDirectory` port over JSON/HTTP.
#[derive(Clone)]
pub struct HttpVisitorDirectory {
    base_url: String,
    http: reqwest::Client,
}

impl HttpVisitorDirectory {
    /// Creates a new client for the directory at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> PortResult<T> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Malformed directory response: {}", e)))
    }

    async fn check_status(response: Response) -> PortResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
            StatusCode::NOT_FOUND => PortError::NotFound(message),
            StatusCode::BAD_REQUEST => PortError::InvalidInput(message),
            StatusCode::SERVICE_UNAVAILABLE => PortError::Unavailable(message),
            _ => PortError::Unexpected(format!("Directory responded with {}: {}", status, message)),
        })
    }
}

/// Maps a transport-level failure (connect, timeout, ...) onto the port error.
fn transport(e: reqwest::Error) -> PortError {
    PortError::Unavailable(e.to_string())
}

fn to_domain(records: Vec<VisitorEntryRecord>) -> Vec<VisitorEntry> {
    records.into_iter().map(VisitorEntryRecord::to_domain).collect()
}

//=========================================================================================
// VisitorDirectory Implementation
//=========================================================================================

#[async_trait]
impl VisitorDirectory for HttpVisitorDirectory {
    async fn log_visitor(&self, username: &str) -> PortResult<()> {
        let body = RecordVisitorRequest {
            username: username.to_string(),
        };
        let response = self
            .http
            .post(self.url("/visitors"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn get_notifications(&self) -> PortResult<Vec<VisitorEntry>> {
        let response = self
            .http
            .get(self.url("/notifications"))
            .send()
            .await
            .map_err(transport)?;
        let records: Vec<VisitorEntryRecord> = Self::read_json(response).await?;
        Ok(to_domain(records))
    }

    async fn get_visitor_log(&self, password: &str) -> PortResult<Option<Vec<VisitorEntry>>> {
        let body = PasswordRequest {
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/visitor-log"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let records: Option<Vec<VisitorEntryRecord>> = Self::read_json(response).await?;
        if records.is_none() {
            debug!("Directory returned no visitor log for the supplied password.");
        }
        Ok(records.map(to_domain))
    }

    async fn clear_visitor_log(&self, password: &str) -> PortResult<bool> {
        let body = PasswordRequest {
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/visitor-log/clear"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let result: ClearLogResponse = Self::read_json(response).await?;
        Ok(result.cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn directory_for(server: &MockServer) -> HttpVisitorDirectory {
        HttpVisitorDirectory::new(&format!("{}/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn posts_visitor_username() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/visitors"))
            .and(body_json(json!({ "username": "alice" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        directory_for(&server).await.log_visitor("alice").await.unwrap();
    }

    #[tokio::test]
    async fn reads_notifications_in_arrival_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "username": "a", "timestamp": 1 },
                { "username": "b", "timestamp": 2 }
            ])))
            .mount(&server)
            .await;

        let entries = directory_for(&server).await.get_notifications().await.unwrap();
        assert_eq!(entries, vec![VisitorEntry::new("a", 1), VisitorEntry::new("b", 2)]);
    }

    #[tokio::test]
    async fn null_log_is_absent_not_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/visitor-log"))
            .and(body_json(json!({ "password": "wrong" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/visitor-log"))
            .and(body_json(json!({ "password": "CUTOUT" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let directory = directory_for(&server).await;
        assert_eq!(directory.get_visitor_log("wrong").await.unwrap(), None);
        assert_eq!(directory.get_visitor_log("CUTOUT").await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn reads_clear_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/visitor-log/clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cleared": true })))
            .mount(&server)
            .await;

        assert!(directory_for(&server).await.clear_visitor_log("CUTOUT").await.unwrap());
    }

    #[tokio::test]
    async fn server_errors_become_port_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = directory_for(&server).await.get_notifications().await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(message) if message.contains("boom")));
    }

    #[tokio::test]
    async fn unreachable_directory_is_unavailable() {
        // Nothing listens on the discard port.
        let directory = HttpVisitorDirectory::new("http://127.0.0.1:9").unwrap();
        let err = directory.get_notifications().await.unwrap_err();
        assert!(matches!(err, PortError::Unavailable(_)));
    }
}
