use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::common::{MessagePage, ReadMessagesQuery, WriteMessageBody};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

const HEALTH_PATH: &str = "health";
const MESSAGES_PATH: &str = "messages";

/// Thin HTTP client for the two endpoints the harness exercises. It only
/// checks the transport-level contract (status and body shape); deciding
/// whether the content is right is left to the test cases.
#[derive(Debug, Clone)]
pub struct GilgameshClient {
    http: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl GilgameshClient {
    pub fn new(base_url: Url, config: &HarnessConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            bearer_token: config.bearer_token().map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /health`. Only an exact 200 counts as healthy.
    pub async fn check_health(&self) -> Result<()> {
        let url = self.endpoint(HEALTH_PATH);
        log::debug!("GET {url}");

        let response = self.http.get(url).send().await?;
        expect_ok("GET /health", response.status())
    }

    /// `POST /messages` with `{ topic, messageId }`.
    pub async fn write_message(&self, topic: &str, message_id: &str) -> Result<()> {
        let url = self.endpoint(MESSAGES_PATH);
        log::debug!("POST {url} topic={topic} messageId={message_id}");

        let body = WriteMessageBody {
            topic: topic.to_string(),
            message_id: message_id.to_string(),
        };
        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .await?;
        expect_ok("POST /messages", response.status())
    }

    /// `GET /messages?topic=...` and validate the response envelope.
    pub async fn read_messages(&self, query: &ReadMessagesQuery) -> Result<MessagePage> {
        let url = self.endpoint(MESSAGES_PATH);
        log::debug!("GET {url} topic={}", query.topic);

        let response = self
            .authorized(self.http.get(url))
            .query(query)
            .send()
            .await?;
        expect_ok("GET /messages", response.status())?;

        let body: Value = response.json().await.map_err(|err| {
            HarnessError::malformed("GET /messages", format!("body is not JSON: {err}"))
        })?;
        MessagePage::from_body(&body)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        // Keep any path prefix on the base URL (e.g. behind a gateway).
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{path}"));
        url
    }
}

fn expect_ok(endpoint: &'static str, actual: StatusCode) -> Result<()> {
    if actual == StatusCode::OK {
        Ok(())
    } else {
        Err(HarnessError::UnexpectedStatus {
            endpoint,
            expected: StatusCode::OK,
            actual,
        })
    }
}
