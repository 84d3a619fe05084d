use serde::Serialize;
use serde_json::Value;

use crate::error::{HarnessError, Result};

/// Largest page the service will hand back; larger requests are clamped.
pub const MAX_MESSAGE_COUNT: usize = 500;

const READ_ENDPOINT: &str = "GET /messages";

/// One stored message as seen through `GET /messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub topic: String,
    pub message_id: String,
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteMessageBody {
    pub topic: String,
    pub message_id: String,
}

/// Paging direction relative to `origin_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Query string of `GET /messages`. Only `topic` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadMessagesQuery {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl ReadMessagesQuery {
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            origin_id: None,
            message_count: None,
            direction: None,
        }
    }

    pub fn after(mut self, origin_id: impl Into<String>) -> Self {
        self.origin_id = Some(origin_id.into());
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.message_count = Some(count.min(MAX_MESSAGE_COUNT));
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Validated content of a `GET /messages` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<MessageRecord>,
    pub next_id: Option<String>,
}

impl MessagePage {
    /// Walk the response step by step so a shape change is reported
    /// precisely instead of as a missing-field panic. Accepts the enveloped
    /// `{ value: { messages, nextId? } }` form and the bare
    /// `{ topic, direction, nextId?, messages }` form served by paging
    /// deployments.
    pub fn from_body(body: &Value) -> Result<Self> {
        let (page, prefix) = match body.get("value") {
            Some(value) if value.is_object() => (value, "value."),
            Some(_) => {
                return Err(HarnessError::malformed(
                    READ_ENDPOINT,
                    "`value` is not an object",
                ));
            }
            None if body.get("messages").is_some() => (body, ""),
            None => {
                return Err(HarnessError::malformed(
                    READ_ENDPOINT,
                    "missing `value` or `messages`",
                ));
            }
        };

        let entries = page
            .get("messages")
            .ok_or_else(|| {
                HarnessError::malformed(READ_ENDPOINT, format!("missing `{prefix}messages`"))
            })?
            .as_array()
            .ok_or_else(|| {
                HarnessError::malformed(
                    READ_ENDPOINT,
                    format!("`{prefix}messages` is not an array"),
                )
            })?;

        let messages = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_record(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let next_id = match page.get("nextId") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => {
                return Err(HarnessError::malformed(
                    READ_ENDPOINT,
                    format!("`{prefix}nextId` is not a string"),
                ));
            }
        };

        Ok(Self { messages, next_id })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn parse_record(index: usize, entry: &Value) -> Result<MessageRecord> {
    let object = entry.as_object().ok_or_else(|| {
        HarnessError::malformed(READ_ENDPOINT, format!("messages[{index}] is not an object"))
    })?;

    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| object.get(*name).and_then(Value::as_str))
            .map(str::to_string)
    };

    let topic = field(&["topic"]).ok_or_else(|| {
        HarnessError::malformed(READ_ENDPOINT, format!("messages[{index}] has no string `topic`"))
    })?;
    // Older deployments serialize the id in snake_case.
    let message_id = field(&["messageId", "message_id"]).ok_or_else(|| {
        HarnessError::malformed(
            READ_ENDPOINT,
            format!("messages[{index}] has no string `messageId`"),
        )
    })?;

    Ok(MessageRecord { topic, message_id })
}
