use std::fmt;

use uuid::Uuid;

use crate::common::ReadMessagesQuery;
use crate::error::{HarnessError, Result};
use crate::network::GilgameshClient;

/// The checks the suite knows how to run against a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCase {
    /// `GET /health` answers 200.
    Health,
    /// A single write to a fresh topic reads back as exactly that message.
    MessageRoundTrip,
    /// A fresh topic with no writes reads back empty.
    EmptyTopic,
}

impl TestCase {
    pub const ALL: [TestCase; 3] = [
        TestCase::Health,
        TestCase::MessageRoundTrip,
        TestCase::EmptyTopic,
    ];

    pub const MESSAGES: [TestCase; 2] = [TestCase::MessageRoundTrip, TestCase::EmptyTopic];

    pub fn name(&self) -> &'static str {
        match self {
            TestCase::Health => "health",
            TestCase::MessageRoundTrip => "message-round-trip",
            TestCase::EmptyTopic => "empty-topic",
        }
    }

    pub async fn run(&self, client: &GilgameshClient) -> Result<()> {
        match self {
            TestCase::Health => client.check_health().await,
            TestCase::MessageRoundTrip => message_round_trip(client).await,
            TestCase::EmptyTopic => empty_topic(client).await,
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn message_round_trip(client: &GilgameshClient) -> Result<()> {
    let topic = Uuid::new_v4().to_string();
    let message_id = Uuid::new_v4().to_string();

    client.write_message(&topic, &message_id).await?;
    let page = client.read_messages(&ReadMessagesQuery::topic(&topic)).await?;

    expect_count(&topic, 1, page.len())?;
    let stored = &page.messages[0];
    expect_field("topic", &topic, &stored.topic)?;
    expect_field("messageId", &message_id, &stored.message_id)
}

async fn empty_topic(client: &GilgameshClient) -> Result<()> {
    let topic = Uuid::new_v4().to_string();
    let page = client.read_messages(&ReadMessagesQuery::topic(&topic)).await?;
    expect_count(&topic, 0, page.len())
}

fn expect_count(topic: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(HarnessError::MessageCount {
        topic: topic.to_string(),
        expected,
        actual,
    })
}

fn expect_field(field: &'static str, expected: &str, actual: &str) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(HarnessError::MessageMismatch {
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
