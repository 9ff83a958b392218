// ABOUTME: Slack incoming-webhook chat sink.
// ABOUTME: Posts one colored attachment per message, tagged with cluster and service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{ChatSink, NotifyError, Severity};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts messages to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    client: Client,
    url: String,
    cluster: String,
    service: String,
}

impl SlackWebhook {
    pub fn new(
        url: impl Into<String>,
        cluster: impl Into<String>,
        service: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            cluster: cluster.into(),
            service: service.into(),
        })
    }

    fn payload<'a>(&'a self, severity: Severity, message: &'a str) -> Payload<'a> {
        Payload {
            attachments: vec![Attachment {
                color: color(severity),
                text: message,
                fields: vec![
                    Field {
                        title: "Cluster",
                        value: &self.cluster,
                        short: true,
                    },
                    Field {
                        title: "Service",
                        value: &self.service,
                        short: true,
                    },
                ],
            }],
        }
    }
}

fn color(severity: Severity) -> Option<&'static str> {
    match severity {
        Severity::Normal => None,
        Severity::Good => Some("good"),
        Severity::Danger => Some("danger"),
    }
}

#[async_trait]
impl ChatSink for SlackWebhook {
    async fn send(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(severity, message))
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Status { status, body })
        }
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    attachments: Vec<Attachment<'a>>,
}

#[derive(Serialize)]
struct Attachment<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    text: &'a str,
    fields: Vec<Field<'a>>,
}

#[derive(Serialize)]
struct Field<'a> {
    title: &'static str,
    value: &'a str,
    short: bool,
}
