//! Notification event DTOs
//!
//! Pipeline payloads are read leniently: a field of the wrong type reads as
//! empty instead of rejecting the whole message.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    })
}

/// Topic notification delivered to the relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

impl SnsEvent {
    /// Builds an event with a single record carrying `message`
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            records: vec![SnsRecord {
                sns: Some(SnsMessage {
                    message: Some(message.into()),
                    subject: None,
                }),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: Option<SnsMessage>,
}

impl SnsRecord {
    pub fn message(&self) -> Option<&str> {
        self.sns.as_ref()?.message.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsMessage {
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
}

/// Manual approval request published by the pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalNotification {
    #[serde(deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(deserialize_with = "lenient_string")]
    pub console_link: String,
    pub approval: ApprovalDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprovalDetail {
    #[serde(deserialize_with = "lenient_string")]
    pub pipeline_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub stage_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub action_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub token: String,
    #[serde(deserialize_with = "lenient_string")]
    pub expires: String,
    #[serde(deserialize_with = "lenient_string")]
    pub approval_review_link: String,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub external_entity_link: Option<String>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub custom_data: Option<String>,
}

/// Pipeline, stage or action state change event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateChangeEvent {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "detail-type", deserialize_with = "lenient_string")]
    pub detail_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(deserialize_with = "lenient_string")]
    pub account: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub region: String,
    pub detail: StateChangeDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateChangeDetail {
    #[serde(deserialize_with = "lenient_string")]
    pub pipeline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(rename = "execution-id", deserialize_with = "lenient_optional_string")]
    pub execution_id: Option<String>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub stage: Option<String>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_message() {
        let event: SnsEvent =
            serde_json::from_str(r#"{ "Records": [{ "Sns": { "Message": "Hi There!" } }] }"#)
                .unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].message(), Some("Hi There!"));

        let empty: SnsEvent = serde_json::from_str(r#"{ "Records": [{}] }"#).unwrap();
        assert_eq!(empty.records[0].message(), None);
    }

    #[test]
    fn test_parse_state_change() {
        let event: StateChangeEvent = serde_json::from_str(
            r#"{
                "version": "0",
                "id": "123-123-123-123",
                "detail-type": "CodePipeline Pipeline Execution State Change",
                "source": "aws.codepipeline",
                "account": "0000000012",
                "time": "2020-04-28T02:36:06Z",
                "region": "ap-southeast-1",
                "detail": { "pipeline": "Notification-test-pipeline", "state": "FAILED", "version": 1.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(event.detail.pipeline, "Notification-test-pipeline");
        assert_eq!(event.detail.state, "FAILED");
        assert_eq!(event.account, "0000000012");
    }

    #[test]
    fn test_mistyped_fields_read_as_empty() {
        let notification: ApprovalNotification = serde_json::from_str(
            r#"{ "region": null, "approval": { "pipelineName": null, "expires": 1588837260,
                 "customData": { "note": "x" } } }"#,
        )
        .unwrap();
        assert_eq!(notification.region, "");
        assert_eq!(notification.approval.pipeline_name, "");
        assert_eq!(notification.approval.expires, "1588837260");
        assert_eq!(notification.approval.custom_data, None);

        let event: StateChangeEvent =
            serde_json::from_str(r#"{ "detail": { "pipeline": "orders", "state": null } }"#)
                .unwrap();
        assert_eq!(event.detail.pipeline, "orders");
        assert_eq!(event.detail.state, "");
    }
}
