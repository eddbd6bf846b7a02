//! SQS 기반 [`QueueClient`] 구현

use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;

use rift_core::types::RawEntry;

use super::{QueueClient, load_sdk_config};
use crate::error::TailError;

/// 모든 메시지 속성을 요청하는 속성 이름
const ALL_ATTRIBUTES: &str = "All";

/// SQS 클라이언트
#[derive(Clone, Debug)]
pub struct SqsQueueClient {
    client: Client,
}

impl SqsQueueClient {
    /// 리전과 프로필로 클라이언트를 생성합니다.
    pub async fn connect(region: &str, profile: &str) -> Self {
        let config = load_sdk_config(region, profile).await;
        Self {
            client: Client::new(&config),
        }
    }
}

impl QueueClient for SqsQueueClient {
    async fn resolve_queue(&self, name: &str) -> Result<String, TailError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(name)
            .send()
            .await
            .map_err(|e| TailError::Remote {
                operation: "GetQueueUrl".to_owned(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        output
            .queue_url()
            .map(str::to_owned)
            .ok_or_else(|| TailError::Remote {
                operation: "GetQueueUrl".to_owned(),
                reason: format!("response for queue '{name}' carried no url"),
            })
    }

    async fn receive(&self, queue_url: &str, max_messages: i32) -> Result<Vec<RawEntry>, TailError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .message_attribute_names(ALL_ATTRIBUTES)
            .max_number_of_messages(max_messages)
            .visibility_timeout(0)
            .send()
            .await
            .map_err(|e| TailError::Remote {
                operation: "ReceiveMessage".to_owned(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let entries = output
            .messages()
            .iter()
            .filter_map(|message| {
                let body = message.body()?;
                let mut entry =
                    RawEntry::queue(body.to_owned(), message.message_id().map(str::to_owned));
                if let Some(attributes) = message.message_attributes() {
                    for (key, value) in attributes {
                        if let Some(text) = value.string_value() {
                            entry = entry.with_attribute(key.clone(), text);
                        }
                    }
                }
                Some(entry)
            })
            .collect();
        Ok(entries)
    }
}
