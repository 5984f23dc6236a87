//! 短信发送
//!
//! 短信是尽力而为的附带动作：发送失败只记录日志，不影响主流程的响应。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, SmsConfig};
use crate::errors::{Result, TutorHubError};

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> Result<()>;
}

/// 批量发送，返回成功条数
pub async fn send_batch<'a, I>(sender: &dyn SmsSender, messages: I) -> u64
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut sent = 0;
    for (to, message) in messages {
        match sender.send(to, message).await {
            Ok(()) => sent += 1,
            Err(e) => warn!("SMS to {} failed: {}", mask_phone(to), e),
        }
    }
    sent
}

/// 日志里只保留号码末四位
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
    sender_id: &'a str,
}

/// 通过服务商 HTTP 接口发送（JSON POST + Bearer API key）
pub struct HttpSmsSender {
    client: Client,
    endpoint: String,
    api_key: String,
    sender_id: String,
}

impl HttpSmsSender {
    pub fn new(config: &SmsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout))
            .build()
            .map_err(|e| TutorHubError::sms(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(&SmsPayload {
            to,
            message,
            sender_id: &self.sender_id,
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TutorHubError::sms(format!("SMS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TutorHubError::sms(format!(
                "SMS provider returned {status}: {body}"
            )));
        }

        debug!("SMS delivered to {}", mask_phone(to));
        Ok(())
    }
}

/// 未配置服务商时只记录日志
#[derive(Debug, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<()> {
        info!("[sms disabled] to {}: {}", mask_phone(to), message);
        Ok(())
    }
}

pub fn create_sms_sender() -> Arc<dyn SmsSender> {
    let config = AppConfig::get();
    if !config.sms_enabled() {
        warn!("SMS provider not configured, messages will only be logged");
        return Arc::new(LogSmsSender);
    }

    match HttpSmsSender::new(&config.sms) {
        Ok(sender) => {
            info!("SMS provider endpoint: {}", config.sms.endpoint);
            Arc::new(sender)
        }
        Err(e) => {
            warn!("{}, falling back to log-only SMS", e);
            Arc::new(LogSmsSender)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SmsSender for RecordingSender {
        async fn send(&self, to: &str, _message: &str) -> Result<()> {
            if to.starts_with("000") {
                return Err(TutorHubError::sms("rejected"));
            }
            self.sent.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("01711000001"), "*******0001");
        assert_eq!(mask_phone("123"), "***");
    }

    #[tokio::test]
    async fn test_batch_counts_only_successes() {
        let sender = RecordingSender::default();
        let sent = send_batch(
            &sender,
            [
                ("01711000001", "hello"),
                ("00000000000", "hello"),
                ("01711000002", "hello"),
            ],
        )
        .await;
        assert_eq!(sent, 2);
        assert_eq!(sender.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_log_sender_never_fails() {
        assert!(LogSmsSender.send("01711000001", "hi").await.is_ok());
    }
}
