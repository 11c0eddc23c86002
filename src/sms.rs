//! Outbound SMS delivery for verification codes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use elysia_config::{SmsConfig, SmsProviderConfig};

/// Validity shown to the recipient, rounded up to whole minutes.
pub fn valid_minutes(code_ttl_secs: u64) -> u64 {
    code_ttl_secs.div_ceil(60).max(1)
}

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("sms gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sms gateway rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        template_id: &str,
        valid_minutes: u64,
    ) -> Result<(), SmsError>;
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    code: &'a str,
    min: u64,
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    phone_number: &'a str,
    sign_name: &'a str,
    template_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Posts codes to a JSON SMS gateway authenticated with a bearer key.
pub struct HttpSmsSender {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sign_name: String,
}

impl HttpSmsSender {
    pub fn new(endpoint: String, api_key: String, sign_name: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            sign_name,
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    #[instrument(skip(self, code), fields(sms.provider = "http"))]
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        template_id: &str,
        valid_minutes: u64,
    ) -> Result<(), SmsError> {
        let body = GatewayRequest {
            phone_number: phone,
            sign_name: &self.sign_name,
            template_id,
            template_params: TemplateParams {
                code,
                min: valid_minutes,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(phone, "Verification SMS sent");
        Ok(())
    }
}

/// Writes codes to the log instead of sending them. Development only.
#[derive(Debug, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        template_id: &str,
        valid_minutes: u64,
    ) -> Result<(), SmsError> {
        info!(
            phone,
            code,
            template_id,
            valid_minutes,
            "Verification code (log provider)"
        );
        Ok(())
    }
}

pub fn create_sms_sender(config: &SmsConfig) -> Arc<dyn SmsSender> {
    match &config.provider {
        SmsProviderConfig::Http {
            endpoint,
            api_key,
            sign_name,
        } => Arc::new(HttpSmsSender::new(
            endpoint.clone(),
            api_key.clone(),
            sign_name.clone(),
        )),
        SmsProviderConfig::Log => Arc::new(LogSmsSender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let sender = create_sms_sender(&SmsConfig::fixed("123456"));
        assert!(
            sender
                .send_verification_code("13800000001", "123456", "TEST_TEMPLATE", 5)
                .await
                .is_ok()
        );
    }

    #[test]
    fn test_valid_minutes_follows_code_ttl() {
        assert_eq!(valid_minutes(300), 5);
        assert_eq!(valid_minutes(90), 2);
        assert_eq!(valid_minutes(0), 1);
    }

    #[test]
    fn test_gateway_payload_shape() {
        let body = GatewayRequest {
            phone_number: "13800000001",
            sign_name: "Elysia",
            template_id: "T1",
            template_params: TemplateParams {
                code: "654321",
                min: valid_minutes(600),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["template_params"]["code"], "654321");
        assert_eq!(json["template_params"]["min"], 10);
        assert_eq!(json["phone_number"], "13800000001");
    }
}
