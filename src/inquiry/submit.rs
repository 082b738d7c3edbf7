use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::mailto::{MailComposer, MailFallbacks};
use super::number::{InquiryNumberSource, RandomInquiryNumbers};
use super::InquiryFields;
use crate::infrastructure::error::SiteError;
use crate::infrastructure::network::{NetworkConfig, NetworkManager};

/// 询价提交方式，由部署配置决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStrategy {
    /// 第三方表单接口，等待结果
    #[default]
    Endpoint,
    /// 生成 mailto 链接交给邮件客户端
    Mailto,
    /// 隐藏 iframe 式投递，不检查响应
    HiddenFrame,
}

impl SubmitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitStrategy::Endpoint => "endpoint",
            SubmitStrategy::Mailto => "mailto",
            SubmitStrategy::HiddenFrame => "hidden_frame",
        }
    }
}

impl fmt::Display for SubmitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmitStrategy {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "endpoint" => Ok(SubmitStrategy::Endpoint),
            "mailto" => Ok(SubmitStrategy::Mailto),
            "hidden_frame" | "iframe" => Ok(SubmitStrategy::HiddenFrame),
            other => Err(SiteError::config(format!("Unsupported submit strategy: {}", other))),
        }
    }
}

/// 表单接收端
#[async_trait]
pub trait InquirySubmitter: Send + Sync {
    async fn submit(&self, fields: &InquiryFields) -> Result<(), SiteError>;
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

/// 以表单编码 POST 到第三方表单服务
#[derive(Debug, Clone)]
pub struct FormEndpointSubmitter {
    url: String,
    access_key: Option<String>,
    network: NetworkManager,
}

impl FormEndpointSubmitter {
    pub fn new(url: impl Into<String>, access_key: Option<String>) -> Result<Self, SiteError> {
        Self::with_network(url, access_key, NetworkManager::new(NetworkConfig::default())?)
    }

    pub fn with_network(
        url: impl Into<String>,
        access_key: Option<String>,
        network: NetworkManager,
    ) -> Result<Self, SiteError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(SiteError::config("Submission endpoint URL is empty"));
        }
        Ok(Self {
            url,
            access_key,
            network,
        })
    }
}

#[async_trait]
impl InquirySubmitter for FormEndpointSubmitter {
    async fn submit(&self, fields: &InquiryFields) -> Result<(), SiteError> {
        let mut pairs = fields.form_pairs();
        if let Some(key) = &self.access_key {
            pairs.push(("access_key", key.clone()));
        }

        let response = self.network.post_form(&self.url, &pairs).await?;
        let body = response.text().await?;

        // 非 JSON 响应按 HTTP 状态判定
        if let Ok(parsed) = serde_json::from_str::<EndpointResponse>(&body) {
            if parsed.success == Some(false) {
                return Err(SiteError::network(
                    parsed
                        .message
                        .unwrap_or_else(|| "endpoint rejected submission".to_string()),
                    Some(self.url.clone()),
                ));
            }
        }

        tracing::info!(url = %self.url, "inquiry submitted");
        Ok(())
    }
}

/// 提交行为的可配置部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSettings {
    pub strategy: SubmitStrategy,
    pub mail_to: String,
    pub sent_label: String,
    pub sent_duration: Duration,
    pub fallbacks: MailFallbacks,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            strategy: SubmitStrategy::Endpoint,
            mail_to: "info@spatialspec.net".to_string(),
            sent_label: "Sent!".to_string(),
            sent_duration: Duration::from_millis(2000),
            fallbacks: MailFallbacks::default(),
        }
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// 显示了 Sent 提示，计时后恢复
    Sent,
    /// mailto 链接已交给邮件客户端
    Composed { uri: String },
    /// 提交失败，按钮已恢复
    Reverted { reason: String },
    /// 表单不存在
    Skipped,
}

/// 提交方式及其协作者
pub struct InquiryDispatcher {
    pub settings: SubmissionSettings,
    submitter: Option<Arc<dyn InquirySubmitter>>,
    composer: Option<Box<dyn MailComposer>>,
    numbers: Box<dyn InquiryNumberSource>,
}

impl InquiryDispatcher {
    pub fn new(settings: SubmissionSettings) -> Self {
        Self {
            settings,
            submitter: None,
            composer: None,
            numbers: Box::new(RandomInquiryNumbers),
        }
    }

    pub fn with_submitter(mut self, submitter: Arc<dyn InquirySubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn with_composer(mut self, composer: Box<dyn MailComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn with_numbers(mut self, numbers: Box<dyn InquiryNumberSource>) -> Self {
        self.numbers = numbers;
        self
    }

    pub fn strategy(&self) -> SubmitStrategy {
        self.settings.strategy
    }

    pub fn submitter(&self) -> Result<Arc<dyn InquirySubmitter>, SiteError> {
        self.submitter.clone().ok_or_else(|| {
            SiteError::config(format!(
                "strategy '{}' needs a submission endpoint",
                self.settings.strategy
            ))
        })
    }

    pub fn composer(&self) -> Result<&dyn MailComposer, SiteError> {
        self.composer
            .as_deref()
            .ok_or_else(|| SiteError::config("strategy 'mailto' needs a mail composer"))
    }

    pub fn next_inquiry_number(&mut self) -> u16 {
        self.numbers.next_number()
    }
}

impl Default for InquiryDispatcher {
    fn default() -> Self {
        Self::new(SubmissionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inquiry::number::FixedInquiryNumber;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("endpoint".parse::<SubmitStrategy>().unwrap(), SubmitStrategy::Endpoint);
        assert_eq!("MAILTO".parse::<SubmitStrategy>().unwrap(), SubmitStrategy::Mailto);
        assert_eq!(
            "hidden-frame".parse::<SubmitStrategy>().unwrap(),
            SubmitStrategy::HiddenFrame
        );
        assert!("carrier-pigeon".parse::<SubmitStrategy>().is_err());
        assert_eq!(SubmitStrategy::HiddenFrame.to_string(), "hidden_frame");
    }

    #[test]
    fn test_settings_default() {
        let settings = SubmissionSettings::default();
        assert_eq!(settings.sent_duration, Duration::from_millis(2000));
        assert_eq!(settings.sent_label, "Sent!");
    }

    #[test]
    fn test_dispatcher_missing_collaborators() {
        let dispatcher = InquiryDispatcher::default();
        assert!(dispatcher.submitter().is_err());
        assert!(dispatcher.composer().is_err());
    }

    #[test]
    fn test_dispatcher_injected_numbers() {
        let mut dispatcher =
            InquiryDispatcher::default().with_numbers(Box::new(FixedInquiryNumber(2024)));
        assert_eq!(dispatcher.next_inquiry_number(), 2024);
    }

    #[test]
    fn test_endpoint_submitter_rejects_empty_url() {
        assert!(FormEndpointSubmitter::new("  ", None).is_err());
    }
}
