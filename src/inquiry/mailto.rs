use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use super::InquiryFields;
use crate::infrastructure::error::SiteError;

/// 字段缺失时写入邮件正文的替代文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailFallbacks {
    pub service: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub description: String,
}

impl Default for MailFallbacks {
    fn default() -> Self {
        Self {
            service: "General".to_string(),
            name: "N/A".to_string(),
            company: "N/A".to_string(),
            email: "N/A".to_string(),
            description: "No description provided".to_string(),
        }
    }
}

/// 交给邮件客户端的询价邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailtoMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailtoMessage {
    pub fn compose(
        to: &str,
        inquiry_number: u16,
        fields: &InquiryFields,
        fallbacks: &MailFallbacks,
    ) -> Self {
        let service = fields.service();
        let description = match (service, fields.description()) {
            (_, None) => fallbacks.description.clone(),
            (Some(service), Some(text)) => format!("[{}] {}", service, text),
            (None, Some(text)) => text.to_string(),
        };

        let body = [
            format!("Inquiry Number: {}", inquiry_number),
            format!("Service: {}", service.unwrap_or(fallbacks.service.as_str())),
            String::new(),
            format!("Name: {}", fields.name().unwrap_or(fallbacks.name.as_str())),
            format!("Company: {}", fields.company().unwrap_or(fallbacks.company.as_str())),
            format!("Email: {}", fields.email().unwrap_or(fallbacks.email.as_str())),
            String::new(),
            format!("Description: {}", description),
        ]
        .join("\r\n");

        Self {
            to: to.to_string(),
            subject: format!("{}: Inquiry", inquiry_number),
            body,
        }
    }

    /// `mailto:<address>?subject=<pct>&body=<pct>`
    pub fn to_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// 平台邮件客户端
pub trait MailComposer: Send + Sync {
    fn compose(&self, uri: &str) -> Result<(), SiteError>;
}

/// 通过外部程序（默认 xdg-open）打开 mailto 链接
#[derive(Debug, Clone)]
pub struct CommandMailComposer {
    program: String,
}

impl CommandMailComposer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandMailComposer {
    fn default() -> Self {
        Self::new("xdg-open")
    }
}

impl MailComposer for CommandMailComposer {
    fn compose(&self, uri: &str) -> Result<(), SiteError> {
        Command::new(&self.program)
            .arg(uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                SiteError::mail_composer(format!("无法启动 {}: {}", self.program, e))
            })?;
        tracing::debug!(program = %self.program, "mail composer launched");
        Ok(())
    }
}
