use crate::config::Config;
use crate::inquiry::{
    CommandMailComposer, FixedInquiryNumber, FormEndpointSubmitter, InquiryFields,
    InquiryNumberSource, InquirySubmitter, MailComposer, MailtoMessage, RandomInquiryNumbers,
};

/// 生成 mailto 链接，`open` 时交给邮件客户端
pub fn compose_mailto(
    config: &Config,
    fields: &InquiryFields,
    number: Option<u16>,
    open: bool,
) -> anyhow::Result<String> {
    let settings = config.submission_settings()?;
    let number = match number {
        Some(n) => FixedInquiryNumber(n).next_number(),
        None => RandomInquiryNumbers.next_number(),
    };
    let uri = MailtoMessage::compose(&config.mail_to, number, fields, &settings.fallbacks).to_uri();

    if open {
        CommandMailComposer::new(config.mail_opener.clone()).compose(&uri)?;
        tracing::info!(inquiry = number, "inquiry handed to mail composer");
    }
    Ok(uri)
}

/// 直接向表单接收端提交
pub async fn submit_inquiry(config: &Config, fields: &InquiryFields) -> anyhow::Result<()> {
    let url = config
        .endpoint_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Submission endpoint URL is required but not set"))?;
    let submitter = FormEndpointSubmitter::new(url, config.access_key.clone())?;
    submitter.submit(fields).await?;
    tracing::info!(url, "inquiry submitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_mailto_with_fixed_number() {
        let config = Config {
            mail_to: "info@example.com".to_string(),
            ..Config::default()
        };
        let fields = InquiryFields::new()
            .with("name", "Jane")
            .with("description", "Survey a roof");
        let uri = compose_mailto(&config, &fields, Some(1234), false).unwrap();
        assert!(uri.starts_with("mailto:info@example.com?subject=1234%3A%20Inquiry&body="));
        assert!(uri.contains("Description%3A%20Survey%20a%20roof"));
    }

    #[test]
    fn test_compose_mailto_clamps_number() {
        let uri = compose_mailto(&Config::default(), &InquiryFields::new(), Some(42), false).unwrap();
        assert!(uri.contains("subject=1000%3A%20Inquiry"));
    }
}
