pub mod layout;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::inquiry::{
    CommandMailComposer, FormEndpointSubmitter, InquiryDispatcher, MailFallbacks,
    SubmissionSettings, SubmitStrategy,
};

pub use layout::Layout;

#[derive(Debug, Clone)]
pub struct Config {
    pub strategy: String,
    pub endpoint_url: Option<String>,
    pub access_key: Option<String>,
    pub mail_to: String,
    pub mail_opener: String,
    pub sent_duration_ms: u64,
    pub layout_path: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: "endpoint".to_string(),
            endpoint_url: Some("https://api.web3forms.com/submit".to_string()),
            access_key: None,
            mail_to: "info@spatialspec.net".to_string(),
            mail_opener: "xdg-open".to_string(),
            sent_duration_ms: 2000,
            layout_path: None,
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        // 默认配置
        let mut config = Config::default();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(format!("{}/.site-panels/.env", home));
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(strategy) = env::var("SITE_PANELS_STRATEGY") {
            self.strategy = strategy;
        }
        if let Ok(url) = env::var("SITE_PANELS_ENDPOINT_URL") {
            self.endpoint_url = Some(url);
        }
        if let Ok(key) = env::var("SITE_PANELS_ACCESS_KEY") {
            self.access_key = Some(key);
        }
        if let Ok(address) = env::var("SITE_PANELS_MAIL_TO") {
            self.mail_to = address;
        }
        if let Ok(opener) = env::var("SITE_PANELS_MAIL_OPENER") {
            self.mail_opener = opener;
        }
        if let Ok(ms) = env::var("SITE_PANELS_SENT_DURATION_MS") {
            match ms.parse() {
                Ok(ms) => self.sent_duration_ms = ms,
                Err(_) => tracing::warn!(value = %ms, "ignoring invalid SITE_PANELS_SENT_DURATION_MS"),
            }
        }
        if let Ok(path) = env::var("SITE_PANELS_LAYOUT") {
            self.layout_path = Some(PathBuf::from(path));
        }
        if let Ok(level) = env::var("SITE_PANELS_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(format) = env::var("SITE_PANELS_LOG_FORMAT") {
            self.log_format = format;
        }
        if let Ok(path) = env::var("SITE_PANELS_LOG_FILE") {
            self.log_file = Some(PathBuf::from(path));
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if !args.strategy.is_empty() {
            self.strategy = args.strategy.clone();
        }
        if let Some(url) = &args.endpoint_url {
            self.endpoint_url = Some(url.clone());
        }
        if let Some(layout) = &args.layout {
            self.layout_path = Some(layout.clone());
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = &args.log_format {
            self.log_format = format.clone();
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    /// 日志配置，未指定文件时输出到标准错误
    pub fn logging_config(&self) -> anyhow::Result<LoggingConfig> {
        let format = self
            .log_format
            .parse::<LogFormat>()
            .map_err(anyhow::Error::msg)?;
        let output = match &self.log_file {
            Some(path) => LogOutput::File(path.clone()),
            None => LogOutput::Stderr,
        };
        Ok(LoggingConfig::default()
            .with_level_str(&self.log_level)
            .with_format(format)
            .with_output(output))
    }

    pub fn strategy(&self) -> anyhow::Result<SubmitStrategy> {
        Ok(self.strategy.parse::<SubmitStrategy>()?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.strategy()? {
            SubmitStrategy::Endpoint | SubmitStrategy::HiddenFrame => {
                let missing = self
                    .endpoint_url
                    .as_deref()
                    .map(|u| u.trim().is_empty())
                    .unwrap_or(true);
                if missing {
                    anyhow::bail!("Submission endpoint URL is required but not set. Please set SITE_PANELS_ENDPOINT_URL environment variable or in .env file");
                }
            }
            SubmitStrategy::Mailto => {
                if !self.mail_to.contains('@') {
                    anyhow::bail!("Invalid mail address: '{}'. Please set SITE_PANELS_MAIL_TO", self.mail_to);
                }
            }
        }
        Ok(())
    }

    pub fn submission_settings(&self) -> anyhow::Result<SubmissionSettings> {
        Ok(SubmissionSettings {
            strategy: self.strategy()?,
            mail_to: self.mail_to.clone(),
            sent_duration: Duration::from_millis(self.sent_duration_ms),
            fallbacks: MailFallbacks::default(),
            ..SubmissionSettings::default()
        })
    }

    /// 按配置组装提交方式及其协作者
    pub fn dispatcher(&self) -> anyhow::Result<InquiryDispatcher> {
        let mut dispatcher = InquiryDispatcher::new(self.submission_settings()?)
            .with_composer(Box::new(CommandMailComposer::new(self.mail_opener.clone())));

        if let Some(url) = self.endpoint_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let submitter = FormEndpointSubmitter::new(url, self.access_key.clone())?;
            dispatcher = dispatcher.with_submitter(Arc::new(submitter));
        }
        Ok(dispatcher)
    }
}
