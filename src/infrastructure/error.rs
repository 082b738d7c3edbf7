use thiserror::Error;

/// 站点面板错误类型
#[derive(Error, Debug, Clone)]
pub enum SiteError {
    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("布局错误: {message}")]
    Layout { message: String, element: Option<String> },

    #[error("网络错误: {message}")]
    Network { message: String, url: Option<String> },

    #[error("邮件客户端错误: {message}")]
    MailComposer { message: String },

    #[error("解析错误: {message}")]
    Parsing { message: String, content_type: String },

    #[error("文件系统错误: {message}")]
    FileSystem { message: String, path: Option<String> },
}

impl SiteError {
    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        SiteError::Configuration {
            message: message.into(),
        }
    }

    /// 创建布局错误
    pub fn layout(message: impl Into<String>, element: Option<String>) -> Self {
        SiteError::Layout {
            message: message.into(),
            element,
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        SiteError::Network {
            message: message.into(),
            url,
        }
    }

    pub fn mail_composer(message: impl Into<String>) -> Self {
        SiteError::MailComposer {
            message: message.into(),
        }
    }

    pub fn file_system(message: impl Into<String>, path: Option<String>) -> Self {
        SiteError::FileSystem {
            message: message.into(),
            path,
        }
    }
}

// 实现从常见错误类型的转换
impl From<std::io::Error> for SiteError {
    fn from(error: std::io::Error) -> Self {
        SiteError::FileSystem {
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(error: serde_json::Error) -> Self {
        SiteError::Parsing {
            message: error.to_string(),
            content_type: "JSON".to_string(),
        }
    }
}

impl From<toml::de::Error> for SiteError {
    fn from(error: toml::de::Error) -> Self {
        SiteError::Parsing {
            message: error.to_string(),
            content_type: "TOML".to_string(),
        }
    }
}

impl From<reqwest::Error> for SiteError {
    fn from(error: reqwest::Error) -> Self {
        SiteError::Network {
            message: error.to_string(),
            url: error.url().map(|u| u.to_string()),
        }
    }
}
