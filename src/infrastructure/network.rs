use crate::infrastructure::error::SiteError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// 网络客户端配置
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("site-panels/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// 网络客户端管理器
#[derive(Debug, Clone)]
pub struct NetworkManager {
    client: Client,
}

impl NetworkManager {
    pub fn new(config: NetworkConfig) -> Result<Self, SiteError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| SiteError::network(format!("Failed to create HTTP client: {}", e), None))?;

        Ok(Self { client })
    }

    /// 以 application/x-www-form-urlencoded 提交，不做重试
    pub async fn post_form<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, SiteError> {
        let response = self
            .client
            .post(url)
            .form(body)
            .send()
            .await
            .map_err(|e| SiteError::network(format!("Request failed: {}", e), Some(url.to_string())))?;

        if !response.status().is_success() {
            return Err(SiteError::network(
                format!("HTTP error: {}", response.status()),
                Some(url.to_string()),
            ));
        }

        Ok(response)
    }
}
