/// 来源平台 HTTP 客户端
///
/// 同一个来源适配器内复用连接，不保存跨运行的状态
use crate::config::SourceSettings;
use crate::error::SourceError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// 创建新的客户端
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(settings.request_timeout)
            .build()
            .context("无法创建 HTTP 客户端")?;
        Ok(Self { client })
    }

    /// 获取页面 HTML
    ///
    /// 非 2xx 状态码作为 `SourceError::HttpStatus` 返回
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        debug!("GET {}", url);
        let response = self.send(url).await?;
        response.text().await.map_err(|source| SourceError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// 获取 JSON 并反序列化
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        debug!("GET {}", url);
        let response = self.send(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
