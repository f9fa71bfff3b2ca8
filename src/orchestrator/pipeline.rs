//! 迁移流水线 - 编排层
//!
//! ## 职责
//!
//! 1. **配置校验**：平台组合、认证信息、目标 URL，全部在任何网络/浏览器操作之前完成
//! 2. **抽取**：解析作品 → 抽取有序话列表
//! 3. **投稿**：构造目标驱动 → 登录 → 逐话投稿
//! 4. **汇总**：返回抽取与投稿的结果，不自动重试

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, CredentialStore, Credentials};
use crate::destinations::{DestinationOpener, PublishReport};
use crate::error::{MigrateError, MigrateResult};
use crate::events::{EventSink, TransferEvent};
use crate::models::{Extraction, Platform, WorkInfo};
use crate::sources::source_for;

/// 一次迁移请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: Platform,
    pub destination: Platform,
    /// 来源作品标识（URL 或 ncode）
    pub identifier: String,
    /// 目标作品管理 URL
    pub destination_url: String,
}

/// 迁移结果
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub work: WorkInfo,
    pub extraction: Extraction,
    pub publish: PublishReport,
}

impl TransferReport {
    /// 抽取和投稿都没有中断
    pub fn is_success(&self) -> bool {
        !self.extraction.is_partial() && self.publish.is_complete()
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "《{}》 抽取: {} | 投稿: {}",
            self.work.title, self.extraction, self.publish
        )
    }
}

/// 迁移流水线
pub struct Pipeline {
    config: Config,
    credentials: CredentialStore,
    sink: Arc<dyn EventSink>,
}

impl Pipeline {
    pub fn new(config: Config, credentials: CredentialStore, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            credentials,
            sink,
        }
    }

    /// 校验平台组合
    pub fn validate_selection(source: Platform, destination: Platform) -> MigrateResult<()> {
        if source == destination {
            return Err(MigrateError::SamePlatform(source));
        }
        for platform in [source, destination] {
            if !platform.is_supported() {
                return Err(MigrateError::Unsupported(platform));
            }
        }
        Ok(())
    }

    /// 校验整个请求，返回目标平台的认证信息
    pub fn validate(&self, request: &TransferRequest) -> MigrateResult<Credentials> {
        Self::validate_selection(request.source, request.destination)?;

        let credentials = self
            .credentials
            .get(request.destination)
            .filter(|c| c.is_configured())
            .cloned()
            .ok_or(MigrateError::MissingCredentials {
                platform: request.destination,
            })?;

        if !request.destination.owns_url(&request.destination_url) {
            return Err(MigrateError::DomainMismatch {
                platform: request.destination,
                url: request.destination_url.clone(),
            });
        }

        Ok(credentials)
    }

    /// 执行一次完整迁移
    pub async fn run(
        &self,
        request: &TransferRequest,
        opener: &dyn DestinationOpener,
    ) -> MigrateResult<TransferReport> {
        let credentials = self.validate(request)?;

        info!("入力元プラットフォーム: {}", request.source);
        info!("出力先プラットフォーム: {}", request.destination);

        let source = source_for(
            request.source,
            &self.config.sources,
            self.config.timings,
            self.sink.clone(),
        )
        .map_err(MigrateError::HttpClient)?;

        let work = source
            .resolve_work(&request.identifier)
            .await?
            .ok_or_else(|| MigrateError::WorkNotFound(request.identifier.clone()))?;
        self.sink.emit(TransferEvent::WorkResolved {
            platform: work.platform,
            title: work.title.clone(),
            total: work.total_episodes,
        });

        let extraction = source.extract_episodes(&work).await;
        if extraction.episodes.is_empty() {
            return Err(MigrateError::NothingToMigrate(extraction.to_string()));
        }
        if extraction.is_partial() {
            warn!("⚠️ 只取得部分话，继续投稿已取得的部分: {}", extraction);
        }

        // 打开浏览器或登录失败时，已抽取的话一话都没有投稿
        let extracted = extraction.episodes.len();
        let mut driver = match opener.open(request.destination, credentials).await {
            Ok(driver) => driver,
            Err(e) => return Err(self.abort_before_publish(extracted, e)),
        };
        if let Err(e) = driver.login().await {
            return Err(self.abort_before_publish(extracted, e));
        }
        let publish = driver
            .publish_sequence(&request.destination_url, &extraction.episodes)
            .await?;

        Ok(TransferReport {
            work,
            extraction,
            publish,
        })
    }

    fn abort_before_publish(&self, extracted: usize, err: MigrateError) -> MigrateError {
        self.sink.emit(TransferEvent::PublishAborted {
            completed: 0,
            total: extracted,
            reason: err.to_string(),
        });
        err
    }
}
