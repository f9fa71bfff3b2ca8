//! 来源适配器 - 抽取层
//!
//! 每个平台一个实现，负责"作品信息"和"有序话列表"两种能力：
//!
//! - `narou` - 计数型：API 给出总话数，按序号拼 URL 逐话抓取
//! - `kakuyomu` - 链式：从第一话开始沿"下一话"链接抓取
//! - `unimplemented` - 菜单中可见但尚未实现的平台

pub mod html;
pub mod kakuyomu;
pub mod narou;
pub mod unimplemented;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{SourceSettings, Timings};
use crate::error::SourceError;
use crate::events::EventSink;
use crate::models::{Extraction, Platform, WorkInfo};

pub use kakuyomu::KakuyomuSource;
pub use narou::NarouSource;
pub use unimplemented::UnimplementedSource;

/// 来源平台能力
#[async_trait]
pub trait SourcePlatform: Send + Sync {
    fn platform(&self) -> Platform;

    /// 解析作品标识
    ///
    /// 平台报告"不存在"时返回 `Ok(None)`，这是正常结果而不是错误
    async fn resolve_work(&self, identifier: &str) -> Result<Option<WorkInfo>, SourceError>;

    /// 抽取全部话
    ///
    /// 单页失败不会返回错误，而是停止并在 `Extraction::outcome` 中标明
    async fn extract_episodes(&self, work: &WorkInfo) -> Extraction;
}

/// 按平台构造来源适配器
pub fn source_for(
    platform: Platform,
    settings: &SourceSettings,
    timings: Timings,
    sink: Arc<dyn EventSink>,
) -> anyhow::Result<Box<dyn SourcePlatform>> {
    let source: Box<dyn SourcePlatform> = match platform {
        Platform::Kakuyomu => Box::new(KakuyomuSource::new(settings, timings, sink)?),
        Platform::Narou => Box::new(NarouSource::new(settings, timings, sink)?),
        Platform::AlphaPolis | Platform::NeoPage => Box::new(UnimplementedSource::new(platform)),
    };
    Ok(source)
}
