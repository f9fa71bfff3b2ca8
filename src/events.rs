//! 迁移进度事件
//!
//! 核心只发出结构化事件，如何显示交给 `EventSink` 的实现

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::models::Platform;

/// 迁移过程中的进度/错误事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// 作品信息已取得
    WorkResolved {
        platform: Platform,
        title: String,
        total: Option<usize>,
    },
    /// 开始抓取一话
    EpisodeFetching { position: usize, url: String },
    /// 一话抓取完成
    EpisodeFetched { position: usize, title: String },
    /// 抓取提前停止（单页失败）
    ExtractionStopped { position: usize, reason: String },
    /// 抓取结束
    ExtractionFinished { count: usize },
    /// 开始登录
    LoginStarted { platform: Platform },
    /// 需要人工完成二段认证
    SecondFactorRequired { platform: Platform, url: String },
    /// 登录完成
    LoggedIn { platform: Platform },
    /// 开始投稿一话
    EpisodePublishing {
        position: usize,
        total: usize,
        title: String,
    },
    /// 一话投稿完成
    EpisodePublished { position: usize, total: usize },
    /// 批量投稿中止
    PublishAborted {
        completed: usize,
        total: usize,
        reason: String,
    },
    /// 批量投稿全部完成
    PublishFinished { total: usize },
}

/// 事件接收端
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TransferEvent);
}

/// 用 tracing 输出事件
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: TransferEvent) {
        match event {
            TransferEvent::WorkResolved { platform, title, total } => match total {
                Some(total) => info!("📚 作品: {} ({}, 共 {} 话)", title, platform, total),
                None => info!("📚 作品: {} ({})", title, platform),
            },
            TransferEvent::EpisodeFetching { position, url } => {
                info!("📥 正在下载第 {} 话: {}", position, url)
            }
            TransferEvent::EpisodeFetched { title, .. } => info!("  ✅ 标题: {}", title),
            TransferEvent::ExtractionStopped { position, reason } => {
                warn!("⚠️ 第 {} 话获取失败，停止下载: {}", position, reason)
            }
            TransferEvent::ExtractionFinished { count } => {
                info!("🎉 共下载 {} 话", count)
            }
            TransferEvent::LoginStarted { platform } => info!("🔐 正在登录 {}...", platform),
            TransferEvent::SecondFactorRequired { platform, url } => {
                warn!("🔑 {} 需要二段认证: {}", platform, url)
            }
            TransferEvent::LoggedIn { platform } => info!("✅ {} 登录完成", platform),
            TransferEvent::EpisodePublishing { position, total, title } => {
                info!("📤 正在投稿第 {}/{} 话: {}", position, total, title)
            }
            TransferEvent::EpisodePublished { position, total } => {
                info!("  ✅ 第 {}/{} 话投稿完成", position, total)
            }
            TransferEvent::PublishAborted { completed, total, reason } => {
                error!("❌ 投稿中止 ({}/{} 已完成): {}", completed, total, reason)
            }
            TransferEvent::PublishFinished { total } => {
                info!("🎉 全部 {} 话投稿完成", total)
            }
        }
    }
}

/// 把事件保存在内存里（测试或 UI 轮询用）
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TransferEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出目前为止的所有事件
    pub fn take(&self) -> Vec<TransferEvent> {
        match self.events.lock() {
            Ok(mut events) => events.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: TransferEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
