//! 目标驱动 - 投稿层
//!
//! 每个驱动独占一个已登录的浏览器会话，负责把有序话列表逐话投稿。
//!
//! 状态机：
//!
//! ```text
//! Unauthenticated --login--> Authenticated --publish--> Publishing
//!                                  ^                        |
//!                                  +------ 全部完成 ---------+
//!                                                           |
//!                              Aborted <--- 超时/意外错误 ---+
//! ```
//!
//! `Aborted` 是终态，需要重新创建驱动才能再次使用。

pub mod kakuyomu;
pub mod layout;
pub mod narou;
pub mod opener;
pub mod second_factor;
pub mod session;

use std::fmt;

use async_trait::async_trait;

use crate::error::MigrateResult;
use crate::models::{EpisodeSequence, Platform};

pub use kakuyomu::KakuyomuDriver;
pub use layout::DestinationLayout;
pub use narou::NarouDriver;
pub use opener::{ChromeOpener, DestinationOpener};
pub use second_factor::{bounded_gate, ConsoleGate, SecondFactorGate, TimeoutGate};
pub use session::DriverContext;

/// 目标平台能力
#[async_trait]
pub trait DestinationPlatform: Send {
    fn platform(&self) -> Platform;

    fn state(&self) -> DriverState;

    /// 登录；遇到二段认证时等待人工确认
    async fn login(&mut self) -> MigrateResult<()>;

    /// 按顺序投稿全部话
    ///
    /// URL 不属于本平台时直接返回错误（一话都不投）；
    /// 投稿途中失败时停止后续所有话，在报告中给出已完成数量
    async fn publish_sequence(
        &mut self,
        work_url: &str,
        episodes: &EpisodeSequence,
    ) -> MigrateResult<PublishReport>;
}

/// 驱动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unauthenticated,
    Authenticated,
    Publishing,
    Aborted,
}

impl DriverState {
    pub fn name(&self) -> &'static str {
        match self {
            DriverState::Unauthenticated => "Unauthenticated",
            DriverState::Authenticated => "Authenticated",
            DriverState::Publishing => "Publishing",
            DriverState::Aborted => "Aborted",
        }
    }
}

/// 批量投稿中止原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAbort {
    /// 等待输入框超时（页面布局变化或会话过期）
    FieldTimeout { position: usize, field: String },
    /// 其他意外错误
    Unexpected { position: usize, message: String },
}

impl PublishAbort {
    /// 出错的话（从 1 开始）
    pub fn position(&self) -> usize {
        match self {
            PublishAbort::FieldTimeout { position, .. } | PublishAbort::Unexpected { position, .. } => {
                *position
            }
        }
    }
}

impl fmt::Display for PublishAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishAbort::FieldTimeout { position, field } => {
                write!(f, "第 {} 话等待输入框 {} 超时", position, field)
            }
            PublishAbort::Unexpected { position, message } => {
                write!(f, "第 {} 话发生意外错误: {}", position, message)
            }
        }
    }
}

/// 批量投稿结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub total: usize,
    pub completed: usize,
    pub abort: Option<PublishAbort>,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.abort.is_none() && self.completed == self.total
    }
}

impl fmt::Display for PublishReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.abort {
            None => write!(f, "{}/{} 话已完成", self.completed, self.total),
            Some(abort) => write!(
                f,
                "{}/{} 话已完成，已中止 ({})",
                self.completed, self.total, abort
            ),
        }
    }
}
