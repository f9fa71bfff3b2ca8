//! 单话投稿上下文
//!
//! 封装"我正在投稿第几话（共几话）"这一信息

use std::fmt::Display;

/// 单话投稿上下文
#[derive(Debug, Clone)]
pub struct EpisodeCtx {
    /// 在序列中的位置（从1开始）
    pub position: usize,

    /// 序列总数
    pub total: usize,

    /// 标题（仅用于日志显示）
    pub title: String,
}

impl EpisodeCtx {
    pub fn new(position: usize, total: usize, title: impl Into<String>) -> Self {
        Self {
            position,
            total,
            title: title.into(),
        }
    }
}

impl Display for EpisodeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.title.is_empty() {
            write!(f, "[{}/{} (无标题)]", self.position, self.total)
        } else {
            write!(f, "[{}/{} {}]", self.position, self.total, self.title)
        }
    }
}
