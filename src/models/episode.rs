//! 标准化的作品与话数据模型
//!
//! 抽取（来源平台）和投稿（目标平台）之间唯一的交接格式

use std::fmt;

use crate::models::Platform;

/// 作品元信息，由来源适配器生成，生成后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInfo {
    /// 来源平台
    pub platform: Platform,
    /// 平台内部 ID（ncode 或作品编号）
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub author_url: String,
    /// 第一话的绝对 URL
    pub first_episode_url: String,
    /// 平台公布的总话数（只有计数型平台才有）
    pub total_episodes: Option<usize>,
}

/// 单话内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// 来源页面 URL（仅供参考）
    pub url: Option<String>,
    pub title: String,
    /// 去除平台标记后的正文
    pub content: String,
}

impl Episode {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: None,
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// 有序的话列表
///
/// 插入顺序即来源平台上的发布顺序。crate 外部只能读取，
/// 投稿阶段不能重排、合并或拆分。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeSequence {
    episodes: Vec<Episode>,
}

impl EpisodeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// 按位置取（从 1 开始）
    pub fn get(&self, position: usize) -> Option<&Episode> {
        position.checked_sub(1).and_then(|i| self.episodes.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Episode> {
        self.episodes.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.episodes.iter().map(|e| e.title.as_str()).collect()
    }
}

impl From<Vec<Episode>> for EpisodeSequence {
    fn from(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }
}

impl<'a> IntoIterator for &'a EpisodeSequence {
    type Item = &'a Episode;
    type IntoIter = std::slice::Iter<'a, Episode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}

/// 抽取结束的方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// 正常结束（计数走完或链条到头）
    Complete,
    /// 在第 `position` 话（从 1 开始）获取或解析失败，提前停止
    Stopped { position: usize, reason: String },
}

/// 抽取结果：已取得的话 + 结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub episodes: EpisodeSequence,
    pub outcome: ExtractionOutcome,
    /// 平台公布的总话数
    pub expected: Option<usize>,
}

impl Extraction {
    pub fn is_partial(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Stopped { .. })
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.outcome, self.expected) {
            (ExtractionOutcome::Complete, _) => write!(f, "{} 话全部取得", self.episodes.len()),
            (ExtractionOutcome::Stopped { position, reason }, Some(expected)) => write!(
                f,
                "取得 {}/{} 话，在第 {} 话中断: {}",
                self.episodes.len(),
                expected,
                position,
                reason
            ),
            (ExtractionOutcome::Stopped { position, reason }, None) => write!(
                f,
                "取得 {} 话，在第 {} 话中断: {}",
                self.episodes.len(),
                position,
                reason
            ),
        }
    }
}
