//! カクヨム 来源适配器（链式）
//!
//! 作品页解析出第一话地址，之后沿着每页的"下一话"链接抓取，
//! 没有下一话链接即为完结

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use tokio::time::sleep;
use url::Url;

use crate::clients::HttpClient;
use crate::config::{SourceSettings, Timings};
use crate::error::SourceError;
use crate::events::{EventSink, TransferEvent};
use crate::models::{Episode, EpisodeSequence, Extraction, ExtractionOutcome, Platform, WorkInfo};
use crate::sources::html::{optional_attr, select_attr, select_text};
use crate::sources::SourcePlatform;

// 作品页：当前布局（带哈希的 class）在前，旧布局在后
const WORK_TITLE_SELECTORS: &[&str] = &[
    "h1.Heading_heading__lQ85n.Heading_left__RVp4h.Heading_size-2l__rAFn3",
    "#workTitle",
];
const AUTHOR_SELECTORS: &[&str] = &[
    ".partialGiftWidgetActivityName a",
    "#workAuthor-activityName a",
];
const FIRST_EPISODE_SELECTORS: &[&str] = &[
    ".Layout_layout__5aFuw.Layout_items-normal__4mOqD.Layout_justify-normal__zqNe7.Layout_direction-row__boh0Z.Layout_wrap-wrap__yY3zM.Layout_gap-2s__xUCm0 a",
    "a.widget-toc-episode-episodeTitle",
];

// 单话页
const EPISODE_TITLE_SELECTORS: &[&str] = &[".widget-episodeTitle"];
const EPISODE_BODY_SELECTORS: &[&str] = &[".widget-episodeBody"];
const NEXT_EPISODE_SELECTOR: &str = "#contentMain-readNextEpisode";

/// 单话页解析结果
struct EpisodePage {
    episode: Episode,
    next_url: Option<String>,
}

pub struct KakuyomuSource {
    http: HttpClient,
    base_url: String,
    timings: Timings,
    sink: Arc<dyn EventSink>,
    work_pattern: Regex,
}

impl KakuyomuSource {
    pub fn new(
        settings: &SourceSettings,
        timings: Timings,
        sink: Arc<dyn EventSink>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            base_url: settings.kakuyomu_base_url.trim_end_matches('/').to_string(),
            timings,
            sink,
            work_pattern: Regex::new(r"^(?:https?://[^/]+/works/)?(\d+)/?$")?,
        })
    }

    /// 从作品 URL 或纯数字 ID 中取出作品 ID
    pub fn work_id(&self, identifier: &str) -> Result<String, SourceError> {
        self.work_pattern
            .captures(identifier.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| SourceError::InvalidIdentifier(identifier.to_string()))
    }

    async fn fetch_episode(&self, url: &str) -> Result<EpisodePage, SourceError> {
        let html = self.http.get_text(url).await?;
        parse_episode_page(&html, url)
    }

    fn stopped(
        &self,
        episodes: EpisodeSequence,
        position: usize,
        reason: String,
    ) -> Extraction {
        self.sink.emit(TransferEvent::ExtractionStopped {
            position,
            reason: reason.clone(),
        });
        Extraction {
            episodes,
            outcome: ExtractionOutcome::Stopped { position, reason },
            expected: None,
        }
    }
}

/// 把相对链接转换为绝对 URL
fn absolute_url(page_url: &str, href: &str) -> Result<String, SourceError> {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .map_err(|e| SourceError::MalformedResponse {
            url: page_url.to_string(),
            reason: format!("无法解析链接 {}: {}", href, e),
        })
}

/// 解析作品页
///
/// 任何必需节点缺失都直接报错，不返回残缺的作品信息
fn parse_work_page(html: &str, work_id: &str, url: &str) -> Result<WorkInfo, SourceError> {
    let doc = Html::parse_document(html);

    let title = select_text(&doc, WORK_TITLE_SELECTORS, url)?;
    let author_name = select_text(&doc, AUTHOR_SELECTORS, url)?;
    let author_href = select_attr(&doc, AUTHOR_SELECTORS, "href", url)?;
    let first_href = select_attr(&doc, FIRST_EPISODE_SELECTORS, "href", url)?;

    Ok(WorkInfo {
        platform: Platform::Kakuyomu,
        id: work_id.to_string(),
        title: title.trim().to_string(),
        author_name: author_name.trim().to_string(),
        author_url: absolute_url(url, &author_href)?,
        first_episode_url: absolute_url(url, &first_href)?,
        total_episodes: None,
    })
}

/// 解析单话页
fn parse_episode_page(html: &str, url: &str) -> Result<EpisodePage, SourceError> {
    let doc = Html::parse_document(html);

    let title = select_text(&doc, EPISODE_TITLE_SELECTORS, url)?;
    let content = select_text(&doc, EPISODE_BODY_SELECTORS, url)?;
    let next_url = optional_attr(&doc, NEXT_EPISODE_SELECTOR, "href")
        .map(|href| absolute_url(url, &href))
        .transpose()?;

    Ok(EpisodePage {
        episode: Episode::new(title.trim(), content.trim_matches(|c| c == '\n' || c == '\r'))
            .with_url(url),
        next_url,
    })
}

#[async_trait]
impl SourcePlatform for KakuyomuSource {
    fn platform(&self) -> Platform {
        Platform::Kakuyomu
    }

    async fn resolve_work(&self, identifier: &str) -> Result<Option<WorkInfo>, SourceError> {
        let work_id = self.work_id(identifier)?;
        let url = format!("{}/works/{}", self.base_url, work_id);

        let html = match self.http.get_text(&url).await {
            Ok(html) => html,
            Err(SourceError::HttpStatus { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        parse_work_page(&html, &work_id, &url).map(Some)
    }

    async fn extract_episodes(&self, work: &WorkInfo) -> Extraction {
        let mut episodes = EpisodeSequence::new();
        let mut visited = HashSet::new();
        let mut next = Some(work.first_episode_url.clone());
        let mut position = 0;

        while let Some(url) = next.take() {
            position += 1;

            if !visited.insert(url.clone()) {
                return self.stopped(episodes, position, format!("下一话链接出现循环: {}", url));
            }
            if position > 1 {
                sleep(self.timings.politeness_delay).await;
            }

            self.sink.emit(TransferEvent::EpisodeFetching {
                position,
                url: url.clone(),
            });

            match self.fetch_episode(&url).await {
                Ok(page) => {
                    self.sink.emit(TransferEvent::EpisodeFetched {
                        position,
                        title: page.episode.title.clone(),
                    });
                    episodes.push(page.episode);
                    next = page.next_url;
                }
                Err(e) => return self.stopped(episodes, position, e.to_string()),
            }
        }

        self.sink.emit(TransferEvent::ExtractionFinished {
            count: episodes.len(),
        });
        Extraction {
            episodes,
            outcome: ExtractionOutcome::Complete,
            expected: None,
        }
    }
}
