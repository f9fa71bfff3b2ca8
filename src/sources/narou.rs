//! 小説家になろう 来源适配器（计数型）
//!
//! 作品信息来自官方小说 API，正文按 `{ncode}/{序号}/` 逐话抓取

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::debug;

use crate::clients::HttpClient;
use crate::config::{SourceSettings, Timings};
use crate::error::SourceError;
use crate::events::{EventSink, TransferEvent};
use crate::models::{Episode, EpisodeSequence, Extraction, ExtractionOutcome, Platform, WorkInfo};
use crate::sources::html::select_text;
use crate::sources::SourcePlatform;

const TITLE_SELECTORS: &[&str] = &[".p-novel__title"];
const BODY_SELECTORS: &[&str] = &[".p-novel__text"];

/// 短篇小说的 noveltype
const NOVELTYPE_SHORT: u8 = 2;

/// API 返回的作品条目（只取需要的字段）
#[derive(Debug, Deserialize)]
struct NarouNovel {
    ncode: String,
    title: String,
    writer: String,
    userid: u64,
    general_all_no: usize,
    #[serde(default)]
    noveltype: Option<u8>,
}

pub struct NarouSource {
    http: HttpClient,
    api_url: String,
    novel_url: String,
    mypage_url: String,
    timings: Timings,
    sink: Arc<dyn EventSink>,
    ncode_pattern: Regex,
}

impl NarouSource {
    pub fn new(
        settings: &SourceSettings,
        timings: Timings,
        sink: Arc<dyn EventSink>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(settings)?,
            api_url: settings.narou_api_url.clone(),
            novel_url: settings.narou_novel_url.trim_end_matches('/').to_string(),
            mypage_url: settings.narou_mypage_url.trim_end_matches('/').to_string(),
            timings,
            sink,
            ncode_pattern: Regex::new(r"^n\d{4}[a-z]{1,3}$")?,
        })
    }

    /// 规范化 ncode（小写、去空白），格式不对时报错
    pub fn normalize_ncode(&self, identifier: &str) -> Result<String, SourceError> {
        let ncode = identifier.trim().to_lowercase();
        if self.ncode_pattern.is_match(&ncode) {
            Ok(ncode)
        } else {
            Err(SourceError::InvalidIdentifier(identifier.to_string()))
        }
    }

    /// 第 `position` 话的 URL
    fn episode_url(&self, work: &WorkInfo, position: usize) -> String {
        // 只有一话时直接用作品信息里的地址（短篇没有序号路径）
        if work.total_episodes == Some(1) {
            return work.first_episode_url.clone();
        }
        format!("{}/{}/{}/", self.novel_url, work.id, position)
    }

    fn to_work_info(&self, novel: NarouNovel) -> WorkInfo {
        let ncode = novel.ncode.to_lowercase();
        let first_episode_url = if novel.noveltype == Some(NOVELTYPE_SHORT) {
            format!("{}/{}/", self.novel_url, ncode)
        } else {
            format!("{}/{}/1/", self.novel_url, ncode)
        };
        WorkInfo {
            platform: Platform::Narou,
            author_url: format!("{}/{}/", self.mypage_url, novel.userid),
            id: ncode,
            title: novel.title,
            author_name: novel.writer,
            first_episode_url,
            total_episodes: Some(novel.general_all_no),
        }
    }

    async fn fetch_episode(&self, url: &str) -> Result<Episode, SourceError> {
        let html = self.http.get_text(url).await?;
        parse_episode(&html, url)
    }
}

/// 解析单话页面
fn parse_episode(html: &str, url: &str) -> Result<Episode, SourceError> {
    let doc = Html::parse_document(html);
    let title = select_text(&doc, TITLE_SELECTORS, url)?;
    let content = select_text(&doc, BODY_SELECTORS, url)?;
    Ok(Episode::new(title.trim(), content.trim_matches(|c| c == '\n' || c == '\r')).with_url(url))
}

#[async_trait]
impl SourcePlatform for NarouSource {
    fn platform(&self) -> Platform {
        Platform::Narou
    }

    async fn resolve_work(&self, identifier: &str) -> Result<Option<WorkInfo>, SourceError> {
        let ncode = self.normalize_ncode(identifier)?;
        let endpoint = format!("{}?ncode={}&out=json", self.api_url, ncode);

        let body: Vec<JsonValue> = self.http.get_json(&endpoint).await?;
        debug!("API 返回 {} 个元素", body.len());

        // 第一个元素是 {allcount}，只有它时表示不存在
        let Some(entry) = body.into_iter().nth(1) else {
            return Ok(None);
        };

        let novel: NarouNovel =
            serde_json::from_value(entry).map_err(|e| SourceError::MalformedResponse {
                url: endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(self.to_work_info(novel)))
    }

    async fn extract_episodes(&self, work: &WorkInfo) -> Extraction {
        let total = work.total_episodes.unwrap_or(0);
        let mut episodes = EpisodeSequence::new();

        for position in 1..=total {
            if position > 1 {
                sleep(self.timings.politeness_delay).await;
            }

            let url = self.episode_url(work, position);
            self.sink.emit(TransferEvent::EpisodeFetching {
                position,
                url: url.clone(),
            });

            match self.fetch_episode(&url).await {
                Ok(episode) => {
                    self.sink.emit(TransferEvent::EpisodeFetched {
                        position,
                        title: episode.title.clone(),
                    });
                    episodes.push(episode);
                }
                Err(e) => {
                    let reason = e.to_string();
                    self.sink.emit(TransferEvent::ExtractionStopped {
                        position,
                        reason: reason.clone(),
                    });
                    return Extraction {
                        episodes,
                        outcome: ExtractionOutcome::Stopped { position, reason },
                        expected: Some(total),
                    };
                }
            }
        }

        self.sink.emit(TransferEvent::ExtractionFinished {
            count: episodes.len(),
        });
        Extraction {
            episodes,
            outcome: ExtractionOutcome::Complete,
            expected: Some(total),
        }
    }
}
