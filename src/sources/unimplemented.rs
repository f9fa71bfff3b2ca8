//! 尚未实现的来源平台（アルファポリス、ネオページ）
//!
//! 菜单中可见，但选择后在任何网络请求之前被拒绝

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{EpisodeSequence, Extraction, ExtractionOutcome, Platform, WorkInfo};
use crate::sources::SourcePlatform;

#[derive(Debug, Clone, Copy)]
pub struct UnimplementedSource {
    platform: Platform,
}

impl UnimplementedSource {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SourcePlatform for UnimplementedSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn resolve_work(&self, _identifier: &str) -> Result<Option<WorkInfo>, SourceError> {
        Err(SourceError::Unsupported(self.platform))
    }

    async fn extract_episodes(&self, _work: &WorkInfo) -> Extraction {
        Extraction {
            episodes: EpisodeSequence::new(),
            outcome: ExtractionOutcome::Stopped {
                position: 1,
                reason: SourceError::Unsupported(self.platform).to_string(),
            },
            expected: None,
        }
    }
}
