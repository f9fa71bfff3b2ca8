//! 单话投稿流程 - 流程层
//!
//! 流程顺序：
//! 1. 打开投稿表单
//! 2. 等待标题和正文输入框出现（有时限）
//! 3. 清空后填入标题、正文
//! 4. 找提交按钮（首选 → 通用）
//! 5. 点击提交，固定等待后返回

use anyhow::anyhow;
use tokio::time::sleep;
use tracing::debug;

use crate::config::Timings;
use crate::destinations::DestinationLayout;
use crate::infrastructure::{wait_for_element, PageDriver};
use crate::models::Episode;
use crate::workflow::EpisodeCtx;

/// 单话投稿失败
#[derive(Debug)]
pub enum EpisodeFailure {
    /// 输入框在时限内没有出现
    FieldTimeout { field: String },
    /// 其他页面操作错误
    Unexpected(anyhow::Error),
}

impl From<anyhow::Error> for EpisodeFailure {
    fn from(err: anyhow::Error) -> Self {
        EpisodeFailure::Unexpected(err)
    }
}

/// 投稿一话
///
/// 不做重试；任何失败都交给调用方决定是否中止整批
pub async fn submit_episode<P: PageDriver + ?Sized>(
    page: &P,
    layout: &DestinationLayout,
    form_url: &str,
    episode: &Episode,
    ctx: &EpisodeCtx,
    timings: &Timings,
) -> Result<(), EpisodeFailure> {
    page.goto(form_url).await?;
    sleep(timings.ui_settle).await;
    debug!("{} 当前URL: {}", ctx, page.current_url().await?);

    for field in [layout.title_field, layout.body_field] {
        let present = wait_for_element(
            page,
            field,
            timings.field_wait_timeout,
            timings.poll_interval,
        )
        .await?;
        if !present {
            return Err(EpisodeFailure::FieldTimeout {
                field: field.to_string(),
            });
        }
    }

    // 表单可能残留上次失败时的内容，先清空再填
    page.clear_and_fill(layout.title_field, &episode.title).await?;
    page.clear_and_fill(layout.body_field, &episode.content).await?;
    sleep(timings.ui_settle).await;

    let submit = if page.has_element(layout.primary_submit).await? {
        layout.primary_submit
    } else if page.has_element(layout.fallback_submit).await? {
        debug!(
            "{} 找不到 {}，改用 {}",
            ctx, layout.primary_submit, layout.fallback_submit
        );
        layout.fallback_submit
    } else {
        return Err(EpisodeFailure::Unexpected(anyhow!(
            "找不到提交按钮 ({} / {})",
            layout.primary_submit,
            layout.fallback_submit
        )));
    };

    page.click(submit).await?;
    sleep(timings.submit_settle).await;

    Ok(())
}
