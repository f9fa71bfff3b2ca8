//! 表单会话 - 两个目标平台共用的登录与批量投稿逻辑
//!
//! 平台差异全部来自 `DestinationLayout`

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::{Credentials, Timings};
use crate::destinations::layout::DestinationLayout;
use crate::destinations::second_factor::SecondFactorGate;
use crate::destinations::{DriverState, PublishAbort, PublishReport};
use crate::error::{MigrateError, MigrateResult};
use crate::events::{EventSink, TransferEvent};
use crate::infrastructure::{wait_for_element, PageDriver};
use crate::models::EpisodeSequence;
use crate::workflow::{submit_episode, EpisodeCtx, EpisodeFailure};

/// 二段认证最多询问次数
const MAX_SECOND_FACTOR_PROMPTS: usize = 3;

/// 排查用页面源码长度
const SNIPPET_CHARS: usize = 1500;

/// 驱动共享的外部协作者
#[derive(Clone)]
pub struct DriverContext {
    pub timings: Timings,
    pub gate: Arc<dyn SecondFactorGate>,
    pub sink: Arc<dyn EventSink>,
}

impl DriverContext {
    pub fn new(timings: Timings, gate: Arc<dyn SecondFactorGate>, sink: Arc<dyn EventSink>) -> Self {
        Self { timings, gate, sink }
    }
}

/// 已绑定页面和认证信息的表单会话
pub struct FormSession<P: PageDriver> {
    layout: &'static DestinationLayout,
    page: P,
    credentials: Credentials,
    ctx: DriverContext,
    state: DriverState,
}

impl<P: PageDriver> FormSession<P> {
    /// 认证信息不完整时拒绝创建
    pub fn new(
        layout: &'static DestinationLayout,
        page: P,
        credentials: Credentials,
        ctx: DriverContext,
    ) -> MigrateResult<Self> {
        if !credentials.is_configured() {
            return Err(MigrateError::MissingCredentials {
                platform: layout.platform,
            });
        }
        Ok(Self {
            layout,
            page,
            credentials,
            ctx,
            state: DriverState::Unauthenticated,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// 登录
    pub async fn login(&mut self) -> MigrateResult<()> {
        if self.state != DriverState::Unauthenticated {
            return Err(MigrateError::InvalidState {
                expected: DriverState::Unauthenticated.name(),
                actual: self.state.name(),
            });
        }

        let layout = self.layout;
        let platform = layout.platform;
        let timings = self.ctx.timings;
        self.ctx.sink.emit(TransferEvent::LoginStarted { platform });

        self.page
            .goto(layout.login_url)
            .await
            .map_err(MigrateError::Browser)?;
        sleep(timings.ui_settle).await;

        let form_ready = wait_for_element(
            &self.page,
            layout.login_id_field,
            timings.field_wait_timeout,
            timings.poll_interval,
        )
        .await
        .map_err(MigrateError::Browser)?;
        if !form_ready {
            return Err(MigrateError::LoginFailed {
                platform,
                reason: format!("登录表单 {} 未出现", layout.login_id_field),
            });
        }

        self.page
            .clear_and_fill(layout.login_id_field, &self.credentials.email)
            .await
            .map_err(MigrateError::Browser)?;
        self.page
            .clear_and_fill(layout.login_password_field, &self.credentials.password)
            .await
            .map_err(MigrateError::Browser)?;
        sleep(timings.ui_settle).await;

        self.page
            .click(layout.login_submit)
            .await
            .map_err(MigrateError::Browser)?;
        sleep(timings.login_settle).await;

        if let Some(marker) = layout.second_factor_marker {
            self.resolve_second_factor(marker).await?;
        }

        // 打开登录后才能访问的页面作为确认
        self.page
            .goto(layout.landing_url)
            .await
            .map_err(MigrateError::Browser)?;
        let current = self.page.current_url().await.map_err(MigrateError::Browser)?;
        if current.contains(layout.login_marker) {
            return Err(MigrateError::LoginFailed {
                platform,
                reason: format!("登录后仍停留在登录页面: {}", current),
            });
        }

        self.state = DriverState::Authenticated;
        self.ctx.sink.emit(TransferEvent::LoggedIn { platform });
        Ok(())
    }

    /// 停留在二段认证页期间反复请求人工确认
    async fn resolve_second_factor(&self, marker: &str) -> MigrateResult<()> {
        let platform = self.layout.platform;

        for attempt in 1..=MAX_SECOND_FACTOR_PROMPTS {
            let current = self.page.current_url().await.map_err(MigrateError::Browser)?;
            if !current.contains(marker) {
                return Ok(());
            }

            debug!("二段认证确认 第 {}/{} 次", attempt, MAX_SECOND_FACTOR_PROMPTS);
            self.ctx.sink.emit(TransferEvent::SecondFactorRequired {
                platform,
                url: current.clone(),
            });
            self.ctx
                .gate
                .wait_for_confirmation(platform, &current)
                .await
                .map_err(|e| MigrateError::LoginFailed {
                    platform,
                    reason: e.to_string(),
                })?;
        }

        let current = self.page.current_url().await.map_err(MigrateError::Browser)?;
        if current.contains(marker) {
            return Err(MigrateError::SecondFactorUnresolved { platform });
        }
        Ok(())
    }

    /// 批量投稿
    pub async fn publish(
        &mut self,
        work_url: &str,
        episodes: &EpisodeSequence,
    ) -> MigrateResult<PublishReport> {
        let layout = self.layout;
        let platform = layout.platform;

        // URL 不对是配置错误，整批直接拒绝
        if !platform.owns_url(work_url) {
            error!("❌ 提供的URL不是 {} 的URL: {}", platform, work_url);
            return Err(MigrateError::DomainMismatch {
                platform,
                url: work_url.to_string(),
            });
        }
        if self.state != DriverState::Authenticated {
            return Err(MigrateError::InvalidState {
                expected: DriverState::Authenticated.name(),
                actual: self.state.name(),
            });
        }

        let form_url = layout.episode_form_url(work_url);
        info!("📝 投稿表单URL: {}", form_url);

        self.state = DriverState::Publishing;
        let total = episodes.len();
        let mut completed = 0;

        for (index, episode) in episodes.iter().enumerate() {
            let position = index + 1;
            let ctx = EpisodeCtx::new(position, total, episode.title.as_str());
            self.ctx.sink.emit(TransferEvent::EpisodePublishing {
                position,
                total,
                title: episode.title.clone(),
            });

            match submit_episode(
                &self.page,
                layout,
                &form_url,
                episode,
                &ctx,
                &self.ctx.timings,
            )
            .await
            {
                Ok(()) => {
                    completed += 1;
                    self.ctx
                        .sink
                        .emit(TransferEvent::EpisodePublished { position, total });
                }
                Err(failure) => {
                    let abort = match failure {
                        EpisodeFailure::FieldTimeout { field } => {
                            PublishAbort::FieldTimeout { position, field }
                        }
                        EpisodeFailure::Unexpected(e) => PublishAbort::Unexpected {
                            position,
                            message: format!("{:#}", e),
                        },
                    };
                    self.log_page_state(&ctx).await;

                    self.state = DriverState::Aborted;
                    self.ctx.sink.emit(TransferEvent::PublishAborted {
                        completed,
                        total,
                        reason: abort.to_string(),
                    });
                    return Ok(PublishReport {
                        total,
                        completed,
                        abort: Some(abort),
                    });
                }
            }
        }

        self.state = DriverState::Authenticated;
        self.ctx.sink.emit(TransferEvent::PublishFinished { total });
        Ok(PublishReport {
            total,
            completed,
            abort: None,
        })
    }

    /// 中止时记录当前页面，方便判断是布局变化还是会话过期
    async fn log_page_state(&self, ctx: &EpisodeCtx) {
        match self.page.current_url().await {
            Ok(url) => error!("{} 当前URL: {}", ctx, url),
            Err(e) => debug!("{} 无法获取当前URL: {}", ctx, e),
        }
        if let Ok(snippet) = self.page.source_snippet(SNIPPET_CHARS).await {
            debug!("--- 页面源码片段 ---\n{}\n--- 结束 ---", snippet);
        }
    }
}
