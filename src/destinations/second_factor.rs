//! 二段认证人工确认
//!
//! 二段认证无法自动化，登录流程在这里暂停，等外部确认后再继续

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::models::Platform;
use crate::utils::console;

/// 二段认证确认门
#[async_trait]
pub trait SecondFactorGate: Send + Sync {
    /// 阻塞直到操作员确认已在浏览器中完成认证
    async fn wait_for_confirmation(&self, platform: Platform, challenge_url: &str) -> Result<()>;
}

/// 控制台确认：按 Enter 继续
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleGate;

#[async_trait]
impl SecondFactorGate for ConsoleGate {
    async fn wait_for_confirmation(&self, platform: Platform, challenge_url: &str) -> Result<()> {
        let prompt = format!(
            "{} 需要二段认证 ({})\n请在浏览器中完成认证后按 Enter 键: ",
            platform.label(),
            challenge_url
        );

        console::read_line(prompt)
            .await
            .context("无法确认二段认证")?;
        Ok(())
    }
}

/// 带超时的确认门：超过时限视为失败
pub struct TimeoutGate<G> {
    inner: G,
    limit: Duration,
}

impl<G: SecondFactorGate> TimeoutGate<G> {
    pub fn new(inner: G, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<G: SecondFactorGate> SecondFactorGate for TimeoutGate<G> {
    async fn wait_for_confirmation(&self, platform: Platform, challenge_url: &str) -> Result<()> {
        match timeout(
            self.limit,
            self.inner.wait_for_confirmation(platform, challenge_url),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => bail!("等待二段认证超时 ({:?})", self.limit),
        }
    }
}

/// 设置了时限时用 `TimeoutGate` 包一层
pub fn bounded_gate<G: SecondFactorGate + 'static>(
    inner: G,
    limit: Option<Duration>,
) -> Arc<dyn SecondFactorGate> {
    match limit {
        Some(limit) => Arc::new(TimeoutGate::new(inner, limit)),
        None => Arc::new(inner),
    }
}
