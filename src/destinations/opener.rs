//! 目标驱动构造
//!
//! 把"开浏览器"放在 trait 后面，编排层不直接依赖 chromiumoxide

use async_trait::async_trait;
use tracing::info;

use crate::browser;
use crate::config::{BrowserSettings, Credentials};
use crate::destinations::{DestinationPlatform, DriverContext, KakuyomuDriver, NarouDriver};
use crate::error::{MigrateError, MigrateResult};
use crate::models::Platform;

/// 为目标平台构造一个未登录的驱动
#[async_trait]
pub trait DestinationOpener: Send + Sync {
    async fn open(
        &self,
        platform: Platform,
        credentials: Credentials,
    ) -> MigrateResult<Box<dyn DestinationPlatform>>;
}

/// 启动 Chromium 并构造驱动
pub struct ChromeOpener {
    settings: BrowserSettings,
    ctx: DriverContext,
}

impl ChromeOpener {
    pub fn new(settings: BrowserSettings, ctx: DriverContext) -> Self {
        Self { settings, ctx }
    }
}

#[async_trait]
impl DestinationOpener for ChromeOpener {
    async fn open(
        &self,
        platform: Platform,
        credentials: Credentials,
    ) -> MigrateResult<Box<dyn DestinationPlatform>> {
        // 在打开浏览器之前检查，避免留下无用的会话
        if !platform.is_supported() {
            return Err(MigrateError::Unsupported(platform));
        }
        if !credentials.is_configured() {
            return Err(MigrateError::MissingCredentials { platform });
        }

        info!("{} 驱动初始化中...", platform.label());
        let page = browser::open_session(&self.settings)
            .await
            .map_err(MigrateError::Browser)?;

        let driver: Box<dyn DestinationPlatform> = match platform {
            Platform::Kakuyomu => Box::new(KakuyomuDriver::new(page, credentials, self.ctx.clone())?),
            Platform::Narou => Box::new(NarouDriver::new(page, credentials, self.ctx.clone())?),
            Platform::AlphaPolis | Platform::NeoPage => {
                return Err(MigrateError::Unsupported(platform))
            }
        };
        Ok(driver)
    }
}
