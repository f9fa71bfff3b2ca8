//! 交互式应用 - 编排层入口
//!
//! 选择来源平台 → 选择目标平台 → 输入作品标识和目标 URL → 执行迁移，
//! 直到在菜单中选择"退出"

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::{Config, CredentialStore};
use crate::destinations::{bounded_gate, ChromeOpener, ConsoleGate, DriverContext};
use crate::error::MigrateError;
use crate::events::{EventSink, TracingSink};
use crate::models::{MenuChoice, Platform};
use crate::orchestrator::{Pipeline, TransferRequest};
use crate::utils::{console, log_startup, menu, print_transfer_summary};

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: Pipeline,
    opener: ChromeOpener,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let credentials =
            CredentialStore::load(&config.credentials_path).context("加载认证信息失败")?;
        for platform in Platform::ALL {
            if credentials.get(platform).is_some_and(|c| !c.is_configured()) {
                warn!("⚠️ {} 的认证信息未设置，无法作为出力先", platform.label());
            }
        }

        let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
        let gate = bounded_gate(ConsoleGate, config.second_factor_timeout);
        let ctx = DriverContext::new(config.timings, gate, sink.clone());
        let opener = ChromeOpener::new(config.browser.clone(), ctx);
        let pipeline = Pipeline::new(config.clone(), credentials, sink);

        Ok(Self {
            config,
            pipeline,
            opener,
        })
    }

    /// 运行应用主循环
    pub async fn run(&self) -> Result<()> {
        loop {
            let Some(source) = choose_platform("入力元のプラットフォームを選択してください").await? else {
                break;
            };
            let Some(destination) = choose_platform("出力先のプラットフォームを選択してください").await? else {
                break;
            };

            // 配置错误在这里直接提示，不打开任何连接
            if let Err(e) = Pipeline::validate_selection(source, destination) {
                error!("❌ {}", e);
                continue;
            }

            let identifier = prompt(&format!(
                "作品のURLまたはIDを入力してください (例: {}): ",
                source.identifier_example()
            ))
            .await?;
            let destination_url = prompt(&format!(
                "出力先の作品管理URLを入力してください (例: {}): ",
                destination.destination_example()
            ))
            .await?;

            let request = TransferRequest {
                source,
                destination,
                identifier,
                destination_url,
            };

            match self.pipeline.run(&request, &self.opener).await {
                Ok(report) => print_transfer_summary(&report, &self.config.log_file),
                Err(e) => error!("❌ 迁移失败: {}", e),
            }
        }

        info!("👋 程序结束");
        Ok(())
    }
}

/// 显示平台菜单，选择"退出"时返回 None
async fn choose_platform(title: &str) -> Result<Option<Platform>> {
    let title = title.to_string();
    let options = Platform::menu_options();
    let index = tokio::task::spawn_blocking(move || menu::choose(&title, &options))
        .await
        .context("菜单任务异常结束")?
        .context("读取菜单选择失败")?;

    match Platform::from_menu_index(index) {
        Some(MenuChoice::Platform(platform)) => Ok(Some(platform)),
        Some(MenuChoice::Exit) => Ok(None),
        None => Err(MigrateError::InvalidSelection(index).into()),
    }
}

/// 读取一行输入（去掉首尾空白）
async fn prompt(message: &str) -> Result<String> {
    console::read_line(message.to_string()).await
}
