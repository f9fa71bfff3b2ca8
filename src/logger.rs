//! 日志初始化
//!
//! 控制台和日志文件同时输出，日志文件不带颜色

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::utils::logging::init_log_file;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；未设置时默认 info，`verbose_logging` 打开时为 debug
pub fn init(config: &Config) -> Result<()> {
    init_log_file(&config.log_file)?;
    let file = OpenOptions::new()
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.log_file))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},chromiumoxide=warn", default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("日志系统已经初始化")?;

    Ok(())
}
