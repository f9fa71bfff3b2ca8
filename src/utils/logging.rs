/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::orchestrator::TransferReport;

/// 初始化日志文件
///
/// 在文件末尾追加本次运行的开头，保留以前的记录
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n小说迁移日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;
    file.write_all(log_header.as_bytes())
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 小说迁移模式");
    info!("🔑 认证信息文件: {}", config.credentials_path);
    match config.browser.debug_port {
        Some(port) => info!("🌐 连接已有浏览器，调试端口: {}", port),
        None => info!(
            "🌐 启动新浏览器 ({})",
            if config.browser.headless { "无头" } else { "有界面" }
        ),
    }
    info!("{}", "=".repeat(60));
}

/// 打印一次迁移的统计信息
///
/// # 参数
/// - `report`: 迁移结果
/// - `log_file_path`: 日志文件路径
pub fn print_transfer_summary(report: &TransferReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 迁移完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📚 作品: {}", truncate_text(&report.work.title, 40));
    info!("✍️ 作者: {}", report.work.author_name);

    let expected = report
        .extraction
        .expected
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    if report.extraction.is_partial() {
        warn!(
            "📥 抽取: {}/{} 话 (提前停止)",
            report.extraction.episodes.len(),
            expected
        );
    } else {
        info!("📥 抽取: {}/{} 话", report.extraction.episodes.len(), expected);
    }

    if report.publish.is_complete() {
        info!("✅ 投稿: {}", report.publish);
    } else {
        error!("❌ 投稿: {}", report.publish);
        if let Some(note) = unpublished_note(report) {
            error!("⛔ {}", note);
        }
    }
    info!("📋 {}", report);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 投稿中止时，说明从第几话开始没有投稿
///
/// # 返回
/// 投稿完整结束时返回 None
pub fn unpublished_note(report: &TransferReport) -> Option<String> {
    let abort = report.publish.abort.as_ref()?;
    let remaining = report.publish.total.saturating_sub(report.publish.completed);
    Some(format!(
        "第 {} 话起共 {} 话未投稿，请确认目标平台后重新迁移",
        abort.position(),
        remaining
    ))
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
