pub mod connection;
pub mod launcher;

pub use connection::connect_to_browser;
pub use launcher::launch_browser;

use anyhow::Result;

use crate::config::BrowserSettings;
use crate::infrastructure::ChromePage;

/// 打开一个独占的浏览器会话
///
/// 配置了调试端口时连接已有浏览器，否则新启动一个
pub async fn open_session(settings: &BrowserSettings) -> Result<ChromePage> {
    let (browser, page) = match settings.debug_port {
        Some(port) => connect_to_browser(port).await?,
        None => launch_browser(settings).await?,
    };
    Ok(ChromePage::new(browser, page))
}
