//! 页面操作能力
//!
//! 投稿流程只依赖这个 trait，不直接接触 chromiumoxide

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Instant};

/// 浏览器页面能力
///
/// 所有元素都通过 CSS 选择器（稳定的 name/id 属性）定位，不按位置定位
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定 URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// 当前页面 URL
    async fn current_url(&self) -> Result<String>;

    /// 元素是否存在
    async fn has_element(&self, selector: &str) -> Result<bool>;

    /// 清空输入框后填入新内容
    async fn clear_and_fill(&self, selector: &str, value: &str) -> Result<()>;

    /// 点击元素
    async fn click(&self, selector: &str) -> Result<()>;

    /// 页面源码开头部分（用于排查）
    async fn source_snippet(&self, max_chars: usize) -> Result<String>;
}

/// 在限定时间内等待元素出现
///
/// # 返回
/// 出现返回 `Ok(true)`，超时返回 `Ok(false)`，页面操作本身出错时返回 `Err`
pub async fn wait_for_element<P: PageDriver + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.has_element(selector).await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(poll_interval).await;
    }
}
