//! Chromium 页面 - 基础设施层
//!
//! 唯一的 page owner，同时持有 Browser 保证会话存活

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::infrastructure::PageDriver;

/// Chromium 页面
///
/// 职责：
/// - 独占一个浏览器会话（不与其他平台或并发运行共享）
/// - 通过 JS 查询/填写元素
/// - 不认识 Episode / 平台
pub struct ChromePage {
    _browser: Browser,
    page: Page,
}

impl ChromePage {
    pub fn new(browser: Browser, page: Page) -> Self {
        Self {
            _browser: browser,
            page,
        }
    }

    /// 执行 JS 代码并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let result = self.page.evaluate(js_code.into()).await?;
        let typed_value = result.into_value()?;
        Ok(typed_value)
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn has_element(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.eval_as(js_code).await
    }

    async fn clear_and_fill(&self, selector: &str, value: &str) -> Result<()> {
        // 通过原型上的 setter 赋值，让 React 等框架也能感知到变化
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                const desc = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value');
                const setValue = (v) => (desc && desc.set) ? desc.set.call(el, v) : (el.value = v);
                el.focus();
                setValue('');
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                setValue({});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            serde_json::to_string(selector)?,
            serde_json::to_string(value)?
        );

        let filled: bool = self.eval_as(js_code).await?;
        if !filled {
            bail!("找不到输入框: {}", selector);
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("找不到元素: {}", selector))?;
        element.click().await?;
        Ok(())
    }

    async fn source_snippet(&self, max_chars: usize) -> Result<String> {
        let content = self.page.content().await?;
        Ok(content.chars().take(max_chars).collect())
    }
}
