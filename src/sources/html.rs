//! HTML 节点查找辅助函数
//!
//! `scraper::Html` 不是 `Send`，所以解析必须在同步函数里完成，
//! 只把结果（String）带回 async 代码

use scraper::{ElementRef, Html, Selector};

use crate::error::SourceError;

/// 按候选选择器顺序查找第一个匹配的节点
pub fn select_first<'a>(
    doc: &'a Html,
    selectors: &[&str],
    url: &str,
) -> Result<ElementRef<'a>, SourceError> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(node) = doc.select(&selector).next() {
            return Ok(node);
        }
    }
    Err(SourceError::MissingNode {
        url: url.to_string(),
        selector: selectors.join(" | "),
    })
}

/// 节点的全部文本
pub fn node_text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>()
}

/// 按候选选择器查找节点并取文本
pub fn select_text(doc: &Html, selectors: &[&str], url: &str) -> Result<String, SourceError> {
    select_first(doc, selectors, url).map(node_text)
}

/// 按候选选择器查找节点并取属性
pub fn select_attr(
    doc: &Html,
    selectors: &[&str],
    attr: &str,
    url: &str,
) -> Result<String, SourceError> {
    let node = select_first(doc, selectors, url)?;
    node.value()
        .attr(attr)
        .map(str::to_string)
        .ok_or_else(|| SourceError::MissingNode {
            url: url.to_string(),
            selector: format!("{}[{}]", selectors.join(" | "), attr),
        })
}

/// 选择器命中时取属性，未命中返回 None
pub fn optional_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|node| node.value().attr(attr))
        .map(str::to_string)
}
