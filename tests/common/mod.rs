#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use novel_migrate::config::Credentials;
use novel_migrate::destinations::{
    DestinationOpener, DestinationPlatform, DriverContext, KakuyomuDriver, NarouDriver,
    SecondFactorGate,
};
use novel_migrate::events::RecordingSink;
use novel_migrate::{MigrateError, MigrateResult, Platform, Timings};

/// 页面上发生过的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Fill { selector: String, value: String },
    Click(String),
}

#[derive(Default)]
struct MockState {
    actions: Vec<Action>,
    current_url: String,
    visits: HashMap<String, usize>,
    missing: HashSet<String>,
    vanishing: Option<(String, usize, Vec<String>)>,
    redirects: HashMap<String, String>,
    click_targets: HashMap<String, String>,
}

/// 内存中的页面：所有元素默认存在
#[derive(Clone, Default)]
pub struct MockPage {
    state: Arc<Mutex<MockState>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 该选择器永远不存在
    pub fn without(self, selector: &str) -> Self {
        self.state.lock().unwrap().missing.insert(selector.to_string());
        self
    }

    /// 第 `visit` 次（及之后）打开 `url` 时这些输入框消失
    pub fn fields_vanish_on_visit(self, url: &str, visit: usize, selectors: &[&str]) -> Self {
        self.state.lock().unwrap().vanishing = Some((
            url.to_string(),
            visit,
            selectors.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// 打开 `from` 时实际停在 `to`
    pub fn redirect(self, from: &str, to: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    /// 点击 `selector` 后跳转到 `url`
    pub fn on_click(self, selector: &str, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .click_targets
            .insert(selector.to_string(), url.to_string());
        self
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().current_url = url.to_string();
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn clicks(&self, selector: &str) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, Action::Click(s) if s == selector))
            .count()
    }

    pub fn filled_values(&self, selector: &str) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Fill { selector: s, value } if s == selector => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn visits(&self, url: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .visits
            .get(url)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl novel_migrate::PageDriver for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Goto(url.to_string()));
        *state.visits.entry(url.to_string()).or_insert(0) += 1;
        state.current_url = state
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().current_url.clone())
    }

    async fn has_element(&self, selector: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        if state.missing.contains(selector) {
            return Ok(false);
        }
        if let Some((url, visit, selectors)) = &state.vanishing {
            let seen = state.visits.get(url).copied().unwrap_or(0);
            if state.current_url == *url
                && seen >= *visit
                && selectors.iter().any(|s| s == selector)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn clear_and_fill(&self, selector: &str, value: &str) -> Result<()> {
        self.state.lock().unwrap().actions.push(Action::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Click(selector.to_string()));
        if let Some(url) = state.click_targets.get(selector).cloned() {
            state.current_url = url;
        }
        Ok(())
    }

    async fn source_snippet(&self, _max_chars: usize) -> Result<String> {
        Ok("<html></html>".to_string())
    }
}

/// 记录调用次数的二段认证门；`resolve_to` 设置时确认后把页面带到该 URL
pub struct ScriptedGate {
    page: MockPage,
    resolve_to: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedGate {
    pub fn resolving(page: MockPage, url: &str) -> Self {
        Self {
            page,
            resolve_to: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn stuck(page: MockPage) -> Self {
        Self {
            page,
            resolve_to: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecondFactorGate for ScriptedGate {
    async fn wait_for_confirmation(&self, _platform: Platform, _challenge_url: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(url) = &self.resolve_to {
            self.page.set_url(url);
        }
        Ok(())
    }
}

/// 不会被调用的二段认证门
pub struct NoGate;

#[async_trait]
impl SecondFactorGate for NoGate {
    async fn wait_for_confirmation(&self, platform: Platform, _: &str) -> Result<()> {
        anyhow::bail!("{} 不应该要求二段认证", platform)
    }
}

pub fn test_context(gate: Arc<dyn SecondFactorGate>, sink: RecordingSink) -> DriverContext {
    DriverContext::new(Timings::instant(), gate, Arc::new(sink))
}

pub fn credentials() -> Credentials {
    Credentials::new("writer@example.com", "secret")
}

/// 用 MockPage 构造驱动，并记录打开次数
pub struct CountingOpener {
    page: MockPage,
    ctx: DriverContext,
    opens: AtomicUsize,
}

impl CountingOpener {
    pub fn new(page: MockPage, ctx: DriverContext) -> Self {
        Self {
            page,
            ctx,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DestinationOpener for CountingOpener {
    async fn open(
        &self,
        platform: Platform,
        credentials: Credentials,
    ) -> MigrateResult<Box<dyn DestinationPlatform>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match platform {
            Platform::Kakuyomu => Ok(Box::new(KakuyomuDriver::new(
                self.page.clone(),
                credentials,
                self.ctx.clone(),
            )?)),
            Platform::Narou => Ok(Box::new(NarouDriver::new(
                self.page.clone(),
                credentials,
                self.ctx.clone(),
            )?)),
            Platform::AlphaPolis | Platform::NeoPage => Err(MigrateError::Unsupported(platform)),
        }
    }
}
