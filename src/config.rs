use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Platform;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 认证信息文件（TOML，扩展名为 .json 时按 JSON 解析）
    pub credentials_path: String,
    /// 输出日志文件
    pub log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 浏览器相关配置
    pub browser: BrowserSettings,
    /// 来源平台地址
    pub sources: SourceSettings,
    /// 各种等待与间隔
    pub timings: Timings,
    /// 等待人工完成二段认证的上限，未设置时一直等待
    pub second_factor_timeout: Option<Duration>,
}

/// 浏览器配置
#[derive(Clone, Debug)]
pub struct BrowserSettings {
    /// 无头模式（二段认证时需要有界面）
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 设置后连接到已启动的浏览器调试端口，而不是新启动一个
    pub debug_port: Option<u16>,
}

/// 来源平台的访问地址
#[derive(Clone, Debug)]
pub struct SourceSettings {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub narou_api_url: String,
    pub narou_novel_url: String,
    pub narou_mypage_url: String,
    pub kakuyomu_base_url: String,
}

/// 节奏控制
///
/// 这些都是有意设置的限速/稳定性参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// 连续抓取之间的礼貌间隔
    pub politeness_delay: Duration,
    /// 页面操作之间的 UI 稳定等待
    pub ui_settle: Duration,
    /// 点击提交后的等待
    pub submit_settle: Duration,
    /// 点击登录后的等待
    pub login_settle: Duration,
    /// 等待输入框出现的上限
    pub field_wait_timeout: Duration,
    /// 等待期间的轮询间隔
    pub poll_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            politeness_delay: Duration::from_secs(1),
            ui_settle: Duration::from_millis(500),
            submit_settle: Duration::from_secs(1),
            login_settle: Duration::from_secs(1),
            field_wait_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl Timings {
    /// 所有等待都压到最小（测试用）
    pub fn instant() -> Self {
        Self {
            politeness_delay: Duration::ZERO,
            ui_settle: Duration::ZERO,
            submit_settle: Duration::ZERO,
            login_settle: Duration::ZERO,
            field_wait_timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(5),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36 Edg/140.0.0.0".to_string(),
            request_timeout: Duration::from_secs(30),
            narou_api_url: "https://api.syosetu.com/novelapi/api/".to_string(),
            narou_novel_url: "https://ncode.syosetu.com".to_string(),
            narou_mypage_url: "https://mypage.syosetu.com".to_string(),
            kakuyomu_base_url: "https://kakuyomu.jp".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: "config.toml".to_string(),
            log_file: "novel_migrate.log".to_string(),
            verbose_logging: false,
            browser: BrowserSettings {
                headless: false,
                chrome_executable: None,
                debug_port: None,
            },
            sources: SourceSettings::default(),
            timings: Timings::default(),
            second_factor_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let timings = default.timings;
        Self {
            credentials_path: std::env::var("CREDENTIALS_PATH").unwrap_or(default.credentials_path),
            log_file: std::env::var("LOG_FILE").unwrap_or(default.log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            browser: BrowserSettings {
                headless: env_parse("BROWSER_HEADLESS").unwrap_or(default.browser.headless),
                chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()),
                debug_port: env_parse("BROWSER_DEBUG_PORT"),
            },
            sources: SourceSettings {
                user_agent: std::env::var("USER_AGENT").unwrap_or(default.sources.user_agent),
                ..default.sources
            },
            timings: Timings {
                politeness_delay: env_millis("POLITENESS_DELAY_MS").unwrap_or(timings.politeness_delay),
                ui_settle: env_millis("UI_SETTLE_MS").unwrap_or(timings.ui_settle),
                submit_settle: env_millis("SUBMIT_SETTLE_MS").unwrap_or(timings.submit_settle),
                login_settle: env_millis("LOGIN_SETTLE_MS").unwrap_or(timings.login_settle),
                field_wait_timeout: env_millis("FIELD_WAIT_TIMEOUT_MS").unwrap_or(timings.field_wait_timeout),
                poll_interval: timings.poll_interval,
            },
            second_factor_timeout: env_millis("SECOND_FACTOR_TIMEOUT_MS"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}

// ========== 认证信息 ==========

/// 单个平台的登录信息
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// 邮箱和密码都不为空
    pub fn is_configured(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 按平台名分组的认证信息文件
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CredentialStore {
    #[serde(default)]
    kakuyomu: Credentials,
    #[serde(default)]
    narou: Credentials,
}

impl CredentialStore {
    /// 从文件加载
    ///
    /// 扩展名为 `.json` 时按 JSON 解析，否则按 TOML 解析
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::NotFound(display));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: display.clone(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content)
                .map_err(|source| ConfigError::JsonParseFailed { path: display, source })
        } else {
            toml::from_str(&content)
                .map_err(|source| ConfigError::TomlParseFailed { path: display, source })
        }
    }

    pub fn get(&self, platform: Platform) -> Option<&Credentials> {
        match platform {
            Platform::Kakuyomu => Some(&self.kakuyomu),
            Platform::Narou => Some(&self.narou),
            Platform::AlphaPolis | Platform::NeoPage => None,
        }
    }

    pub fn with(mut self, platform: Platform, credentials: Credentials) -> Self {
        match platform {
            Platform::Kakuyomu => self.kakuyomu = credentials,
            Platform::Narou => self.narou = credentials,
            Platform::AlphaPolis | Platform::NeoPage => {}
        }
        self
    }
}
