use thiserror::Error;

use crate::models::Platform;

/// 迁移流程错误
///
/// 每个变体对应一种操作员可区分的失败类别
#[derive(Debug, Error)]
pub enum MigrateError {
    // ========== 配置错误（任何网络/浏览器操作之前拒绝） ==========
    /// 来源与目标选择了同一平台
    #[error("不能选择相同的平台作为来源和目标: {0}")]
    SamePlatform(Platform),

    /// 平台尚未实现
    #[error("平台尚未实现: {0}")]
    Unsupported(Platform),

    /// 菜单索引越界
    #[error("无效的选项: {0}")]
    InvalidSelection(usize),

    /// 认证信息为空
    #[error("{platform} 的邮箱或密码未设置")]
    MissingCredentials { platform: Platform },

    /// 作品管理 URL 不属于目标平台
    #[error("提供的 URL 不是 {platform} 的 URL: {url}")]
    DomainMismatch { platform: Platform, url: String },

    // ========== 来源侧 ==========
    /// 作品不存在
    #[error("未找到作品: {0}")]
    WorkNotFound(String),

    /// 一话都没有取到
    #[error("没有可迁移的话 ({0})")]
    NothingToMigrate(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    /// HTTP 客户端初始化失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[source] anyhow::Error),

    // ========== 目标侧 ==========
    /// 浏览器启动或操作失败
    #[error("浏览器错误: {0}")]
    Browser(#[source] anyhow::Error),

    /// 登录失败
    #[error("登录 {platform} 失败: {reason}")]
    LoginFailed { platform: Platform, reason: String },

    /// 二段认证未完成
    #[error("{platform} 的二段认证未完成")]
    SecondFactorUnresolved { platform: Platform },

    /// 驱动状态不允许该操作
    #[error("驱动状态错误: 期望 {expected}，实际 {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
}

/// 来源平台抽取错误（单页或元信息级别）
#[derive(Debug, Error)]
pub enum SourceError {
    /// 网络请求失败
    #[error("请求失败 ({url}): {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 返回非成功状态码
    #[error("HTTP {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    /// 页面中找不到预期节点
    #[error("找不到节点 {selector} ({url})")]
    MissingNode { url: String, selector: String },

    /// API 返回结构无法解析
    #[error("API 响应格式错误 ({url}): {reason}")]
    MalformedResponse { url: String, reason: String },

    /// 标识格式不正确
    #[error("无效的作品标识: {0}")]
    InvalidIdentifier(String),

    /// 平台未实现
    #[error("平台尚未实现: {0}")]
    Unsupported(Platform),
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    /// 读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 迁移结果类型
pub type MigrateResult<T> = Result<T, MigrateError>;
