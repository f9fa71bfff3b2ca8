//! # Novel Migrate
//!
//! 把已发布的连载小说从一个投稿平台迁移到另一个平台
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露页面操作能力
//! - `PageDriver` - 跳转、等待、填写、点击；`ChromePage` 是 chromiumoxide 实现
//! - `clients/` - 来源平台的 HTTP 客户端
//!
//! ### ② 平台层（Sources / Destinations）
//! - `sources/` - 来源适配器：作品信息 + 有序话列表
//! - `destinations/` - 目标驱动：登录 + 批量投稿，带状态机
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一话"的投稿流程（打开表单 → 等待 → 填写 → 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 校验 → 抽取 → 投稿
//! - `orchestrator/app` - 菜单循环
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod destinations;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod sources;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, CredentialStore, Credentials, Timings};
pub use destinations::{DestinationOpener, DestinationPlatform, DriverState, PublishReport};
pub use error::{MigrateError, MigrateResult, SourceError};
pub use events::{EventSink, TracingSink, TransferEvent};
pub use infrastructure::PageDriver;
pub use models::{Episode, EpisodeSequence, Extraction, ExtractionOutcome, Platform, WorkInfo};
pub use orchestrator::{App, Pipeline, TransferReport, TransferRequest};
pub use sources::{source_for, SourcePlatform};
