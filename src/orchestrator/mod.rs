//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `pipeline` - 单次迁移
//! - 校验平台组合、认证信息、目标 URL
//! - 来源适配器抽取有序话列表
//! - 目标驱动登录并逐话投稿
//!
//! ### `app` - 交互式入口
//! - 菜单选择平台、读取输入
//! - 持有浏览器打开方式和事件输出
//! - 循环执行迁移直到退出
//!
//! ## 层次关系
//!
//! ```text
//! app (菜单循环)
//!     ↓
//! pipeline (一次迁移)
//!     ↓                      ↓
//! sources (HTTP 抽取)     destinations (浏览器投稿)
//!                              ↓
//!                         workflow::submit_episode (单话)
//!                              ↓
//!                         infrastructure (PageDriver)
//! ```

pub mod app;
pub mod pipeline;

pub use app::App;
pub use pipeline::{Pipeline, TransferReport, TransferRequest};
