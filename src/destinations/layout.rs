//! 目标平台的页面布局
//!
//! 登录页、投稿表单的地址和选择器都集中在这里，流程代码不写死站点细节

use crate::models::Platform;

/// 一个目标平台的页面布局
#[derive(Debug)]
pub struct DestinationLayout {
    pub platform: Platform,
    /// 登录页
    pub login_url: &'static str,
    pub login_id_field: &'static str,
    pub login_password_field: &'static str,
    pub login_submit: &'static str,
    /// 当前 URL 包含该片段时说明仍在登录页
    pub login_marker: &'static str,
    /// 当前 URL 包含该片段时说明被带到了二段认证页
    pub second_factor_marker: Option<&'static str>,
    /// 登录后用于确认的页面
    pub landing_url: &'static str,
    /// 由作品管理 URL（已去掉末尾 `/`）得到投稿表单 URL
    pub form_url: fn(&str) -> String,
    pub title_field: &'static str,
    pub body_field: &'static str,
    /// 首选提交按钮
    pub primary_submit: &'static str,
    /// 首选按钮不存在时使用的通用提交按钮
    pub fallback_submit: &'static str,
}

impl DestinationLayout {
    /// 投稿表单 URL
    pub fn episode_form_url(&self, work_url: &str) -> String {
        (self.form_url)(work_url.trim().trim_end_matches('/'))
    }
}
